//! Bus endpoint that owns the selection state and the two file-name labels.
//!
//! Each (control, label) pair is wired through its own [`LabelBinding`]; the
//! two bindings never interact. Everything that touches the window goes
//! through `upgrade_in_event_loop`.

use std::sync::{Arc, Mutex};

use log::debug;
use tokio::sync::broadcast::{Receiver, Sender};

use crate::config::Config;
use crate::label_sync::{BindingError, LabelBinding, SelectionControl, TextDisplay};
use crate::protocol::{ConfigMessage, Message, ReportMessage, ReportRequest, SelectionMessage};
use crate::report;
use crate::selection::{FileSlot, SelectionState};
use crate::AppWindow;

fn label_name(slot: FileSlot) -> &'static str {
    match slot {
        FileSlot::Source => "source-file-name label",
        FileSlot::Previous => "previous-file-name label",
    }
}

/// Read adapter exposing one slot of the shared selection state as a control.
struct SlotSelection {
    selection: Arc<Mutex<SelectionState>>,
    slot: FileSlot,
}

impl SelectionControl for SlotSelection {
    fn selected_file_name(&self) -> Option<String> {
        self.selection
            .lock()
            .expect("selection state lock")
            .file_name(self.slot)
    }
}

/// Write adapter targeting one of the window's file-name labels.
struct WindowLabel {
    ui: slint::Weak<AppWindow>,
    slot: FileSlot,
}

impl WindowLabel {
    /// Look up the label's owning window. Must run on the UI thread; fails
    /// when the window is already gone at bind time.
    fn locate(ui: &slint::Weak<AppWindow>, slot: FileSlot) -> Result<WindowLabel, BindingError> {
        if ui.upgrade().is_none() {
            return Err(BindingError::TargetMissing(label_name(slot)));
        }
        Ok(WindowLabel {
            ui: ui.clone(),
            slot,
        })
    }
}

impl TextDisplay for WindowLabel {
    fn set_text(&mut self, text: &str) {
        let slot = self.slot;
        let text = slint::SharedString::from(text);
        let _ = self.ui.upgrade_in_event_loop(move |ui| match slot {
            FileSlot::Source => ui.set_source_file_name(text),
            FileSlot::Previous => ui.set_previous_file_name(text),
        });
    }
}

/// Manages selection changes, render requests, and status display.
pub struct UiManager {
    ui: slint::Weak<AppWindow>,
    bus_receiver: Receiver<Message>,
    bus_sender: Sender<Message>,
    config: Config,
    selection: Arc<Mutex<SelectionState>>,
    source_binding: LabelBinding<SlotSelection, WindowLabel>,
    previous_binding: LabelBinding<SlotSelection, WindowLabel>,
}

impl UiManager {
    /// Build the manager and establish both label bindings.
    ///
    /// Must be called on the UI thread so the label lookups can see the
    /// window; a missing target is a startup error, not something to retry.
    pub fn new(
        ui: slint::Weak<AppWindow>,
        bus_receiver: Receiver<Message>,
        bus_sender: Sender<Message>,
    ) -> Result<UiManager, BindingError> {
        let selection = Arc::new(Mutex::new(SelectionState::new()));
        let source_binding = LabelBinding::bind(
            SlotSelection {
                selection: selection.clone(),
                slot: FileSlot::Source,
            },
            WindowLabel::locate(&ui, FileSlot::Source)?,
        );
        let previous_binding = LabelBinding::bind(
            SlotSelection {
                selection: selection.clone(),
                slot: FileSlot::Previous,
            },
            WindowLabel::locate(&ui, FileSlot::Previous)?,
        );

        Ok(UiManager {
            ui,
            bus_receiver,
            bus_sender,
            config: Config::default(),
            selection,
            source_binding,
            previous_binding,
        })
    }

    pub fn run(&mut self) {
        loop {
            match self.bus_receiver.blocking_recv() {
                Ok(message) => match message {
                    Message::Config(ConfigMessage::ConfigChanged(config)) => {
                        self.config = config;
                    }
                    Message::Selection(SelectionMessage::Changed { slot, path }) => {
                        debug!("Selection changed: slot={:?} path={:?}", slot, path);
                        self.selection
                            .lock()
                            .expect("selection state lock")
                            .set(slot, path);
                        match slot {
                            FileSlot::Source => self.source_binding.selection_changed(),
                            FileSlot::Previous => self.previous_binding.selection_changed(),
                        }
                    }
                    Message::Report(ReportMessage::RunRequested { revision }) => {
                        self.request_render(revision);
                    }
                    Message::Report(ReportMessage::Started) => {
                        self.set_running(true);
                        self.set_status("Rendering response sheet...".to_string());
                    }
                    Message::Report(ReportMessage::Finished { output, rows }) => {
                        self.set_running(false);
                        self.set_status(format!("Wrote {} rows to {}", rows, output.display()));
                    }
                    Message::Report(ReportMessage::Failed { reason }) => {
                        self.set_running(false);
                        self.set_status(reason);
                    }
                    _ => {}
                },
                Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => {}
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    /// Resolve the current selection into a render job, or explain why not.
    fn request_render(&mut self, revision: String) {
        let (source, previous) = {
            let selection = self.selection.lock().expect("selection state lock");
            (
                selection.selected(FileSlot::Source).map(|p| p.to_path_buf()),
                selection
                    .selected(FileSlot::Previous)
                    .map(|p| p.to_path_buf()),
            )
        };

        let Some(source) = source else {
            self.set_status("No file selected.".to_string());
            return;
        };

        let output = self
            .config
            .report
            .resolved_output_dir(&source)
            .join(report::output_file_name(&source));
        let revision = revision.trim().to_string();
        let request = ReportRequest {
            source,
            previous,
            revision: if revision.is_empty() {
                None
            } else {
                Some(revision)
            },
            output,
        };
        let _ = self
            .bus_sender
            .send(Message::Report(ReportMessage::Render(request)));
    }

    fn set_status(&self, status: String) {
        let _ = self.ui.upgrade_in_event_loop(move |ui| {
            ui.set_status_text(status.as_str().into());
        });
    }

    fn set_running(&self, running: bool) {
        let _ = self.ui.upgrade_in_event_loop(move |ui| {
            ui.set_report_running(running);
        });
    }
}
