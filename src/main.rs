mod config;
mod label_sync;
mod protocol;
mod report;
mod report_manager;
mod selection;
mod ui_manager;

use std::thread;

use config::Config;
use log::{debug, info, warn};
use protocol::{ConfigMessage, Message, ReportMessage, SelectionMessage};
use report_manager::ReportManager;
use selection::FileSlot;
use slint::ComponentHandle;
use tokio::sync::broadcast;
use ui_manager::UiManager;

slint::include_modules!();

fn panic_payload_to_string(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        return (*s).to_string();
    }
    if let Some(s) = payload.downcast_ref::<String>() {
        return s.clone();
    }
    "non-string panic payload".to_string()
}

fn sanitize_config(mut config: Config) -> Config {
    if config.ui.window_width < 480 {
        config.ui.window_width = 480;
    }
    if config.ui.window_height < 320 {
        config.ui.window_height = 320;
    }
    config
}

fn apply_config_to_ui(ui: &AppWindow, config: &Config) {
    ui.window().set_size(slint::LogicalSize::new(
        config.ui.window_width as f32,
        config.ui.window_height as f32,
    ));
    ui.set_revision_text(config.report.default_revision.as_str().into());
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut clog = colog::default_builder();
    clog.filter(None, log::LevelFilter::Debug);
    clog.init();

    std::panic::set_hook(Box::new(|panic_info| {
        let current_thread = std::thread::current();
        let thread_name = current_thread.name().unwrap_or("unnamed");
        log::error!("panic in thread '{}': {}", thread_name, panic_info);
    }));

    if std::env::var_os("SLINT_BACKEND").is_none() {
        std::env::set_var("SLINT_BACKEND", "winit-software");
        info!("SLINT_BACKEND not set. Defaulting to winit-software");
    }

    let ui = AppWindow::new()?;

    let config_dir = dirs::config_dir().unwrap();
    let config_file = config_dir.join("revsheet.toml");

    if !config_file.exists() {
        let default_config = Config::default();

        info!(
            "Config file not found. Creating default config. path={}",
            config_file.display()
        );
        std::fs::write(
            config_file.clone(),
            toml::to_string(&default_config).unwrap(),
        )
        .unwrap();
    }

    let config_content = std::fs::read_to_string(config_file.clone()).unwrap();
    let config = sanitize_config(toml::from_str::<Config>(&config_content).unwrap_or_default());
    apply_config_to_ui(&ui, &config);

    // Bus for communication between components
    let (bus_sender, _) = broadcast::channel(64);

    // Setup comment CSV file dialog
    let bus_sender_clone = bus_sender.clone();
    ui.on_pick_source(move || {
        debug!("Opening comment CSV dialog");
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Comment CSV", &["csv"])
            .pick_file()
        {
            debug!("Comment CSV selected: {:?}", path);
            let _ = bus_sender_clone.send(Message::Selection(SelectionMessage::Changed {
                slot: FileSlot::Source,
                path: Some(path),
            }));
        }
    });

    let bus_sender_clone = bus_sender.clone();
    ui.on_clear_source(move || {
        debug!("Comment CSV selection cleared");
        let _ = bus_sender_clone.send(Message::Selection(SelectionMessage::Changed {
            slot: FileSlot::Source,
            path: None,
        }));
    });

    // Setup previous revision file dialog
    let bus_sender_clone = bus_sender.clone();
    ui.on_pick_previous(move || {
        debug!("Opening previous revision dialog");
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Excel Workbook", &["xlsx"])
            .pick_file()
        {
            debug!("Previous revision selected: {:?}", path);
            let _ = bus_sender_clone.send(Message::Selection(SelectionMessage::Changed {
                slot: FileSlot::Previous,
                path: Some(path),
            }));
        }
    });

    let bus_sender_clone = bus_sender.clone();
    ui.on_clear_previous(move || {
        debug!("Previous revision selection cleared");
        let _ = bus_sender_clone.send(Message::Selection(SelectionMessage::Changed {
            slot: FileSlot::Previous,
            path: None,
        }));
    });

    // Wire up render button
    let bus_sender_clone = bus_sender.clone();
    ui.on_run_report(move |revision| {
        debug!("Render requested: revision={}", revision);
        let _ = bus_sender_clone.send(Message::Report(ReportMessage::RunRequested {
            revision: revision.to_string(),
        }));
    });

    // Setup UI manager. The label bindings are established here; a missing
    // target is a startup error.
    let mut ui_manager = UiManager::new(ui.as_weak(), bus_sender.subscribe(), bus_sender.clone())?;
    thread::spawn(move || {
        let run_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            ui_manager.run();
        }));
        if let Err(payload) = run_result {
            log::error!(
                "UiManager thread terminated due to panic: {}",
                panic_payload_to_string(payload.as_ref())
            );
        }
    });

    // Setup report manager
    let report_bus_receiver = bus_sender.subscribe();
    let report_bus_sender = bus_sender.clone();
    thread::spawn(move || {
        let mut report_manager = ReportManager::new(report_bus_receiver, report_bus_sender);
        report_manager.run();
    });

    let bus_sender_clone = bus_sender.clone();
    let _ = bus_sender_clone.send(Message::Config(ConfigMessage::ConfigChanged(config.clone())));

    ui.run()?;

    // Persist window geometry and the revision field for the next session.
    let mut config = config;
    let size = ui.window().size();
    let scale = ui.window().scale_factor();
    config.ui.window_width = (size.width as f32 / scale).round() as u32;
    config.ui.window_height = (size.height as f32 / scale).round() as u32;
    config.report.default_revision = ui.get_revision_text().to_string();
    if let Err(e) = std::fs::write(&config_file, toml::to_string(&config)?) {
        warn!("Failed to persist config: {}", e);
    }

    info!("Application exiting");
    Ok(())
}
