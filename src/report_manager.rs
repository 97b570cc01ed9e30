//! Background worker that renders response workbooks off the UI thread.

use log::{error, info};
use tokio::sync::broadcast::{Receiver, Sender};

use crate::config::Config;
use crate::protocol::{ConfigMessage, Message, ReportMessage, ReportRequest};
use crate::report;

pub struct ReportManager {
    bus_receiver: Receiver<Message>,
    bus_sender: Sender<Message>,
    config: Config,
}

impl ReportManager {
    pub fn new(bus_receiver: Receiver<Message>, bus_sender: Sender<Message>) -> Self {
        Self {
            bus_receiver,
            bus_sender,
            config: Config::default(),
        }
    }

    pub fn run(&mut self) {
        loop {
            match self.bus_receiver.blocking_recv() {
                Ok(message) => match message {
                    Message::Config(ConfigMessage::ConfigChanged(config)) => {
                        self.config = config;
                    }
                    Message::Report(ReportMessage::Render(request)) => {
                        self.render(request);
                    }
                    _ => {}
                },
                Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => {}
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    fn render(&mut self, request: ReportRequest) {
        info!(
            "Rendering {} -> {}",
            request.source.display(),
            request.output.display()
        );
        let _ = self.bus_sender.send(Message::Report(ReportMessage::Started));

        let template_path = self.config.report.resolved_template_path();
        match report::render(&request, &template_path) {
            Ok(rows) => {
                info!("Wrote {} rows to {}", rows, request.output.display());
                let _ = self.bus_sender.send(Message::Report(ReportMessage::Finished {
                    output: request.output,
                    rows,
                }));
            }
            Err(e) => {
                error!("Render failed: {}", e);
                let _ = self.bus_sender.send(Message::Report(ReportMessage::Failed {
                    reason: e.to_string(),
                }));
            }
        }
    }
}
