//! Event-bus protocol shared by all runtime components.
//!
//! This module defines all message payloads exchanged between the selection
//! handling, report rendering, UI, and runtime configuration handlers.

use std::path::PathBuf;

use crate::config::Config;
use crate::selection::FileSlot;

/// Top-level envelope for all bus traffic.
#[derive(Debug, Clone)]
pub enum Message {
    Selection(SelectionMessage),
    Report(ReportMessage),
    Config(ConfigMessage),
}

/// Selection-domain notifications.
#[derive(Debug, Clone)]
pub enum SelectionMessage {
    /// A selection control now holds `path`, or nothing when `None`.
    /// Emitted for every change, including picking the same file again.
    Changed {
        slot: FileSlot,
        path: Option<PathBuf>,
    },
}

/// Fully resolved render job.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    /// Review-comment CSV export (columns `Page`, `Text`).
    pub source: PathBuf,
    /// Previous-revision workbook whose rows are carried over, if any.
    pub previous: Option<PathBuf>,
    /// Value written to the "Rev." column of new rows.
    pub revision: Option<String>,
    pub output: PathBuf,
}

/// Report-domain commands and notifications.
#[derive(Debug, Clone)]
pub enum ReportMessage {
    /// UI requested a render with the revision field's current value.
    /// The UI manager resolves the selected files and the output path.
    RunRequested { revision: String },
    Render(ReportRequest),
    Started,
    Finished { output: PathBuf, rows: usize },
    Failed { reason: String },
}

/// Runtime configuration broadcast.
#[derive(Debug, Clone)]
pub enum ConfigMessage {
    ConfigChanged(Config),
}
