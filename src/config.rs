//! Persistent application configuration model and defaults.

use std::path::{Path, PathBuf};

/// Root configuration persisted to `revsheet.toml`.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Config {
    #[serde(default)]
    /// UI preferences.
    pub ui: UiConfig,
    #[serde(default)]
    /// Report rendering preferences.
    pub report: ReportConfig,
}

/// UI preferences persisted between sessions.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct UiConfig {
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    #[serde(default = "default_window_height")]
    pub window_height: u32,
}

impl Default for UiConfig {
    fn default() -> UiConfig {
        UiConfig {
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

/// Report rendering preferences persisted between sessions.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ReportConfig {
    /// Template workbook the response sheet is rendered from.
    /// Empty means the bundled default location under the config directory.
    #[serde(default)]
    pub template_path: String,
    /// Revision value restored into the revision field on startup.
    #[serde(default)]
    pub default_revision: String,
    /// Directory rendered workbooks are written to.
    /// Empty means the directory of the source CSV.
    #[serde(default)]
    pub output_dir: String,
}

impl ReportConfig {
    /// Template workbook path with the empty-value default applied.
    pub fn resolved_template_path(&self) -> PathBuf {
        if self.template_path.is_empty() {
            default_template_path()
        } else {
            PathBuf::from(&self.template_path)
        }
    }

    /// Output directory for a report rendered from `source`.
    pub fn resolved_output_dir(&self, source: &Path) -> PathBuf {
        if self.output_dir.is_empty() {
            source.parent().unwrap_or_else(|| Path::new(".")).to_path_buf()
        } else {
            PathBuf::from(&self.output_dir)
        }
    }
}

fn default_template_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("revsheet")
        .join("comment_response_template.xlsx")
}

fn default_window_width() -> u32 {
    560
}

fn default_window_height() -> u32 {
    420
}
