use std::path::{Path, PathBuf};

/// Identifies one of the two independent (control, label) pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSlot {
    /// The review-comment CSV export.
    Source,
    /// The previous-revision response workbook.
    Previous,
}

/// Current selection of both file controls.
///
/// Each slot holds zero or one path at a time. The slots are fully
/// independent; changing one never affects the other.
#[derive(Debug, Default)]
pub struct SelectionState {
    source: Option<PathBuf>,
    previous: Option<PathBuf>,
}

impl SelectionState {
    pub fn new() -> SelectionState {
        SelectionState::default()
    }

    /// Replace a slot's selection. `None` clears it.
    pub fn set(&mut self, slot: FileSlot, path: Option<PathBuf>) {
        match slot {
            FileSlot::Source => self.source = path,
            FileSlot::Previous => self.previous = path,
        }
    }

    pub fn selected(&self, slot: FileSlot) -> Option<&Path> {
        match slot {
            FileSlot::Source => self.source.as_deref(),
            FileSlot::Previous => self.previous.as_deref(),
        }
    }

    /// File name of the slot's current selection, if any.
    pub fn file_name(&self, slot: FileSlot) -> Option<String> {
        self.selected(slot).map(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slots_have_no_file_name() {
        let state = SelectionState::new();
        assert_eq!(state.file_name(FileSlot::Source), None);
        assert_eq!(state.file_name(FileSlot::Previous), None);
    }

    #[test]
    fn set_and_clear_round_trip() {
        let mut state = SelectionState::new();
        state.set(FileSlot::Source, Some(PathBuf::from("/tmp/report.pdf")));
        assert_eq!(
            state.file_name(FileSlot::Source),
            Some("report.pdf".to_string())
        );

        state.set(FileSlot::Source, None);
        assert_eq!(state.file_name(FileSlot::Source), None);
    }

    #[test]
    fn slots_do_not_affect_each_other() {
        let mut state = SelectionState::new();
        state.set(FileSlot::Source, Some(PathBuf::from("a.txt")));
        state.set(FileSlot::Previous, Some(PathBuf::from("b.txt")));
        assert_eq!(state.file_name(FileSlot::Source), Some("a.txt".to_string()));
        assert_eq!(
            state.file_name(FileSlot::Previous),
            Some("b.txt".to_string())
        );

        state.set(FileSlot::Previous, None);
        assert_eq!(state.file_name(FileSlot::Source), Some("a.txt".to_string()));
        assert_eq!(state.file_name(FileSlot::Previous), None);
    }
}
