//! One-way bindings that mirror a file selection into a text display.
//!
//! A binding ties one selection control to one display element. After every
//! change notification the display's text equals the name of the control's
//! currently selected file, or the empty string when nothing is selected.
//! The handler re-derives that text in full on each notification; there is
//! no incremental state.

use thiserror::Error;

/// Binding establishment failure.
///
/// Signals a miswired window at startup, not a runtime fault; it is surfaced
/// once during initialization and never caught or retried.
#[derive(Debug, Error)]
pub enum BindingError {
    #[error("binding target `{0}` was not found")]
    TargetMissing(&'static str),
}

/// Read side of a binding: a control holding zero or one selected file.
pub trait SelectionControl {
    /// Name of the currently selected file, if any.
    fn selected_file_name(&self) -> Option<String>;
}

/// Write side of a binding: an element owning a single text value.
pub trait TextDisplay {
    fn set_text(&mut self, text: &str);
}

/// One established control → display binding.
///
/// Both endpoints are injected, already looked up; a failed lookup produces
/// [`BindingError::TargetMissing`] before a binding ever exists.
pub struct LabelBinding<C, D> {
    control: C,
    display: D,
}

impl<C: SelectionControl, D: TextDisplay> LabelBinding<C, D> {
    /// Establish the binding and synchronize the display once.
    pub fn bind(control: C, display: D) -> LabelBinding<C, D> {
        let mut binding = LabelBinding { control, display };
        binding.selection_changed();
        binding
    }

    /// Change-notification handler.
    ///
    /// Synchronously sets the display text from the control's current
    /// selection. Idempotent; mutates nothing but the bound display.
    pub fn selection_changed(&mut self) {
        match self.control.selected_file_name() {
            Some(name) => self.display.set_text(&name),
            None => self.display.set_text(""),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[derive(Clone, Default)]
    struct FakeControl {
        selected: Rc<RefCell<Option<String>>>,
    }

    impl FakeControl {
        fn select(&self, name: &str) {
            *self.selected.borrow_mut() = Some(name.to_string());
        }

        fn clear(&self) {
            *self.selected.borrow_mut() = None;
        }
    }

    impl SelectionControl for FakeControl {
        fn selected_file_name(&self) -> Option<String> {
            self.selected.borrow().clone()
        }
    }

    #[derive(Clone, Default)]
    struct FakeDisplay {
        text: Rc<RefCell<String>>,
        set_count: Rc<RefCell<usize>>,
    }

    impl FakeDisplay {
        fn text(&self) -> String {
            self.text.borrow().clone()
        }
    }

    impl TextDisplay for FakeDisplay {
        fn set_text(&mut self, text: &str) {
            *self.text.borrow_mut() = text.to_string();
            *self.set_count.borrow_mut() += 1;
        }
    }

    #[test]
    fn display_stays_empty_when_nothing_is_ever_selected() {
        let control = FakeControl::default();
        let display = FakeDisplay::default();
        let mut binding = LabelBinding::bind(control, display.clone());

        binding.selection_changed();
        assert_eq!(display.text(), "");
    }

    #[test]
    fn selecting_a_file_shows_its_name() {
        let control = FakeControl::default();
        let display = FakeDisplay::default();
        let mut binding = LabelBinding::bind(control.clone(), display.clone());

        control.select("report.pdf");
        binding.selection_changed();
        assert_eq!(display.text(), "report.pdf");
    }

    #[test]
    fn clearing_the_selection_clears_the_display() {
        let control = FakeControl::default();
        let display = FakeDisplay::default();
        let mut binding = LabelBinding::bind(control.clone(), display.clone());

        control.select("report.pdf");
        binding.selection_changed();
        control.clear();
        binding.selection_changed();
        assert_eq!(display.text(), "");
    }

    #[test]
    fn repeated_notifications_are_idempotent() {
        let control = FakeControl::default();
        let display = FakeDisplay::default();
        let mut binding = LabelBinding::bind(control.clone(), display.clone());

        control.select("report.pdf");
        binding.selection_changed();
        binding.selection_changed();
        assert_eq!(display.text(), "report.pdf");
        assert_eq!(*display.set_count.borrow(), 3); // bind + two notifications
    }

    #[test]
    fn bindings_are_independent() {
        let control_a = FakeControl::default();
        let display_a = FakeDisplay::default();
        let mut binding_a = LabelBinding::bind(control_a.clone(), display_a.clone());

        let control_b = FakeControl::default();
        let display_b = FakeDisplay::default();
        let mut binding_b = LabelBinding::bind(control_b.clone(), display_b.clone());

        control_a.select("a.txt");
        binding_a.selection_changed();
        control_b.select("b.txt");
        binding_b.selection_changed();

        assert_eq!(display_a.text(), "a.txt");
        assert_eq!(display_b.text(), "b.txt");

        control_a.clear();
        binding_a.selection_changed();
        assert_eq!(display_a.text(), "");
        assert_eq!(display_b.text(), "b.txt");
    }
}
