//! Modal stack for managing overlays
//!
//! Dialogs for importing, choosing the export format, help and quitting.

use super::command_type::CommandType;

/// A modal overlay displayed on top of the main screen
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    /// Quit confirmation dialog
    QuitConfirm,
    /// Path prompt for importing a file into a tab
    Import { command_type: CommandType },
    /// Export format selection
    ExportFormat { selected_index: usize },
    /// Help dialog showing all keyboard shortcuts
    Help,
}

/// A stack of modal overlays
///
/// Modals are rendered from bottom to top, with only the top modal
/// receiving input events.
#[derive(Debug, Default)]
pub struct ModalStack {
    stack: Vec<Modal>,
}

impl ModalStack {
    /// Create an empty modal stack
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    /// Push a modal onto the stack
    pub fn push(&mut self, modal: Modal) {
        self.stack.push(modal);
    }

    /// Pop the top modal from the stack
    pub fn pop(&mut self) -> Option<Modal> {
        self.stack.pop()
    }

    /// Get a reference to the top modal without removing it
    pub fn top(&self) -> Option<&Modal> {
        self.stack.last()
    }

    /// Get a mutable reference to the top modal
    pub fn top_mut(&mut self) -> Option<&mut Modal> {
        self.stack.last_mut()
    }

    /// Check if the stack is empty
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_stack_push_pop() {
        let mut stack = ModalStack::new();
        assert!(stack.top().is_none());

        stack.push(Modal::Help);
        stack.push(Modal::QuitConfirm);

        assert_eq!(stack.pop(), Some(Modal::QuitConfirm));
        assert_eq!(stack.pop(), Some(Modal::Help));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_modal_stack_top_mut() {
        let mut stack = ModalStack::new();
        stack.push(Modal::ExportFormat { selected_index: 0 });

        if let Some(Modal::ExportFormat { selected_index }) = stack.top_mut() {
            *selected_index = 1;
        }

        assert_eq!(stack.top(), Some(&Modal::ExportFormat { selected_index: 1 }));
    }

    #[test]
    fn test_import_modal_carries_tab() {
        let mut stack = ModalStack::new();
        stack.push(Modal::Import {
            command_type: CommandType::Ddl,
        });
        assert!(matches!(
            stack.top(),
            Some(Modal::Import { command_type: CommandType::Ddl })
        ));
    }
}
