//! Workspace - owner of all tab content
//!
//! Holds the mapping from command type to its content controller and the
//! currently active tab. Lookups go through this struct, never global state.

use super::command_type::CommandType;
use super::tab_content::TabContentController;
use std::collections::HashMap;

/// File name given to content that did not come from a file
pub const PASTED_FILE_NAME: &str = "pasted.sql";

#[derive(Debug)]
pub struct Workspace {
    controllers: HashMap<CommandType, TabContentController>,
    current: CommandType,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            controllers: HashMap::new(),
            current: CommandType::Dml,
        }
    }

    pub fn current(&self) -> CommandType {
        self.current
    }

    /// Make a tab active, re-checking its export status.
    /// Returns false for `CommandType::None`.
    pub fn select_tab(&mut self, command_type: CommandType) -> bool {
        if !command_type.is_tab() {
            return false;
        }
        self.current = command_type;
        if let Some(controller) = self.controllers.get_mut(&command_type) {
            controller.update_download_button_status();
        }
        true
    }

    /// Apply loaded file content: reset the existing controller of that type
    /// or create it. Returns false (and changes nothing) for `None`.
    pub fn load(&mut self, command_type: CommandType, text: String, file_name: String) -> bool {
        if !command_type.is_tab() {
            return false;
        }
        match self.controllers.get_mut(&command_type) {
            Some(controller) => controller.reset_page_content(text, file_name),
            None => {
                self.controllers.insert(
                    command_type,
                    TabContentController::new(command_type, text, file_name),
                );
            }
        }
        true
    }

    /// Replace the buffer of a tab with content from outside a file load
    pub fn update(&mut self, command_type: CommandType, text: String) -> bool {
        if !command_type.is_tab() {
            return false;
        }
        match self.controllers.get_mut(&command_type) {
            Some(controller) => controller.update_page_content(text),
            None => {
                self.controllers.insert(
                    command_type,
                    TabContentController::new(command_type, text, PASTED_FILE_NAME.to_string()),
                );
            }
        }
        true
    }

    pub fn controller(&self, command_type: CommandType) -> Option<&TabContentController> {
        self.controllers.get(&command_type)
    }

    pub fn controller_mut(&mut self, command_type: CommandType) -> Option<&mut TabContentController> {
        self.controllers.get_mut(&command_type)
    }

    pub fn current_controller(&self) -> Option<&TabContentController> {
        self.controllers.get(&self.current)
    }

    pub fn current_controller_mut(&mut self) -> Option<&mut TabContentController> {
        self.controllers.get_mut(&self.current)
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_controller_per_type() {
        let mut ws = Workspace::new();
        assert!(ws.load(CommandType::Dml, "a".into(), "a.sql".into()));
        assert!(ws.load(CommandType::Ddl, "b".into(), "b.sql".into()));
        assert_eq!(ws.len(), 2);

        assert!(ws.load(CommandType::Dml, "c".into(), "c.sql".into()));
        assert_eq!(ws.len(), 2);

        let dml = ws.controller(CommandType::Dml).unwrap();
        assert_eq!(dml.text(), "c");
        assert_eq!(dml.source_file_name(), "c.sql");
        // Reset, not recreated
        assert_eq!(dml.revision(), 2);
    }

    #[test]
    fn test_none_is_ignored() {
        let mut ws = Workspace::new();
        ws.load(CommandType::Dml, "a".into(), "a.sql".into());

        assert!(!ws.load(CommandType::None, "x".into(), "x.sql".into()));
        assert!(!ws.update(CommandType::None, "x".into()));
        assert!(!ws.select_tab(CommandType::None));

        assert_eq!(ws.len(), 1);
        assert!(ws.controller(CommandType::None).is_none());
        assert_eq!(ws.current(), CommandType::Dml);
    }

    #[test]
    fn test_update_existing_keeps_file_name() {
        let mut ws = Workspace::new();
        ws.load(CommandType::Ddl, "a".into(), "schema.sql".into());
        ws.update(CommandType::Ddl, "b".into());
        let ddl = ws.controller(CommandType::Ddl).unwrap();
        assert_eq!(ddl.text(), "b");
        assert_eq!(ddl.source_file_name(), "schema.sql");
    }

    #[test]
    fn test_update_creates_when_missing() {
        let mut ws = Workspace::new();
        ws.update(CommandType::Ddl, "CREATE TABLE t (id INT);".into());
        let ddl = ws.controller(CommandType::Ddl).unwrap();
        assert_eq!(ddl.source_file_name(), PASTED_FILE_NAME);
        assert!(ddl.download_enabled());
    }

    #[test]
    fn test_select_tab() {
        let mut ws = Workspace::new();
        assert_eq!(ws.current(), CommandType::Dml);
        assert!(ws.current_controller().is_none());

        ws.load(CommandType::Ddl, "x".into(), "x.sql".into());
        assert!(ws.select_tab(CommandType::Ddl));
        assert_eq!(ws.current(), CommandType::Ddl);
        assert!(ws.current_controller().is_some());
    }
}
