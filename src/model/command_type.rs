//! Script classification shared by tabs, loads and exports

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which tab a piece of SQL belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandType {
    Dml,
    Ddl,
    /// Unrecognized tag. Never owns a tab.
    None,
}

impl CommandType {
    /// The tabs shown in the UI, in display order
    pub fn tabs() -> [CommandType; 2] {
        [CommandType::Dml, CommandType::Ddl]
    }

    /// Resolve a textual tag such as `"DML"`; anything unknown is `None`
    pub fn from_tag(tag: &str) -> CommandType {
        match tag.trim().to_ascii_uppercase().as_str() {
            "DML" => CommandType::Dml,
            "DDL" => CommandType::Ddl,
            _ => CommandType::None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            CommandType::Dml => "DML",
            CommandType::Ddl => "DDL",
            CommandType::None => "NONE",
        }
    }

    /// Whether this type can own tab content
    pub fn is_tab(&self) -> bool {
        !matches!(self, CommandType::None)
    }

    pub fn next(&self) -> CommandType {
        match self {
            CommandType::Dml => CommandType::Ddl,
            CommandType::Ddl | CommandType::None => CommandType::Dml,
        }
    }

    pub fn previous(&self) -> CommandType {
        // Only two tabs, so previous and next coincide
        self.next()
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag() {
        assert_eq!(CommandType::from_tag("DML"), CommandType::Dml);
        assert_eq!(CommandType::from_tag("ddl"), CommandType::Ddl);
        assert_eq!(CommandType::from_tag(" Ddl "), CommandType::Ddl);
        assert_eq!(CommandType::from_tag("DCL"), CommandType::None);
        assert_eq!(CommandType::from_tag(""), CommandType::None);
    }

    #[test]
    fn test_tabs_exclude_none() {
        assert!(CommandType::tabs().iter().all(|t| t.is_tab()));
        assert!(!CommandType::None.is_tab());
    }

    #[test]
    fn test_tab_cycling() {
        assert_eq!(CommandType::Dml.next(), CommandType::Ddl);
        assert_eq!(CommandType::Ddl.next(), CommandType::Dml);
        assert_eq!(CommandType::Ddl.previous(), CommandType::Dml);
    }
}
