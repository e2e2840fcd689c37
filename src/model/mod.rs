//! Model layer - centralized state management
//!
//! This module contains all state-related types:
//! - `Workspace` - tab content controllers keyed by command type
//! - `SqlTemplate` - sections parsed from a tab buffer
//! - `ModalStack` - Modal overlay management

pub mod command_type;
pub mod modal;
pub mod section;
pub mod tab_content;
pub mod template;
pub mod workspace;

// Re-export commonly used types
pub use command_type::CommandType;
pub use section::{LineEnding, SectionName, SqlTemplate};
pub use tab_content::TabContentController;
pub use workspace::Workspace;
