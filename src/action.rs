//! Action enum - All possible application actions
//!
//! Actions are discrete operations that the application can perform.
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use crate::model::{CommandType, SectionName};
use crate::services::ExportFormat;
use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick, polls background reads
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Force quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────
    /// Move to the next tab
    NextTab,
    /// Move to the previous tab
    PrevTab,
    /// Activate a tab directly
    SelectTab(CommandType),
    /// Select next section in the outline
    NextSection,
    /// Select previous section in the outline
    PrevSection,

    // ─────────────────────────────────────────────────────────────────────────
    // Scrolling
    // ─────────────────────────────────────────────────────────────────────────
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    /// Jump back to the top of the content
    ScrollTop,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    OpenQuitDialog,
    /// Open the import prompt for the active tab
    OpenImport,
    /// Open the export format selector
    OpenExportFormat,
    OpenHelp,
    CloseModal,
    ConfirmModal,
    ModalUp,
    ModalDown,

    // ─────────────────────────────────────────────────────────────────────────
    // Content
    // ─────────────────────────────────────────────────────────────────────────
    /// Start reading a file into a tab
    ImportFile(CommandType, String),
    /// Replace the active tab buffer with pasted text
    Paste(String),
    /// Export the active tab in the configured format
    Export,
    /// Change the export format
    SetExportFormat(ExportFormat),
    /// Write the example template
    WriteExample,
    /// Edit the active tab buffer in $EDITOR
    EditBuffer,
    /// Edit one section of the active tab in $EDITOR
    EditSection(SectionName),
    /// Edit the section selected in the outline
    EditSelectedSection,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::NextTab => write!(f, "NextTab"),
            Action::PrevTab => write!(f, "PrevTab"),
            Action::SelectTab(t) => write!(f, "SelectTab({})", t),
            Action::NextSection => write!(f, "NextSection"),
            Action::PrevSection => write!(f, "PrevSection"),
            Action::ScrollUp => write!(f, "ScrollUp"),
            Action::ScrollDown => write!(f, "ScrollDown"),
            Action::PageUp => write!(f, "PageUp"),
            Action::PageDown => write!(f, "PageDown"),
            Action::ScrollTop => write!(f, "ScrollTop"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenImport => write!(f, "OpenImport"),
            Action::OpenExportFormat => write!(f, "OpenExportFormat"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::ConfirmModal => write!(f, "ConfirmModal"),
            Action::ModalUp => write!(f, "ModalUp"),
            Action::ModalDown => write!(f, "ModalDown"),
            Action::ImportFile(t, path) => write!(f, "ImportFile({}, {})", t, path),
            Action::Paste(text) => write!(f, "Paste({} bytes)", text.len()),
            Action::Export => write!(f, "Export"),
            Action::SetExportFormat(format) => write!(f, "SetExportFormat({})", format.label()),
            Action::WriteExample => write!(f, "WriteExample"),
            Action::EditBuffer => write!(f, "EditBuffer"),
            Action::EditSection(name) => write!(f, "EditSection({})", name),
            Action::EditSelectedSection => write!(f, "EditSelectedSection"),
        }
    }
}
