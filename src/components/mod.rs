//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod content;
pub mod export_dialog;
pub mod help_dialog;
pub mod home;
pub mod import_dialog;
pub mod layout;
pub mod quit_dialog;
pub mod sql_highlight;

pub use content::ContentComponent;
pub use export_dialog::ExportFormatDialog;
pub use help_dialog::HelpDialog;
pub use home::{draw_home_screen, HomeComponent, HomeRenderContext, LoadProgress};
pub use import_dialog::ImportDialog;
pub use layout::{calculate_main_layout, centered_popup};
pub use quit_dialog::QuitDialog;
