//! Root application component
//!
//! The App struct implements the Component trait, acting as the root component
//! that delegates event handling and rendering to child components. It owns the
//! workspace, the file loader and the modal stack.

use crate::action::Action;
use crate::component::Component;
use crate::components::content::marker_line;
use crate::components::{
    draw_home_screen, ContentComponent, ExportFormatDialog, HelpDialog, HomeComponent,
    HomeRenderContext, ImportDialog, LoadProgress, QuitDialog,
};
use crate::config::Config;
use crate::model::modal::{Modal, ModalStack};
use crate::model::{CommandType, SectionName, Workspace};
use crate::services::{self, ExportFormat, FileLoader, LoadOutcome};
use anyhow::Result;
use chrono::Local;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};
use std::path::{Path, PathBuf};

/// A buffer or one section of it, queued for the external editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    pub command_type: CommandType,
    /// `None` edits the whole buffer
    pub section: Option<SectionName>,
}

impl EditRequest {
    /// Name of the scratch file handed to the editor
    pub fn file_name(&self) -> String {
        let part = self.section.map_or("buffer", |s| s.as_str());
        format!(
            "sqltpl-{}-{}-{}.sql",
            std::process::id(),
            self.command_type.tag().to_lowercase(),
            part
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

/// Main application state - coordinates between components
pub struct App {
    /// Tab content controllers and the active tab
    pub workspace: Workspace,

    /// Background file reads
    pub loader: FileLoader,

    /// Modal overlay stack
    pub modals: ModalStack,

    pub config: Config,

    /// Where config changes are persisted; `None` keeps them in memory
    pub config_path: Option<PathBuf>,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// Error message to display
    pub error: Option<String>,

    /// Status message to display
    pub status_message: Option<String>,

    /// Pending external edit (set by edit actions, handled by main loop)
    pub pending_edit: Option<EditRequest>,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub home: HomeComponent,
    pub content: ContentComponent,
    pub quit_dialog: QuitDialog,
    pub help_dialog: HelpDialog,
    pub import_dialog: ImportDialog,
    pub export_dialog: ExportFormatDialog,
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    /// Create the app with an empty workspace. `config_path` is where
    /// format changes are written back.
    pub fn new(config: Config, config_path: Option<PathBuf>) -> App {
        App {
            workspace: Workspace::new(),
            loader: FileLoader::new(config.chunk_size),
            modals: ModalStack::new(),
            export_dialog: ExportFormatDialog::new(config.export_format),
            config,
            config_path,
            should_quit: false,
            error: None,
            status_message: None,
            pending_edit: None,
            home: HomeComponent::new(),
            content: ContentComponent::new(),
            quit_dialog: QuitDialog::default(),
            help_dialog: HelpDialog::default(),
            import_dialog: ImportDialog::default(),
        }
    }

    /// Show a timestamped status line and clear any error
    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(format!(
            "{} {}",
            Local::now().format("%H:%M:%S"),
            message.into()
        ));
        self.error = None;
    }

    /// Show an error in the status bar until the next status message
    fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Begin reading a file into a tab
    fn import_file(&mut self, command_type: CommandType, path: &str) {
        if matches!(self.modals.top(), Some(Modal::Import { .. })) {
            self.modals.pop();
        }
        if self.loader.start(command_type, Path::new(path)) {
            let name = self.loader.loading_file_name(command_type).unwrap_or(path);
            let message = format!("Reading {} into {}", name, command_type);
            self.set_status(message);
        } else {
            tracing::debug!(tab = %command_type, path, "import ignored");
        }
    }

    /// Put a finished read into its tab, or report why it failed
    fn apply_load_outcome(&mut self, outcome: LoadOutcome) {
        match outcome {
            LoadOutcome::Loaded {
                command_type,
                file_name,
                text,
            } => {
                let sections = crate::model::SqlTemplate::parse(&text).names();
                tracing::debug!(tab = %command_type, ?sections, "sections found");
                if self.workspace.load(command_type, text, file_name.clone()) {
                    self.set_status(format!(
                        "Loaded {} into {} ({} sections)",
                        file_name,
                        command_type,
                        sections.len()
                    ));
                }
            }
            LoadOutcome::Failed {
                file_name, error, ..
            } => {
                self.set_error(format!("Could not load {}: {}", file_name, error));
            }
        }
    }

    /// Route pasted text to the import prompt or the active tab
    fn paste(&mut self, text: String) {
        if matches!(self.modals.top(), Some(Modal::Import { .. })) {
            self.import_dialog.paste(&text);
            return;
        }
        if !self.modals.is_empty() {
            return;
        }
        let current = self.workspace.current();
        // The newest input wins over a read still in flight
        self.loader.cancel(current);
        let lines = text.lines().count();
        if self.workspace.update(current, text) {
            self.set_status(format!("Pasted {} lines into {}", lines, current));
        }
    }

    /// Export the active tab in the configured format
    fn export_current(&mut self) {
        let current = self.workspace.current();
        let format = self.config.export_format;
        let dir = self.config.export_dir();
        let result = match self.workspace.current_controller_mut() {
            Some(controller) => {
                controller.update_download_button_status();
                services::export_tab(controller, format, &dir)
            }
            None => Ok(None),
        };
        match result {
            Ok(Some(path)) => self.set_status(format!("Exported {} to {}", current, path.display())),
            Ok(None) => self.set_status(format!("Nothing to export in {}", current)),
            Err(e) => self.set_error(format!("Export failed: {}", e)),
        }
    }

    /// Write the example template into the export directory
    fn write_example(&mut self) {
        match services::write_example(None, &self.config.export_dir()) {
            Ok(path) => self.set_status(format!("Example written to {}", path.display())),
            Err(e) => self.set_error(format!("Could not write example: {}", e)),
        }
    }

    /// Switch the export format and persist it to the config file
    fn set_export_format(&mut self, format: ExportFormat) {
        if matches!(self.modals.top(), Some(Modal::ExportFormat { .. })) {
            self.modals.pop();
        }
        self.config.export_format = format;
        self.export_dialog.current = format;
        // Only the format is persisted; other values may be session overrides
        if let Some(ref path) = self.config_path {
            match Config::read_from(path) {
                Ok(mut stored) => {
                    stored.export_format = format;
                    if let Err(e) = stored.save_to(path) {
                        tracing::warn!(error = %e, "could not save config");
                    }
                }
                Err(e) => {
                    // Leave a broken file for the user to fix
                    tracing::warn!(path = %path.display(), error = %e, "config not saved");
                    self.set_status(format!(
                        "Export format set to {} for this session ({} is invalid)",
                        format.label(),
                        path.display()
                    ));
                    return;
                }
            }
        }
        self.set_status(format!("Export format set to {}", format.label()));
    }

    /// Queue an external edit of the buffer or one section
    fn request_edit(&mut self, section: Option<SectionName>) {
        let command_type = self.workspace.current();
        if self.workspace.current_controller().is_none() {
            self.set_status(format!("Load or paste a {} template first", command_type));
            return;
        }
        self.pending_edit = Some(EditRequest {
            command_type,
            section,
        });
    }

    /// Text written to the scratch file for an edit
    pub fn edit_seed(&self, request: &EditRequest) -> Option<String> {
        let controller = self.workspace.controller(request.command_type)?;
        let text = match request.section {
            None => controller.text().to_string(),
            Some(name) => controller
                .sections()
                .get(name)
                .unwrap_or_default()
                .to_string(),
        };
        Some(text)
    }

    /// Put edited text back into its tab
    pub fn apply_edit(&mut self, request: &EditRequest, edited: String) {
        let Some(original) = self.edit_seed(request) else {
            return;
        };
        let edited = strip_editor_newline(&original, edited);
        if edited == original {
            self.set_status("No changes");
            return;
        }

        match request.section {
            None => {
                self.workspace.update(request.command_type, edited);
                self.set_status(format!("{} buffer updated", request.command_type));
            }
            Some(name) => {
                if let Some(controller) = self.workspace.controller_mut(request.command_type) {
                    controller.replace_section(name, &edited);
                }
                self.set_status(format!("{} updated in {}", name, request.command_type));
            }
        }
    }

    fn select_tab(&mut self, command_type: CommandType) {
        if self.workspace.select_tab(command_type) {
            tracing::debug!(tab = %command_type, "tab selected");
        }
    }

    /// Scroll the content panel to the marker of the outline selection
    fn follow_selected_section(&mut self) {
        let current = self.workspace.current();
        let Some(controller) = self.workspace.current_controller() else {
            return;
        };
        if let Some(line) = marker_line(controller.text(), self.home.selected_section()) {
            self.content.set_content(current, Some(controller));
            self.content.scroll_to_line(line);
        }
    }

    fn loaded_tabs(&self) -> Vec<String> {
        CommandType::tabs()
            .iter()
            .filter(|t| self.workspace.controller(**t).is_some_and(|c| c.has_content()))
            .map(|t| t.to_string())
            .collect()
    }
}

/// Editors usually end the file with a newline. Drop it when the original
/// text had none.
fn strip_editor_newline(original: &str, mut edited: String) -> String {
    if !original.ends_with('\n') {
        if edited.ends_with("\r\n") {
            edited.truncate(edited.len() - 2);
        } else if edited.ends_with('\n') {
            edited.truncate(edited.len() - 1);
        }
    }
    edited
}

impl Component for App {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match self.modals.top() {
            Some(Modal::QuitConfirm) => self.quit_dialog.handle_key_event(key),
            Some(Modal::Import { .. }) => self.import_dialog.handle_key_event(key),
            Some(Modal::ExportFormat { .. }) => self.export_dialog.handle_key_event(key),
            Some(Modal::Help) => self.help_dialog.handle_key_event(key),
            None => self.home.handle_key_event(key),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {
                for outcome in self.loader.poll() {
                    self.apply_load_outcome(outcome);
                }
            }
            Action::ForceQuit => {
                self.should_quit = true;
            }
            Action::Resize(_, _) => {}

            // ─────────────────────────────────────────────────────────────────
            // Navigation
            // ─────────────────────────────────────────────────────────────────
            Action::NextTab => {
                self.select_tab(self.workspace.current().next());
                self.home.update(action)?;
            }
            Action::PrevTab => {
                self.select_tab(self.workspace.current().previous());
                self.home.update(action)?;
            }
            Action::SelectTab(command_type) => {
                self.select_tab(command_type);
                self.home.update(action)?;
            }
            Action::NextSection | Action::PrevSection => {
                self.home.update(action)?;
                self.follow_selected_section();
            }

            // ─────────────────────────────────────────────────────────────────
            // Scrolling (delegate to ContentComponent)
            // ─────────────────────────────────────────────────────────────────
            Action::ScrollUp
            | Action::ScrollDown
            | Action::PageUp
            | Action::PageDown
            | Action::ScrollTop => {
                self.content.update(action)?;
            }

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                self.quit_dialog.set_unsaved_tabs(self.loaded_tabs());
                self.modals.push(Modal::QuitConfirm);
            }
            Action::OpenImport => {
                let command_type = self.workspace.current();
                self.import_dialog.open(command_type);
                self.modals.push(Modal::Import { command_type });
            }
            Action::OpenExportFormat => {
                self.export_dialog = ExportFormatDialog::new(self.config.export_format);
                self.modals.push(Modal::ExportFormat {
                    selected_index: self.export_dialog.selected_index,
                });
            }
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help);
            }
            Action::CloseModal => {
                self.modals.pop();
            }
            Action::ConfirmModal => match self.modals.top() {
                Some(Modal::QuitConfirm) => self.should_quit = true,
                Some(Modal::ExportFormat { .. }) => {
                    return Ok(Some(Action::SetExportFormat(
                        self.export_dialog.selected_format(),
                    )));
                }
                _ => {}
            },
            Action::ModalUp | Action::ModalDown => {
                if let Some(Modal::ExportFormat { selected_index }) = self.modals.top_mut() {
                    *selected_index = self.export_dialog.selected_index;
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Content
            // ─────────────────────────────────────────────────────────────────
            Action::ImportFile(command_type, path) => self.import_file(command_type, &path),
            Action::Paste(text) => self.paste(text),
            Action::Export => self.export_current(),
            Action::SetExportFormat(format) => self.set_export_format(format),
            Action::WriteExample => self.write_example(),
            Action::EditBuffer => self.request_edit(None),
            Action::EditSection(name) => self.request_edit(Some(name)),
            Action::EditSelectedSection => {
                return Ok(Some(Action::EditSection(self.home.selected_section())));
            }
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let current = self.workspace.current();
        let export_dir = self.config.export_dir();
        let loading = match (
            self.loader.loading_file_name(current),
            self.loader.progress(current),
        ) {
            (Some(file_name), Some((read, total))) => Some(LoadProgress {
                file_name,
                read,
                total,
            }),
            _ => None,
        };

        let ctx = HomeRenderContext {
            workspace: &self.workspace,
            loading,
            export_format: self.config.export_format,
            export_dir: &export_dir,
            error: self.error.as_deref(),
            status_message: self.status_message.as_deref(),
        };

        draw_home_screen(frame, area, &mut self.home, &mut self.content, &ctx)?;

        match self.modals.top() {
            Some(Modal::QuitConfirm) => self.quit_dialog.draw(frame, area)?,
            Some(Modal::Import { command_type }) => {
                self.import_dialog.command_type = *command_type;
                self.import_dialog.draw(frame, area)?;
            }
            Some(Modal::ExportFormat { selected_index }) => {
                self.export_dialog.select(*selected_index);
                self.export_dialog.draw(frame, area)?;
            }
            Some(Modal::Help) => self.help_dialog.draw(frame, area)?,
            None => {}
        }
        Ok(())
    }
}
