//! Per-tab content state
//!
//! One controller exists per tab once a file has been loaded into it. The
//! controller owns the raw buffer; sections are derived from it on demand.

use super::command_type::CommandType;
use super::section::{SectionName, SqlTemplate};

/// Text buffer and export state of a single tab
#[derive(Debug, Clone)]
pub struct TabContentController {
    command_type: CommandType,
    text: String,
    source_file_name: String,
    has_content: bool,
    download_enabled: bool,
    /// Bumped on every buffer change, used by views to drop cached renders
    revision: u64,
}

impl TabContentController {
    pub fn new(command_type: CommandType, text: String, source_file_name: String) -> Self {
        let mut controller = Self {
            command_type,
            text: String::new(),
            source_file_name: String::new(),
            has_content: false,
            download_enabled: false,
            revision: 0,
        };
        controller.reset_page_content(text, source_file_name);
        controller
    }

    pub fn command_type(&self) -> CommandType {
        self.command_type
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source_file_name(&self) -> &str {
        &self.source_file_name
    }

    pub fn has_content(&self) -> bool {
        self.has_content
    }

    pub fn download_enabled(&self) -> bool {
        self.download_enabled
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace buffer and source file name after a new file was loaded
    pub fn reset_page_content(&mut self, text: String, source_file_name: String) {
        self.text = text;
        self.source_file_name = source_file_name;
        self.has_content = true;
        self.revision += 1;
        self.update_download_button_status();
    }

    /// Replace the buffer only, keeping the source file name
    pub fn update_page_content(&mut self, text: String) {
        self.text = text;
        self.has_content = true;
        self.revision += 1;
        self.update_download_button_status();
    }

    /// Re-evaluate whether the buffer can be exported
    pub fn update_download_button_status(&mut self) -> bool {
        self.download_enabled = self.has_content && !self.text.trim().is_empty();
        self.download_enabled
    }

    /// Parse the buffer into sections
    pub fn sections(&self) -> SqlTemplate {
        SqlTemplate::parse(&self.text)
    }

    /// Replace one section body and rewrite the buffer in canonical form.
    /// A blank body removes the section.
    pub fn replace_section(&mut self, name: SectionName, body: &str) {
        let mut template = self.sections();
        if body.trim().is_empty() {
            template.remove(name);
        } else {
            template.set(name, body);
        }
        self.update_page_content(template.to_sql());
    }

    /// Base name used for exported files, e.g. `orders` for `orders.sql`
    pub fn export_stem(&self) -> String {
        let stem = std::path::Path::new(&self.source_file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        if stem.is_empty() {
            "template".to_string()
        } else {
            stem
        }
    }
}
