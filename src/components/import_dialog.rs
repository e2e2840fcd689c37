//! Import prompt
//!
//! Takes a file path for the active tab. Dropping a file onto most
//! terminals pastes its path, so pasted text lands in the input too.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::model::CommandType;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::path::Path;

pub struct ImportDialog {
    pub command_type: CommandType,
    pub input: String,
    pub error: Option<String>,
}

impl Default for ImportDialog {
    fn default() -> Self {
        Self {
            command_type: CommandType::Dml,
            input: String::new(),
            error: None,
        }
    }
}

impl ImportDialog {
    /// Reset the prompt for a tab
    pub fn open(&mut self, command_type: CommandType) {
        self.command_type = command_type;
        self.input.clear();
        self.error = None;
    }

    /// Append pasted or dropped text
    pub fn paste(&mut self, text: &str) {
        self.input.push_str(&normalize_dropped_path(text));
        self.error = None;
    }

    fn submit(&mut self) -> Option<Action> {
        let path = normalize_dropped_path(&self.input);
        if path.is_empty() {
            self.error = Some("Enter a file path".to_string());
            return None;
        }
        Some(Action::ImportFile(self.command_type, path))
    }
}

/// Clean up a path typed or dropped into the prompt
///
/// Strips surrounding whitespace and quotes, a `file://` prefix, and expands
/// a leading `~/`.
pub fn normalize_dropped_path(text: &str) -> String {
    let mut path = text.trim();
    for quote in ['\'', '"'] {
        if path.len() >= 2 && path.starts_with(quote) && path.ends_with(quote) {
            path = &path[1..path.len() - 1];
        }
    }
    let path = path.strip_prefix("file://").unwrap_or(path);

    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return Path::new(&home).join(rest).to_string_lossy().into_owned();
        }
    }
    path.to_string()
}

impl Component for ImportDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc => Some(Action::CloseModal),
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                self.input.pop();
                self.error = None;
                None
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                self.error = None;
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let width = 70u16.min(area.width.saturating_sub(4));
        let popup_area = centered_popup(area, width, 9);
        frame.render_widget(Clear, popup_area);

        let mut lines = vec![
            Line::from(""),
            Line::from(format!(
                "Path to a .sql file for the {} tab (or drop one here):",
                self.command_type
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("> ", Style::default().fg(Color::Cyan)),
                Span::styled(
                    format!("{}_", &self.input),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        let candidate = normalize_dropped_path(&self.input);
        if let Some(ref error) = self.error {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("Error: {}", error),
                Style::default().fg(Color::Red),
            )));
        } else if !candidate.is_empty() && Path::new(&candidate).is_file() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "✓ File exists",
                Style::default().fg(Color::Green),
            )));
        }

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Import {} ", self.command_type))
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .border_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}
