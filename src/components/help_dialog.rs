//! Help dialog component
//!
//! Lists keyboard shortcuts and the section markers a template may use.

use crate::action::Action;
use crate::component::Component;
use crate::model::section::{SectionName, PLACEHOLDER};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

#[derive(Default)]
pub struct HelpDialog {
    pub scroll_offset: usize,
}

impl Component for HelpDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                None
            }
            KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(10);
                None
            }
            KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        frame.render_widget(Clear, area);

        let margin = 4;
        let dialog_area = Rect::new(
            area.x + margin,
            area.y + margin,
            area.width.saturating_sub(margin * 2),
            area.height.saturating_sub(margin * 2),
        );

        let content = build_help_content();
        let total = content.len();
        let visible_height = dialog_area.height.saturating_sub(2) as usize;

        let max_scroll = total.saturating_sub(visible_height);
        self.scroll_offset = self.scroll_offset.min(max_scroll);

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Keyboard Shortcuts ")
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .scroll((self.scroll_offset as u16, 0));

        frame.render_widget(paragraph, dialog_area);

        if total > visible_height {
            let mut scrollbar_state = ScrollbarState::new(max_scroll).position(self.scroll_offset);

            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                dialog_area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}

fn add_section(lines: &mut Vec<Line<'static>>, title: &str) {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("  {} ", title),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        format!("  {}", "─".repeat(title.chars().count() + 2)),
        Style::default().fg(Color::DarkGray),
    )));
}

fn add_shortcut(lines: &mut Vec<Line<'static>>, key: &str, description: &str) {
    lines.push(Line::from(vec![
        Span::styled(
            format!("  {:14}", key),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(description.to_string(), Style::default().fg(Color::White)),
    ]));
}

/// Build the help content
fn build_help_content() -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    add_section(&mut lines, "Tabs");
    add_shortcut(&mut lines, "Tab", "Next tab (DML/DDL)");
    add_shortcut(&mut lines, "Shift+Tab", "Previous tab");
    add_shortcut(&mut lines, "1 / 2", "Jump to DML / DDL");

    add_section(&mut lines, "Sections");
    add_shortcut(&mut lines, "j / ↓", "Select next section");
    add_shortcut(&mut lines, "k / ↑", "Select previous section");
    add_shortcut(&mut lines, "E / Enter", "Edit selected section in $EDITOR");

    add_section(&mut lines, "Scrolling");
    add_shortcut(&mut lines, "Ctrl+e", "Scroll down one line");
    add_shortcut(&mut lines, "Ctrl+y", "Scroll up one line");
    add_shortcut(&mut lines, "Ctrl+d / PgDn", "Scroll down half page");
    add_shortcut(&mut lines, "Ctrl+u / PgUp", "Scroll up half page");
    add_shortcut(&mut lines, "g", "Back to top");

    add_section(&mut lines, "Files");
    add_shortcut(&mut lines, "o", "Import a .sql file into the active tab");
    add_shortcut(&mut lines, "paste", "Replace the active tab with pasted text");
    add_shortcut(&mut lines, "e", "Edit the whole buffer in $EDITOR");
    add_shortcut(&mut lines, "x", "Export the active tab");
    add_shortcut(&mut lines, "X", "Choose export format");
    add_shortcut(&mut lines, "w", "Write the example template");

    add_section(&mut lines, "General");
    add_shortcut(&mut lines, "?", "Show this help");
    add_shortcut(&mut lines, "q", "Quit");

    add_section(&mut lines, "Section Markers");
    for name in SectionName::all() {
        add_shortcut(&mut lines, name.marker(), name.hint());
    }
    lines.push(Line::from(Span::styled(
        format!("  A {} line right after a marker is skipped.", PLACEHOLDER),
        Style::default().fg(Color::DarkGray),
    )));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Press q, Esc, or ? to close",
        Style::default().fg(Color::DarkGray),
    )));

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_lists_every_marker() {
        let text: Vec<String> = build_help_content()
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.to_string()).collect())
            .collect();
        for name in SectionName::all() {
            assert!(text.iter().any(|line| line.contains(name.marker())));
        }
    }
}
