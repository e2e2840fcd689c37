//! Content panel
//!
//! Shows the active tab buffer with highlighting. Highlighted lines are
//! cached per tab revision so redraws do not re-tokenize the buffer.

use super::sql_highlight;
use crate::action::Action;
use crate::component::Component;
use crate::model::section::{parse_marker, SectionName};
use crate::model::{CommandType, TabContentController};
use anyhow::Result;
use ratatui::{
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

pub struct ContentComponent {
    scroll: usize,
    lines: Vec<Line<'static>>,
    /// Tab and revision the cached lines were built from
    key: Option<(CommandType, u64)>,
    title: String,
    /// Visible rows at the last draw
    viewport: usize,
}

impl Default for ContentComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentComponent {
    pub fn new() -> Self {
        Self {
            scroll: 0,
            lines: empty_state(CommandType::Dml),
            key: None,
            title: " Content ".to_string(),
            viewport: 20,
        }
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Point the panel at a tab. Re-highlights only when the revision moved.
    pub fn set_content(&mut self, command_type: CommandType, controller: Option<&TabContentController>) {
        let key = controller.map(|c| (c.command_type(), c.revision()));
        if key.is_some() && key == self.key {
            return;
        }

        let same_tab = self.key.map(|(t, _)| t) == Some(command_type);
        match controller {
            Some(c) => {
                self.lines = sql_highlight::highlight_sql(c.text());
                self.title = format!(" {} · {} ", c.command_type(), c.source_file_name());
            }
            None => {
                self.lines = empty_state(command_type);
                self.title = format!(" {} ", command_type);
            }
        }
        self.key = key;

        if !same_tab {
            self.scroll = 0;
        }
        self.clamp();
    }

    pub fn scroll_to_line(&mut self, line: usize) {
        self.scroll = line;
        self.clamp();
    }

    fn max_scroll(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }

    fn clamp(&mut self) {
        self.scroll = self.scroll.min(self.max_scroll());
    }

    fn page(&self) -> usize {
        (self.viewport / 2).max(1)
    }
}

/// Line index of the marker that opens a section.
/// The last occurrence is the one a parse keeps.
pub fn marker_line(text: &str, name: SectionName) -> Option<usize> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| parse_marker(line) == Some(name))
        .map(|(i, _)| i)
        .last()
}

fn empty_state(command_type: CommandType) -> Vec<Line<'static>> {
    let dim = Style::default().fg(Color::DarkGray);
    let key = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  No {} template loaded", command_type),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  o ", key),
            Span::styled("import a .sql file", dim),
        ]),
        Line::from(vec![
            Span::styled("  paste ", key),
            Span::styled("drop a file or paste SQL into the terminal", dim),
        ]),
        Line::from(vec![
            Span::styled("  w ", key),
            Span::styled("write the example template", dim),
        ]),
    ]
}

impl Component for ContentComponent {
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let max_scroll = self.max_scroll();
        match action {
            Action::ScrollDown => {
                if self.scroll < max_scroll {
                    self.scroll += 1;
                }
            }
            Action::ScrollUp => {
                self.scroll = self.scroll.saturating_sub(1);
            }
            Action::PageDown => {
                self.scroll = (self.scroll + self.page()).min(max_scroll);
            }
            Action::PageUp => {
                self.scroll = self.scroll.saturating_sub(self.page());
            }
            Action::ScrollTop => {
                self.scroll = 0;
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let visible_height = area.height.saturating_sub(2) as usize;
        self.viewport = visible_height;

        let paragraph = Paragraph::new(self.lines.clone())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(self.title.clone())
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .scroll((self.scroll.min(u16::MAX as usize) as u16, 0));

        frame.render_widget(paragraph, area);

        let total = self.lines.len();
        if total > visible_height {
            let mut scrollbar_state =
                ScrollbarState::new(total.saturating_sub(visible_height)).position(self.scroll);

            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(text: &str) -> TabContentController {
        TabContentController::new(CommandType::Dml, text.to_string(), "a.sql".to_string())
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut content = ContentComponent::new();
        let c = controller("a\nb\nc");
        content.set_content(CommandType::Dml, Some(&c));
        assert_eq!(content.line_count(), 3);

        for _ in 0..10 {
            content.update(Action::ScrollDown).unwrap();
        }
        assert_eq!(content.scroll(), 2);

        content.update(Action::ScrollTop).unwrap();
        assert_eq!(content.scroll(), 0);
        content.update(Action::ScrollUp).unwrap();
        assert_eq!(content.scroll(), 0);
    }

    #[test]
    fn test_switching_tab_resets_scroll() {
        let mut content = ContentComponent::new();
        let dml = controller("1\n2\n3\n4");
        content.set_content(CommandType::Dml, Some(&dml));
        content.scroll_to_line(3);

        content.set_content(CommandType::Ddl, None);
        assert_eq!(content.scroll(), 0);
    }

    #[test]
    fn test_edit_keeps_scroll_within_new_length() {
        let mut content = ContentComponent::new();
        let mut c = controller("1\n2\n3\n4\n5");
        content.set_content(CommandType::Dml, Some(&c));
        content.scroll_to_line(4);

        c.update_page_content("1\n2".to_string());
        content.set_content(CommandType::Dml, Some(&c));
        assert_eq!(content.scroll(), 1);
    }

    #[test]
    fn test_marker_line_uses_last_occurrence() {
        let text = "--#PreSQL\r\nA\r\n--#MainSQL\r\nB\r\n--#PreSQL\r\nC";
        assert_eq!(marker_line(text, SectionName::PreSql), Some(4));
        assert_eq!(marker_line(text, SectionName::MainSql), Some(2));
        assert_eq!(marker_line(text, SectionName::PostSql), None);
    }
}
