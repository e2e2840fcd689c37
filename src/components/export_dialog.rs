//! Export format selector

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::services::ExportFormat;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

pub struct ExportFormatDialog {
    pub selected_index: usize,
    pub current: ExportFormat,
    list_state: ListState,
}

impl Default for ExportFormatDialog {
    fn default() -> Self {
        Self::new(ExportFormat::default())
    }
}

impl ExportFormatDialog {
    pub fn new(current: ExportFormat) -> Self {
        let mut dialog = Self {
            selected_index: 0,
            current,
            list_state: ListState::default(),
        };
        dialog.select(dialog.index_of(current));
        dialog
    }

    /// Index of a format in the option list
    pub fn index_of(&self, format: ExportFormat) -> usize {
        ExportFormat::all()
            .iter()
            .position(|f| *f == format)
            .unwrap_or(0)
    }

    pub fn select(&mut self, index: usize) {
        let last = ExportFormat::all().len() - 1;
        self.selected_index = index.min(last);
        self.list_state.select(Some(self.selected_index));
    }

    pub fn selected_format(&self) -> ExportFormat {
        ExportFormat::all()
            .get(self.selected_index)
            .copied()
            .unwrap_or_default()
    }
}

impl Component for ExportFormatDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::CloseModal),
            KeyCode::Enter => Some(Action::ConfirmModal),
            KeyCode::Up | KeyCode::Char('k') => {
                self.select(self.selected_index.saturating_sub(1));
                Some(Action::ModalUp)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select(self.selected_index + 1);
                Some(Action::ModalDown)
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                ExportFormat::all()
                    .get(index)
                    .map(|format| Action::SetExportFormat(*format))
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let width = 60u16.min(area.width.saturating_sub(4));
        let popup_area = centered_popup(area, width, 10);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Export Format ")
            .title_style(
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            );
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(2), Constraint::Length(2)])
            .split(inner);

        let items: Vec<ListItem> = ExportFormat::all()
            .iter()
            .enumerate()
            .map(|(i, format)| {
                let marker = if *format == self.current { "● " } else { "  " };
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(
                            format!("{}{}. ", marker, i + 1),
                            Style::default().fg(Color::Green),
                        ),
                        Span::styled(
                            format!("{} (.{})", format.label(), format.extension()),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                    ]),
                    Line::from(Span::styled(
                        format!("     {}", format.description()),
                        Style::default().fg(Color::DarkGray),
                    )),
                ])
            })
            .collect();

        let list = List::new(items).highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_stateful_widget(list, chunks[0], &mut self.list_state);

        let help = Paragraph::new(Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Cyan)),
            Span::raw(" select  "),
            Span::styled("j/k", Style::default().fg(Color::Cyan)),
            Span::raw(" move  "),
            Span::styled("Esc", Style::default().fg(Color::Cyan)),
            Span::raw(" cancel"),
        ]));
        frame.render_widget(help, chunks[1]);
        Ok(())
    }
}
