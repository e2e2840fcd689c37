//! Home component - Main application screen
//!
//! Displays the DML/DDL tabs, file info, the section outline, the content
//! panel and the status and help bars. Owns outline navigation state.

use crate::action::Action;
use crate::component::Component;
use crate::components::{calculate_main_layout, ContentComponent};
use crate::model::section::SectionName;
use crate::model::{CommandType, SqlTemplate, Workspace};
use crate::services::ExportFormat;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, LineGauge, List, ListItem, ListState, Paragraph, Tabs},
    Frame,
};
use std::path::Path;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Home component for the main application view
pub struct HomeComponent {
    /// Selection in the section outline
    pub outline_state: ListState,
}

impl Default for HomeComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl HomeComponent {
    pub fn new() -> Self {
        let mut outline_state = ListState::default();
        outline_state.select(Some(0));
        Self { outline_state }
    }

    /// Section highlighted in the outline
    pub fn selected_section(&self) -> SectionName {
        let all = SectionName::all();
        let index = self.outline_state.selected().unwrap_or(0).min(all.len() - 1);
        all[index]
    }

    pub fn next_section(&mut self) {
        let last = SectionName::all().len() - 1;
        let index = self.outline_state.selected().map_or(0, |i| (i + 1).min(last));
        self.outline_state.select(Some(index));
    }

    pub fn prev_section(&mut self) {
        let index = self
            .outline_state
            .selected()
            .map_or(0, |i| i.saturating_sub(1));
        self.outline_state.select(Some(index));
    }

    pub fn reset_outline(&mut self) {
        self.outline_state.select(Some(0));
    }
}

impl Component for HomeComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let action = match key.code {
            // Scrolling
            KeyCode::Char('e') if ctrl => Some(Action::ScrollDown),
            KeyCode::Char('y') if ctrl => Some(Action::ScrollUp),
            KeyCode::Char('d') if ctrl => Some(Action::PageDown),
            KeyCode::Char('u') if ctrl => Some(Action::PageUp),
            KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::PageUp => Some(Action::PageUp),
            KeyCode::Char('g') => Some(Action::ScrollTop),

            // Tabs and outline
            KeyCode::Tab => Some(Action::NextTab),
            KeyCode::BackTab => Some(Action::PrevTab),
            KeyCode::Char('1') => Some(Action::SelectTab(CommandType::Dml)),
            KeyCode::Char('2') => Some(Action::SelectTab(CommandType::Ddl)),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextSection),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevSection),

            // Content
            KeyCode::Char('o') => Some(Action::OpenImport),
            KeyCode::Char('x') => Some(Action::Export),
            KeyCode::Char('X') => Some(Action::OpenExportFormat),
            KeyCode::Char('w') => Some(Action::WriteExample),
            KeyCode::Char('e') => Some(Action::EditBuffer),
            KeyCode::Char('E') | KeyCode::Enter => Some(Action::EditSelectedSection),

            // Modals
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            KeyCode::Char('c') if ctrl => Some(Action::OpenQuitDialog),

            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::NextSection => self.next_section(),
            Action::PrevSection => self.prev_section(),
            Action::NextTab | Action::PrevTab | Action::SelectTab(_) => self.reset_outline(),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawing goes through draw_home_screen, which needs the workspace
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rendering Functions
// ═══════════════════════════════════════════════════════════════════════════════

/// Progress of a running file read
pub struct LoadProgress<'a> {
    pub file_name: &'a str,
    pub read: u64,
    pub total: u64,
}

impl LoadProgress<'_> {
    /// Filled share of the gauge; empty until the first progress event
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.read as f64 / self.total as f64).clamp(0.0, 1.0)
        }
    }
}

/// Context needed for rendering the home screen
pub struct HomeRenderContext<'a> {
    pub workspace: &'a Workspace,
    pub loading: Option<LoadProgress<'a>>,
    pub export_format: ExportFormat,
    pub export_dir: &'a Path,
    pub error: Option<&'a str>,
    pub status_message: Option<&'a str>,
}

/// Draw the home screen
pub fn draw_home_screen(
    frame: &mut Frame,
    area: Rect,
    home: &mut HomeComponent,
    content: &mut ContentComponent,
    ctx: &HomeRenderContext,
) -> Result<()> {
    let layout = calculate_main_layout(area);
    let current = ctx.workspace.current();
    let controller = ctx.workspace.current_controller();
    let template = controller.map(|c| c.sections());

    render_tabs(frame, layout.tabs, ctx.workspace);
    render_info_box(frame, layout.info, ctx, template.as_ref());
    render_outline(frame, layout.outline, home, template.as_ref());

    content.set_content(current, controller);
    content.draw(frame, layout.content)?;

    render_status_bar(frame, layout.status, ctx);
    render_help_bar(frame, layout.help);
    Ok(())
}

fn render_tabs(frame: &mut Frame, area: Rect, workspace: &Workspace) {
    let all_tabs = CommandType::tabs();
    let titles: Vec<String> = all_tabs
        .iter()
        .map(|t| {
            let loaded = workspace.controller(*t).is_some_and(|c| c.has_content());
            if loaded {
                format!("{} ●", t)
            } else {
                t.to_string()
            }
        })
        .collect();
    let selected = all_tabs
        .iter()
        .position(|t| *t == workspace.current())
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::BOTTOM))
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

fn render_info_box(
    frame: &mut Frame,
    area: Rect,
    ctx: &HomeRenderContext,
    template: Option<&SqlTemplate>,
) {
    let width = area.width.saturating_sub(2) as usize;
    let label = Style::default().fg(Color::DarkGray);
    let mut lines = vec![];

    match (ctx.workspace.current_controller(), template) {
        (Some(controller), Some(template)) => {
            lines.push(Line::from(Span::styled(
                truncate_to_width(controller.source_file_name(), width),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(vec![
                Span::styled("sections: ", label),
                Span::styled(
                    format!("{}/{}", template.len(), SectionName::all().len()),
                    Style::default().fg(Color::Cyan),
                ),
            ]));
            lines.push(Line::from(vec![
                Span::styled("lines: ", label),
                Span::styled(
                    format!("{} ({})", controller.text().lines().count(), line_ending_label(template)),
                    Style::default().fg(Color::Cyan),
                ),
            ]));
            let (status, color) = if controller.download_enabled() {
                (format!("ready (.{})", ctx.export_format.extension()), Color::Green)
            } else {
                ("nothing to export".to_string(), Color::DarkGray)
            };
            lines.push(Line::from(vec![
                Span::styled("export: ", label),
                Span::styled(status, Style::default().fg(color)),
            ]));
        }
        _ => {
            lines.push(Line::from(Span::styled("No file loaded", label)));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", ctx.workspace.current()))
        .border_style(Style::default().fg(Color::DarkGray));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn line_ending_label(template: &SqlTemplate) -> &'static str {
    match template.line_ending() {
        crate::model::LineEnding::Crlf => "CRLF",
        crate::model::LineEnding::Lf => "LF",
    }
}

fn render_outline(
    frame: &mut Frame,
    area: Rect,
    home: &mut HomeComponent,
    template: Option<&SqlTemplate>,
) {
    let items: Vec<ListItem> = SectionName::all()
        .iter()
        .map(|name| match template.and_then(|t| t.get(*name)) {
            Some(body) => {
                let count = if body.is_empty() { 0 } else { body.split('\n').count() };
                ListItem::new(Line::from(vec![
                    Span::styled("● ", Style::default().fg(Color::Green)),
                    Span::styled(name.as_str(), Style::default().fg(Color::White)),
                    Span::styled(format!(" ({})", count), Style::default().fg(Color::DarkGray)),
                ]))
            }
            None => ListItem::new(Line::from(vec![
                Span::styled("○ ", Style::default().fg(Color::DarkGray)),
                Span::styled(name.as_str(), Style::default().fg(Color::DarkGray)),
            ])),
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Sections ")
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, &mut home.outline_state);
}

fn render_status_bar(frame: &mut Frame, area: Rect, ctx: &HomeRenderContext) {
    if let Some(ref progress) = ctx.loading {
        let gauge = LineGauge::default()
            .filled_style(Style::default().fg(Color::Cyan))
            .label(format!(
                " Reading {} {:>3}% ",
                progress.file_name,
                (progress.ratio() * 100.0).round() as u32
            ))
            .ratio(progress.ratio());
        frame.render_widget(gauge, area);
        return;
    }

    let mut spans = vec![Span::styled(
        format!(" {} ", ctx.export_format.label()),
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    spans.push(Span::styled(
        format!(" → {} ", ctx.export_dir.display()),
        Style::default().fg(Color::DarkGray),
    ));

    if let Some(error) = ctx.error {
        spans.push(Span::styled(
            format!(" Error: {} ", error),
            Style::default().fg(Color::Red),
        ));
    } else if let Some(status) = ctx.status_message {
        spans.push(Span::styled(
            format!(" {} ", status),
            Style::default().fg(Color::Yellow),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_help_bar(frame: &mut Frame, area: Rect) {
    let key = |k: &'static str, color: Color| {
        Span::styled(k, Style::default().fg(color).add_modifier(Modifier::BOLD))
    };
    let help_spans = vec![
        key(" q ", Color::Yellow),
        Span::raw("Quit "),
        key(" o ", Color::Green),
        Span::raw("Import "),
        key(" x ", Color::Green),
        Span::raw("Export "),
        key(" X ", Color::Cyan),
        Span::raw("Format "),
        key(" e ", Color::Cyan),
        Span::raw("Edit "),
        key(" E ", Color::Cyan),
        Span::raw("Edit section "),
        key(" w ", Color::Magenta),
        Span::raw("Example "),
        key(" ? ", Color::White),
        Span::raw("Help"),
    ];

    frame.render_widget(Paragraph::new(Line::from(help_spans)), area);
}

/// Cut a string to a display width, marking the cut with an ellipsis
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > max_width - 1 {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_key_bindings() {
        let mut home = HomeComponent::new();
        let cases = [
            (key(KeyCode::Char('o')), Action::OpenImport),
            (key(KeyCode::Char('x')), Action::Export),
            (key(KeyCode::Char('X')), Action::OpenExportFormat),
            (key(KeyCode::Char('e')), Action::EditBuffer),
            (key(KeyCode::Enter), Action::EditSelectedSection),
            (key(KeyCode::Tab), Action::NextTab),
            (key(KeyCode::Char('2')), Action::SelectTab(CommandType::Ddl)),
            (
                KeyEvent::new(KeyCode::Char('e'), KeyModifiers::CONTROL),
                Action::ScrollDown,
            ),
        ];
        for (event, expected) in cases {
            assert_eq!(home.handle_key_event(event).unwrap(), Some(expected));
        }
        assert_eq!(home.handle_key_event(key(KeyCode::Char('z'))).unwrap(), None);
    }

    #[test]
    fn test_outline_navigation_is_clamped() {
        let mut home = HomeComponent::new();
        assert_eq!(home.selected_section(), SectionName::PreSql);

        home.prev_section();
        assert_eq!(home.selected_section(), SectionName::PreSql);

        for _ in 0..10 {
            home.next_section();
        }
        assert_eq!(home.selected_section(), SectionName::PostSql);

        home.update(Action::NextTab).unwrap();
        assert_eq!(home.selected_section(), SectionName::PreSql);
    }

    #[test]
    fn test_load_progress_ratio() {
        let progress = LoadProgress {
            file_name: "a.sql",
            read: 50,
            total: 200,
        };
        assert!((progress.ratio() - 0.25).abs() < f64::EPSILON);

        let started = LoadProgress {
            file_name: "b.sql",
            read: 0,
            total: 0,
        };
        assert_eq!(started.ratio(), 0.0);
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short.sql", 20), "short.sql");
        assert_eq!(truncate_to_width("abcdefghij", 5), "abcd…");
        // Wide characters take two columns each
        assert_eq!(truncate_to_width("異動語法範本.sql", 7), "異動語…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }
}
