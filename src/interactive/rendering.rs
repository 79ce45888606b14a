//! TUI rendering with ratatui
//!
//! Left: the board as a sighted player sees it. Right: the same game as the
//! retrofit presents it to a screen reader.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
};

use super::app::{App, TileView};
use crate::output::formatters::checked_glyph;

/// Main UI rendering function
pub fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Min(12),    // Main content
            Constraint::Length(3),  // Status bar
        ])
        .split(f.area());

    render_header(f, chunks[0]);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(45), // Visible game
            Constraint::Percentage(55), // Screen-reader view
        ])
        .split(chunks[1]);

    render_board(f, app, main_chunks[0]);
    render_reader_panel(f, app, main_chunks[1]);

    render_status(f, app, chunks[2]);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new("♿ WORDLE ACCESSIBILITY RETROFIT - Live View")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Color::Cyan)),
        );
    f.render_widget(header, area);
}

fn tile_span(tile: &TileView) -> Span<'static> {
    let letter = tile
        .letter
        .clone()
        .unwrap_or_else(|| " ".to_string());
    let text = format!(" {letter} ");
    let style = match tile.status.as_deref() {
        Some("correct") => Style::default().bg(Color::Green).fg(Color::Black),
        Some("present") => Style::default().bg(Color::Yellow).fg(Color::Black),
        Some("absent") => Style::default().bg(Color::DarkGray).fg(Color::White),
        _ => Style::default().fg(Color::White),
    };
    Span::styled(text, style.add_modifier(Modifier::BOLD))
}

fn render_board(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();
    for row in app.board_rows() {
        let mut spans = Vec::new();
        for tile in &row {
            spans.push(tile_span(tile));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    if let Some(target) = app.revealed_target() {
        lines.push(Line::from(Span::styled(
            format!("Target was {target}"),
            Style::default().fg(Color::Magenta),
        )));
    }

    let board = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .title(" Board ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    f.render_widget(board, area);
}

fn render_reader_panel(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),    // Utterance feed
            Constraint::Length(6), // Focus + settings
        ])
        .split(area);

    render_feed(f, app, chunks[0]);
    render_state(f, app, chunks[1]);
}

fn render_feed(f: &mut Frame, app: &App, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let start = app.feed.len().saturating_sub(visible);
    let items: Vec<ListItem> = app.feed[start..]
        .iter()
        .map(|entry| ListItem::new(Line::from(entry.as_str())))
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" Screen reader ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .style(Style::default().fg(Color::Green)),
    );
    f.render_widget(list, area);
}

fn render_state(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![Line::from(vec![
        Span::raw("Focus: "),
        Span::styled(
            app.focused_description()
                .unwrap_or_else(|| "(page)".to_string()),
            Style::default().fg(Color::Blue),
        ),
    ])];
    for (name, state) in app.toggle_views() {
        lines.push(Line::from(format!(
            "{} {name} (aria-checked={state})",
            checked_glyph(Some(&state))
        )));
    }

    let state = Paragraph::new(lines).block(
        Block::default()
            .title(" Accessibility state ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    f.render_widget(state, area);
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let hint = if app.help_open() {
        "Help open: Enter/Esc close (focus is on the Close button)"
    } else {
        "Type letters | Enter submit | Backspace delete | F1 help | F2/F3 toggles | Esc quit"
    };
    let status = Paragraph::new(hint)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        );
    f.render_widget(status, area);
}
