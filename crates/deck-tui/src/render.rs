//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState`, draw to a ratatui `Frame`, and never
//! mutate state or return effects.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::common::truncate_with_ellipsis;
use crate::overlays::render_utils::row_style;
use crate::state::{AppState, TuiState};

const HEADER_HEIGHT: u16 = 1;
const STATUS_HEIGHT: u16 = 1;

const NAME_WIDTH: usize = 28;
const VERSION_WIDTH: usize = 10;
const LOADER_WIDTH: usize = 10;

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    let state = &app.tui;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(area);

    render_header(state, frame, chunks[0]);
    render_cluster_list(state, frame, chunks[1]);
    render_status_line(state, frame, chunks[2]);

    // Only the top overlay is drawn; anything below it stays hidden.
    if let Some(entry) = app.overlays.current() {
        entry.render.render(frame, area, state);
    }
}

fn render_header(state: &TuiState, frame: &mut Frame, area: Rect) {
    let count = state.clusters.len();
    let line = Line::from(vec![
        Span::styled(
            " deck ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            format!("{count} cluster{}", if count == 1 { "" } else { "s" }),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_cluster_list(state: &TuiState, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Clusters ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.clusters.is_empty() {
        let message = if state.clusters_loading {
            format!("{} Loading clusters...", state.spinner())
        } else {
            "No clusters yet. Press n to create one.".to_string()
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(
            message,
            Style::default().fg(Color::DarkGray),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(paragraph, inner);
        return;
    }

    let visible = inner.height.saturating_sub(1) as usize;
    let offset = state
        .cluster_cursor
        .saturating_sub(visible.saturating_sub(1));

    let mut lines = vec![Line::from(Span::styled(
        format!(
            " {:<NAME_WIDTH$} {:<VERSION_WIDTH$} {:<LOADER_WIDTH$} SOURCE",
            "NAME", "VERSION", "LOADER"
        ),
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    ))];

    for (index, cluster) in state
        .clusters
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
    {
        let source = cluster
            .imported_from
            .map_or("deck", |kind| kind.display_name());
        let text = format!(
            " {:<NAME_WIDTH$} {:<VERSION_WIDTH$} {:<LOADER_WIDTH$} {source}",
            truncate_with_ellipsis(&cluster.name, NAME_WIDTH),
            truncate_with_ellipsis(&cluster.mc_version, VERSION_WIDTH),
            cluster.mod_loader.display_name(),
        );
        let selected = index == state.cluster_cursor;
        lines.push(Line::from(Span::styled(
            truncate_with_ellipsis(&text, inner.width as usize),
            row_style(selected, Color::Cyan),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Renders the status line: last message on the left, shortcuts otherwise.
fn render_status_line(state: &TuiState, frame: &mut Frame, area: Rect) {
    let mut spans = Vec::new();
    if state.commands_in_flight > 0 {
        spans.push(Span::styled(
            format!("{} ", state.spinner()),
            Style::default().fg(Color::Yellow),
        ));
    }

    if let Some(status) = &state.status {
        spans.push(Span::raw(status.clone()));
    } else {
        for (key, action) in [("n", "new cluster"), ("r", "refresh"), ("q", "quit")] {
            spans.push(Span::styled(key, Style::default().fg(Color::DarkGray)));
            spans.push(Span::raw(format!(" {action}  ")));
        }
    }

    let status = Paragraph::new(Line::from(spans)).alignment(Alignment::Left);
    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
    use deck_core::config::Config;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::events::UiEvent;
    use crate::update::update;

    fn screen(app: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn press(app: &mut AppState, code: KeyCode, modifiers: KeyModifiers) {
        update(
            app,
            UiEvent::Terminal(Event::Key(KeyEvent::new(code, modifiers))),
        );
    }

    #[test]
    fn test_empty_list_shows_hint() {
        let app = AppState::new(Config::default());
        assert!(screen(&app).contains("Press n to create one"));
    }

    #[test]
    fn test_only_top_overlay_is_drawn() {
        let mut app = AppState::new(Config::default());
        press(&mut app, KeyCode::Char('n'), KeyModifiers::NONE);
        assert!(screen(&app).contains("New cluster"));

        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        press(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        let text = screen(&app);
        assert!(text.contains("Discard cluster?"));
        assert!(!text.contains("New cluster"));
    }
}
