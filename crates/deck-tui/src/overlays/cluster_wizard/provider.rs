//! Provider selection stage.

use crossterm::event::{KeyCode, KeyEvent};
use deck_core::cluster::Provider;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::overlays::OverlayUpdate;
use crate::overlays::render_utils::{InputHint, row_style};
use crate::state::TuiState;

pub(super) const HINTS: [InputHint<'static>; 3] = [
    InputHint {
        key: "↑↓",
        action: "move",
    },
    InputHint {
        key: "Enter",
        action: "choose",
    },
    InputHint {
        key: "Esc",
        action: "close",
    },
];

pub(super) fn handle_key(tui: &mut TuiState, key: KeyEvent) -> OverlayUpdate {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => tui.wizard.provider.move_cursor(false),
        KeyCode::Down | KeyCode::Char('j') => tui.wizard.provider.move_cursor(true),
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            if let Some(provider) = Provider::all().get(index).copied() {
                choose(tui, provider);
            }
        }
        KeyCode::Enter => {
            let provider = tui.wizard.provider.highlighted();
            choose(tui, provider);
        }
        _ => {}
    }
    OverlayUpdate::stay()
}

/// Records the provider and moves on to the stage it leads to.
fn choose(tui: &mut TuiState, provider: Provider) {
    tui.wizard.choose_provider(provider);
    tui.wizard.advance_next();
}

pub(super) fn render(frame: &mut Frame, area: Rect, tui: &TuiState) {
    let highlighted = tui.wizard.provider.highlighted();
    let chosen = tui.wizard.draft().provider;

    let mut lines = vec![
        Line::from(Span::styled(
            "Where should the cluster come from?",
            Style::default().fg(Color::Gray),
        )),
        Line::default(),
    ];
    for (i, provider) in Provider::all().iter().enumerate() {
        let marker = if chosen == Some(*provider) { "●" } else { "○" };
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {} {marker} {:<11}", i + 1, provider.display_name()),
                row_style(*provider == highlighted, Color::Cyan),
            ),
            Span::styled(
                format!("  {}", provider.description()),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), area);
}
