//! Import selection stage: pick instances of another launcher.

use crossterm::event::{KeyCode, KeyEvent};
use deck_core::cluster::{ImportCandidate, Listing};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::finish;
use crate::common::{truncate_start_with_ellipsis, truncate_with_ellipsis};
use crate::overlays::OverlayUpdate;
use crate::overlays::render_utils::{InputHint, row_style};
use crate::state::TuiState;

pub(super) const HINTS: [InputHint<'static>; 5] = [
    InputHint {
        key: "Space",
        action: "select",
    },
    InputHint {
        key: "Tab",
        action: "launcher",
    },
    InputHint {
        key: "r",
        action: "rescan",
    },
    InputHint {
        key: "Enter",
        action: "import",
    },
    InputHint {
        key: "Esc",
        action: "back",
    },
];

pub(super) fn handle_key(tui: &mut TuiState, key: KeyEvent) -> OverlayUpdate {
    match key.code {
        KeyCode::Enter => return finish(tui),
        KeyCode::Up | KeyCode::Char('k') => tui.wizard.import.move_cursor(false),
        KeyCode::Down | KeyCode::Char('j') => tui.wizard.import.move_cursor(true),
        KeyCode::Char(' ') => {
            let cursor = tui.wizard.import.cursor;
            tui.wizard.toggle_candidate(cursor);
        }
        KeyCode::Tab => {
            let kind = tui.wizard.import.kind.cycle();
            tui.wizard.set_import_kind(kind);
        }
        KeyCode::Char('r') => {
            let base_path = tui.wizard.import.base_path.clone();
            tui.wizard.set_import_base_path(base_path);
        }
        _ => {}
    }
    OverlayUpdate::stay()
}

pub(super) fn render(frame: &mut Frame, area: Rect, tui: &TuiState) {
    let step = &tui.wizard.import;
    let row = |offset: u16| Rect::new(area.x, area.y + offset, area.width, 1);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Launcher: ", Style::default().fg(Color::Gray)),
            Span::styled(step.kind.display_name(), Style::default().fg(Color::Cyan)),
        ])),
        row(0),
    );
    let location = step.base_path.as_ref().map_or_else(
        || "configured or usual location".to_string(),
        |p| truncate_start_with_ellipsis(&p.display().to_string(), (area.width as usize).saturating_sub(6)),
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!("From: {location}"),
            Style::default().fg(Color::DarkGray),
        ))),
        row(1),
    );

    let list_area = Rect::new(
        area.x,
        area.y + 3,
        area.width,
        area.height.saturating_sub(3),
    );
    let message = match &step.listing {
        Listing::Idle => Some(("Press r to scan".to_string(), Color::DarkGray)),
        Listing::Loading(_) => Some((
            format!("{} Looking for instances…", tui.spinner()),
            Color::Yellow,
        )),
        Listing::Failed(error) => Some((error.clone(), Color::Red)),
        Listing::Loaded if step.candidates.is_empty() => {
            Some(("No instances found".to_string(), Color::DarkGray))
        }
        Listing::Loaded => None,
    };
    if let Some((text, color)) = message {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(text, Style::default().fg(color)))),
            list_area,
        );
        return;
    }

    let visible = list_area.height as usize;
    let offset = step.cursor.saturating_sub(visible.saturating_sub(1));
    let lines: Vec<Line> = step
        .candidates
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(i, candidate)| {
            candidate_line(
                candidate,
                step.selected.contains(&i),
                i == step.cursor,
                list_area.width as usize,
            )
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), list_area);
}

fn candidate_line(
    candidate: &ImportCandidate,
    selected: bool,
    highlighted: bool,
    width: usize,
) -> Line<'static> {
    let check = if selected { "[x]" } else { "[ ]" };
    let details = match (&candidate.mc_version, candidate.mod_loader) {
        (Some(version), Some(loader)) => format!("{version} {}", loader.display_name()),
        (Some(version), None) => version.clone(),
        (None, _) => "unknown version".to_string(),
    };
    let name_width = width.saturating_sub(details.len() + 7);
    Line::from(vec![
        Span::styled(
            format!(
                " {check} {:<name_width$}",
                truncate_with_ellipsis(&candidate.name, name_width)
            ),
            row_style(highlighted, Color::Cyan),
        ),
        Span::styled(format!(" {details}"), Style::default().fg(Color::DarkGray)),
    ])
}
