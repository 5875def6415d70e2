//! Game setup stage: name, Minecraft version and mod loader.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use deck_core::cluster::{ModLoader, SetupFocus};
use deck_core::wizard::ValidationError;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::finish;
use crate::overlays::OverlayUpdate;
use crate::overlays::render_utils::{InputHint, InputLine, render_input_line};
use crate::state::TuiState;

pub(super) const HINTS: [InputHint<'static>; 4] = [
    InputHint {
        key: "Tab",
        action: "next field",
    },
    InputHint {
        key: "←→",
        action: "change",
    },
    InputHint {
        key: "Enter",
        action: "create",
    },
    InputHint {
        key: "Esc",
        action: "back",
    },
];

pub(super) fn handle_key(tui: &mut TuiState, key: KeyEvent) -> OverlayUpdate {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let focus = tui.wizard.setup.focus;

    match key.code {
        KeyCode::Enter => return finish(tui),
        KeyCode::Tab => tui.wizard.setup.focus = focus.next(),
        KeyCode::Char(c) if focus == SetupFocus::Name && !ctrl => {
            tui.wizard.input_char(c);
        }
        KeyCode::Backspace if focus == SetupFocus::Name => {
            tui.wizard.backspace();
        }
        KeyCode::Up | KeyCode::Left if focus == SetupFocus::Version => step_version(tui, false),
        KeyCode::Down | KeyCode::Right if focus == SetupFocus::Version => step_version(tui, true),
        KeyCode::Up | KeyCode::Left if focus == SetupFocus::Loader => step_loader(tui, false),
        KeyCode::Down | KeyCode::Right if focus == SetupFocus::Loader => step_loader(tui, true),
        _ => {}
    }
    OverlayUpdate::stay()
}

fn step_version(tui: &mut TuiState, forward: bool) {
    let cursor = tui.wizard.setup.version_cursor;
    let last = tui.wizard.setup.versions.len().saturating_sub(1);
    let next = if forward {
        (cursor + 1).min(last)
    } else {
        cursor.saturating_sub(1)
    };
    tui.wizard.select_version(next);
}

fn step_loader(tui: &mut TuiState, forward: bool) {
    let loaders = ModLoader::all();
    let cursor = tui.wizard.setup.loader_cursor;
    let next = if forward {
        (cursor + 1) % loaders.len()
    } else {
        (cursor + loaders.len() - 1) % loaders.len()
    };
    tui.wizard.select_loader(loaders[next]);
}

pub(super) fn render(frame: &mut Frame, area: Rect, tui: &TuiState) {
    let setup = &tui.wizard.setup;
    let draft = tui.wizard.draft();
    let row = |offset: u16| Rect::new(area.x, area.y + offset, area.width, 1);

    frame.render_widget(
        Paragraph::new(label(
            "Name",
            setup.focus == SetupFocus::Name,
            missing(tui, "name"),
        )),
        row(0),
    );
    render_input_line(
        frame,
        row(1),
        &InputLine {
            value: &setup.name,
            placeholder: "My cluster",
            focused: setup.focus == SetupFocus::Name,
            accent: Color::Cyan,
        },
    );

    let version = draft.mc_version.as_deref().unwrap_or("-");
    frame.render_widget(
        Paragraph::new(label(
            "Minecraft version",
            setup.focus == SetupFocus::Version,
            missing(tui, "mc_version"),
        )),
        row(3),
    );
    frame.render_widget(
        Paragraph::new(chooser(version, setup.focus == SetupFocus::Version)),
        row(4),
    );

    let loader = draft.mod_loader.map_or("-", ModLoader::display_name);
    frame.render_widget(
        Paragraph::new(label(
            "Mod loader",
            setup.focus == SetupFocus::Loader,
            missing(tui, "mod_loader"),
        )),
        row(6),
    );
    frame.render_widget(
        Paragraph::new(chooser(loader, setup.focus == SetupFocus::Loader)),
        row(7),
    );

    if let Some(provider) = draft.provider {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!("Source: {}", provider.display_name()),
                Style::default().fg(Color::DarkGray),
            ))),
            row(9),
        );
    }
}

fn missing(tui: &TuiState, field: &str) -> bool {
    tui.wizard_error
        .as_ref()
        .and_then(ValidationError::field)
        .is_some_and(|missing| missing == field)
}

fn label(text: &str, focused: bool, missing: bool) -> Line<'_> {
    let style = if missing {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    Line::from(Span::styled(text, style))
}

fn chooser(value: &str, focused: bool) -> Line<'_> {
    let arrows = if focused { Color::Cyan } else { Color::DarkGray };
    Line::from(vec![
        Span::styled("  ‹ ", Style::default().fg(arrows)),
        Span::styled(value, Style::default().fg(Color::White)),
        Span::styled(" ›", Style::default().fg(arrows)),
    ])
}
