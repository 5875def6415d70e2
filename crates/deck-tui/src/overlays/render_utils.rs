//! Drawing helpers shared by the wizard and confirm popups.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::common::truncate_start_with_ellipsis;

/// A key and what it does, drawn in the popup's bottom row.
pub struct InputHint<'a> {
    pub key: &'a str,
    pub action: &'a str,
}

impl<'a> InputHint<'a> {
    pub const fn new(key: &'a str, action: &'a str) -> Self {
        Self { key, action }
    }
}

/// Size, frame and hint row of a popup.
pub struct Popup<'a> {
    pub title: &'a str,
    pub accent: Color,
    pub width: u16,
    pub height: u16,
    pub hints: &'a [InputHint<'a>],
}

impl Popup<'_> {
    /// Draws the popup centered in `area` and returns the body left for content.
    pub fn render(&self, frame: &mut Frame, area: Rect) -> Rect {
        let popup = centered(area, self.width, self.height);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.accent))
            .title(Span::styled(
                format!(" {} ", self.title),
                Style::default().fg(self.accent).add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        if self.hints.is_empty() || inner.height == 0 {
            return inner;
        }
        let last = inner.height - 1;
        frame.render_widget(
            Paragraph::new(hint_line(self.hints, self.accent)).alignment(Alignment::Center),
            Rect::new(inner.x, inner.y + last, inner.width, 1),
        );
        Rect::new(inner.x, inner.y, inner.width, last)
    }
}

/// `width` x `height` centered in `area`, leaving a small margin.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn hint_line(hints: &[InputHint<'_>], accent: Color) -> Line<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" · ", dim));
        }
        spans.push(Span::styled(hint.key.to_string(), Style::default().fg(accent)));
        spans.push(Span::styled(format!(" {}", hint.action), dim));
    }
    Line::from(spans)
}

/// Single-line text field: `> value█`, or the placeholder while empty.
pub struct InputLine<'a> {
    pub value: &'a str,
    pub placeholder: &'a str,
    pub focused: bool,
    pub accent: Color,
}

pub fn render_input_line(frame: &mut Frame, area: Rect, input: &InputLine<'_>) {
    const PROMPT: &str = "> ";
    let room = (area.width as usize).saturating_sub(PROMPT.len() + 1);
    let prompt = if input.focused { input.accent } else { Color::DarkGray };

    let mut spans = vec![Span::styled(PROMPT, Style::default().fg(prompt))];
    let cursor = input
        .focused
        .then(|| Span::styled("█", Style::default().fg(input.accent)));
    if input.value.is_empty() {
        spans.extend(cursor);
        spans.push(Span::styled(
            truncate_start_with_ellipsis(input.placeholder, room),
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::styled(
            truncate_start_with_ellipsis(input.value, room),
            Style::default().fg(Color::White),
        ));
        spans.extend(cursor);
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Horizontal rule across one row.
pub fn render_separator(frame: &mut Frame, row: Rect) {
    frame.render_widget(
        Paragraph::new(Span::styled(
            "─".repeat(row.width as usize),
            Style::default().fg(Color::DarkGray),
        )),
        row,
    );
}

/// Style for a list row, highlighted when under the cursor.
pub fn row_style(selected: bool, accent: Color) -> Style {
    if selected {
        Style::default()
            .fg(Color::Black)
            .bg(accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}
