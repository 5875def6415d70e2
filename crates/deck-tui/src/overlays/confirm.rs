//! Yes/no confirmation overlay.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use super::OverlayUpdate;
use super::render_utils::{InputHint, Popup};
use crate::effects::UiEffect;
use crate::mutations::StateMutation;

/// What happens when the user confirms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    DiscardCluster,
    Quit,
}

#[derive(Debug, Clone)]
pub struct ConfirmState {
    pub title: &'static str,
    pub message: String,
    pub action: ConfirmAction,
}

impl ConfirmState {
    pub fn discard_cluster() -> Self {
        Self {
            title: "Discard cluster?",
            message: "The cluster you are setting up will be lost.".to_string(),
            action: ConfirmAction::DiscardCluster,
        }
    }

    pub fn quit(in_flight: usize) -> Self {
        Self {
            title: "Quit?",
            message: format!(
                "{in_flight} cluster operation(s) still running. Quitting stops them."
            ),
            action: ConfirmAction::Quit,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayUpdate {
        match key.code {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => match self.action {
                ConfirmAction::DiscardCluster => {
                    OverlayUpdate::close().with_mutations(vec![StateMutation::CancelWizard])
                }
                ConfirmAction::Quit => OverlayUpdate::close().with_ui_effects(vec![UiEffect::Quit]),
            },
            KeyCode::Char('n' | 'N') | KeyCode::Esc => OverlayUpdate::close(),
            _ => OverlayUpdate::stay(),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let hints = [InputHint::new("y", "yes"), InputHint::new("n", "no")];
        let body = Popup {
            title: self.title,
            accent: Color::Red,
            width: 46,
            height: 6,
            hints: &hints,
        }
        .render(frame, area);

        let message = Paragraph::new(Line::from(Span::styled(
            self.message.as_str(),
            Style::default().fg(Color::White),
        )))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        frame.render_widget(message, body);
    }
}
