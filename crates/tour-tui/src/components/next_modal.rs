//! NextModal component — confirmation before auto-advancing to the next
//! station. Appears when a narration finishes with auto-advance enabled;
//! the session decides when, the modal only renders and answers.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use tour_core::i18n::Text;
use tour_core::session::PlayerAction;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
};

pub struct NextModal {
    /// Which button the cursor is on. Reset to Yes each time the prompt opens.
    yes_selected: bool,
}

impl NextModal {
    pub fn new() -> Self {
        Self { yes_selected: true }
    }

    pub fn is_open(state: &AppState) -> bool {
        state.session.pending_next().is_some()
    }
}

impl Component for NextModal {
    fn id(&self) -> ComponentId {
        ComponentId::NextModal
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                self.yes_selected = !self.yes_selected;
                vec![]
            }
            KeyCode::Enter => {
                let action = if self.yes_selected {
                    PlayerAction::ConfirmNext
                } else {
                    PlayerAction::CancelNext
                };
                vec![Action::Player(action)]
            }
            KeyCode::Char('y') => vec![Action::Player(PlayerAction::ConfirmNext)],
            KeyCode::Char('n') | KeyCode::Esc => vec![Action::Player(PlayerAction::CancelNext)],
            // The modal swallows everything else
            _ => vec![],
        }
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        // A fresh prompt always starts on Yes.
        if matches!(action, Action::Player(_)) {
            self.yes_selected = true;
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        let Some(next) = state.session.pending_next() else {
            return;
        };
        let palette = state.palette();
        let lang = state.session.lang();
        let popup = centered_rect(50, 8, area);

        let yes = state.tr(Text::NextYes);
        let no = state.tr(Text::NextNo);
        let (yes_style, no_style) = if self.yes_selected {
            (
                palette.style_playing().add_modifier(Modifier::BOLD | Modifier::REVERSED),
                palette.style_secondary(),
            )
        } else {
            (
                palette.style_secondary(),
                palette.style_accent().add_modifier(Modifier::BOLD | Modifier::REVERSED),
            )
        };

        let lines: Vec<Line> = vec![
            Line::from(""),
            Line::from(Span::styled(
                state.tr(Text::NextQuestion),
                palette.style_secondary(),
            ))
            .centered(),
            Line::from(Span::styled(
                next.title.get(lang).to_string(),
                palette.style_default().add_modifier(Modifier::BOLD),
            ))
            .centered(),
            Line::from(""),
            Line::from(vec![
                Span::styled(format!("  {yes}  "), yes_style),
                Span::raw("   "),
                Span::styled(format!("  {no}  "), no_style),
            ])
            .centered(),
        ];

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(palette.style_accent())
                    .title(Span::styled(
                        format!(" {} ", state.tr(Text::NextTitle)),
                        palette.style_default().add_modifier(Modifier::BOLD),
                    ))
                    .style(Style::default().bg(palette.modal_bg)),
            ),
            popup,
        );
    }
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vert[1])[1]
}
