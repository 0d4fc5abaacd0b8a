//! Transcript component — scrollable narration text for the current station.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    text::Span,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use tour_core::i18n::Text;
use tour_core::session::PlayerAction;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
};

pub struct Transcript {
    pub visible: bool,
    scroll: u16,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            visible: false,
            scroll: 0,
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        self.scroll = 0;
    }
}

impl Component for Transcript {
    fn id(&self) -> ComponentId {
        ComponentId::Transcript
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release || !self.visible {
            return vec![];
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll = self.scroll.saturating_add(1);
            }
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_add(5);
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.scroll = 0;
            }
            KeyCode::Esc => {
                return vec![Action::ToggleTranscript];
            }
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        match action {
            Action::ToggleTranscript => self.toggle(),
            // New narration, new text: reset the scroll position.
            Action::Player(
                PlayerAction::Select(_)
                | PlayerAction::SetLanguage(_)
                | PlayerAction::ConfirmNext,
            ) => self.scroll = 0,
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        if !self.visible {
            return;
        }
        let palette = state.palette();
        let lang = state.session.lang();

        let text = state
            .session
            .current_station()
            .map(|s| s.transcript.get(lang).to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| state.tr(Text::NothingPlaying).to_string());

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(palette.style_border(focused))
            .title(Span::styled(
                format!(" {} ", state.tr(Text::Transcript)),
                palette.style_secondary(),
            ));

        let paragraph = Paragraph::new(text)
            .style(palette.style_default())
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .block(block);
        frame.render_widget(paragraph, area);
    }
}
