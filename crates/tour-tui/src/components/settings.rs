//! Settings component — centered popup for theme, font size, auto-advance
//! and language. Changes apply immediately and persist through preferences.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use tour_core::i18n::Text;
use tour_core::prefs::{Theme, FONT_SIZE_STEP};
use tour_core::session::PlayerAction;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
};

pub struct Settings {
    pub visible: bool,
}

impl Settings {
    pub fn new() -> Self {
        Self { visible: false }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }
}

impl Component for Settings {
    fn id(&self) -> ComponentId {
        ComponentId::Settings
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release || !self.visible {
            return vec![];
        }
        match key.code {
            KeyCode::Esc | KeyCode::Char('o') | KeyCode::Char('q') => {
                self.visible = false;
                vec![]
            }
            KeyCode::Char('d') | KeyCode::Char('t') => {
                vec![Action::Player(PlayerAction::ToggleTheme)]
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                vec![Action::Player(PlayerAction::AdjustFontSize(FONT_SIZE_STEP))]
            }
            KeyCode::Char('-') => {
                vec![Action::Player(PlayerAction::AdjustFontSize(-FONT_SIZE_STEP))]
            }
            KeyCode::Char('a') => vec![Action::Player(PlayerAction::ToggleAutoAdvance)],
            KeyCode::Char('l') => {
                let next = state.session.lang().next();
                vec![Action::Player(PlayerAction::SetLanguage(next))]
            }
            // Consume everything else while the popup is open
            _ => vec![],
        }
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if matches!(action, Action::ToggleSettings) {
            self.toggle();
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        if !self.visible {
            return;
        }
        let palette = state.palette();
        let prefs = state.session.prefs();
        let popup = centered_rect(46, 10, area);

        let theme_label = match prefs.theme {
            Theme::Dark => state.tr(Text::ThemeDark),
            Theme::Light => state.tr(Text::ThemeLight),
        };
        let auto_label = if prefs.auto_advance {
            state.tr(Text::On)
        } else {
            state.tr(Text::Off)
        };

        let font_size_label = prefs.font_size.to_string();
        let lines: Vec<Line> = vec![
            Line::from(""),
            setting_row("t", state.tr(Text::Theme), theme_label, palette),
            setting_row(
                "+/-",
                state.tr(Text::FontSize),
                &font_size_label,
                palette,
            ),
            setting_row("a", state.tr(Text::AutoAdvance), auto_label, palette),
            setting_row(
                "l",
                state.tr(Text::Language),
                state.session.lang().label(),
                palette,
            ),
            Line::from(""),
            Line::from(Span::styled(" esc close", palette.style_muted())),
        ];

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(palette.panel_border))
                    .title(Span::styled(
                        format!(" {} ", state.tr(Text::Settings)),
                        palette.style_default().add_modifier(Modifier::BOLD),
                    ))
                    .style(Style::default().bg(palette.modal_bg)),
            ),
            popup,
        );
    }
}

fn setting_row<'a>(
    key: &'a str,
    label: &'a str,
    value: &'a str,
    palette: &crate::theme::Palette,
) -> Line<'a> {
    Line::from(vec![
        Span::raw(" "),
        Span::styled(
            format!("{key:<5}"),
            palette.style_default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("{label:<24}"), palette.style_secondary()),
        Span::styled(value, palette.style_accent()),
    ])
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
