//! PlayerBar component — current station, controls readout, progress.
//!
//! Hidden until the first narration actually starts; before that the pane
//! shows a one-line hint instead of empty controls.

use ratatui::crossterm::event::KeyEvent;
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use tour_core::i18n::Text;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    widgets::progress_bar,
};

pub struct PlayerBar;

impl PlayerBar {
    pub fn new() -> Self {
        Self
    }
}

impl Component for PlayerBar {
    fn id(&self) -> ComponentId {
        ComponentId::PlayerBar
    }

    fn handle_key(&mut self, _key: KeyEvent, _state: &AppState) -> Vec<Action> {
        // Playback keys are global; the bar is display-only.
        vec![]
    }

    fn on_action(&mut self, _action: &Action, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let palette = state.palette();
        let session = &state.session;

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(palette.style_border(focused));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if !session.player_revealed() {
            let hint = Paragraph::new(Line::from(Span::styled(
                format!(" {}", state.tr(Text::NothingPlaying)),
                palette.style_muted(),
            )));
            frame.render_widget(hint, inner);
            return;
        }

        let lang = session.lang();
        let title = session
            .current_station()
            .map(|s| s.title.get(lang).to_string())
            .unwrap_or_default();

        let status_icon = if session.is_loading() {
            "⋯"
        } else if session.is_playing() {
            "▶"
        } else {
            "⏸"
        };

        // Right-aligned speed and language badges
        let badges = format!("{:.2}× · {}", session.speed(), lang.code().to_uppercase());
        let title_max = inner.width.saturating_sub(badges.width() as u16 + 6) as usize;
        let title = truncate(&title, title_max);

        let mut spans = vec![
            Span::styled(format!(" {status_icon} "), palette.style_playing()),
            Span::styled(
                title.clone(),
                palette.style_default().add_modifier(Modifier::BOLD),
            ),
        ];
        let used = 3 + title.width() + 1;
        let pad = (inner.width as usize).saturating_sub(used + badges.width());
        spans.push(Span::raw(" ".repeat(pad)));
        spans.push(Span::styled(badges, palette.style_secondary()));
        frame.render_widget(
            Paragraph::new(Line::from(spans)),
            Rect { height: 1, ..inner },
        );

        if inner.height >= 2 {
            let bar_area = Rect {
                y: inner.y + 1,
                height: 1,
                x: inner.x + 1,
                width: inner.width.saturating_sub(2),
            };
            progress_bar::draw_progress(
                frame,
                bar_area,
                session.progress_ratio(),
                Some(session.position()),
                Some(session.duration()),
                palette,
            );
        }
    }

    fn min_height(&self) -> u16 {
        4
    }
}

fn truncate(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut out = String::new();
    let mut w = 0;
    for ch in s.chars() {
        let cw = ch.width().unwrap_or(0);
        if w + cw + 1 > max_width {
            break;
        }
        w += cw;
        out.push(ch);
    }
    out.push('…');
    out
}
