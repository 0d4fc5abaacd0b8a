//! StationList component — the tour itinerary, left pane.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use tour_core::catalog::Station;
use tour_core::i18n::Text;
use tour_core::session::PlayerAction;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
};

pub struct StationList {
    selected: usize,
    list_state: ListState,
}

impl StationList {
    pub fn new() -> Self {
        Self {
            selected: 0,
            list_state: ListState::default(),
        }
    }

    pub fn selected_station<'a>(&self, state: &'a AppState) -> Option<&'a Station> {
        state.session.catalog().stations().get(self.selected)
    }

    fn move_selection(&mut self, state: &AppState, delta: i64) {
        let len = state.session.catalog().len();
        if len == 0 {
            return;
        }
        let max = (len - 1) as i64;
        self.selected = (self.selected as i64 + delta).clamp(0, max) as usize;
    }

    /// Number of rows one station card occupies at the current density.
    /// The font-size preference maps to card density: bigger font, airier list.
    fn card_height(font_size: u16) -> usize {
        match font_size {
            0..=15 => 1,
            16..=21 => 2,
            _ => 3,
        }
    }

    fn render_item<'a>(
        &self,
        station: &'a Station,
        is_selected: bool,
        state: &AppState,
        focused: bool,
    ) -> ListItem<'a> {
        let palette = state.palette();
        let lang = state.session.lang();
        let font_size = state.session.prefs().font_size;
        let is_current = state.session.current_id() == Some(station.id);

        let (icon, icon_style) = if is_current {
            if state.session.is_loading() {
                ("⋯", palette.style_secondary())
            } else if state.session.is_playing() {
                ("▶", palette.style_playing())
            } else {
                ("⏸", palette.style_secondary())
            }
        } else {
            (" ", palette.style_muted())
        };

        let title_style = if is_current {
            palette.style_playing().add_modifier(Modifier::BOLD)
        } else if is_selected && focused {
            palette.style_selected_focused()
        } else {
            palette.style_default()
        };

        let mut title_spans = vec![
            Span::styled(format!(" {icon} "), icon_style),
            Span::styled(station.title.get(lang).to_string(), title_style),
        ];
        if state.session.prefs().is_visited(station.id) {
            title_spans.push(Span::raw(" "));
            title_spans.push(Span::styled(
                format!("✓ {}", state.tr(Text::Visited)),
                Style::default().fg(palette.visited),
            ));
        }

        let mut lines = vec![Line::from(title_spans)];
        let height = Self::card_height(font_size);
        if height >= 2 {
            let description = station.description.get(lang);
            if !description.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("   {description}"),
                    palette.style_secondary(),
                )));
            } else {
                lines.push(Line::from(""));
            }
        }
        if height >= 3 {
            lines.push(Line::from(""));
        }

        let item = ListItem::new(lines);
        if is_selected {
            item.style(Style::default().bg(palette.selection_bg))
        } else {
            item
        }
    }
}

impl Component for StationList {
    fn id(&self) -> ComponentId {
        ComponentId::StationList
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection(state, -1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection(state, 1);
            }
            KeyCode::PageUp => {
                self.move_selection(state, -5);
            }
            KeyCode::PageDown => {
                self.move_selection(state, 5);
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.selected = 0;
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.selected = state.session.catalog().len().saturating_sub(1);
            }
            KeyCode::Enter => {
                if let Some(station) = self.selected_station(state) {
                    return vec![Action::Player(PlayerAction::Select(station.id))];
                }
            }
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, state: &AppState) -> Vec<Action> {
        if let Action::JumpToStation(id) = action {
            if let Some(pos) = state.session.catalog().position(*id) {
                self.selected = pos;
            }
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let palette = state.palette();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(palette.style_border(focused))
            .title(Span::styled(" audiotour ", palette.style_accent()));

        let items: Vec<ListItem> = state
            .session
            .catalog()
            .stations()
            .iter()
            .enumerate()
            .map(|(i, station)| self.render_item(station, i == self.selected, state, focused))
            .collect();

        self.list_state.select(Some(self.selected));
        let list = List::new(items).block(block);
        frame.render_stateful_widget(list, area, &mut self.list_state);
    }
}
