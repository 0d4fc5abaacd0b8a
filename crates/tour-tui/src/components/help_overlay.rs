//! HelpOverlay component — centered popup with keyboard shortcut reference.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::Palette,
};

pub struct HelpOverlay {
    pub visible: bool,
}

impl HelpOverlay {
    pub fn new() -> Self {
        Self { visible: false }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }
}

impl Component for HelpOverlay {
    fn id(&self) -> ComponentId {
        ComponentId::HelpOverlay
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        if !self.visible {
            return vec![];
        }
        match key.code {
            KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc => {
                self.visible = false;
                return vec![];
            }
            _ => {}
        }
        // Consume all keys while overlay is open
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if matches!(action, Action::ToggleHelp) {
            self.toggle();
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        if !self.visible {
            return;
        }
        let palette = state.palette();
        let popup = centered_rect(60, 24, area);

        let help_lines: Vec<Line> = vec![
            Line::from(Span::styled(
                " keyboard shortcuts",
                palette.style_default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                " playback",
                palette.style_muted().add_modifier(Modifier::BOLD),
            )),
            help_row("enter", "play selected station (again = pause)", palette),
            help_row("space", "toggle pause/play", palette),
            help_row(", / .  or  ← / →", "rewind / forward", palette),
            help_row("s", "cycle playback speed", palette),
            help_row("l", "cycle narration language", palette),
            Line::from(""),
            Line::from(Span::styled(
                " navigation",
                palette.style_muted().add_modifier(Modifier::BOLD),
            )),
            help_row("↑ / ↓  or  j / k", "move selection / scroll", palette),
            help_row("pg up / pg dn", "jump 5 rows", palette),
            help_row("home / end  or  g / G", "jump first / last", palette),
            help_row("tab", "focus transcript pane (when open)", palette),
            help_row("J", "jump to current station", palette),
            Line::from(""),
            Line::from(Span::styled(
                " panels & ui",
                palette.style_muted().add_modifier(Modifier::BOLD),
            )),
            help_row("t", "toggle transcript", palette),
            help_row("o", "settings (theme, font, auto-advance)", palette),
            help_row("?", "toggle this help overlay", palette),
            help_row("q / Ctrl+C", "quit", palette),
            Line::from(""),
            Line::from(Span::styled(
                " press ? or esc to close",
                palette.style_muted(),
            )),
        ];

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(help_lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(palette.panel_border))
                        .style(Style::default().bg(palette.modal_bg)),
                )
                .wrap(Wrap { trim: false }),
            popup,
        );
    }
}

fn help_row<'a>(key: &'a str, desc: &'a str, palette: &Palette) -> Line<'a> {
    Line::from(vec![
        Span::raw(" "),
        Span::styled(
            format!("{:<22}", key),
            palette.style_default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(desc, palette.style_secondary()),
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
