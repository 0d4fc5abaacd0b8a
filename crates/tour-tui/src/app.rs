//! App — component-based event loop.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data for components).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background tasks.
//! - The event loop draws each frame, then awaits the next message.
//! - Components return `Vec<Action>`; App dispatches each Action.
//! - Session effects flow out to the audio engine and the preferences file.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::Block,
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use tour_core::config::Config;
use tour_core::session::{Effect, PlaybackEvent, PlayerAction, Session};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    audio::{AudioCommand, AudioEngine},
    component::Component,
    components::{
        help_overlay::HelpOverlay, next_modal::NextModal, player_bar::PlayerBar,
        settings::Settings, station_list::StationList, transcript::Transcript,
    },
    widgets::{status_bar, toast::ToastManager},
};

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    Playback(PlaybackEvent),
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    // ── Shared state (passed read-only to components) ─────────────────────────
    pub state: AppState,

    // ── Paths ─────────────────────────────────────────────────────────────────
    audio_dir: PathBuf,
    prefs_path: PathBuf,

    // ── Components ────────────────────────────────────────────────────────────
    station_list: StationList,
    player_bar: PlayerBar,
    transcript: Transcript,
    settings: Settings,
    next_modal: NextModal,
    help_overlay: HelpOverlay,

    // ── Session bookkeeping ───────────────────────────────────────────────────
    engine: AudioEngine,
    toast: ToastManager,
    focus: ComponentId,
    should_quit: bool,
}

impl App {
    pub fn new(session: Session, engine: AudioEngine, config: &Config) -> Self {
        Self {
            state: AppState {
                session,
                terminal_bell: config.ui.terminal_bell,
            },
            audio_dir: config.paths.audio_dir.clone(),
            prefs_path: config.paths.prefs_file.clone(),
            station_list: StationList::new(),
            player_bar: PlayerBar::new(),
            transcript: Transcript::new(),
            settings: Settings::new(),
            next_modal: NextModal::new(),
            help_overlay: HelpOverlay::new(),
            engine,
            toast: ToastManager::new(),
            focus: ComponentId::StationList,
            should_quit: false,
        }
    }

    pub async fn run(
        mut self,
        mut playback_rx: mpsc::Receiver<PlaybackEvent>,
    ) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let (tx, mut rx) = mpsc::channel::<AppMessage>(1024);

        // ── Background task: keyboard events ──────────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // ── Background task: audio engine events ──────────────────────────────
        let audio_tx = tx.clone();
        tokio::spawn(async move {
            while let Some(ev) = playback_rx.recv().await {
                if audio_tx.send(AppMessage::Playback(ev)).await.is_err() {
                    break;
                }
            }
        });

        // Toast expiry check + spinner animation: 100ms for smooth braille animation
        let mut toast_tick = tokio::time::interval(Duration::from_millis(100));
        toast_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    needs_redraw = self.handle_message(msg);
                }

                _ = toast_tick.tick() => {
                    if !self.toast.is_empty() {
                        self.toast.tick();
                        needs_redraw = true;
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        if let Err(e) = self.state.session.prefs().save(&self.prefs_path) {
            warn!("final preferences save failed: {e:#}");
        }
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        Ok(())
    }

    fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(Event::Key(key)) => {
                let actions = self.handle_key(key);
                for action in actions {
                    self.dispatch(action);
                }
                true
            }
            AppMessage::Event(Event::Resize(..)) => true,
            AppMessage::Event(_) => false,
            AppMessage::Playback(ev) => {
                if matches!(
                    ev,
                    PlaybackEvent::Started { .. } | PlaybackEvent::Failed { .. }
                ) {
                    self.toast.dismiss_spinner();
                }
                let effects = self.state.session.on_playback(ev);
                self.run_effects(effects);
                true
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return vec![Action::Quit];
        }

        // Overlays capture input, top-most first.
        if self.help_overlay.visible {
            return self.help_overlay.handle_key(key, &self.state);
        }
        if NextModal::is_open(&self.state) {
            return self.next_modal.handle_key(key, &self.state);
        }
        if self.settings.visible {
            return self.settings.handle_key(key, &self.state);
        }

        // Global keys, regardless of focus.
        match key.code {
            KeyCode::Char('q') => return vec![Action::Quit],
            KeyCode::Char('?') => return vec![Action::ToggleHelp],
            KeyCode::Char('o') => return vec![Action::ToggleSettings],
            KeyCode::Char('t') => return vec![Action::ToggleTranscript],
            KeyCode::Char(' ') => return vec![Action::Player(PlayerAction::TogglePlay)],
            KeyCode::Char(',') | KeyCode::Left => {
                return vec![Action::Player(PlayerAction::Rewind)]
            }
            KeyCode::Char('.') | KeyCode::Right => {
                return vec![Action::Player(PlayerAction::Forward)]
            }
            KeyCode::Char('s') => return vec![Action::Player(PlayerAction::CycleSpeed)],
            KeyCode::Char('l') => {
                let next = self.state.session.lang().next();
                return vec![Action::Player(PlayerAction::SetLanguage(next))];
            }
            KeyCode::Char('J') => {
                if let Some(id) = self.state.session.current_id() {
                    return vec![Action::JumpToStation(id)];
                }
                return vec![];
            }
            KeyCode::Tab => return vec![Action::FocusNext],
            _ => {}
        }

        match self.focus {
            ComponentId::Transcript => self.transcript.handle_key(key, &self.state),
            _ => self.station_list.handle_key(key, &self.state),
        }
    }

    fn dispatch(&mut self, action: Action) {
        debug!("dispatch: {action:?}");
        match &action {
            Action::Player(pa) => {
                let effects = self.state.session.apply(*pa);
                self.run_effects(effects);
            }
            Action::Quit => {
                self.should_quit = true;
                return;
            }
            Action::ToggleHelp => {
                self.help_overlay.toggle();
                return;
            }
            Action::ToggleSettings => {
                self.settings.toggle();
                return;
            }
            Action::FocusNext => {
                self.focus = if self.focus == ComponentId::StationList && self.transcript.visible {
                    ComponentId::Transcript
                } else {
                    ComponentId::StationList
                };
                return;
            }
            _ => {}
        }

        // Let every component react; collect follow-up actions.
        let mut follow_ups = Vec::new();
        {
            let state = &self.state;
            follow_ups.extend(self.station_list.on_action(&action, state));
            follow_ups.extend(self.transcript.on_action(&action, state));
            follow_ups.extend(self.settings.on_action(&action, state));
            follow_ups.extend(self.next_modal.on_action(&action, state));
        }
        if matches!(action, Action::ToggleTranscript) && !self.transcript.visible {
            self.focus = ComponentId::StationList;
        }
        for follow_up in follow_ups {
            self.dispatch(follow_up);
        }
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Load { station_id, lang, start_at, paused, speed, generation } => {
                    let Some(station) = self.state.session.catalog().get(station_id) else {
                        continue;
                    };
                    let path = station.audio_file(&self.audio_dir, lang);
                    self.toast.spinner(station.title.get(lang).to_string());
                    self.engine.send(AudioCommand::Load {
                        path,
                        start_at,
                        paused,
                        speed,
                        generation,
                    });
                }
                Effect::Pause => self.engine.send(AudioCommand::Pause),
                Effect::Resume => self.engine.send(AudioCommand::Resume),
                Effect::Seek(pos) => self.engine.send(AudioCommand::Seek(pos)),
                Effect::SetSpeed(speed) => self.engine.send(AudioCommand::SetSpeed(speed)),
                Effect::Haptic => {
                    if self.state.terminal_bell {
                        bell();
                    }
                }
                Effect::SavePrefs => {
                    if let Err(e) = self.state.session.prefs().save(&self.prefs_path) {
                        warn!("preferences save failed: {e:#}");
                        self.toast.warning("could not save preferences");
                    }
                }
                Effect::JumpToStation(id) => {
                    let action = Action::JumpToStation(id);
                    self.station_list.on_action(&action, &self.state);
                }
                Effect::PlaybackFailed(message) => {
                    info!("playback failed: {message}");
                    self.toast.error(message);
                }
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        let palette = self.state.palette();
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(palette.bg)), area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(4),
                Constraint::Length(self.player_bar.min_height()),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        if self.transcript.visible {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(rows[0]);
            self.station_list.draw(
                frame,
                cols[0],
                self.focus == ComponentId::StationList,
                &self.state,
            );
            self.transcript.draw(
                frame,
                cols[1],
                self.focus == ComponentId::Transcript,
                &self.state,
            );
        } else {
            self.station_list.draw(frame, rows[0], true, &self.state);
        }

        self.player_bar.draw(frame, rows[1], false, &self.state);
        status_bar::draw_separator(frame, rows[2], palette);
        status_bar::draw_keys_bar(frame, rows[3], NextModal::is_open(&self.state), palette);

        // Overlays last, on top of everything.
        self.settings.draw(frame, area, true, &self.state);
        self.next_modal.draw(frame, area, true, &self.state);
        self.help_overlay.draw(frame, area, true, &self.state);
        self.toast.draw(frame, area, palette);
    }
}

/// Terminal bell, the closest thing a terminal has to a vibration motor.
fn bell() {
    let mut stdout = io::stdout();
    let _ = stdout.write_all(b"\x07");
    let _ = stdout.flush();
}
