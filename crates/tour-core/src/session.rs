//! Tour session state machine.
//!
//! All playback and preference intent flows through [`Session::apply`], all
//! engine feedback through [`Session::on_playback`]. Both return [`Effect`]s
//! for the caller to execute; the session itself never touches the audio
//! device or the filesystem. Every load carries a generation token and
//! events from superseded loads are dropped, so a slow track can never
//! clobber a newer selection.

use std::time::Duration;

use tracing::debug;

use crate::catalog::Catalog;
use crate::lang::Lang;
use crate::prefs::Preferences;

/// Where the player currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No station selected yet; the player surface is hidden.
    Idle,
    LoadedPaused,
    LoadedPlaying,
    /// Narration finished and auto-advance wants confirmation before
    /// moving on to `pending`.
    AwaitingNext { pending: u32 },
}

/// Why a load was requested. A language swap keeps the player surface as it
/// is; a fresh selection reveals it and marks the station visited once the
/// track actually starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    Select,
    LanguageSwap,
}

/// User intent, normalized by the UI layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerAction {
    Select(u32),
    TogglePlay,
    CycleSpeed,
    Rewind,
    Forward,
    SeekTo(Duration),
    SetLanguage(Lang),
    ToggleTheme,
    AdjustFontSize(i16),
    ToggleAutoAdvance,
    ConfirmNext,
    CancelNext,
}

/// Side effects the caller must carry out, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Load {
        station_id: u32,
        lang: Lang,
        start_at: Option<Duration>,
        paused: bool,
        speed: f32,
        generation: u64,
    },
    Pause,
    Resume,
    Seek(Duration),
    SetSpeed(f32),
    /// Tactile feedback for a control interaction.
    Haptic,
    SavePrefs,
    /// Scroll the station list to the given id.
    JumpToStation(u32),
    PlaybackFailed(String),
}

/// Feedback from the audio engine. Every event names the generation of the
/// load it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    Started { generation: u64, duration: Duration },
    Progress { generation: u64, position: Duration },
    Finished { generation: u64 },
    Failed { generation: u64, message: String },
}

#[derive(Debug)]
pub struct Session {
    catalog: Catalog,
    prefs: Preferences,
    lang: Lang,
    speeds: Vec<f32>,
    speed_idx: usize,
    seek_step: Duration,

    phase: Phase,
    current: Option<u32>,
    position: Duration,
    duration: Duration,
    generation: u64,
    in_flight: Option<LoadKind>,
    player_revealed: bool,
}

impl Session {
    pub fn new(
        catalog: Catalog,
        prefs: Preferences,
        lang: Lang,
        speeds: Vec<f32>,
        seek_step: Duration,
    ) -> Self {
        let speeds = if speeds.is_empty() { vec![1.0] } else { speeds };
        Self {
            catalog,
            prefs,
            lang,
            speeds,
            speed_idx: 0,
            seek_step,
            phase: Phase::Idle,
            current: None,
            position: Duration::ZERO,
            duration: Duration::ZERO,
            generation: 0,
            in_flight: None,
            player_revealed: false,
        }
    }

    pub fn apply(&mut self, action: PlayerAction) -> Vec<Effect> {
        match action {
            PlayerAction::Select(id) => self.select(id),
            PlayerAction::TogglePlay => self.toggle_play(),
            PlayerAction::CycleSpeed => self.cycle_speed(),
            PlayerAction::Rewind => self.seek_by(-(self.seek_step.as_secs() as i64)),
            PlayerAction::Forward => self.seek_by(self.seek_step.as_secs() as i64),
            PlayerAction::SeekTo(pos) => self.seek_to(pos),
            PlayerAction::SetLanguage(lang) => self.set_language(lang),
            PlayerAction::ToggleTheme => {
                self.prefs.theme = self.prefs.theme.toggle();
                vec![Effect::Haptic, Effect::SavePrefs]
            }
            PlayerAction::AdjustFontSize(delta) => {
                self.prefs.adjust_font_size(delta);
                vec![Effect::Haptic, Effect::SavePrefs]
            }
            PlayerAction::ToggleAutoAdvance => {
                self.prefs.auto_advance = !self.prefs.auto_advance;
                vec![Effect::Haptic, Effect::SavePrefs]
            }
            PlayerAction::ConfirmNext => self.confirm_next(),
            PlayerAction::CancelNext => self.cancel_next(),
        }
    }

    pub fn on_playback(&mut self, event: PlaybackEvent) -> Vec<Effect> {
        match event {
            PlaybackEvent::Started { generation, duration } => {
                if generation != self.generation {
                    debug!("dropping stale start (gen {generation} != {})", self.generation);
                    return vec![];
                }
                self.duration = duration;
                // The phase already tracks the user's latest intent; a pause
                // or resume issued while the load was in flight stands.
                let kind = self.in_flight.take();

                let mut effects = vec![];
                if kind == Some(LoadKind::Select) {
                    self.player_revealed = true;
                    if let Some(id) = self.current {
                        if self.prefs.mark_visited(id) {
                            effects.push(Effect::SavePrefs);
                        }
                        effects.push(Effect::JumpToStation(id));
                    }
                }
                effects
            }
            PlaybackEvent::Progress { generation, position } => {
                if generation == self.generation && self.in_flight.is_none() {
                    self.position = position.min(self.duration);
                }
                vec![]
            }
            PlaybackEvent::Finished { generation } => {
                if generation != self.generation {
                    return vec![];
                }
                self.position = self.duration;
                let next = self.current.and_then(|id| self.catalog.next_after(id));
                self.phase = match next {
                    Some(next) if self.prefs.auto_advance => {
                        Phase::AwaitingNext { pending: next.id }
                    }
                    _ => Phase::LoadedPaused,
                };
                vec![]
            }
            PlaybackEvent::Failed { generation, message } => {
                if generation != self.generation {
                    return vec![];
                }
                self.in_flight = None;
                self.phase = Phase::LoadedPaused;
                vec![Effect::PlaybackFailed(message)]
            }
        }
    }

    fn select(&mut self, id: u32) -> Vec<Effect> {
        if self.catalog.get(id).is_none() {
            return vec![];
        }
        // Selecting the loaded station again is the play/pause toggle.
        if self.current == Some(id)
            && matches!(self.phase, Phase::LoadedPaused | Phase::LoadedPlaying)
        {
            return self.toggle_play();
        }
        self.start_load(id, None, false, LoadKind::Select)
    }

    fn toggle_play(&mut self) -> Vec<Effect> {
        match self.phase {
            Phase::LoadedPlaying => {
                self.phase = Phase::LoadedPaused;
                vec![Effect::Haptic, Effect::Pause]
            }
            Phase::LoadedPaused => {
                self.phase = Phase::LoadedPlaying;
                vec![Effect::Haptic, Effect::Resume]
            }
            Phase::Idle | Phase::AwaitingNext { .. } => vec![],
        }
    }

    fn cycle_speed(&mut self) -> Vec<Effect> {
        self.speed_idx = (self.speed_idx + 1) % self.speeds.len();
        vec![Effect::Haptic, Effect::SetSpeed(self.speed())]
    }

    fn seek_by(&mut self, delta_secs: i64) -> Vec<Effect> {
        if !self.is_loaded() {
            return vec![];
        }
        let pos = self.position.as_secs() as i64 + delta_secs;
        let pos = pos.clamp(0, self.duration.as_secs() as i64);
        self.seek_to(Duration::from_secs(pos as u64))
    }

    fn seek_to(&mut self, pos: Duration) -> Vec<Effect> {
        if !self.is_loaded() {
            return vec![];
        }
        self.position = pos.min(self.duration);
        vec![Effect::Haptic, Effect::Seek(self.position)]
    }

    fn set_language(&mut self, lang: Lang) -> Vec<Effect> {
        if lang == self.lang {
            return vec![];
        }
        self.lang = lang;
        let Some(id) = self.current else {
            return vec![Effect::Haptic];
        };
        if !self.is_loaded() {
            return vec![Effect::Haptic];
        }
        // Swap the narration track, keeping position and play state.
        let paused = self.phase != Phase::LoadedPlaying;
        let start_at = Some(self.position);
        self.start_load(id, start_at, paused, LoadKind::LanguageSwap)
    }

    fn confirm_next(&mut self) -> Vec<Effect> {
        let Phase::AwaitingNext { pending } = self.phase else {
            return vec![];
        };
        self.start_load(pending, None, false, LoadKind::Select)
    }

    fn cancel_next(&mut self) -> Vec<Effect> {
        if !matches!(self.phase, Phase::AwaitingNext { .. }) {
            return vec![];
        }
        self.phase = Phase::LoadedPaused;
        vec![Effect::Haptic]
    }

    fn start_load(
        &mut self,
        id: u32,
        start_at: Option<Duration>,
        paused: bool,
        kind: LoadKind,
    ) -> Vec<Effect> {
        self.generation += 1;
        self.in_flight = Some(kind);
        self.current = Some(id);
        if kind == LoadKind::Select {
            self.position = Duration::ZERO;
            self.duration = Duration::ZERO;
        }
        self.phase = if paused { Phase::LoadedPaused } else { Phase::LoadedPlaying };
        vec![
            Effect::Haptic,
            Effect::Load {
                station_id: id,
                lang: self.lang,
                start_at,
                paused,
                speed: self.speed(),
                generation: self.generation,
            },
        ]
    }

    fn is_loaded(&self) -> bool {
        matches!(
            self.phase,
            Phase::LoadedPaused | Phase::LoadedPlaying | Phase::AwaitingNext { .. }
        )
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_id(&self) -> Option<u32> {
        self.current
    }

    pub fn current_station(&self) -> Option<&crate::catalog::Station> {
        self.current.and_then(|id| self.catalog.get(id))
    }

    /// True while a load is in flight and its track has not started yet.
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::LoadedPlaying
    }

    pub fn player_revealed(&self) -> bool {
        self.player_revealed
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn progress_ratio(&self) -> f64 {
        if self.duration.is_zero() {
            0.0
        } else {
            (self.position.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
        }
    }

    pub fn speed(&self) -> f32 {
        self.speeds[self.speed_idx]
    }

    pub fn lang(&self) -> Lang {
        self.lang
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn prefs(&self) -> &Preferences {
        &self.prefs
    }

    /// Station the next-station prompt is waiting to play, if any.
    pub fn pending_next(&self) -> Option<&crate::catalog::Station> {
        match self.phase {
            Phase::AwaitingNext { pending } => self.catalog.get(pending),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::parse(
            r#"
            [[station]]
            id = 1
            [station.title]
            pl = "1. Ołtarz Główny"
            en = "1. Main Altar"

            [[station]]
            id = 2
            [station.title]
            pl = "2. Ambona"
            en = "2. The Pulpit"
            "#,
        )
        .unwrap()
    }

    fn session() -> Session {
        Session::new(
            catalog(),
            Preferences::default(),
            Lang::En,
            vec![1.0, 1.25, 1.5],
            Duration::from_secs(10),
        )
    }

    fn latest_generation(effects: &[Effect]) -> u64 {
        effects
            .iter()
            .find_map(|e| match e {
                Effect::Load { generation, .. } => Some(*generation),
                _ => None,
            })
            .expect("no load effect")
    }

    fn start(session: &mut Session, id: u32) -> u64 {
        let gen = latest_generation(&session.apply(PlayerAction::Select(id)));
        session.on_playback(PlaybackEvent::Started {
            generation: gen,
            duration: Duration::from_secs(120),
        });
        gen
    }

    #[test]
    fn selecting_current_station_toggles_playback() {
        let mut s = session();
        start(&mut s, 1);
        assert_eq!(s.phase(), Phase::LoadedPlaying);

        let effects = s.apply(PlayerAction::Select(1));
        assert_eq!(s.phase(), Phase::LoadedPaused);
        assert!(effects.contains(&Effect::Pause));

        let effects = s.apply(PlayerAction::Select(1));
        assert_eq!(s.phase(), Phase::LoadedPlaying);
        assert!(effects.contains(&Effect::Resume));
    }

    #[test]
    fn selecting_other_station_loads_from_zero() {
        let mut s = session();
        start(&mut s, 1);
        s.on_playback(PlaybackEvent::Progress {
            generation: s.generation,
            position: Duration::from_secs(30),
        });

        let effects = s.apply(PlayerAction::Select(2));
        assert_eq!(s.current_id(), Some(2));
        assert_eq!(s.position(), Duration::ZERO);
        assert!(matches!(
            effects.as_slice(),
            [Effect::Haptic, Effect::Load { station_id: 2, start_at: None, paused: false, .. }]
        ));
    }

    #[test]
    fn unknown_station_is_ignored() {
        let mut s = session();
        assert!(s.apply(PlayerAction::Select(99)).is_empty());
        assert_eq!(s.phase(), Phase::Idle);
    }

    #[test]
    fn started_reveals_player_and_marks_visited_once() {
        let mut s = session();
        assert!(!s.player_revealed());

        let gen = latest_generation(&s.apply(PlayerAction::Select(1)));
        let effects = s.on_playback(PlaybackEvent::Started {
            generation: gen,
            duration: Duration::from_secs(120),
        });
        assert!(s.player_revealed());
        assert!(s.prefs().is_visited(1));
        assert_eq!(effects, vec![Effect::SavePrefs, Effect::JumpToStation(1)]);

        // Replaying an already-visited station saves nothing.
        start(&mut s, 2);
        let gen = latest_generation(&s.apply(PlayerAction::Select(1)));
        let effects = s.on_playback(PlaybackEvent::Started {
            generation: gen,
            duration: Duration::from_secs(120),
        });
        assert!(!effects.contains(&Effect::SavePrefs));
        assert!(effects.contains(&Effect::JumpToStation(1)));
    }

    #[test]
    fn stale_events_are_dropped() {
        let mut s = session();
        let old_gen = latest_generation(&s.apply(PlayerAction::Select(1)));
        let new_gen = latest_generation(&s.apply(PlayerAction::Select(2)));
        assert_ne!(old_gen, new_gen);

        // The superseded load reports in late.
        let effects = s.on_playback(PlaybackEvent::Started {
            generation: old_gen,
            duration: Duration::from_secs(50),
        });
        assert!(effects.is_empty());
        assert_eq!(s.current_id(), Some(2));
        assert_eq!(s.duration(), Duration::ZERO);

        let effects = s.on_playback(PlaybackEvent::Finished { generation: old_gen });
        assert!(effects.is_empty());
        assert_eq!(s.phase(), Phase::LoadedPlaying);

        s.on_playback(PlaybackEvent::Started {
            generation: new_gen,
            duration: Duration::from_secs(80),
        });
        assert_eq!(s.duration(), Duration::from_secs(80));
    }

    #[test]
    fn pause_during_load_survives_track_start() {
        let mut s = session();
        let gen = latest_generation(&s.apply(PlayerAction::Select(1)));

        // User pauses before the engine confirms the start.
        let effects = s.apply(PlayerAction::TogglePlay);
        assert!(effects.contains(&Effect::Pause));
        assert_eq!(s.phase(), Phase::LoadedPaused);

        let effects = s.on_playback(PlaybackEvent::Started {
            generation: gen,
            duration: Duration::from_secs(120),
        });
        assert_eq!(s.phase(), Phase::LoadedPaused);
        // The select continuation still runs.
        assert!(s.player_revealed());
        assert!(s.prefs().is_visited(1));
        assert!(effects.contains(&Effect::JumpToStation(1)));
    }

    #[test]
    fn language_change_preserves_position_and_play_state() {
        let mut s = session();
        start(&mut s, 1);
        s.on_playback(PlaybackEvent::Progress {
            generation: s.generation,
            position: Duration::from_secs(45),
        });
        s.apply(PlayerAction::TogglePlay);
        assert_eq!(s.phase(), Phase::LoadedPaused);

        let effects = s.apply(PlayerAction::SetLanguage(Lang::De));
        let load = effects.iter().find_map(|e| match e {
            Effect::Load { lang, start_at, paused, .. } => Some((*lang, *start_at, *paused)),
            _ => None,
        });
        assert_eq!(load, Some((Lang::De, Some(Duration::from_secs(45)), true)));

        // The swap keeps the player where it was, no re-visit, no jump.
        let effects = s.on_playback(PlaybackEvent::Started {
            generation: s.generation,
            duration: Duration::from_secs(130),
        });
        assert!(effects.is_empty());
        assert_eq!(s.phase(), Phase::LoadedPaused);
        assert_eq!(s.position(), Duration::from_secs(45));
    }

    #[test]
    fn language_change_while_idle_only_switches_ui() {
        let mut s = session();
        let effects = s.apply(PlayerAction::SetLanguage(Lang::Cs));
        assert_eq!(effects, vec![Effect::Haptic]);
        assert_eq!(s.lang(), Lang::Cs);
        assert_eq!(s.phase(), Phase::Idle);
    }

    #[test]
    fn seek_clamps_to_track_bounds() {
        let mut s = session();
        start(&mut s, 1);

        let effects = s.apply(PlayerAction::Rewind);
        assert!(effects.contains(&Effect::Seek(Duration::ZERO)));

        s.on_playback(PlaybackEvent::Progress {
            generation: s.generation,
            position: Duration::from_secs(115),
        });
        let effects = s.apply(PlayerAction::Forward);
        assert!(effects.contains(&Effect::Seek(Duration::from_secs(120))));

        let effects = s.apply(PlayerAction::SeekTo(Duration::from_secs(999)));
        assert!(effects.contains(&Effect::Seek(Duration::from_secs(120))));
    }

    #[test]
    fn seek_without_track_is_a_no_op() {
        let mut s = session();
        assert!(s.apply(PlayerAction::Forward).is_empty());
        assert!(s.apply(PlayerAction::SeekTo(Duration::from_secs(5))).is_empty());
    }

    #[test]
    fn speed_cycles_and_wraps() {
        let mut s = session();
        assert_eq!(s.speed(), 1.0);
        assert!(s
            .apply(PlayerAction::CycleSpeed)
            .contains(&Effect::SetSpeed(1.25)));
        s.apply(PlayerAction::CycleSpeed);
        assert_eq!(s.speed(), 1.5);
        s.apply(PlayerAction::CycleSpeed);
        assert_eq!(s.speed(), 1.0);
    }

    #[test]
    fn finish_with_auto_advance_prompts_for_next() {
        let mut s = session();
        start(&mut s, 1);
        s.on_playback(PlaybackEvent::Finished { generation: s.generation });
        assert_eq!(s.phase(), Phase::AwaitingNext { pending: 2 });
        assert_eq!(s.pending_next().map(|st| st.id), Some(2));
        assert_eq!(s.position(), s.duration());
    }

    #[test]
    fn finish_on_last_station_just_pauses() {
        let mut s = session();
        start(&mut s, 2);
        s.on_playback(PlaybackEvent::Finished { generation: s.generation });
        assert_eq!(s.phase(), Phase::LoadedPaused);
    }

    #[test]
    fn finish_with_auto_advance_off_just_pauses() {
        let mut s = session();
        s.apply(PlayerAction::ToggleAutoAdvance);
        start(&mut s, 1);
        s.on_playback(PlaybackEvent::Finished { generation: s.generation });
        assert_eq!(s.phase(), Phase::LoadedPaused);
    }

    #[test]
    fn confirm_next_plays_pending_station() {
        let mut s = session();
        start(&mut s, 1);
        s.on_playback(PlaybackEvent::Finished { generation: s.generation });

        let effects = s.apply(PlayerAction::ConfirmNext);
        assert!(matches!(
            effects.as_slice(),
            [Effect::Haptic, Effect::Load { station_id: 2, start_at: None, paused: false, .. }]
        ));
        assert_eq!(s.current_id(), Some(2));
        assert_eq!(s.phase(), Phase::LoadedPlaying);
    }

    #[test]
    fn cancel_next_stays_on_finished_station() {
        let mut s = session();
        start(&mut s, 1);
        s.on_playback(PlaybackEvent::Finished { generation: s.generation });

        let effects = s.apply(PlayerAction::CancelNext);
        assert_eq!(effects, vec![Effect::Haptic]);
        assert_eq!(s.phase(), Phase::LoadedPaused);
        assert_eq!(s.current_id(), Some(1));
    }

    #[test]
    fn confirm_outside_prompt_is_a_no_op() {
        let mut s = session();
        start(&mut s, 1);
        assert!(s.apply(PlayerAction::ConfirmNext).is_empty());
        assert!(s.apply(PlayerAction::CancelNext).is_empty());
    }

    #[test]
    fn failed_load_pauses_and_reports() {
        let mut s = session();
        let gen = latest_generation(&s.apply(PlayerAction::Select(1)));
        let effects = s.on_playback(PlaybackEvent::Failed {
            generation: gen,
            message: "no such file".into(),
        });
        assert_eq!(s.phase(), Phase::LoadedPaused);
        assert_eq!(effects, vec![Effect::PlaybackFailed("no such file".into())]);
        // The player surface stays hidden until a track really starts.
        assert!(!s.player_revealed());
        assert!(!s.prefs().is_visited(1));
    }

    #[test]
    fn full_tour_advance_flow() {
        let mut s = session();
        start(&mut s, 1);
        assert!(s.prefs().is_visited(1));

        s.on_playback(PlaybackEvent::Finished { generation: s.generation });
        assert_eq!(s.pending_next().map(|st| st.id), Some(2));

        let gen = latest_generation(&s.apply(PlayerAction::ConfirmNext));
        let effects = s.on_playback(PlaybackEvent::Started {
            generation: gen,
            duration: Duration::from_secs(90),
        });
        assert!(s.prefs().is_visited(2));
        assert!(s.prefs().is_visited(1));
        assert!(effects.contains(&Effect::SavePrefs));
        assert_eq!(s.phase(), Phase::LoadedPlaying);
    }

    #[test]
    fn declined_advance_marks_nothing_new() {
        let mut s = session();
        start(&mut s, 1);
        s.on_playback(PlaybackEvent::Finished { generation: s.generation });

        s.apply(PlayerAction::CancelNext);
        assert_eq!(s.phase(), Phase::LoadedPaused);
        assert!(s.pending_next().is_none());
        assert!(!s.prefs().is_visited(2));
        assert!(s.prefs().is_visited(1));
    }

    #[test]
    fn preference_toggles_persist() {
        let mut s = session();
        let effects = s.apply(PlayerAction::ToggleTheme);
        assert_eq!(effects, vec![Effect::Haptic, Effect::SavePrefs]);
        assert_eq!(s.prefs().theme, crate::prefs::Theme::Light);

        s.apply(PlayerAction::AdjustFontSize(2));
        assert_eq!(s.prefs().font_size, 18);

        s.apply(PlayerAction::ToggleAutoAdvance);
        assert!(!s.prefs().auto_advance);
    }
}
