//! Action enum — all user-initiated intents and internal events.

use tour_core::session::PlayerAction;

/// Unique identifier for a focusable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    StationList,
    PlayerBar,
    Transcript,
    Settings,
    NextModal,
    HelpOverlay,
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Playback / session ───────────────────────────────────────────────────
    Player(PlayerAction),

    // ── Navigation ───────────────────────────────────────────────────────────
    JumpToStation(u32),

    // ── UI toggles ───────────────────────────────────────────────────────────
    ToggleTranscript,
    ToggleSettings,
    ToggleHelp,
    FocusNext,

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
}
