//! AppState — shared read-only data passed to all components during render/event.
//!
//! Components read this for session state, but never mutate it.
//! The App event-loop is the only thing that writes to AppState.

use tour_core::i18n::{self, Text};
use tour_core::session::Session;

use crate::theme::{self, Palette};

/// The full shared state of the application.
/// Components read this; only the App event-loop writes to it.
pub struct AppState {
    pub session: Session,
    /// Ring the terminal bell on control interactions.
    pub terminal_bell: bool,
}

impl AppState {
    /// Active color palette, following the theme preference.
    pub fn palette(&self) -> &'static Palette {
        theme::palette(self.session.prefs().theme)
    }

    /// Translate a fixed UI string into the session language.
    pub fn tr(&self, text: Text) -> &'static str {
        i18n::tr(self.session.lang(), text)
    }
}
