//! Persisted user preferences.
//!
//! Theme, font size, auto-advance and the visited-station set survive across
//! runs; everything else in the session resets on restart. Stored as one
//! JSON file in the data directory; every field degrades independently via
//! serde defaults, and an unreadable file yields the defaults.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const FONT_SIZE_MIN: u16 = 14;
pub const FONT_SIZE_MAX: u16 = 24;
pub const FONT_SIZE_STEP: i16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggle(self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_font_size")]
    pub font_size: u16,
    #[serde(default = "default_auto_advance")]
    pub auto_advance: bool,
    #[serde(default)]
    pub visited: BTreeSet<u32>,
}

fn default_font_size() -> u16 {
    16
}

fn default_auto_advance() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            font_size: default_font_size(),
            auto_advance: default_auto_advance(),
            visited: BTreeSet::new(),
        }
    }
}

impl Preferences {
    /// Load preferences, falling back to defaults on any read/parse error.
    /// The font size is re-clamped in case the file was edited by hand.
    pub fn load(path: &Path) -> Self {
        let mut prefs = std::fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str::<Preferences>(&content).ok())
            .unwrap_or_default();
        prefs.font_size = prefs
            .font_size
            .clamp(FONT_SIZE_MIN, FONT_SIZE_MAX);
        prefs
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Record that a station's narration was started. Returns `true` when the
    /// id is new; the set never shrinks.
    pub fn mark_visited(&mut self, id: u32) -> bool {
        self.visited.insert(id)
    }

    pub fn is_visited(&self, id: u32) -> bool {
        self.visited.contains(&id)
    }

    /// Apply a signed font-size delta, clamped to the allowed range.
    pub fn adjust_font_size(&mut self, delta: i16) {
        let next = i32::from(self.font_size) + i32::from(delta);
        self.font_size = next.clamp(i32::from(FONT_SIZE_MIN), i32::from(FONT_SIZE_MAX)) as u16;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visited_is_idempotent_and_grows() {
        let mut prefs = Preferences::default();
        assert!(prefs.mark_visited(1));
        assert!(!prefs.mark_visited(1));
        assert_eq!(prefs.visited.len(), 1);
        assert!(prefs.mark_visited(2));
        assert_eq!(prefs.visited.len(), 2);
        assert!(prefs.is_visited(1));
    }

    #[test]
    fn font_size_stays_in_bounds() {
        let mut prefs = Preferences::default();
        for _ in 0..50 {
            prefs.adjust_font_size(FONT_SIZE_STEP);
        }
        assert_eq!(prefs.font_size, FONT_SIZE_MAX);
        for _ in 0..50 {
            prefs.adjust_font_size(-FONT_SIZE_STEP);
        }
        assert_eq!(prefs.font_size, FONT_SIZE_MIN);
        prefs.adjust_font_size(3);
        prefs.adjust_font_size(-1);
        assert!((FONT_SIZE_MIN..=FONT_SIZE_MAX).contains(&prefs.font_size));
    }

    #[test]
    fn round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let mut prefs = Preferences::default();
        prefs.theme = Theme::Light;
        prefs.adjust_font_size(FONT_SIZE_STEP);
        prefs.auto_advance = false;
        prefs.mark_visited(2);
        prefs.save(&path).unwrap();

        let loaded = Preferences::load(&path);
        assert_eq!(loaded, prefs);
    }

    #[test]
    fn load_clamps_hand_edited_font_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, r#"{ "font_size": 99 }"#).unwrap();
        let prefs = Preferences::load(&path);
        assert_eq!(prefs.font_size, FONT_SIZE_MAX);
        // Missing fields take their defaults.
        assert!(prefs.auto_advance);
        assert_eq!(prefs.theme, Theme::Dark);
    }

    #[test]
    fn load_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::load(&dir.path().join("nope.json"));
        assert_eq!(prefs, Preferences::default());
    }
}
