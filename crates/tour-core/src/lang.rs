//! Supported narration languages.
//!
//! The set is fixed; anything the platform reports outside of it falls back
//! to Polish, which every station and UI string table must cover.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    Pl,
    En,
    De,
    Cs,
}

impl Lang {
    pub const FALLBACK: Lang = Lang::Pl;
    pub const ALL: [Lang; 4] = [Lang::Pl, Lang::En, Lang::De, Lang::Cs];

    /// Two-letter code, also the audio asset directory name.
    pub fn code(self) -> &'static str {
        match self {
            Lang::Pl => "pl",
            Lang::En => "en",
            Lang::De => "de",
            Lang::Cs => "cs",
        }
    }

    /// Native-language label for the settings selector.
    pub fn label(self) -> &'static str {
        match self {
            Lang::Pl => "Polski",
            Lang::En => "English",
            Lang::De => "Deutsch",
            Lang::Cs => "Čeština",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Lang::Pl => 0,
            Lang::En => 1,
            Lang::De => 2,
            Lang::Cs => 3,
        }
    }

    pub fn from_code(code: &str) -> Option<Lang> {
        match code {
            "pl" => Some(Lang::Pl),
            "en" => Some(Lang::En),
            "de" => Some(Lang::De),
            "cs" => Some(Lang::Cs),
            _ => None,
        }
    }

    /// Next language in display order, wrapping. Used by the settings panel.
    pub fn next(self) -> Lang {
        let i = (self.index() + 1) % Self::ALL.len();
        Self::ALL[i]
    }

    pub fn prev(self) -> Lang {
        let i = (self.index() + Self::ALL.len() - 1) % Self::ALL.len();
        Self::ALL[i]
    }

    /// Detect the UI language from the process environment.
    pub fn detect() -> Lang {
        let locale = std::env::var("LC_ALL")
            .or_else(|_| std::env::var("LC_MESSAGES"))
            .or_else(|_| std::env::var("LANG"))
            .ok();
        Self::detect_from(locale.as_deref())
    }

    /// Map a locale string like `en_US.UTF-8` to a supported language,
    /// falling back when the prefix is not in the set.
    pub fn detect_from(locale: Option<&str>) -> Lang {
        locale
            .and_then(|l| l.get(..2))
            .map(|p| p.to_ascii_lowercase())
            .and_then(|p| Self::from_code(&p))
            .unwrap_or(Self::FALLBACK)
    }
}

impl Default for Lang {
    fn default() -> Self {
        Self::FALLBACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_known_locale() {
        assert_eq!(Lang::detect_from(Some("de_DE.UTF-8")), Lang::De);
        assert_eq!(Lang::detect_from(Some("cs_CZ")), Lang::Cs);
        assert_eq!(Lang::detect_from(Some("EN")), Lang::En);
    }

    #[test]
    fn detect_unknown_locale_falls_back() {
        assert_eq!(Lang::detect_from(Some("fr_FR.UTF-8")), Lang::Pl);
        assert_eq!(Lang::detect_from(Some("")), Lang::Pl);
        assert_eq!(Lang::detect_from(None), Lang::Pl);
    }

    #[test]
    fn next_cycles_through_all() {
        let mut lang = Lang::Pl;
        let mut seen = Vec::new();
        for _ in 0..Lang::ALL.len() {
            seen.push(lang);
            lang = lang.next();
        }
        assert_eq!(lang, Lang::Pl);
        assert_eq!(seen, Lang::ALL.to_vec());
    }
}
