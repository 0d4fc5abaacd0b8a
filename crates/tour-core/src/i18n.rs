//! Fixed UI string table, keyed lookup with fallback.
//!
//! Rows are `[pl, en, de, cs]` in [`Lang::ALL`](crate::lang::Lang::ALL)
//! order. Every key defines every language; the fallback rule in [`tr`]
//! only fires if a row entry is left empty.

use crate::lang::Lang;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    // Next-station confirmation modal
    NextTitle,
    NextQuestion,
    NextYes,
    NextNo,
    // Station list
    Visited,
    // Panels
    Transcript,
    Settings,
    Theme,
    ThemeDark,
    ThemeLight,
    FontSize,
    AutoAdvance,
    Language,
    On,
    Off,
    NothingPlaying,
}

fn row(text: Text) -> [&'static str; 4] {
    match text {
        Text::NextTitle => ["Przejść dalej?", "Go to next?", "Weitergehen?", "Jít dál?"],
        Text::NextQuestion => [
            "Czy chcesz odtworzyć:",
            "Do you want to play:",
            "Möchten Sie spielen:",
            "Chcete přehrát:",
        ],
        Text::NextYes => ["Tak", "Yes", "Ja", "Ano"],
        Text::NextNo => ["Zostań", "Stay", "Bleiben", "Zůstat"],
        Text::Visited => ["Odwiedzono", "Visited", "Besucht", "Navštíveno"],
        Text::Transcript => ["Transkrypcja", "Transcript", "Transkription", "Přepis"],
        Text::Settings => ["Ustawienia", "Settings", "Einstellungen", "Nastavení"],
        Text::Theme => ["Motyw", "Theme", "Design", "Motiv"],
        Text::ThemeDark => ["ciemny", "dark", "dunkel", "tmavý"],
        Text::ThemeLight => ["jasny", "light", "hell", "světlý"],
        Text::FontSize => ["Rozmiar czcionki", "Font size", "Schriftgröße", "Velikost písma"],
        Text::AutoAdvance => [
            "Automatyczne przejście",
            "Auto-advance",
            "Automatisch weiter",
            "Automatický posun",
        ],
        Text::Language => ["Język", "Language", "Sprache", "Jazyk"],
        Text::On => ["wł.", "on", "an", "zap."],
        Text::Off => ["wył.", "off", "aus", "vyp."],
        Text::NothingPlaying => [
            "Nic nie jest odtwarzane",
            "Nothing playing",
            "Nichts wird abgespielt",
            "Nic nehraje",
        ],
    }
}

/// Translate `text` into `lang`, falling back to the fallback language.
pub fn tr(lang: Lang, text: Text) -> &'static str {
    let entries = row(text);
    let s = entries[lang.index()];
    if s.is_empty() {
        entries[Lang::FALLBACK.index()]
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modal_texts_match_per_language() {
        assert_eq!(tr(Lang::Pl, Text::NextTitle), "Przejść dalej?");
        assert_eq!(tr(Lang::En, Text::NextTitle), "Go to next?");
        assert_eq!(tr(Lang::De, Text::NextYes), "Ja");
        assert_eq!(tr(Lang::Cs, Text::NextNo), "Zůstat");
    }

    #[test]
    fn every_key_is_total() {
        let keys = [
            Text::NextTitle,
            Text::NextQuestion,
            Text::NextYes,
            Text::NextNo,
            Text::Visited,
            Text::Transcript,
            Text::Settings,
            Text::Theme,
            Text::ThemeDark,
            Text::ThemeLight,
            Text::FontSize,
            Text::AutoAdvance,
            Text::Language,
            Text::On,
            Text::Off,
            Text::NothingPlaying,
        ];
        for key in keys {
            for lang in Lang::ALL {
                assert!(!tr(lang, key).is_empty(), "{key:?} missing for {lang:?}");
            }
        }
    }
}
