//! The station catalog — the immutable list of points of interest.
//!
//! Loaded once at startup from a `[[station]]` TOML file; a compiled-in
//! catalog serves as fallback when no file is present. Catalog order defines
//! what "next station" means for auto-advance.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::lang::Lang;

/// Per-language text with a single fallback rule: exact language first,
/// then the fallback language, then empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<Lang, String>);

impl LocalizedText {
    pub fn get(&self, lang: Lang) -> &str {
        self.0
            .get(&lang)
            .or_else(|| self.0.get(&Lang::FALLBACK))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn insert(&mut self, lang: Lang, text: impl Into<String>) {
        self.0.insert(lang, text.into());
    }
}

/// A point of interest with localized text and a narration asset per language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: u32,
    #[serde(default)]
    pub image: String,
    pub title: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    #[serde(default)]
    pub transcript: LocalizedText,
}

impl Station {
    /// Path of the narration track for `lang`, relative to `audio_dir`.
    pub fn audio_file(&self, audio_dir: &Path, lang: Lang) -> PathBuf {
        audio_dir.join(lang.code()).join(format!("{}.mp3", self.id))
    }
}

/// Matches the `[[station]]` table layout of the catalog file. Kept separate
/// from `Catalog` so the file schema can diverge from the in-memory shape.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    station: Vec<Station>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    stations: Vec<Station>,
}

impl Catalog {
    pub fn new(stations: Vec<Station>) -> Self {
        Self { stations }
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let file: CatalogFile = toml::from_str(content)?;
        Ok(Self::new(file.station))
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Built-in catalog compiled into the binary.
    pub fn builtin() -> anyhow::Result<Self> {
        Self::parse(include_str!("../data/stations.toml"))
    }

    /// Load from `path` when it exists and parses; otherwise the built-in
    /// catalog. A broken user file is logged, not fatal.
    pub fn load_or_builtin(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            match Self::load(path) {
                Ok(catalog) => return Ok(catalog),
                Err(e) => warn!("ignoring broken catalog {}: {e:#}", path.display()),
            }
        }
        Self::builtin()
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == id)
    }

    pub fn position(&self, id: u32) -> Option<usize> {
        self.stations.iter().position(|s| s.id == id)
    }

    /// The station following `id` in catalog order, if any.
    pub fn next_after(&self, id: u32) -> Option<&Station> {
        let pos = self.position(id)?;
        self.stations.get(pos + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::parse(
            r#"
            [[station]]
            id = 1
            image = "img/altar.jpg"
            [station.title]
            pl = "1. Ołtarz Główny"
            en = "1. Main Altar"

            [[station]]
            id = 2
            [station.title]
            pl = "2. Ambona"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn parses_station_tables() {
        let catalog = sample();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(1).unwrap().image, "img/altar.jpg");
        assert_eq!(catalog.get(2).unwrap().image, "");
    }

    #[test]
    fn localized_text_falls_back() {
        let catalog = sample();
        let title = &catalog.get(1).unwrap().title;
        assert_eq!(title.get(Lang::En), "1. Main Altar");
        // German missing — falls back to Polish.
        assert_eq!(title.get(Lang::De), "1. Ołtarz Główny");
        // Description absent entirely — empty, not a panic.
        assert_eq!(catalog.get(1).unwrap().description.get(Lang::En), "");
    }

    #[test]
    fn next_after_follows_catalog_order() {
        let catalog = sample();
        assert_eq!(catalog.next_after(1).map(|s| s.id), Some(2));
        assert_eq!(catalog.next_after(2).map(|s| s.id), None);
        assert_eq!(catalog.next_after(99).map(|s| s.id), None);
    }

    #[test]
    fn builtin_catalog_parses() {
        let catalog = Catalog::builtin().unwrap();
        assert!(!catalog.is_empty());
        // Every station must carry a fallback-language title.
        for station in catalog.stations() {
            assert!(!station.title.get(Lang::FALLBACK).is_empty());
        }
    }
}
