// Merged player model.
//
// A `Player` is anchored on its ATP ranking row. The ELO, head-to-head and
// 2024-season blocks are overlays joined by name, and each is `None` when the
// corresponding dataset has no entry for the player.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::h2h::H2hSummary;
use crate::season::SeasonStats;

// ---------------------------------------------------------------------------
// Join key
// ---------------------------------------------------------------------------

/// A player's display name, validated for use as the cross-dataset join key.
///
/// Construction trims surrounding whitespace and rejects empty names. Two
/// names join when their [`key`](PlayerName::key)s are equal, i.e. exact
/// equality ignoring case. There is no fuzzy matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(PlayerName(trimmed.to_string()))
        }
    }

    /// The display form, exactly as written in the source dataset.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased form used to index and join.
    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }

    /// Case-insensitive equality against an arbitrary string.
    pub fn matches(&self, other: &str) -> bool {
        self.0.to_lowercase() == other.trim().to_lowercase()
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Surfaces
// ---------------------------------------------------------------------------

/// The three court surfaces that get their own buckets. Any other surface
/// string (e.g. "Carpet") has no bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Surface {
    Hard,
    Clay,
    Grass,
}

impl Surface {
    /// Match the literal source spelling. Case-sensitive on purpose: only
    /// `Hard`, `Clay` and `Grass` are recognized.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Hard" => Some(Surface::Hard),
            "Clay" => Some(Surface::Clay),
            "Grass" => Some(Surface::Grass),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Surface::Hard => "Hard",
            Surface::Clay => "Clay",
            Surface::Grass => "Grass",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// ELO block
// ---------------------------------------------------------------------------

/// A rating with its own ranking position. Either half may be missing from
/// the export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RankedElo {
    pub rank: Option<u32>,
    pub rating: Option<f64>,
}

/// Pre-computed ELO ratings for one player.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EloRatings {
    pub overall: RankedElo,
    pub hard: RankedElo,
    pub clay: RankedElo,
    pub grass: RankedElo,
    pub peak: Option<f64>,
    pub peak_month: Option<String>,
    /// ATP rank as recorded in the ELO export, which may lag the rankings file.
    pub atp_rank: Option<u32>,
}

impl EloRatings {
    pub fn surface(&self, surface: Surface) -> RankedElo {
        match surface {
            Surface::Hard => self.hard,
            Surface::Clay => self.clay,
            Surface::Grass => self.grass,
        }
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// One ranked player with every overlay that could be joined to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub name: PlayerName,
    pub rank: u32,
    pub age: Option<u32>,
    pub country: String,
    pub points: Option<u32>,
    pub elo: Option<EloRatings>,
    pub h2h: Option<H2hSummary>,
    pub season: Option<SeasonStats>,
}

/// Build a lookup from lowercase join key to value, keeping the first entry
/// for a key.
pub(crate) fn index_first<T>(items: impl IntoIterator<Item = (String, T)>) -> HashMap<String, T> {
    let mut map = HashMap::new();
    for (key, value) in items {
        map.entry(key).or_insert(value);
    }
    map
}

// ---------------------------------------------------------------------------
// Numeric cell parsing
// ---------------------------------------------------------------------------

/// Parse an integer cell, tolerating thousands separators and a trailing
/// fractional part ("11,830", "23.0").
pub(crate) fn parse_count(raw: &str) -> Option<u32> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    if let Ok(n) = cleaned.parse::<u32>() {
        return Some(n);
    }
    let f = cleaned.parse::<f64>().ok()?;
    if f.is_finite() && f >= 0.0 {
        Some(f.round() as u32)
    } else {
        None
    }
}

/// Parse a rating cell. Non-finite values count as missing.
pub(crate) fn parse_rating(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_name_trims_and_rejects_blank() {
        assert_eq!(PlayerName::new("  Jannik Sinner ").unwrap().as_str(), "Jannik Sinner");
        assert!(PlayerName::new("   ").is_none());
        assert!(PlayerName::new("").is_none());
    }

    #[test]
    fn player_name_key_is_case_insensitive() {
        let a = PlayerName::new("Carlos Alcaraz").unwrap();
        let b = PlayerName::new("CARLOS alcaraz").unwrap();
        assert_eq!(a.key(), b.key());
        assert!(a.matches(" carlos ALCARAZ "));
        assert!(!a.matches("Carlos Alcaraz Garfia"));
    }

    #[test]
    fn surface_labels_are_exact() {
        assert_eq!(Surface::from_label("Hard"), Some(Surface::Hard));
        assert_eq!(Surface::from_label("Clay"), Some(Surface::Clay));
        assert_eq!(Surface::from_label("Grass"), Some(Surface::Grass));
        assert_eq!(Surface::from_label("Carpet"), None);
        assert_eq!(Surface::from_label("hard"), None);
        assert_eq!(Surface::from_label(""), None);
    }

    #[test]
    fn parse_count_variants() {
        assert_eq!(parse_count("11830"), Some(11830));
        assert_eq!(parse_count("11,830"), Some(11830));
        assert_eq!(parse_count(" 23 "), Some(23));
        assert_eq!(parse_count("23.0"), Some(23));
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("-"), None);
        assert_eq!(parse_count("-4"), None);
    }

    #[test]
    fn parse_rating_variants() {
        assert_eq!(parse_rating("2201.5"), Some(2201.5));
        assert_eq!(parse_rating(""), None);
        assert_eq!(parse_rating("NaN"), None);
        assert_eq!(parse_rating("inf"), None);
    }

    #[test]
    fn index_first_keeps_earliest() {
        let map = index_first(vec![
            ("a".to_string(), 1),
            ("b".to_string(), 2),
            ("a".to_string(), 3),
        ]);
        assert_eq!(map["a"], 1);
        assert_eq!(map["b"], 2);
    }
}
