// Head-to-head matrix index.
//
// The matrix stores each pairwise record once, under whichever player's row
// happens to carry the `vs. <Opponent>` column. Queries orient the record to
// the asking player, reversing it when only the opponent's row has it.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::csv_table::Table;
use crate::player::{index_first, PlayerName};

const VS_TOP_5: &str = "vs. top 1-5";
const VS_TOP_10: &str = "vs. top 1-10";
// Spelled without the period in the source sheet.
const VS_TOP_15: &str = "vs top 1-15";
const OPPONENT_PREFIX: &str = "vs.";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One player's row of the matrix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct H2hSummary {
    pub vs_top_5: Option<String>,
    pub vs_top_10: Option<String>,
    pub vs_top_15: Option<String>,
    /// Opponent display name → `"wins-losses"` exactly as stored.
    pub opponents: BTreeMap<String, String>,
}

/// A head-to-head record oriented from one player's side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct H2hRecord {
    pub opponent: String,
    pub wins: u32,
    pub losses: u32,
    pub total: u32,
    pub win_percentage: f64,
}

impl H2hRecord {
    fn new(opponent: &str, wins: u32, losses: u32) -> Self {
        let total = wins + losses;
        let win_percentage = if total == 0 {
            0.0
        } else {
            f64::from(wins) / f64::from(total) * 100.0
        };
        H2hRecord {
            opponent: opponent.to_string(),
            wins,
            losses,
            total,
            win_percentage,
        }
    }

    /// The same meetings seen from the other side.
    fn reversed(&self, opponent: &str) -> Self {
        H2hRecord {
            opponent: opponent.to_string(),
            wins: self.losses,
            losses: self.wins,
            total: self.total,
            win_percentage: if self.total == 0 {
                0.0
            } else {
                100.0 - self.win_percentage
            },
        }
    }
}

impl fmt::Display for H2hRecord {
    /// `"5-9 (36%)"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{} ({}%)",
            self.wins,
            self.losses,
            self.win_percentage.round() as u32
        )
    }
}

/// Parse a `"wins-losses"` cell.
pub fn parse_record(raw: &str) -> Option<(u32, u32)> {
    let (wins, losses) = raw.trim().split_once('-')?;
    Some((wins.trim().parse().ok()?, losses.trim().parse().ok()?))
}

// ---------------------------------------------------------------------------
// Index
// ---------------------------------------------------------------------------

/// Matrix rows keyed by lowercase player name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct H2hIndex {
    summaries: HashMap<String, H2hSummary>,
}

impl H2hIndex {
    /// Build the index from the matrix table.
    ///
    /// The second column holds the player name; rows without one are dropped.
    /// Empty opponent cells are not stored. A player listed twice keeps the
    /// first row.
    pub fn build(matrix: &Table) -> Self {
        let headers = matrix.headers();
        let Some(name_column) = headers.get(1) else {
            if !matrix.is_empty() {
                debug!("h2h matrix has fewer than two columns, ignoring it");
            }
            return H2hIndex::default();
        };

        let opponent_columns: Vec<(&str, &str)> = headers
            .iter()
            .filter_map(|h| opponent_name(h).map(|name| (h.as_str(), name)))
            .collect();

        let summaries = index_first(matrix.rows().iter().filter_map(|row| {
            let Some(name) = PlayerName::new(row.get(name_column)) else {
                debug!("dropping h2h row with no player name");
                return None;
            };
            let opponents = opponent_columns
                .iter()
                .filter_map(|(column, opponent)| {
                    row.non_empty(column)
                        .map(|cell| (opponent.to_string(), cell.to_string()))
                })
                .collect();
            let summary = H2hSummary {
                vs_top_5: row.non_empty(VS_TOP_5).map(str::to_string),
                vs_top_10: row.non_empty(VS_TOP_10).map(str::to_string),
                vs_top_15: row.non_empty(VS_TOP_15).map(str::to_string),
                opponents,
            };
            Some((name.key(), summary))
        }));

        H2hIndex { summaries }
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// The matrix row for `player`, matched ignoring case.
    pub fn summary(&self, player: &str) -> Option<&H2hSummary> {
        self.summaries.get(&player.trim().to_lowercase())
    }

    /// Record of `a` against `b`, from `a`'s side.
    ///
    /// `a`'s own row is consulted first for a `vs. <b>` entry. Failing that,
    /// `b`'s row is consulted for `vs. <a>` and the record is reversed. When
    /// both rows carry the pair, `a`'s row wins. `None` means neither row
    /// holds a readable record for the pair.
    pub fn head_to_head(&self, a: &str, b: &str) -> Option<H2hRecord> {
        let (a, b) = (a.trim(), b.trim());
        if let Some((wins, losses)) = self.stored(a, b) {
            return Some(H2hRecord::new(b, wins, losses));
        }
        let (wins, losses) = self.stored(b, a)?;
        Some(H2hRecord::new(a, wins, losses).reversed(b))
    }

    /// The record stored in `player`'s row under the exact column
    /// `vs. <opponent>`.
    fn stored(&self, player: &str, opponent: &str) -> Option<(u32, u32)> {
        let cell = self.summary(player)?.opponents.get(opponent)?;
        let parsed = parse_record(cell);
        if parsed.is_none() {
            debug!("unreadable h2h cell '{cell}' for {player} vs {opponent}");
        }
        parsed
    }
}

/// Opponent name from an individual `vs. <Name>` header. Aggregate columns
/// return `None`.
fn opponent_name(header: &str) -> Option<&str> {
    if header == VS_TOP_5 || header == VS_TOP_10 || header == VS_TOP_15 {
        return None;
    }
    let rest = header.strip_prefix(OPPONENT_PREFIX)?.trim();
    if rest.is_empty() || rest.starts_with("top ") {
        None
    } else {
        Some(rest)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
