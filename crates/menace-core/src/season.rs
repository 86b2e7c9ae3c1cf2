// 2024 season aggregation from raw match results.
//
// Each usable match row credits a win to the winner and a loss to the loser.
// Per player the matches are then ordered by tournament date and scanned once
// for the longest winning and losing runs.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::csv_table::Table;
use crate::player::{PlayerName, Surface};

const WINNER: &str = "winner_name";
const LOSER: &str = "loser_name";
const SURFACE: &str = "surface";
const DATE: &str = "tourney_date";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MatchResult {
    Win,
    Loss,
}

impl MatchResult {
    pub fn letter(self) -> char {
        match self {
            MatchResult::Win => 'W',
            MatchResult::Loss => 'L',
        }
    }
}

/// A win/loss tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WinLoss {
    pub wins: u32,
    pub losses: u32,
}

impl WinLoss {
    pub fn matches(&self) -> u32 {
        self.wins + self.losses
    }

    /// Win percentage rounded to the nearest integer, 0 with no matches.
    pub fn win_rate(&self) -> u32 {
        rounded_percentage(self.wins, self.losses)
    }

    /// `"wins-losses"`, e.g. `"73-6"`.
    pub fn record(&self) -> String {
        format!("{}-{}", self.wins, self.losses)
    }

    fn add(&mut self, result: MatchResult) {
        match result {
            MatchResult::Win => self.wins += 1,
            MatchResult::Loss => self.losses += 1,
        }
    }
}

impl fmt::Display for WinLoss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.wins, self.losses)
    }
}

/// Hard/Clay/Grass breakdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SurfaceBreakdown {
    pub hard: WinLoss,
    pub clay: WinLoss,
    pub grass: WinLoss,
}

impl SurfaceBreakdown {
    pub fn get(&self, surface: Surface) -> WinLoss {
        match surface {
            Surface::Hard => self.hard,
            Surface::Clay => self.clay,
            Surface::Grass => self.grass,
        }
    }

    fn get_mut(&mut self, surface: Surface) -> &mut WinLoss {
        match surface {
            Surface::Hard => &mut self.hard,
            Surface::Clay => &mut self.clay,
            Surface::Grass => &mut self.grass,
        }
    }
}

/// One player's 2024 season.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeasonStats {
    pub overall: WinLoss,
    pub longest_win_streak: u32,
    pub longest_lose_streak: u32,
    pub surfaces: SurfaceBreakdown,
    /// Every counted result, oldest first.
    pub results: Vec<MatchResult>,
}

impl SeasonStats {
    pub fn wins(&self) -> u32 {
        self.overall.wins
    }

    pub fn losses(&self) -> u32 {
        self.overall.losses
    }

    pub fn record(&self) -> String {
        self.overall.record()
    }

    pub fn win_rate(&self) -> u32 {
        self.overall.win_rate()
    }

    /// The last `n` results as `W`/`L` letters, oldest first.
    pub fn recent_form(&self, n: usize) -> String {
        let start = self.results.len().saturating_sub(n);
        self.results[start..].iter().map(|r| r.letter()).collect()
    }
}

/// Season stats keyed by lowercase player name.
pub type SeasonTable = HashMap<String, SeasonStats>;

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

struct Entry {
    date: Option<NaiveDate>,
    result: MatchResult,
}

#[derive(Default)]
struct Running {
    overall: WinLoss,
    surfaces: SurfaceBreakdown,
    entries: Vec<Entry>,
}

impl Running {
    fn record(&mut self, result: MatchResult, surface: Option<Surface>, date: Option<NaiveDate>) {
        self.overall.add(result);
        if let Some(surface) = surface {
            self.surfaces.get_mut(surface).add(result);
        }
        self.entries.push(Entry { date, result });
    }

    fn finish(mut self) -> SeasonStats {
        // Stable: same-day matches keep file order. Undated rows go last.
        self.entries.sort_by_key(|e| (e.date.is_none(), e.date));
        let results: Vec<MatchResult> = self.entries.iter().map(|e| e.result).collect();
        let (longest_win_streak, longest_lose_streak) = longest_streaks(&results);
        SeasonStats {
            overall: self.overall,
            longest_win_streak,
            longest_lose_streak,
            surfaces: self.surfaces,
            results,
        }
    }
}

/// Aggregate every player appearing in `matches` as winner or loser.
///
/// Rows missing a winner, loser or surface are skipped entirely. Surfaces
/// other than Hard/Clay/Grass still count toward the overall record and the
/// streak sequence but have no surface bucket. Players never seen are absent
/// from the result.
pub fn aggregate(matches: &Table) -> SeasonTable {
    let mut running: HashMap<String, Running> = HashMap::new();
    let mut skipped = 0usize;

    for row in matches.rows() {
        let (Some(winner), Some(loser), Some(surface_label)) = (
            PlayerName::new(row.get(WINNER)),
            PlayerName::new(row.get(LOSER)),
            row.non_empty(SURFACE),
        ) else {
            skipped += 1;
            continue;
        };

        let surface = Surface::from_label(surface_label);
        let date = parse_tourney_date(row.get(DATE));

        running
            .entry(winner.key())
            .or_default()
            .record(MatchResult::Win, surface, date);
        running
            .entry(loser.key())
            .or_default()
            .record(MatchResult::Loss, surface, date);
    }

    if skipped > 0 {
        debug!("skipped {skipped} match rows missing winner, loser or surface");
    }

    running
        .into_iter()
        .map(|(key, r)| (key, r.finish()))
        .collect()
}

/// Longest consecutive wins and longest consecutive losses, in that order.
pub fn longest_streaks(results: &[MatchResult]) -> (u32, u32) {
    let (mut win_run, mut lose_run) = (0u32, 0u32);
    let (mut best_win, mut best_lose) = (0u32, 0u32);
    for result in results {
        match result {
            MatchResult::Win => {
                win_run += 1;
                lose_run = 0;
                best_win = best_win.max(win_run);
            }
            MatchResult::Loss => {
                lose_run += 1;
                win_run = 0;
                best_lose = best_lose.max(lose_run);
            }
        }
    }
    (best_win, best_lose)
}

/// `tourney_date` appears as `20240115` in the match exports; ISO dates are
/// accepted too.
fn parse_tourney_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.len() == 8 && raw.bytes().all(|b| b.is_ascii_digit()) {
        let year = raw[0..4].parse().ok()?;
        let month = raw[4..6].parse().ok()?;
        let day = raw[6..8].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

pub(crate) fn rounded_percentage(wins: u32, losses: u32) -> u32 {
    let total = wins + losses;
    if total == 0 {
        return 0;
    }
    (f64::from(wins) / f64::from(total) * 100.0).round() as u32
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
