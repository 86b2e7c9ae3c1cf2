// ATP rankings ⋈ ELO ratings.
//
// A left join anchored on the rankings export: every named ATP row yields
// exactly one `Player`, and the ELO block is attached only when an ELO row
// carries the same name ignoring case.

use tracing::debug;

use crate::csv_table::{Row, Table};
use crate::player::{index_first, parse_count, parse_rating, EloRatings, Player, PlayerName, RankedElo};

// ATP rankings columns.
const ATP_RANK: &str = "#";
const ATP_NAME: &str = "Name";
const ATP_AGE: &str = "Age";
const ATP_COUNTRY: &str = "Ctry";
const ATP_POINTS: &str = "Pts";

// ELO ratings columns.
const ELO_PLAYER: &str = "Player";
const ELO_RANK: &str = "Elo Rank";
const ELO: &str = "Elo";
const HARD_RANK: &str = "Hardcourt Elo Rank";
const HARD: &str = "Hardcourt Elo";
const CLAY_RANK: &str = "Clay Elo Rank";
const CLAY: &str = "Clay Elo";
const GRASS_RANK: &str = "Grass Elo Rank";
const GRASS: &str = "Grass Elo";
const PEAK: &str = "Peak Elo";
const PEAK_MONTH: &str = "Peak Month";
const ELO_ATP_RANK: &str = "ATP Rank";

/// Result of joining the rankings with the ELO export.
#[derive(Debug, Clone, Default)]
pub struct MergedRankings {
    /// One player per distinct ranked name, in rankings-file order. Only the
    /// ELO overlay is filled in at this stage.
    pub players: Vec<Player>,
    /// Ranked players for whom no ELO row matched.
    pub missing_elo: Vec<PlayerName>,
}

/// Join `atp` rows with `elo` rows by case-insensitive name.
///
/// Rows without a name are dropped. A later row repeating an earlier name is
/// dropped too, so every ranked name appears once. When the `#` cell is not a
/// number the row's 1-based position stands in for the rank. When several
/// ELO rows share a name the first one in file order wins.
pub fn merge_rankings(atp: &Table, elo: &Table) -> MergedRankings {
    let elo_by_name = index_first(elo.rows().iter().filter_map(|row| {
        let name = PlayerName::new(row.get(ELO_PLAYER))?;
        Some((name.key(), row))
    }));

    let mut merged = MergedRankings::default();
    let mut seen = std::collections::HashSet::new();

    for (position, row) in atp.rows().iter().enumerate() {
        let Some(name) = PlayerName::new(row.get(ATP_NAME)) else {
            debug!("dropping rankings row {} with no name", position + 1);
            continue;
        };
        if !seen.insert(name.key()) {
            debug!("dropping duplicate rankings row for '{name}'");
            continue;
        }

        let rank = parse_count(row.get(ATP_RANK)).unwrap_or_else(|| {
            debug!("rankings row for '{name}' has no numeric rank, using file position");
            position as u32 + 1
        });

        let elo = elo_by_name.get(&name.key()).map(|elo_row| elo_from_row(elo_row));
        if elo.is_none() {
            merged.missing_elo.push(name.clone());
        }

        merged.players.push(Player {
            rank,
            age: parse_count(row.get(ATP_AGE)),
            country: row.get(ATP_COUNTRY).to_string(),
            points: parse_count(row.get(ATP_POINTS)),
            elo,
            h2h: None,
            season: None,
            name,
        });
    }

    merged
}

fn elo_from_row(row: &Row) -> EloRatings {
    let ranked = |rank_col: &str, rating_col: &str| RankedElo {
        rank: parse_count(row.get(rank_col)),
        rating: parse_rating(row.get(rating_col)),
    };
    EloRatings {
        overall: ranked(ELO_RANK, ELO),
        hard: ranked(HARD_RANK, HARD),
        clay: ranked(CLAY_RANK, CLAY),
        grass: ranked(GRASS_RANK, GRASS),
        peak: parse_rating(row.get(PEAK)),
        peak_month: row.non_empty(PEAK_MONTH).map(str::to_string),
        atp_rank: parse_count(row.get(ELO_ATP_RANK)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
