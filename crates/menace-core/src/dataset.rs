// The four source datasets and their raw text.

use std::fmt;

use serde::Serialize;

use crate::csv_table::{self, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DatasetKind {
    AtpRankings,
    EloRatings,
    H2hMatrix,
    Matches,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 4] = [
        DatasetKind::AtpRankings,
        DatasetKind::EloRatings,
        DatasetKind::H2hMatrix,
        DatasetKind::Matches,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DatasetKind::AtpRankings => "ATP rankings",
            DatasetKind::EloRatings => "ELO ratings",
            DatasetKind::H2hMatrix => "head-to-head matrix",
            DatasetKind::Matches => "2024 match results",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw text of each dataset. `None` marks a dataset that failed to load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDatasets {
    pub atp_rankings: Option<String>,
    pub elo_ratings: Option<String>,
    pub h2h_matrix: Option<String>,
    pub matches: Option<String>,
}

impl RawDatasets {
    pub fn get(&self, kind: DatasetKind) -> Option<&str> {
        match kind {
            DatasetKind::AtpRankings => self.atp_rankings.as_deref(),
            DatasetKind::EloRatings => self.elo_ratings.as_deref(),
            DatasetKind::H2hMatrix => self.h2h_matrix.as_deref(),
            DatasetKind::Matches => self.matches.as_deref(),
        }
    }

    /// Parse one dataset. A missing dataset parses as an empty table.
    pub fn table(&self, kind: DatasetKind) -> Table {
        self.get(kind).map(csv_table::parse).unwrap_or_default()
    }

    pub fn unavailable(&self) -> Vec<DatasetKind> {
        DatasetKind::ALL
            .into_iter()
            .filter(|kind| self.get(*kind).is_none())
            .collect()
    }
}
