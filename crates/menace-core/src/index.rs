// Player search facade.
//
// `PlayerIndex::build` is the whole pipeline: parse the four datasets, join
// them into merged players, and keep the head-to-head index for pairwise
// queries. The result is immutable; a refresh builds a new one.

use std::collections::HashMap;

use serde::Serialize;
use tracing::info;

use crate::dataset::{DatasetKind, RawDatasets};
use crate::h2h::{H2hIndex, H2hRecord};
use crate::merge::merge_rankings;
use crate::player::{Player, PlayerName};
use crate::season;

/// Most players that can be pinned for comparison at once.
pub const MAX_PINNED: usize = 3;

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// Ranked players that found no row in an overlay dataset. A dataset that
/// failed to load contributes no names here; see [`PlayerIndex::unavailable`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Unmatched {
    pub elo: Vec<PlayerName>,
    pub h2h: Vec<PlayerName>,
    pub season: Vec<PlayerName>,
}

impl Unmatched {
    pub fn is_empty(&self) -> bool {
        self.elo.is_empty() && self.h2h.is_empty() && self.season.is_empty()
    }
}

// ---------------------------------------------------------------------------
// PlayerIndex
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerIndex {
    players: Vec<Player>,
    by_key: HashMap<String, usize>,
    h2h: H2hIndex,
    unavailable: Vec<DatasetKind>,
    unmatched: Unmatched,
}

impl PlayerIndex {
    /// Build the merged player set from whatever datasets loaded.
    pub fn build(raw: &RawDatasets) -> Self {
        let unavailable = raw.unavailable();
        let has = |kind: DatasetKind| raw.get(kind).is_some();

        let merged = merge_rankings(
            &raw.table(DatasetKind::AtpRankings),
            &raw.table(DatasetKind::EloRatings),
        );
        let h2h = H2hIndex::build(&raw.table(DatasetKind::H2hMatrix));
        let seasons = season::aggregate(&raw.table(DatasetKind::Matches));

        let mut unmatched = Unmatched::default();
        if has(DatasetKind::EloRatings) {
            unmatched.elo = merged.missing_elo;
        }

        let mut players = merged.players;
        for player in &mut players {
            player.h2h = h2h.summary(player.name.as_str()).cloned();
            player.season = seasons.get(&player.name.key()).cloned();

            if player.h2h.is_none() && has(DatasetKind::H2hMatrix) {
                unmatched.h2h.push(player.name.clone());
            }
            if player.season.is_none() && has(DatasetKind::Matches) {
                unmatched.season.push(player.name.clone());
            }
        }

        let by_key = players
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.key(), i))
            .collect();

        info!(
            "built player index: {} players, {} h2h rows, {} season records",
            players.len(),
            h2h.len(),
            seasons.len()
        );
        if !unmatched.is_empty() {
            info!(
                "unmatched names: {} without elo, {} without h2h, {} without 2024 season",
                unmatched.elo.len(),
                unmatched.h2h.len(),
                unmatched.season.len()
            );
        }

        PlayerIndex {
            players,
            by_key,
            h2h,
            unavailable,
            unmatched,
        }
    }

    /// All players in rankings order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Players whose name contains `term`, ignoring case, in rankings order.
    /// A blank term matches nothing.
    pub fn search(&self, term: &str) -> Vec<&Player> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.players
            .iter()
            .filter(|p| p.name.as_str().to_lowercase().contains(&needle))
            .collect()
    }

    /// [`search`](Self::search) truncated to the first `limit` matches.
    pub fn search_limited(&self, term: &str, limit: usize) -> Vec<&Player> {
        let mut found = self.search(term);
        found.truncate(limit);
        found
    }

    /// The first `n` players of the rankings file.
    pub fn top_players(&self, n: usize) -> &[Player] {
        &self.players[..n.min(self.players.len())]
    }

    /// Exact lookup ignoring case.
    pub fn player(&self, name: &str) -> Option<&Player> {
        let i = self.by_key.get(&name.trim().to_lowercase())?;
        self.players.get(*i)
    }

    /// Head-to-head record of `a` against `b`, from `a`'s side.
    pub fn head_to_head(&self, a: &str, b: &str) -> Option<H2hRecord> {
        self.h2h.head_to_head(a, b)
    }

    pub fn has_head_to_head(&self, a: &str, b: &str) -> bool {
        self.head_to_head(a, b).is_some()
    }

    /// Datasets that failed to load for this build.
    pub fn unavailable(&self) -> &[DatasetKind] {
        &self.unavailable
    }

    pub fn unmatched(&self) -> &Unmatched {
        &self.unmatched
    }
}

// ---------------------------------------------------------------------------
// Pinned players
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PinOutcome {
    Pinned,
    AlreadyPinned,
    Full,
}

/// Comparison tabs offered for the current pin selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComparisonView {
    List,
    Details,
    HeadToHead,
}

/// Up to [`MAX_PINNED`] players selected for comparison, in pin order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PinnedPlayers {
    players: Vec<Player>,
}

impl PinnedPlayers {
    pub fn pin(&mut self, player: &Player) -> PinOutcome {
        if self.is_pinned(player.name.as_str()) {
            return PinOutcome::AlreadyPinned;
        }
        if self.players.len() >= MAX_PINNED {
            return PinOutcome::Full;
        }
        self.players.push(player.clone());
        PinOutcome::Pinned
    }

    /// Returns whether a player was removed.
    pub fn unpin(&mut self, name: &str) -> bool {
        let before = self.players.len();
        self.players.retain(|p| p.name.as_str() != name);
        self.players.len() != before
    }

    pub fn clear(&mut self) {
        self.players.clear();
    }

    pub fn is_pinned(&self, name: &str) -> bool {
        self.players.iter().any(|p| p.name.as_str() == name)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// The head-to-head tab needs exactly two pins and a stored record for
    /// the pair in either direction.
    pub fn available_views(&self, index: &PlayerIndex) -> Vec<ComparisonView> {
        let mut views = Vec::new();
        if self.players.is_empty() {
            return views;
        }
        views.push(ComparisonView::List);
        if self.players.len() >= 2 {
            views.push(ComparisonView::Details);
        }
        if let [a, b] = self.players.as_slice() {
            if index.has_head_to_head(a.name.as_str(), b.name.as_str()) {
                views.push(ComparisonView::HeadToHead);
            }
        }
        views
    }

    /// The pinned pair's record, from the first pin's side.
    pub fn head_to_head(&self, index: &PlayerIndex) -> Option<H2hRecord> {
        match self.players.as_slice() {
            [a, b] => index.head_to_head(a.name.as_str(), b.name.as_str()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawDatasets {
        RawDatasets {
            atp_rankings: Some(
                "\
#,Name,Age,Ctry,Pts
1,Nadal,38,ESP,5000
2,Federer,43,SUI,4000
3,Djokovic,37,SRB,3000
4,Murray,37,GBR,1000"
                    .into(),
            ),
            elo_ratings: Some(
                "Player,Elo Rank,Elo,Hardcourt Elo Rank,Hardcourt Elo,Clay Elo Rank,Clay Elo,Grass Elo Rank,Grass Elo,Peak Elo,Peak Month,ATP Rank\nnadal,1,2100,,,,,,,,,1"
                    .into(),
            ),
            h2h_matrix: Some(
                "Rank,Player,vs. top 1-5,vs. top 1-10,vs top 1-15,vs. Federer,vs. Nadal\n1,Nadal,\"1-1\",,,\"24-16\",\n2,Federer,,,,,"
                    .into(),
            ),
            matches: Some(
                "tourney_date,surface,winner_name,loser_name\n20240101,Clay,Nadal,Djokovic\n20240102,Clay,Djokovic,Nadal"
                    .into(),
            ),
        }
    }

    #[test]
    fn every_ranked_player_once_with_overlays() {
        let index = PlayerIndex::build(&raw());
        assert_eq!(index.len(), 4);

        let nadal = index.player("NADAL").unwrap();
        assert!(nadal.elo.is_some());
        assert_eq!(nadal.h2h.as_ref().unwrap().vs_top_5.as_deref(), Some("1-1"));
        assert_eq!(nadal.season.as_ref().unwrap().record(), "1-1");

        let murray = index.player("Murray").unwrap();
        assert!(murray.elo.is_none());
        assert!(murray.h2h.is_none());
        assert!(murray.season.is_none());
    }

    #[test]
    fn unmatched_names_are_collected() {
        let index = PlayerIndex::build(&raw());
        let names = |v: &[PlayerName]| v.iter().map(|n| n.to_string()).collect::<Vec<_>>();
        let unmatched = index.unmatched();
        assert_eq!(names(unmatched.elo.as_slice()), vec!["Federer", "Djokovic", "Murray"]);
        assert_eq!(names(unmatched.h2h.as_slice()), vec!["Djokovic", "Murray"]);
        assert_eq!(names(unmatched.season.as_slice()), vec!["Federer", "Murray"]);
        assert!(index.unavailable().is_empty());
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let index = PlayerIndex::build(&raw());
        let found: Vec<&str> = index.search("ER").iter().map(|p| p.name.as_str()).collect();
        assert_eq!(found, vec!["Federer"]);
        assert_eq!(index.search("a").len(), 2);
        assert_eq!(index.search_limited("a", 1).len(), 1);
        assert!(index.search("   ").is_empty());
        assert!(index.search("zzz").is_empty());
    }

    #[test]
    fn top_players_in_file_order() {
        let index = PlayerIndex::build(&raw());
        let top: Vec<u32> = index.top_players(3).iter().map(|p| p.rank).collect();
        assert_eq!(top, vec![1, 2, 3]);
        assert_eq!(index.top_players(10).len(), 4);
        assert!(index.top_players(0).is_empty());
    }

    #[test]
    fn head_to_head_delegates_with_reversal() {
        let index = PlayerIndex::build(&raw());
        let rec = index.head_to_head("Federer", "Nadal").unwrap();
        assert_eq!((rec.wins, rec.losses), (16, 24));
        assert!(index.head_to_head("Murray", "Nadal").is_none());
        assert!(!index.has_head_to_head("Djokovic", "Murray"));
    }

    #[test]
    fn missing_datasets_degrade_to_rankings_only() {
        let mut raw = raw();
        raw.elo_ratings = None;
        raw.matches = None;
        let index = PlayerIndex::build(&raw);
        assert_eq!(index.len(), 4);
        assert!(index.players().iter().all(|p| p.elo.is_none() && p.season.is_none()));
        assert_eq!(
            index.unavailable(),
            &[DatasetKind::EloRatings, DatasetKind::Matches]
        );
        assert!(index.unmatched().elo.is_empty());
        assert!(index.unmatched().season.is_empty());
    }

    #[test]
    fn no_rankings_means_no_players() {
        let mut raw = raw();
        raw.atp_rankings = None;
        let index = PlayerIndex::build(&raw);
        assert!(index.is_empty());
        assert!(index.head_to_head("Nadal", "Federer").is_some());
    }

    #[test]
    fn pinning_rules() {
        let index = PlayerIndex::build(&raw());
        let mut pinned = PinnedPlayers::default();
        let p = index.players();

        assert_eq!(pinned.pin(&p[0]), PinOutcome::Pinned);
        assert_eq!(pinned.pin(&p[0]), PinOutcome::AlreadyPinned);
        assert_eq!(pinned.pin(&p[1]), PinOutcome::Pinned);
        assert_eq!(pinned.pin(&p[2]), PinOutcome::Pinned);
        assert_eq!(pinned.pin(&p[3]), PinOutcome::Full);
        assert_eq!(pinned.len(), MAX_PINNED);

        assert!(pinned.unpin("Federer"));
        assert!(!pinned.unpin("Federer"));
        let order: Vec<&str> = pinned.players().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(order, vec!["Nadal", "Djokovic"]);

        pinned.clear();
        assert!(pinned.is_empty());
    }

    #[test]
    fn comparison_views_follow_pin_count_and_h2h() {
        let index = PlayerIndex::build(&raw());
        let p = index.players();
        let mut pinned = PinnedPlayers::default();
        assert!(pinned.available_views(&index).is_empty());

        pinned.pin(&p[1]);
        assert_eq!(pinned.available_views(&index), vec![ComparisonView::List]);

        pinned.pin(&p[0]);
        assert_eq!(
            pinned.available_views(&index),
            vec![
                ComparisonView::List,
                ComparisonView::Details,
                ComparisonView::HeadToHead
            ]
        );
        let rec = pinned.head_to_head(&index).unwrap();
        assert_eq!(rec.to_string(), "16-24 (40%)");

        pinned.pin(&p[2]);
        assert_eq!(
            pinned.available_views(&index),
            vec![ComparisonView::List, ComparisonView::Details]
        );
        assert!(pinned.head_to_head(&index).is_none());

        pinned.clear();
        pinned.pin(&p[2]);
        pinned.pin(&p[3]);
        assert!(!pinned
            .available_views(&index)
            .contains(&ComparisonView::HeadToHead));
    }

    #[test]
    fn rebuilding_is_idempotent() {
        assert_eq!(PlayerIndex::build(&raw()), PlayerIndex::build(&raw()));
    }
}
