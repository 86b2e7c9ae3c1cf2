// End-to-end tests over the fixture exports in tests/fixtures.

use std::fs;
use std::path::PathBuf;

use menace_core::season::{MatchResult, WinLoss};
use menace_core::{
    ComparisonView, DatasetKind, PinOutcome, PinnedPlayers, PlayerIndex, RawDatasets, Surface,
};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn fixtures() -> RawDatasets {
    RawDatasets {
        atp_rankings: Some(read_fixture("atp_rankings.csv")),
        elo_ratings: Some(read_fixture("elo_ratings.csv")),
        h2h_matrix: Some(read_fixture("h2h_matrix.csv")),
        matches: Some(read_fixture("atp_matches_2024.csv")),
    }
}

#[test]
fn every_ranked_name_appears_exactly_once() {
    let index = PlayerIndex::build(&fixtures());
    let names: Vec<&str> = index.players().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Jannik Sinner",
            "Carlos Alcaraz",
            "Alexander Zverev",
            "Taylor Fritz",
            "Jack Draper"
        ]
    );
    // Djokovic has ELO and match rows but no ranking row.
    assert!(index.player("Novak Djokovic").is_none());
}

#[test]
fn overlays_attach_where_names_match() {
    let index = PlayerIndex::build(&fixtures());

    let zverev = index.player("Alexander Zverev").unwrap();
    let elo = zverev.elo.as_ref().expect("case-insensitive elo match");
    assert_eq!(elo.overall.rating, Some(2050.4));
    assert_eq!(elo.peak_month.as_deref(), Some("2021-11"));

    let draper = index.player("jack draper").unwrap();
    assert_eq!(draper.rank, 5);
    assert_eq!(draper.points, Some(4440));
    assert!(draper.elo.is_none());
    assert!(draper.h2h.is_none());
    assert!(draper.season.is_none());

    let unmatched: Vec<&str> = index
        .unmatched()
        .elo
        .iter()
        .map(|n| n.as_str())
        .collect();
    assert_eq!(unmatched, vec!["Taylor Fritz", "Jack Draper"]);
}

#[test]
fn season_stats_from_match_history() {
    let index = PlayerIndex::build(&fixtures());

    let sinner = index.player("Jannik Sinner").unwrap().season.as_ref().unwrap();
    assert_eq!(sinner.overall, WinLoss { wins: 4, losses: 3 });
    assert_eq!(sinner.longest_win_streak, 2);
    assert_eq!(sinner.longest_lose_streak, 2);
    assert_eq!(sinner.surfaces.get(Surface::Hard), WinLoss { wins: 3, losses: 1 });
    assert_eq!(sinner.surfaces.get(Surface::Clay), WinLoss { wins: 0, losses: 1 });
    assert_eq!(sinner.surfaces.get(Surface::Grass), WinLoss { wins: 1, losses: 1 });
    assert_eq!(sinner.recent_form(3), "WLW");

    let alcaraz = index.player("Carlos Alcaraz").unwrap().season.as_ref().unwrap();
    assert_eq!(alcaraz.record(), "3-0");
    assert_eq!((alcaraz.longest_win_streak, alcaraz.longest_lose_streak), (3, 0));
    assert_eq!(alcaraz.win_rate(), 100);

    // The Laver Cup row is on Carpet: counted overall, no surface bucket.
    let zverev = index.player("Alexander Zverev").unwrap().season.as_ref().unwrap();
    assert_eq!(zverev.overall, WinLoss { wins: 0, losses: 2 });
    assert_eq!(zverev.longest_lose_streak, 2);
    assert_eq!(zverev.surfaces.clay.losses, 1);
    assert_eq!(zverev.surfaces.hard.matches() + zverev.surfaces.grass.matches(), 0);

    // The exhibition row has no surface and is ignored entirely.
    let fritz = index.player("Taylor Fritz").unwrap().season.as_ref().unwrap();
    assert_eq!(fritz.results, vec![MatchResult::Loss, MatchResult::Win]);
}

#[test]
fn head_to_head_orientation() {
    let index = PlayerIndex::build(&fixtures());

    let direct = index.head_to_head("Jannik Sinner", "Carlos Alcaraz").unwrap();
    assert_eq!((direct.wins, direct.losses, direct.total), (5, 7, 12));
    assert_eq!(direct.to_string(), "5-7 (42%)");

    let reversed = index.head_to_head("Carlos Alcaraz", "Jannik Sinner").unwrap();
    assert_eq!((reversed.wins, reversed.losses), (7, 5));
    assert!((reversed.win_percentage + direct.win_percentage - 100.0).abs() < 1e-9);

    let fritz = index.head_to_head("Taylor Fritz", "Alexander Zverev").unwrap();
    assert_eq!((fritz.wins, fritz.losses), (4, 6));

    assert!(index.head_to_head("Carlos Alcaraz", "Taylor Fritz").is_none());
    assert!(index.head_to_head("Jack Draper", "Jannik Sinner").is_none());
}

#[test]
fn comparison_tab_only_with_stored_pair() {
    let index = PlayerIndex::build(&fixtures());
    let mut pinned = PinnedPlayers::default();

    assert_eq!(pinned.pin(index.player("Carlos Alcaraz").unwrap()), PinOutcome::Pinned);
    assert_eq!(pinned.pin(index.player("Taylor Fritz").unwrap()), PinOutcome::Pinned);
    assert!(!pinned.available_views(&index).contains(&ComparisonView::HeadToHead));

    pinned.unpin("Taylor Fritz");
    pinned.pin(index.player("Jannik Sinner").unwrap());
    assert!(pinned.available_views(&index).contains(&ComparisonView::HeadToHead));
    assert_eq!(pinned.head_to_head(&index).unwrap().to_string(), "7-5 (58%)");
}

#[test]
fn loading_twice_is_field_wise_equal() {
    let first = PlayerIndex::build(&fixtures());
    let second = PlayerIndex::build(&fixtures());
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(first.players()).unwrap(),
        serde_json::to_string(second.players()).unwrap()
    );
}

#[test]
fn partial_load_keeps_rankings() {
    let mut raw = fixtures();
    raw.h2h_matrix = None;
    let index = PlayerIndex::build(&raw);
    assert_eq!(index.len(), 5);
    assert_eq!(index.unavailable(), &[DatasetKind::H2hMatrix]);
    assert!(index.head_to_head("Jannik Sinner", "Carlos Alcaraz").is_none());
    assert!(index.unmatched().h2h.is_empty());
}

#[test]
fn search_and_top() {
    let index = PlayerIndex::build(&fixtures());
    let found: Vec<&str> = index.search("ZV").iter().map(|p| p.name.as_str()).collect();
    assert_eq!(found, vec!["Alexander Zverev"]);
    assert_eq!(index.search("r").len(), 5);
    assert_eq!(index.search_limited("r", 3).len(), 3);
    let top: Vec<u32> = index.top_players(3).iter().map(|p| p.rank).collect();
    assert_eq!(top, vec![1, 2, 3]);
}
