// Command-line definition and command execution over a player index.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use menace_core::{PinOutcome, PinnedPlayers, PlayerIndex};
use serde_json::{json, Value};

use crate::config::SearchConfig;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "menace", version, about = "Tennis player stats from rankings, ELO, H2H and 2024 results")]
pub struct Cli {
    /// Config file path (defaults to ./menace.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Players whose name contains the search term
    Search {
        #[arg(required = true, num_args = 1..)]
        term: Vec<String>,
    },
    /// First n players of the rankings
    Top {
        /// Defaults to `search.top_players` from the config
        n: Option<usize>,
    },
    /// One player with all joined stats
    Player {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// Head-to-head record from the first player's side
    H2h { a: String, b: String },
    /// Pin up to three players and list comparison views
    Compare {
        #[arg(required = true, num_args = 1..=3)]
        names: Vec<String>,
    },
}

/// Run `command` against `index`, producing the JSON document to print.
pub fn execute(command: &Command, index: &PlayerIndex, search: &SearchConfig) -> Value {
    let unavailable: Vec<String> = index.unavailable().iter().map(|k| k.to_string()).collect();
    let mut out = match command {
        Command::Search { term } => {
            let term = term.join(" ");
            let total = index.search(&term).len();
            json!({
                "term": term,
                "total": total,
                "results": index.search_limited(&term, search.max_results),
            })
        }
        Command::Top { n } => {
            json!({ "players": index.top_players(n.unwrap_or(search.top_players)) })
        }
        Command::Player { name } => json!({ "player": index.player(&name.join(" ")) }),
        Command::H2h { a, b } => {
            let record = index.head_to_head(a, b);
            json!({
                "player": a,
                "opponent": b,
                "record": record,
                "summary": record.as_ref().map(|r| r.to_string()),
            })
        }
        Command::Compare { names } => compare(names, index),
    };
    if !unavailable.is_empty() {
        if let Value::Object(map) = &mut out {
            map.insert("data_unavailable".to_string(), json!(unavailable));
        }
    }
    out
}

fn compare(names: &[String], index: &PlayerIndex) -> Value {
    let mut pinned = PinnedPlayers::default();
    let mut skipped = Vec::new();
    for name in names {
        match index.player(name) {
            Some(player) => {
                if pinned.pin(player) != PinOutcome::Pinned {
                    skipped.push(name.clone());
                }
            }
            None => skipped.push(name.clone()),
        }
    }
    let pinned_names: Vec<&str> = pinned.players().iter().map(|p| p.name.as_str()).collect();
    json!({
        "pinned": pinned_names,
        "skipped": skipped,
        "views": pinned.available_views(index),
        "players": pinned.players(),
        "head_to_head": pinned.head_to_head(index),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
