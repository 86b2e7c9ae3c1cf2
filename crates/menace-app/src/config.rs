// Configuration loading and parsing (menace.toml).

use std::path::{Path, PathBuf};

use menace_core::DatasetKind;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "menace.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub search: SearchConfig,
}

/// Where the four datasets come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Files,
    Http,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub source: SourceKind,
    /// Directory (files) or base URL (http) the file names are relative to.
    pub base: String,
    pub atp_rankings: String,
    pub elo_ratings: String,
    pub h2h_matrix: String,
    pub matches: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            source: SourceKind::Files,
            base: "data".to_string(),
            atp_rankings: "Rankings_July_2025 - Sheet1.csv".to_string(),
            elo_ratings: "EloRankingsJuly2025.csv".to_string(),
            h2h_matrix: "h2h_matrix.csv".to_string(),
            matches: "atp_matches_2024.csv".to_string(),
        }
    }
}

impl DataConfig {
    pub fn file_name(&self, kind: DatasetKind) -> &str {
        match kind {
            DatasetKind::AtpRankings => &self.atp_rankings,
            DatasetKind::EloRatings => &self.elo_ratings,
            DatasetKind::H2hMatrix => &self.h2h_matrix,
            DatasetKind::Matches => &self.matches,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search results shown per query.
    pub max_results: usize,
    /// Length of the top-players list shown before any search.
    pub top_players: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_results: 5,
            top_players: 3,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate the config file at `path`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path, or from `menace.toml` in the working
/// directory. Only the implicit default may be absent, in which case built-in
/// defaults apply.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    match explicit {
        Some(path) => load_config_from(path),
        None => {
            let path = Path::new(DEFAULT_CONFIG_FILE);
            if path.exists() {
                load_config_from(path)
            } else {
                Ok(Config::default())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let data = &config.data;
    if data.base.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.base".into(),
            message: "must not be empty".into(),
        });
    }

    let name_fields: &[(&str, &str)] = &[
        ("data.atp_rankings", data.atp_rankings.as_str()),
        ("data.elo_ratings", data.elo_ratings.as_str()),
        ("data.h2h_matrix", data.h2h_matrix.as_str()),
        ("data.matches", data.matches.as_str()),
    ];
    for (name, val) in name_fields {
        if val.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must not be empty".into(),
            });
        }
    }

    let count_fields: &[(&str, usize)] = &[
        ("search.max_results", config.search.max_results),
        ("search.top_players", config.search.top_players),
    ];
    for (name, val) in count_fields {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be greater than 0".into(),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
