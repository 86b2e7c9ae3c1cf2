// Dataset loading from a local directory or an HTTP base URL.
//
// The four fetches are independent and run concurrently. A failed fetch is
// logged and leaves its slot empty; the index is built from whatever loaded.

use std::path::PathBuf;

use menace_core::{DatasetKind, RawDatasets};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{DataConfig, SourceKind};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {kind} from {path}: {source}")]
    Io {
        kind: DatasetKind,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to fetch {kind} from {url}: {source}")]
    Http {
        kind: DatasetKind,
        url: String,
        source: reqwest::Error,
    },

    #[error("fetching {kind} from {url} returned HTTP {status}")]
    Status {
        kind: DatasetKind,
        url: String,
        status: reqwest::StatusCode,
    },
}

impl LoadError {
    pub fn kind(&self) -> DatasetKind {
        match self {
            LoadError::Io { kind, .. }
            | LoadError::Http { kind, .. }
            | LoadError::Status { kind, .. } => *kind,
        }
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Where dataset text is read from.
pub enum DatasetSource {
    /// Files under a local directory.
    Files { dir: PathBuf },
    /// Documents under a base URL.
    Http {
        client: reqwest::Client,
        base_url: String,
    },
}

impl DatasetSource {
    pub fn from_config(data: &DataConfig) -> Self {
        match data.source {
            SourceKind::Files => DatasetSource::Files {
                dir: PathBuf::from(&data.base),
            },
            SourceKind::Http => DatasetSource::Http {
                client: reqwest::Client::new(),
                base_url: data.base.trim_end_matches('/').to_string(),
            },
        }
    }

    /// Fetch one dataset's raw text.
    pub async fn fetch(&self, kind: DatasetKind, name: &str) -> Result<String, LoadError> {
        match self {
            DatasetSource::Files { dir } => {
                let path = dir.join(name);
                let read = tokio::fs::read_to_string(&path).await;
                read.map_err(|source| LoadError::Io { kind, path, source })
            }
            DatasetSource::Http { client, base_url } => {
                let url = format!("{base_url}/{name}");
                let response = client.get(&url).send().await.map_err(|source| LoadError::Http {
                    kind,
                    url: url.clone(),
                    source,
                })?;
                let status = response.status();
                if !status.is_success() {
                    return Err(LoadError::Status { kind, url, status });
                }
                response
                    .text()
                    .await
                    .map_err(|source| LoadError::Http { kind, url, source })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Loads the four datasets named by a [`DataConfig`].
pub struct DatasetLoader {
    source: DatasetSource,
    data: DataConfig,
}

impl DatasetLoader {
    pub fn new(source: DatasetSource, data: DataConfig) -> Self {
        DatasetLoader { source, data }
    }

    pub fn from_config(data: &DataConfig) -> Self {
        DatasetLoader::new(DatasetSource::from_config(data), data.clone())
    }

    /// Fetch all four datasets concurrently. Failures are logged and leave
    /// the dataset unset.
    pub async fn load(&self) -> RawDatasets {
        let (atp, elo, h2h, matches) = tokio::join!(
            self.fetch_one(DatasetKind::AtpRankings),
            self.fetch_one(DatasetKind::EloRatings),
            self.fetch_one(DatasetKind::H2hMatrix),
            self.fetch_one(DatasetKind::Matches),
        );
        RawDatasets {
            atp_rankings: atp,
            elo_ratings: elo,
            h2h_matrix: h2h,
            matches,
        }
    }

    async fn fetch_one(&self, kind: DatasetKind) -> Option<String> {
        match self.source.fetch(kind, self.data.file_name(kind)).await {
            Ok(text) => {
                debug!("loaded {kind} ({} bytes)", text.len());
                Some(text)
            }
            Err(e) => {
                warn!("{e}");
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
