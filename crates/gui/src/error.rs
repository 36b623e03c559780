//! Errors raised while reading tour data sources.

use std::path::PathBuf;

/// Failure to read or parse one of the tour's data sources.
///
/// These never reach the visitor directly: callers log them and fall back
/// to the next source in the chain.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {what}: {source}")]
    Json {
        what: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("no platform data directory available")]
    NoDataDir,
}

impl SourceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(what: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            what: what.into(),
            source,
        }
    }
}

/// Failure to fetch or decode a panorama image or the dollhouse model.
///
/// Reported to the tour as a message; the visitor stays where they are.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read {reference}: {source}")]
    Io {
        reference: String,
        #[source]
        source: std::io::Error,
    },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{reference} returned HTTP {status}")]
    Status { reference: String, status: u16 },
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("{reference} exceeds the {limit} byte download limit")]
    TooLarge { reference: String, limit: u64 },
    #[error("model {0} has no vertices")]
    EmptyModel(String),
    #[error("loader task failed: {0}")]
    Task(String),
}
