use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures of a conversion run.
///
/// Parse anomalies inside a playlist are never errors; they are skipped by the indexer.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("cannot read playlist file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch playlist: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid playlist URL {url}: server answered {status}")]
    InvalidUrl {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("not an M3U file: first line must start with #EXTM3U")]
    NotM3u,

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
