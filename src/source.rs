use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{ConvertError, Result};

pub const M3U_HEADER: &str = "#EXTM3U";

/// Where a playlist is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Url(String),
}

impl Source {
    /// Picks the source from the `--file` / `--url` flags.
    ///
    /// Returns `None` unless exactly one of them is given; the caller prints usage in that case.
    pub fn from_flags(file: Option<PathBuf>, url: Option<String>) -> Option<Self> {
        match (file, url) {
            (Some(path), None) => Some(Source::File(path)),
            (None, Some(url)) => Some(Source::Url(url)),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct FetchConfig {
    #[serde(default)]
    pub accept_invalid_certs: bool,
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Ignore `HTTP_PROXY` and friends from the environment.
    #[serde(default)]
    pub no_proxy: bool,
}

pub async fn load(source: &Source, cfg: &FetchConfig) -> Result<Vec<String>> {
    let text = match source {
        Source::File(path) => read_file(path).await?,
        Source::Url(url) => fetch_url(url, cfg).await?,
    };
    let lines = split_lines(&text)?;
    info!("Loaded {} playlist lines", lines.len());
    Ok(lines)
}

pub async fn read_file(path: &Path) -> Result<String> {
    info!("Reading playlist from {}", path.display());
    let bytes = tokio::fs::read(path).await.map_err(|source| ConvertError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub async fn fetch_url(url: &str, cfg: &FetchConfig) -> Result<String> {
    info!("Fetching playlist from {}", url);
    let mut builder = reqwest::Client::builder().danger_accept_invalid_certs(cfg.accept_invalid_certs);
    if let Some(ua) = &cfg.user_agent {
        builder = builder.user_agent(ua.as_str());
    }
    if cfg.no_proxy {
        builder = builder.no_proxy();
    }
    let client = builder.build()?;

    let resp = client.get(url).send().await?;
    let status = resp.status();
    debug!("GET {} -> {}", url, status);
    if !status.is_success() {
        return Err(ConvertError::InvalidUrl {
            url: url.to_string(),
            status,
        });
    }
    Ok(resp.text().await?)
}

/// Splits playlist text into lines and checks the `#EXTM3U` header.
pub fn split_lines(text: &str) -> Result<Vec<String>> {
    let lines: Vec<String> = text.lines().map(str::to_string).collect();
    match lines.first() {
        Some(first) if first.starts_with(M3U_HEADER) => Ok(lines),
        _ => Err(ConvertError::NotM3u),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_strips_line_endings() {
        let lines = split_lines("#EXTM3U\r\n#EXTINF:-1,A\r\nhttp://a\n").unwrap();
        assert_eq!(lines, vec!["#EXTM3U", "#EXTINF:-1,A", "http://a"]);
    }

    #[test]
    fn test_split_lines_accepts_header_with_attributes() {
        let lines = split_lines("#EXTM3U x-tvg-url=\"http://epg\"\n").unwrap();
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_split_lines_rejects_missing_header() {
        assert!(matches!(split_lines(""), Err(ConvertError::NotM3u)));
        assert!(matches!(split_lines("\n#EXTM3U\n"), Err(ConvertError::NotM3u)));
        assert!(matches!(split_lines("hello\n"), Err(ConvertError::NotM3u)));
        assert!(matches!(split_lines("#extm3u\n"), Err(ConvertError::NotM3u)));
    }

    #[test]
    fn test_source_from_flags() {
        assert_eq!(
            Source::from_flags(Some(PathBuf::from("a.m3u")), None),
            Some(Source::File(PathBuf::from("a.m3u")))
        );
        assert_eq!(
            Source::from_flags(None, Some("http://x".to_string())),
            Some(Source::Url("http://x".to_string()))
        );
        assert_eq!(Source::from_flags(None, None), None);
        assert_eq!(
            Source::from_flags(Some(PathBuf::from("a.m3u")), Some("http://x".to_string())),
            None
        );
    }

    #[tokio::test]
    async fn test_read_missing_file_is_io_error() {
        let err = read_file(Path::new("/nonexistent/playlist.m3u")).await.unwrap_err();
        assert!(matches!(err, ConvertError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/playlist.m3u"));
    }
}
