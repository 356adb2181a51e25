//! Layout source resolution and loading
//!
//! A layout comes from a local JSON file, an HTTP(S) endpoint, or the sample
//! venue bundled into the binary. Loading is the only asynchronous step.

use log::{debug, info};
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::error::{Error, Result};
use crate::core::model::MallLayout;

/// Two-floor sample venue shipped with the crate
pub const BUNDLED_SAMPLE: &str = include_str!("../../data/sample_mall.json");

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Where a layout is read from
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutSource {
    File(PathBuf),
    Http(String),
    Bundled,
}

impl LayoutSource {
    /// Resolve a source string: `http(s)://...`, `bundled:sample`, or a file path.
    pub fn parse(source: &str) -> Self {
        match source {
            "bundled" | "bundled:sample" => LayoutSource::Bundled,
            url if url.starts_with("http://") || url.starts_with("https://") => {
                LayoutSource::Http(url.to_string())
            }
            path => LayoutSource::File(PathBuf::from(path)),
        }
    }

    /// Fetch, parse and validate the layout.
    pub async fn load(&self) -> Result<MallLayout> {
        let layout = match self {
            LayoutSource::File(path) => {
                debug!("Reading layout from {}", path.display());
                let text = tokio::fs::read_to_string(path).await.map_err(|e| {
                    Error::LayoutLoad(format!("cannot read {}: {e}", path.display()))
                })?;
                parse_layout(&text)?
            }
            LayoutSource::Http(url) => fetch_layout(url).await?,
            LayoutSource::Bundled => parse_layout(BUNDLED_SAMPLE)?,
        };

        layout.validate()?;
        info!(
            "Layout '{}' loaded from {self}: {} floors",
            layout.id,
            layout.floors.len()
        );
        Ok(layout)
    }
}

impl std::fmt::Display for LayoutSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutSource::File(path) => write!(f, "{}", path.display()),
            LayoutSource::Http(url) => write!(f, "{url}"),
            LayoutSource::Bundled => write!(f, "bundled:sample"),
        }
    }
}

/// Parse layout JSON without validating it.
pub fn parse_layout(text: &str) -> Result<MallLayout> {
    Ok(serde_json::from_str(text)?)
}

/// The bundled sample venue, parsed.
pub fn sample_layout() -> Result<MallLayout> {
    parse_layout(BUNDLED_SAMPLE)
}

async fn fetch_layout(url: &str) -> Result<MallLayout> {
    debug!("Fetching layout from {url}");
    let client = Client::builder().timeout(HTTP_TIMEOUT).build()?;
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::LayoutLoad(format!("{url} returned HTTP {status}")));
    }

    let text = response.text().await?;
    parse_layout(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source_kinds() {
        assert_eq!(LayoutSource::parse("bundled:sample"), LayoutSource::Bundled);
        assert_eq!(
            LayoutSource::parse("https://venues.example/mall.json"),
            LayoutSource::Http("https://venues.example/mall.json".to_string())
        );
        assert_eq!(
            LayoutSource::parse("./mall.json"),
            LayoutSource::File(PathBuf::from("./mall.json"))
        );
    }

    #[test]
    fn test_bundled_sample_is_valid() {
        let layout = sample_layout().unwrap();
        layout.validate().unwrap();
        assert_eq!(layout.floors.len(), 2);
        assert!(layout.poi("g_entrance_1").is_some());
        assert!(layout.poi("l1_food_court").is_some());
    }

    #[tokio::test]
    async fn test_load_missing_file_is_layout_load_error() {
        let err = LayoutSource::File(PathBuf::from("/definitely/not/here.json"))
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::LayoutLoad(_)));
    }
}
