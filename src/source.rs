use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::Serialize;
use serde_json::Value;

use crate::error::AzkarError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentSource {
    pub name: String,
    pub url: String,
}

impl ContentSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    pub fn from_url(url: &str) -> Result<Self, AzkarError> {
        let url = url.trim();
        let parsed =
            Url::parse(url).map_err(|err| AzkarError::InvalidSource(format!("{url}: {err}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AzkarError::InvalidSource(url.to_string()));
        }
        let host = parsed
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| AzkarError::InvalidSource(url.to_string()))?;
        Ok(Self::new(host, url))
    }
}

pub fn default_sources() -> Vec<ContentSource> {
    vec![
        ContentSource::new(
            "azkar-db",
            "https://raw.githubusercontent.com/osamayy/azkar-db/master/azkar.json",
        ),
        ContentSource::new(
            "azkar-api",
            "https://raw.githubusercontent.com/nawafalqari/azkar-api/56df51279ab6eb86dc2f6202c7de26c8948331c1/azkar.json",
        ),
    ]
}

pub trait SourceClient: Send + Sync {
    fn fetch_json(&self, source: &ContentSource) -> Result<Value, AzkarError>;
}

#[derive(Clone)]
pub struct HttpSourceClient {
    client: Client,
}

impl HttpSourceClient {
    pub fn new(timeout: Duration) -> Result<Self, AzkarError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("azkar-content/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| AzkarError::SourceHttp(err.to_string()))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|err| AzkarError::SourceHttp(err.to_string()))?;
        Ok(Self { client })
    }

    fn handle_status(
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, AzkarError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response
            .text()
            .unwrap_or_else(|_| "content source request failed".to_string());
        Err(AzkarError::SourceStatus { status, message })
    }
}

impl SourceClient for HttpSourceClient {
    fn fetch_json(&self, source: &ContentSource) -> Result<Value, AzkarError> {
        let response = self
            .client
            .get(&source.url)
            .send()
            .map_err(|err| AzkarError::SourceHttp(err.to_string()))?;
        let response = Self::handle_status(response)?;
        // raw.githubusercontent.com serves JSON as text/plain.
        let body = response
            .bytes()
            .map_err(|err| AzkarError::SourceHttp(err.to_string()))?;
        serde_json::from_slice(&body).map_err(|err| AzkarError::SourcePayload(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn source_from_url_uses_host_as_name() {
        let source = ContentSource::from_url(" https://example.org/azkar.json ").unwrap();
        assert_eq!(source.name, "example.org");
        assert_eq!(source.url, "https://example.org/azkar.json");
    }

    #[test]
    fn source_from_url_rejects_other_schemes() {
        assert_matches!(
            ContentSource::from_url("ftp://example.org/a.json"),
            Err(AzkarError::InvalidSource(_))
        );
        for url in [
            "example.org/a.json",
            "https://exa mple.org/a.json",
            "https://?q=1",
            "https://:80/x",
            "http://[bad/x",
        ] {
            assert_matches!(
                ContentSource::from_url(url),
                Err(AzkarError::InvalidSource(_)),
                "{url}"
            );
        }
    }

    #[test]
    fn default_sources_are_ordered_and_named() {
        let sources = default_sources();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].name, "azkar-db");
        assert!(sources.iter().all(|s| s.url.starts_with("https://")));
    }
}
