use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use camino::Utf8PathBuf;
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::app::DEFAULT_FRESHNESS_HOURS;
use crate::error::AzkarError;
use crate::source::{ContentSource, default_sources};

pub const CONFIG_FILE: &str = "azkar.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub sources: Vec<SourceEntry>,
    #[serde(default)]
    pub freshness_hours: Option<u32>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub snapshot_path: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum SourceEntry {
    Shorthand(String),
    Detailed(SourceEntryObject),
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SourceEntryObject {
    pub url: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub schema_version: u32,
    pub sources: Vec<ContentSource>,
    pub freshness: TimeDelta,
    pub timeout: Duration,
    pub snapshot_path: Option<Utf8PathBuf>,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Reads `azkar.json` from the working directory, or `path` when given.
    /// A missing default file resolves to the built-in defaults.
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, AzkarError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(CONFIG_FILE),
        };

        if path.is_none() && !config_path.exists() {
            tracing::debug!("no {CONFIG_FILE} found; using defaults");
            return Self::resolve_config(Config::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| AzkarError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| AzkarError::ConfigParse(err.to_string()))?;

        Self::resolve_config(config)
    }

    pub fn resolve_config(config: Config) -> Result<ResolvedConfig, AzkarError> {
        let schema_version = config.schema_version.unwrap_or(1);

        let mut sources = config
            .sources
            .into_iter()
            .map(|entry| match entry {
                SourceEntry::Shorthand(url) => ContentSource::from_url(&url),
                SourceEntry::Detailed(obj) => {
                    let source = ContentSource::from_url(&obj.url)?;
                    Ok(match obj.name {
                        Some(name) => ContentSource::new(name, source.url),
                        None => source,
                    })
                }
            })
            .collect::<Result<Vec<_>, AzkarError>>()?;
        if sources.is_empty() {
            sources = default_sources();
        }

        let freshness = TimeDelta::hours(
            config
                .freshness_hours
                .map(i64::from)
                .unwrap_or(DEFAULT_FRESHNESS_HOURS),
        );
        let timeout = Duration::from_secs(config.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));

        Ok(ResolvedConfig {
            schema_version,
            sources,
            freshness,
            timeout,
            snapshot_path: config.snapshot_path.map(Utf8PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let resolved = ConfigLoader::resolve_config(Config::default()).unwrap();
        assert_eq!(resolved.schema_version, 1);
        assert_eq!(resolved.sources, default_sources());
        assert_eq!(resolved.freshness, TimeDelta::hours(24));
        assert_eq!(resolved.timeout, Duration::from_secs(30));
        assert!(resolved.snapshot_path.is_none());
    }

    #[test]
    fn parse_config_shorthand_and_detailed() {
        let config: Config = serde_json::from_str(
            r#"{
                "sources": [
                    "https://example.org/a.json",
                    { "name": "mirror", "url": "https://mirror.example.org/b.json" }
                ],
                "freshness_hours": 6
            }"#,
        )
        .unwrap();

        let resolved = ConfigLoader::resolve_config(config).unwrap();
        assert_eq!(resolved.sources.len(), 2);
        assert_eq!(resolved.sources[0].name, "example.org");
        assert_eq!(resolved.sources[1].name, "mirror");
        assert_eq!(resolved.freshness, TimeDelta::hours(6));
    }

    #[test]
    fn invalid_source_is_rejected() {
        let config = Config {
            sources: vec![SourceEntry::Shorthand("not a url".to_string())],
            ..Config::default()
        };
        assert_matches!(
            ConfigLoader::resolve_config(config),
            Err(AzkarError::InvalidSource(_))
        );
    }
}
