use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::domain::CanonicalDataset;
use crate::group::group;
use crate::shape::{PayloadShape, flatten};
use crate::source::{ContentSource, SourceClient};
use crate::store::{Snapshot, SnapshotStore};

pub const DEFAULT_FRESHNESS_HOURS: i64 = 24;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Origin {
    Baseline,
    FreshSnapshot { fetched_at: DateTime<Utc> },
    Network { source: String, fetched_at: DateTime<Utc> },
    StaleSnapshot { fetched_at: DateTime<Utc> },
}

#[derive(Debug, Clone, Serialize)]
pub struct Acquisition {
    pub origin: Origin,
    pub dataset: CanonicalDataset,
}

impl Acquisition {
    pub fn into_dataset(self) -> CanonicalDataset {
        self.dataset
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClearResult {
    pub cleared: bool,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

pub struct NoopSink;

impl ProgressSink for NoopSink {
    fn event(&self, _event: ProgressEvent) {}
}

fn emit(sink: &dyn ProgressSink, message: impl Into<String>) {
    sink.event(ProgressEvent {
        message: message.into(),
    });
}

/// Merges the bundled baseline, the persisted snapshot and the network
/// sources into one dataset that is never worse than the baseline.
pub struct App<S: SnapshotStore, C: SourceClient> {
    baseline: CanonicalDataset,
    store: S,
    client: C,
    sources: Vec<ContentSource>,
    freshness: TimeDelta,
}

impl<S: SnapshotStore, C: SourceClient> App<S, C> {
    pub fn new(
        baseline: CanonicalDataset,
        store: S,
        client: C,
        sources: Vec<ContentSource>,
    ) -> Self {
        Self {
            baseline,
            store,
            client,
            sources,
            freshness: TimeDelta::hours(DEFAULT_FRESHNESS_HOURS),
        }
    }

    pub fn with_freshness(mut self, freshness: TimeDelta) -> Self {
        self.freshness = freshness;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn acquire(&self, sink: &dyn ProgressSink) -> Acquisition {
        let now = Utc::now();
        emit(sink, "phase=Resolve; reading snapshot");
        let snapshot = self.read_snapshot();

        let mut merged = self.baseline.clone();
        if let Some(snapshot) = &snapshot {
            merged.overlay(&snapshot.data);
            if snapshot.is_fresh(now, self.freshness) {
                tracing::debug!(fetched_at = %snapshot.fetched_at, "serving fresh snapshot");
                emit(sink, "phase=Store; snapshot is fresh");
                return Acquisition {
                    origin: Origin::FreshSnapshot {
                        fetched_at: snapshot.fetched_at,
                    },
                    dataset: merged,
                };
            }
            tracing::info!(fetched_at = %snapshot.fetched_at, "snapshot is stale");
        }

        for source in &self.sources {
            emit(sink, format!("phase=Fetch; {}", source.name));
            let Some(candidate) = self.fetch_candidate(source) else {
                continue;
            };

            let fetched_at = Utc::now();
            self.persist(Snapshot::new(fetched_at, candidate.clone()));
            emit(
                sink,
                format!("phase=Store; {} categories from {}", candidate.len(), source.name),
            );
            return Acquisition {
                origin: Origin::Network {
                    source: source.name.clone(),
                    fetched_at,
                },
                dataset: self.baseline.clone().overlaid(&candidate),
            };
        }

        match snapshot {
            Some(snapshot) => {
                tracing::warn!("all content sources failed; serving stale snapshot");
                Acquisition {
                    origin: Origin::StaleSnapshot {
                        fetched_at: snapshot.fetched_at,
                    },
                    dataset: merged,
                }
            }
            None => {
                tracing::warn!("all content sources failed; serving bundled baseline");
                Acquisition {
                    origin: Origin::Baseline,
                    dataset: merged,
                }
            }
        }
    }

    pub fn invalidate(&self, sink: &dyn ProgressSink) -> ClearResult {
        emit(sink, "phase=Store; clearing snapshot");
        match self.store.clear() {
            Ok(()) => ClearResult { cleared: true },
            Err(err) => {
                tracing::warn!(error = %err, "failed to clear snapshot");
                ClearResult { cleared: false }
            }
        }
    }

    pub fn refresh(&self, sink: &dyn ProgressSink) -> Acquisition {
        self.invalidate(sink);
        self.acquire(sink)
    }

    fn read_snapshot(&self) -> Option<Snapshot> {
        let raw = match self.store.load() {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read snapshot");
                return None;
            }
        };
        match Snapshot::decode(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                tracing::warn!(error = %err, "purging corrupt snapshot");
                if let Err(err) = self.store.clear() {
                    tracing::warn!(error = %err, "failed to purge corrupt snapshot");
                }
                None
            }
        }
    }

    fn fetch_candidate(&self, source: &ContentSource) -> Option<CanonicalDataset> {
        let start = std::time::Instant::now();
        let payload = match self.client.fetch_json(source) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(source = %source.name, error = %err, "content source failed");
                return None;
            }
        };
        let shape = PayloadShape::detect(&payload).name();
        let candidate = group(&flatten(&payload));
        tracing::info!(
            source = %source.name,
            shape,
            categories = candidate.len(),
            entries = candidate.entry_count(),
            latency_ms = start.elapsed().as_millis() as u64,
            "content source responded"
        );
        (!candidate.is_empty()).then_some(candidate)
    }

    fn persist(&self, snapshot: Snapshot) {
        let result = snapshot.encode().and_then(|raw| self.store.save(&raw));
        if let Err(err) = result {
            tracing::warn!(error = %err, "failed to persist snapshot");
        }
    }
}
