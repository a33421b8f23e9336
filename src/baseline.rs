use serde_json::Value;

use crate::domain::CanonicalDataset;
use crate::group::group;
use crate::shape::flatten;

const BUNDLED: &str = include_str!("../data/baseline.json");

// Runs through the same pipeline as network payloads.
pub fn bundled() -> CanonicalDataset {
    let payload = match serde_json::from_str::<Value>(BUNDLED) {
        Ok(payload) => payload,
        Err(err) => {
            tracing::error!(error = %err, "bundled baseline is not valid JSON");
            Value::Null
        }
    };
    group(&flatten(&payload))
}
