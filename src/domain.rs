use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::category;

pub type RawEntryRecord = Map<String, Value>;

/// Stored repetition value for phrases with no fixed target.
pub const UNBOUNDED: &str = "∞";

const UNBOUNDED_ALIASES: &[&str] = &[
    UNBOUNDED,
    "unbounded",
    "unlimited",
    "infinite",
    "مفتوح",
    "غير محدود",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalEntry {
    pub category: String,
    pub text: String,
    pub repetition_count: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub reference: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepetitionTarget {
    Times(u32),
    Unbounded,
}

impl fmt::Display for RepetitionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepetitionTarget::Times(count) => write!(f, "{count}"),
            RepetitionTarget::Unbounded => write!(f, "{UNBOUNDED}"),
        }
    }
}

impl CanonicalEntry {
    pub fn target(&self) -> RepetitionTarget {
        if is_unbounded(&self.repetition_count) {
            return RepetitionTarget::Unbounded;
        }
        RepetitionTarget::Times(parse_count(&self.repetition_count).unwrap_or(1))
    }

    pub fn concrete_target(&self) -> u32 {
        match self.target() {
            RepetitionTarget::Times(count) => count,
            RepetitionTarget::Unbounded => 1,
        }
    }
}

pub fn repetition_text(value: Option<&Value>) -> String {
    let text = match value {
        Some(Value::String(text)) => text.trim().to_string(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    };
    if text.is_empty() {
        return "1".to_string();
    }
    if is_unbounded(&text) {
        return UNBOUNDED.to_string();
    }
    text
}

fn is_unbounded(value: &str) -> bool {
    let folded = value.trim().to_lowercase();
    UNBOUNDED_ALIASES.iter().any(|alias| folded == *alias)
}

fn parse_count(value: &str) -> Option<u32> {
    let digits = value
        .trim()
        .chars()
        .map(|ch| match ch {
            '٠'..='٩' => char::from_u32(ch as u32 - '٠' as u32 + '0' as u32).unwrap_or(ch),
            _ => ch,
        })
        .collect::<String>();
    digits.parse::<u32>().ok().filter(|count| *count > 0)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalDataset(IndexMap<String, Vec<CanonicalEntry>>);

impl CanonicalDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entry_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CanonicalEntry])> {
        self.0
            .iter()
            .map(|(category, entries)| (category.as_str(), entries.as_slice()))
    }

    pub fn get(&self, category: &str) -> Option<&[CanonicalEntry]> {
        self.0.get(category).map(Vec::as_slice)
    }

    pub fn push_unique(&mut self, entry: CanonicalEntry) -> bool {
        let bucket = self.0.entry(entry.category.clone()).or_default();
        if bucket.iter().any(|existing| existing.text == entry.text) {
            return false;
        }
        bucket.push(entry);
        true
    }

    // Re-applies label normalization and per-category dedup to data that did
    // not come through `group`, such as a persisted snapshot.
    pub fn canonicalized(self) -> Self {
        let mut dataset = Self::new();
        for (label, entries) in self.0 {
            let label = category::normalize(&label);
            for mut entry in entries {
                entry.text = entry.text.trim().to_string();
                if entry.text.is_empty() {
                    continue;
                }
                entry.category = label.clone();
                dataset.push_unique(entry);
            }
        }
        dataset
    }

    pub fn overlay(&mut self, other: &CanonicalDataset) {
        for (category, entries) in &other.0 {
            if entries.is_empty() {
                continue;
            }
            self.0.insert(category.clone(), entries.clone());
        }
    }

    pub fn overlaid(mut self, other: &CanonicalDataset) -> Self {
        self.overlay(other);
        self
    }

    /// Looks a category up the way the UI does: exact label, then the
    /// normalized label, then any stored key containing or contained in the
    /// requested label.
    pub fn entries_for(&self, label: &str) -> Option<&[CanonicalEntry]> {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Some(entries) = self.get(trimmed) {
            return Some(entries);
        }
        if let Some(entries) = self.get(&category::normalize(trimmed)) {
            return Some(entries);
        }
        self.0
            .iter()
            .find(|(key, _)| key.contains(trimmed) || trimmed.contains(key.as_str()))
            .map(|(_, entries)| entries.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn entry(category: &str, text: &str, count: &str) -> CanonicalEntry {
        CanonicalEntry {
            category: category.to_string(),
            text: text.to_string(),
            repetition_count: count.to_string(),
            description: String::new(),
            reference: String::new(),
        }
    }

    #[test]
    fn repetition_targets() {
        assert_eq!(entry("c", "t", "33").target(), RepetitionTarget::Times(33));
        assert_eq!(entry("c", "t", "٣٣").concrete_target(), 33);
        assert_eq!(entry("c", "t", "abc").concrete_target(), 1);
        assert_eq!(entry("c", "t", "0").concrete_target(), 1);
        assert_matches!(entry("c", "t", "∞").target(), RepetitionTarget::Unbounded);
        assert_eq!(entry("c", "t", "∞").concrete_target(), 1);
    }

    #[test]
    fn repetition_text_defaults_and_sentinel() {
        assert_eq!(repetition_text(None), "1");
        assert_eq!(repetition_text(Some(&json!(""))), "1");
        assert_eq!(repetition_text(Some(&json!(100))), "100");
        assert_eq!(repetition_text(Some(&json!(" 7 "))), "7");
        assert_eq!(repetition_text(Some(&json!("Unlimited"))), UNBOUNDED);
        assert_eq!(repetition_text(Some(&json!(null))), "1");
    }

    #[test]
    fn push_unique_is_category_scoped() {
        let mut dataset = CanonicalDataset::new();
        assert!(dataset.push_unique(entry("a", "x", "1")));
        assert!(!dataset.push_unique(entry("a", "x", "3")));
        assert!(dataset.push_unique(entry("b", "x", "1")));
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.get("a").unwrap()[0].repetition_count, "1");
    }

    #[test]
    fn overlay_replaces_non_empty_categories() {
        let mut base = CanonicalDataset::new();
        base.push_unique(entry("a", "base-a", "1"));
        base.push_unique(entry("b", "base-b", "1"));

        let mut incoming = CanonicalDataset::new();
        incoming.push_unique(entry("b", "net-b", "1"));
        incoming.push_unique(entry("c", "net-c", "1"));

        base.overlay(&incoming);
        assert_eq!(base.categories().collect::<Vec<_>>(), ["a", "b", "c"]);
        assert_eq!(base.get("b").unwrap().len(), 1);
        assert_eq!(base.get("b").unwrap()[0].text, "net-b");
    }

    #[test]
    fn canonicalized_normalizes_labels_and_drops_duplicates() {
        let mut raw = IndexMap::new();
        raw.insert(
            "Morning".to_string(),
            vec![entry("Morning", "x", "1"), entry("Morning", " x ", "3")],
        );
        raw.insert(
            "صباح".to_string(),
            vec![entry("صباح", "x", "1"), entry("صباح", "y", "1")],
        );
        raw.insert("Evening".to_string(), vec![entry("Evening", "  ", "1")]);

        let dataset = CanonicalDataset(raw).canonicalized();

        assert_eq!(dataset.categories().collect::<Vec<_>>(), [category::MORNING]);
        let morning = dataset.get(category::MORNING).unwrap();
        assert_eq!(morning.len(), 2);
        assert_eq!(morning[0].text, "x");
        assert_eq!(morning[0].repetition_count, "1");
        assert!(morning.iter().all(|e| e.category == category::MORNING));
    }

    #[test]
    fn lookup_falls_back_to_normalized_then_substring() {
        let mut dataset = CanonicalDataset::new();
        dataset.push_unique(entry(category::MORNING, "x", "1"));
        dataset.push_unique(entry("Friday Special", "y", "1"));

        assert!(dataset.entries_for(category::MORNING).is_some());
        assert!(dataset.entries_for("Morning").is_some());
        assert_eq!(dataset.entries_for("Friday").unwrap()[0].text, "y");
        assert_eq!(dataset.entries_for("Friday Special Night").unwrap()[0].text, "y");
        assert!(dataset.entries_for("Ramadan").is_none());
        assert!(dataset.entries_for("  ").is_none());
    }

    #[test]
    fn serializes_as_object_with_camel_case_entries() {
        let mut dataset = CanonicalDataset::new();
        dataset.push_unique(entry("a", "x", "3"));
        let value = serde_json::to_value(&dataset).unwrap();
        assert_eq!(value["a"][0]["repetitionCount"], "3");
    }
}
