use serde_json::Value;

use crate::category::{self, DEFAULT_CATEGORY};
use crate::domain::{CanonicalDataset, CanonicalEntry, RawEntryRecord, repetition_text};

const TEXT_KEYS: &[&str] = &["zekr", "content", "text", "description"];
const CATEGORY_KEYS: &[&str] = &["category", "type", "section"];
const COUNT_KEYS: &[&str] = &["count", "repeat", "repetition", "times"];
const DESCRIPTION_KEYS: &[&str] = &["description"];
const REFERENCE_KEYS: &[&str] = &["reference", "ref", "source"];

pub fn group(records: &[RawEntryRecord]) -> CanonicalDataset {
    let mut dataset = CanonicalDataset::new();
    for record in records {
        if let Some(entry) = to_entry(record) {
            dataset.push_unique(entry);
        }
    }
    dataset
}

pub fn to_entry(record: &RawEntryRecord) -> Option<CanonicalEntry> {
    let text = first_text(record, TEXT_KEYS)?;
    let raw_category = first_text(record, CATEGORY_KEYS);
    let category = category::normalize(raw_category.as_deref().unwrap_or(DEFAULT_CATEGORY));
    let repetition_count = repetition_text(first_value(record, COUNT_KEYS));
    let description = first_text(record, DESCRIPTION_KEYS)
        .filter(|description| *description != text)
        .unwrap_or_default();
    let reference = first_text(record, REFERENCE_KEYS).unwrap_or_default();

    Some(CanonicalEntry {
        category,
        text,
        repetition_count,
        description,
        reference,
    })
}

fn first_value<'a>(record: &'a RawEntryRecord, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|value| !value.is_null())
}

fn first_text(record: &RawEntryRecord, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::shape::flatten;

    fn record(value: Value) -> RawEntryRecord {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn columnar_scenario() {
        let payload = json!({
            "columns": ["zekr", "category", "count"],
            "rows": [["سبحان الله", "أذكار الصباح", "33"]]
        });
        let dataset = group(&flatten(&payload));

        assert_eq!(dataset.len(), 1);
        let entries = dataset.get(category::MORNING).unwrap();
        assert_eq!(
            entries,
            [CanonicalEntry {
                category: category::MORNING.to_string(),
                text: "سبحان الله".to_string(),
                repetition_count: "33".to_string(),
                description: String::new(),
                reference: String::new(),
            }]
        );
    }

    #[test]
    fn text_key_fallback_order() {
        let entry = to_entry(&record(json!({ "content": " a ", "text": "b" }))).unwrap();
        assert_eq!(entry.text, "a");

        let entry = to_entry(&record(json!({ "zekr": "  ", "text": "b" }))).unwrap();
        assert_eq!(entry.text, "b");

        let entry = to_entry(&record(json!({ "description": "only" }))).unwrap();
        assert_eq!(entry.text, "only");
        assert_eq!(entry.description, "");
    }

    #[test]
    fn records_without_text_are_dropped() {
        let records = vec![
            record(json!({ "category": "Morning", "count": 3 })),
            record(json!({ "zekr": 12 })),
            record(json!({ "zekr": "kept" })),
        ];
        let dataset = group(&records);
        assert_eq!(dataset.entry_count(), 1);
        assert_eq!(dataset.get(DEFAULT_CATEGORY).unwrap()[0].text, "kept");
    }

    #[test]
    fn defaults_and_description_suppression() {
        let entry = to_entry(&record(json!({
            "zekr": "x",
            "description": "x",
            "category": "   ",
            "source": "رواه مسلم"
        })))
        .unwrap();
        assert_eq!(entry.category, DEFAULT_CATEGORY);
        assert_eq!(entry.repetition_count, "1");
        assert_eq!(entry.description, "");
        assert_eq!(entry.reference, "رواه مسلم");
    }

    #[test]
    fn dedup_is_category_scoped() {
        let records = vec![
            record(json!({ "zekr": "سبحان الله", "category": "صباح", "count": "33" })),
            record(json!({ "zekr": "سبحان الله", "category": "Morning", "count": "100" })),
            record(json!({ "zekr": "سبحان الله", "category": "Evening" })),
        ];
        let dataset = group(&records);

        let morning = dataset.get(category::MORNING).unwrap();
        assert_eq!(morning.len(), 1);
        assert_eq!(morning[0].repetition_count, "33");
        assert_eq!(dataset.get(category::EVENING).unwrap().len(), 1);
    }

    #[test]
    fn no_duplicate_text_in_any_bucket() {
        let payload = json!([
            { "zekr": "a", "category": "Sleep" },
            { "zekr": "a", "category": "أذكار النوم" },
            { "zekr": "b", "category": "Sleep" },
            { "zekr": "b", "category": "sleep " }
        ]);
        let dataset = group(&flatten(&payload));
        for (_, entries) in dataset.iter() {
            let mut texts = entries.iter().map(|e| e.text.as_str()).collect::<Vec<_>>();
            let before = texts.len();
            texts.sort_unstable();
            texts.dedup();
            assert_eq!(texts.len(), before);
        }
        assert_eq!(dataset.get(category::SLEEP).unwrap().len(), 2);
    }

    #[test]
    fn malformed_payload_groups_to_empty() {
        assert!(group(&flatten(&json!(7))).is_empty());
        assert!(group(&flatten(&json!({ "meta": { "a": 1 } }))).is_empty());
    }
}
