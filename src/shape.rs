//! Flattening of remote payloads whose top-level shape is not known up front.

use serde_json::{Map, Value};

use crate::domain::RawEntryRecord;

pub const CATEGORY_FIELD: &str = "category";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PayloadShape<'a> {
    /// `{ "columns": [...], "rows": [[...], ...] }`
    Columnar {
        columns: &'a [Value],
        rows: &'a [Value],
    },
    /// `[ {...}, {...} ]`
    FlatArray(&'a [Value]),
    /// `{ "<category>": [ {...}, ... ], ... }`
    GroupedByKey(&'a Map<String, Value>),
    Unrecognized,
}

impl<'a> PayloadShape<'a> {
    pub fn detect(payload: &'a Value) -> Self {
        match payload {
            Value::Object(map) if map.contains_key("columns") && map.contains_key("rows") => {
                match (map.get("columns"), map.get("rows")) {
                    (Some(Value::Array(columns)), Some(Value::Array(rows))) => {
                        PayloadShape::Columnar { columns, rows }
                    }
                    _ => PayloadShape::Unrecognized,
                }
            }
            Value::Array(items) => PayloadShape::FlatArray(items),
            Value::Object(map) => PayloadShape::GroupedByKey(map),
            _ => PayloadShape::Unrecognized,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PayloadShape::Columnar { .. } => "columnar",
            PayloadShape::FlatArray(_) => "flat-array",
            PayloadShape::GroupedByKey(_) => "grouped-by-key",
            PayloadShape::Unrecognized => "unrecognized",
        }
    }

    pub fn records(&self) -> Vec<RawEntryRecord> {
        match *self {
            PayloadShape::Columnar { columns, rows } => zip_rows(columns, rows),
            PayloadShape::FlatArray(items) => items
                .iter()
                .filter_map(|item| item.as_object().cloned())
                .collect(),
            PayloadShape::GroupedByKey(map) => flatten_groups(map),
            PayloadShape::Unrecognized => Vec::new(),
        }
    }
}

pub fn flatten(payload: &Value) -> Vec<RawEntryRecord> {
    PayloadShape::detect(payload).records()
}

fn zip_rows(columns: &[Value], rows: &[Value]) -> Vec<RawEntryRecord> {
    rows.iter()
        .filter_map(Value::as_array)
        .map(|row| {
            columns
                .iter()
                .zip(row)
                .filter_map(|(column, value)| {
                    column
                        .as_str()
                        .map(|name| (name.to_string(), value.clone()))
                })
                .collect::<RawEntryRecord>()
        })
        .collect()
}

fn flatten_groups(map: &Map<String, Value>) -> Vec<RawEntryRecord> {
    let mut records = Vec::new();
    for (key, value) in map {
        let Some(items) = value.as_array() else {
            continue;
        };
        for item in items {
            if let Some(object) = item.as_object() {
                let mut record = object.clone();
                record.insert(CATEGORY_FIELD.to_string(), Value::String(key.clone()));
                records.push(record);
            }
        }
    }
    records
}
