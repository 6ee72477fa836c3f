use serde_json::Value as JsonValue;

use crate::error::{Error, Result};

use super::record::{Record, fields};
use super::{RankingEntry, RankingList};

/// Top-level key holding an unrelated score field; never a participant.
pub const RESERVED_KEY: &str = fields::SCORE;

/// Turn a raw snapshot into an ordered ranking.
///
/// `Null` yields an empty list. Only object-valued entries are participants;
/// the reserved key is skipped whatever its shape. An array snapshot (the
/// store's rendering of children keyed `0, 1, 2, ...`) is read as a mapping
/// from index to value, with `null` holes skipped. Entries are sorted by
/// numeric score, descending, keeping snapshot order among equal scores.
///
/// A snapshot that is present but neither an object nor an array is rejected.
pub fn project(snapshot: &JsonValue) -> Result<RankingList> {
    let candidates: Vec<(String, &JsonValue)> = match snapshot {
        JsonValue::Null => return Ok(RankingList::default()),
        JsonValue::Object(entries) => entries
            .iter()
            .filter(|(key, _)| key.as_str() != RESERVED_KEY)
            .map(|(key, value)| (key.clone(), value))
            .collect(),
        JsonValue::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, value)| (index.to_string(), value))
            .collect(),
        other => {
            return Err(Error::MalformedSnapshot(format!(
                "expected a collection of records, got {}",
                json_kind(other)
            )));
        }
    };

    let mut scored: Vec<(f64, Record)> = candidates
        .iter()
        .filter_map(|(key, value)| value.as_object().map(|object| (key, object)))
        .map(|(key, object)| {
            let record = Record::from_fields(key, object);
            (record.numeric_score(), record)
        })
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    let entries = scored
        .into_iter()
        .enumerate()
        .map(|(index, (score, record))| RankingEntry {
            position: index + 1,
            score,
            record,
        })
        .collect();

    Ok(RankingList::new(entries))
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
