//! Record and record id helpers.

use serde_json::{Map, Value};

/// A stored record: a JSON object carrying a unique `id` field.
pub type Record = Map<String, Value>;

/// Name of the identifying field of every record.
pub const ID_FIELD: &str = "id";

/// Comparison key of an id value.
///
/// Only strings and integers are valid ids. `1` and `"1"` share the key `"1"`,
/// so ids coming from URLs and query strings compare equal to stored ones.
pub fn id_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
        _ => None,
    }
}

/// Returns the id of a record, treating `null` as absent.
pub fn record_id(record: &Record) -> Option<&Value> {
    record.get(ID_FIELD).filter(|v| !v.is_null())
}

/// Returns the comparison key of a record's id.
pub fn record_key(record: &Record) -> Option<String> {
    record_id(record).and_then(id_key)
}

/// Position of the record with the given id key.
pub fn position_of(records: &[Record], key: &str) -> Option<usize> {
    records
        .iter()
        .position(|r| record_key(r).is_some_and(|k| k == key))
}

/// Converts an id taken from a URL into the id type used by the collection.
///
/// Collections whose first record has a numeric id (and empty collections)
/// get integer ids when the raw value parses as one.
pub fn parse_id(records: &[Record], raw: &str) -> Value {
    let numeric = records
        .first()
        .and_then(record_id)
        .is_none_or(Value::is_number);

    if numeric {
        if let Ok(n) = raw.parse::<i64>() {
            return Value::from(n);
        }
    }
    Value::String(raw.to_owned())
}

/// Largest integer id in the collection, if any.
pub fn max_integer_id(records: &[Record]) -> Option<i64> {
    records
        .iter()
        .filter_map(record_id)
        .filter_map(Value::as_i64)
        .max()
}

/// Default id generator: one more than the largest integer id, or `1`.
///
/// `None` once the largest id is `i64::MAX`.
pub fn next_integer_id(records: &[Record]) -> Option<Value> {
    max_integer_id(records)
        .unwrap_or(0)
        .checked_add(1)
        .map(Value::from)
}
