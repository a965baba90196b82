//! Query string parsing and record filtering.

use crate::types::record::{id_key, Record, ID_FIELD};
use regex::{Regex, RegexBuilder};
use serde_json::Value;

/// Parse a query string into decoded `(key, value)` pairs in request order.
///
/// Repeated keys are kept as separate pairs; a key without `=` gets an empty value.
pub fn parse_query_string(query_str: &str) -> Vec<(String, String)> {
    query_str
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(key), decode(value))
        })
        .collect()
}

fn decode(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    urlencoding::decode(&raw)
        .map(|s| s.into_owned())
        .unwrap_or(raw)
}

#[derive(Debug, Clone)]
enum Condition {
    /// Exact comparison of the record id
    Id(String),
    /// Pattern search in the string form of a field
    Pattern { field: String, regex: Regex },
    /// Plain equality when the value cannot be compiled as a pattern
    Equals { field: String, value: String },
}

impl Condition {
    fn new(field: &str, value: &str, case_sensitive: bool) -> Self {
        if field == ID_FIELD {
            return Condition::Id(value.to_owned());
        }

        let build = |pattern: &str| {
            RegexBuilder::new(pattern)
                .case_insensitive(!case_sensitive)
                .build()
        };
        match build(value).or_else(|_| build(&regex::escape(value))) {
            Ok(regex) => Condition::Pattern {
                field: field.to_owned(),
                regex,
            },
            Err(_) => Condition::Equals {
                field: field.to_owned(),
                value: value.to_owned(),
            },
        }
    }

    fn matches(&self, record: &Record) -> bool {
        match self {
            Condition::Id(id) => record
                .get(ID_FIELD)
                .and_then(id_key)
                .is_some_and(|key| key == *id),
            Condition::Pattern { field, regex } => {
                field_text(record, field).is_some_and(|text| regex.is_match(&text))
            }
            Condition::Equals { field, value } => {
                field_text(record, field).is_some_and(|text| text == *value)
            }
        }
    }
}

fn field_text(record: &Record, field: &str) -> Option<String> {
    match record.get(field)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Conditions of a filtered collection GET, combined with AND.
///
/// `id` is compared exactly; other fields are searched with the query value
/// as a regular expression, so `name=Maxi` finds `Maxinius`. Records without
/// a field never match a condition on it.
#[derive(Debug, Clone, Default)]
pub struct QueryFilter {
    conditions: Vec<Condition>,
}

impl QueryFilter {
    pub fn new(params: &[(String, String)], case_sensitive: bool) -> Self {
        let conditions = params
            .iter()
            .map(|(field, value)| Condition::new(field, value, case_sensitive))
            .collect();
        Self { conditions }
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.conditions.iter().all(|c| c.matches(record))
    }

    /// Matching records, cloned, in collection order.
    pub fn apply(&self, records: &[Record]) -> Vec<Record> {
        records
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect()
    }
}
