//! Request URL parsing and route patterns with path parameters.

use crate::matching::query::parse_query_string;
use std::collections::HashMap;

/// Base segment reserved for backend commands (`commands/resetDb`).
pub const COMMANDS_BASE: &str = "commands";

/// Request URL split into path segments and query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedUrl {
    /// Decoded path segments; the first one is the whole api base
    pub segments: Vec<String>,
    /// Query parameters in request order
    pub query: Vec<(String, String)>,
}

/// Path of a URL without scheme, host, query string, fragment and outer slashes.
pub fn request_path(url: &str) -> &str {
    let without_query = url.split(['?', '#']).next().unwrap_or("");
    let path = match without_query.find("://") {
        Some(idx) => {
            let rest = &without_query[idx + 3..];
            rest.find('/').map_or("", |i| &rest[i..])
        }
        None => without_query,
    };
    path.trim_matches('/')
}

/// Split a request URL into segments and query parameters.
///
/// With `api_base` set and the path starting with it, the base segments are
/// joined into the first segment so that `{base}/{collection}/{id}` patterns
/// apply to multi-segment bases. Paths outside the configured base keep the
/// first-segment rule.
pub fn parse_url(url: &str, api_base: Option<&str>) -> ParsedUrl {
    let mut segments: Vec<String> = request_path(url)
        .split('/')
        .filter(|s| !s.is_empty())
        .map(decode_segment)
        .collect();

    if let Some(base) = api_base {
        collapse_base(&mut segments, base);
    }

    let query = url
        .split('#')
        .next()
        .and_then(|without_fragment| without_fragment.split_once('?'))
        .map(|(_, q)| parse_query_string(q))
        .unwrap_or_default();

    ParsedUrl { segments, query }
}

fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_owned())
}

fn collapse_base(segments: &mut Vec<String>, base: &str) {
    let base: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();

    if base.is_empty() {
        // Root base: the collection is the first segment.
        if segments.first().is_some_and(|s| s != COMMANDS_BASE) {
            segments.insert(0, String::new());
        }
        return;
    }

    let starts_with_base =
        segments.len() >= base.len() && segments.iter().zip(&base).all(|(s, b)| s == b);
    if starts_with_base && base.len() > 1 {
        let joined = segments.drain(..base.len()).collect::<Vec<_>>().join("/");
        segments.insert(0, joined);
    }
}

/// A single segment of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Fixed text, compared case-insensitively
    Literal(String),
    /// `{name}` placeholder capturing one path segment
    Param(String),
}

/// Values captured by the placeholders of a matched pattern.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathParams(HashMap<String, String>);

impl PathParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

/// Route pattern such as `commands/resetDb` or `{base}/{collection}/{id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    segments: Vec<Segment>,
}

impl RoutePattern {
    pub fn parse(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) => Segment::Param(name.to_owned()),
                None => Segment::Literal(s.to_owned()),
            })
            .collect();
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Match path segments exactly, returning the captured placeholders.
    pub fn matches(&self, path: &[String]) -> Option<PathParams> {
        if path.len() != self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (segment, actual) in self.segments.iter().zip(path) {
            match segment {
                Segment::Literal(text) if text.eq_ignore_ascii_case(actual) => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), actual.clone());
                }
            }
        }
        Some(PathParams(params))
    }
}
