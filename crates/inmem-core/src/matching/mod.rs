//! Request URL parsing, route patterns and query filtering.

mod query;
mod url;

pub use query::{parse_query_string, QueryFilter};
pub use url::{parse_url, request_path, ParsedUrl, PathParams, RoutePattern, Segment};
