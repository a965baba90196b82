//! Response type.

use serde_json::Value;
use std::collections::HashMap;

/// Status codes produced by the backend.
pub mod status {
    pub const OK: u16 = 200;
    pub const CREATED: u16 = 201;
    pub const NO_CONTENT: u16 = 204;
    pub const BAD_REQUEST: u16 = 400;
    pub const NOT_FOUND: u16 = 404;
    pub const CONFLICT: u16 = 409;
}

/// Response produced by the backend or by a passthrough forwarder.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    pub headers: HashMap<String, String>,
    /// JSON body, `None` for bodiless responses such as 204
    pub body: Option<Value>,
}

impl Response {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Payload of an encapsulated body (`{"data": ...}`).
    pub fn data(&self) -> Option<&Value> {
        self.body.as_ref().and_then(|b| b.get("data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(status::OK, true)]
    #[case(status::CREATED, true)]
    #[case(status::NO_CONTENT, true)]
    #[case(status::BAD_REQUEST, false)]
    #[case(status::NOT_FOUND, false)]
    #[case(status::CONFLICT, false)]
    fn test_is_success(#[case] code: u16, #[case] expected: bool) {
        assert_eq!(Response::new(code).is_success(), expected);
    }

    #[rstest]
    fn test_data() {
        let response = Response::new(status::OK).with_body(json!({"data": [1, 2]}));
        assert_eq!(response.data(), Some(&json!([1, 2])));
        assert_eq!(Response::new(status::NO_CONTENT).data(), None);
    }
}
