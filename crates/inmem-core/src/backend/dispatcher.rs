//! Route table mapping a method and a path pattern to a backend action.

use crate::matching::{PathParams, RoutePattern};
use crate::types::request::HttpMethod;

/// Operation performed for a matched route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ResetDb,
    GetConfig,
    UpdateConfig,
    GetCollection,
    GetRecord,
    Post,
    Put,
    Delete,
}

impl Action {
    /// Actions addressing a collection rather than a command.
    pub fn targets_collection(&self) -> bool {
        !matches!(
            self,
            Action::ResetDb | Action::GetConfig | Action::UpdateConfig
        )
    }

    /// Actions that modify a collection.
    pub fn is_write(&self) -> bool {
        matches!(self, Action::Post | Action::Put | Action::Delete)
    }
}

#[derive(Debug, Clone)]
struct RouteEntry {
    method: HttpMethod,
    pattern: RoutePattern,
    action: Action,
}

/// Matched route with the values of its placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub action: Action,
    pub params: PathParams,
}

impl Resolved {
    pub fn base(&self) -> &str {
        self.params.get("base").unwrap_or_default()
    }

    pub fn collection(&self) -> Option<&str> {
        self.params.get("collection")
    }

    pub fn id(&self) -> Option<&str> {
        self.params.get("id")
    }
}

/// Ordered route table; the first entry matching method and path wins.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    routes: Vec<RouteEntry>,
}

impl Dispatcher {
    /// Empty table.
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    pub fn route(mut self, method: HttpMethod, pattern: &str, action: Action) -> Self {
        self.routes.push(RouteEntry {
            method,
            pattern: RoutePattern::parse(pattern),
            action,
        });
        self
    }

    pub fn resolve(&self, method: HttpMethod, segments: &[String]) -> Option<Resolved> {
        self.routes
            .iter()
            .filter(|entry| entry.method == method)
            .find_map(|entry| {
                entry.pattern.matches(segments).map(|params| Resolved {
                    action: entry.action,
                    params,
                })
            })
    }
}

impl Default for Dispatcher {
    /// Commands first, then the collection routes.
    fn default() -> Self {
        use HttpMethod::{Delete, Get, Post, Put};

        Self::new()
            .route(Post, "commands/resetDb", Action::ResetDb)
            .route(Get, "commands/config", Action::GetConfig)
            .route(Post, "commands/config", Action::UpdateConfig)
            .route(Get, "{base}/{collection}", Action::GetCollection)
            .route(Get, "{base}/{collection}/{id}", Action::GetRecord)
            .route(Post, "{base}/{collection}", Action::Post)
            .route(Post, "{base}/{collection}/{id}", Action::Post)
            .route(Put, "{base}/{collection}/{id}", Action::Put)
            .route(Delete, "{base}/{collection}/{id}", Action::Delete)
    }
}
