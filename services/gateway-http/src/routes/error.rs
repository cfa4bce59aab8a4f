use super::RouteMethod;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouteTableError {
    #[error("Route table is empty")]
    Empty,

    #[error("Route {route}: path {path} must start with '/'")]
    InvalidPath { route: String, path: String },

    #[error("Route {route}: malformed placeholder segment {segment}")]
    InvalidPlaceholder { route: String, segment: String },

    #[error("Route {route}: placeholder {{{name}}} appears more than once")]
    DuplicatePlaceholder { route: String, name: String },

    #[error("Route {route}: backend placeholder {{{name}}} is not captured by the route path")]
    UnknownPlaceholder { route: String, name: String },

    #[error("Route {route}: required query key cannot be empty")]
    EmptyQueryKey { route: String },

    #[error("Duplicate route {method} {path}")]
    DuplicateRoute { method: RouteMethod, path: String },

    #[error("Failed to read route file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse route file: {0}")]
    Parse(#[from] serde_json::Error),
}
