//! graphql response envelope
//!
//! the `{data, errors}` shape a graphql endpoint wraps an introspection
//! result in. only what schema loading reads is modelled.

use serde::Deserialize;

/// graphql response wrapper
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse<T> {
    /// introspection payload, null when the endpoint refused
    pub data: Option<T>,
    /// graphql errors array
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

impl<T> GraphQlResponse<T> {
    /// true if the response contains graphql errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// error entry reported alongside (or instead of) the schema
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    /// where in the introspection query the endpoint complained
    #[serde(default)]
    pub locations: Vec<GraphQlLocation>,
}

/// 1-based position in the introspection query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GraphQlLocation {
    pub line: u32,
    pub column: u32,
}
