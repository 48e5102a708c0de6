//! error types
//!
//! structured errors for schema fetch, type resolution, and document output.
//! every variant is fatal to a generator run.

use crate::graphql::GraphQlError;
use std::fmt;
use std::path::PathBuf;

/// library result type
pub type Result<T> = std::result::Result<T, Error>;

/// error type for the generator
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url error: {0}")]
    Url(#[from] url::ParseError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("graphql error: {message}")]
    GraphQl {
        /// http status if available
        status: Option<u16>,
        /// graphql error list
        errors: Vec<GraphQlError>,
        /// raw response body
        body: String,
        /// top-level message
        message: String,
    },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid type reference: {0}")]
    InvalidTypeRef(String),

    #[error("unknown type kind {kind} for {name}")]
    UnknownKind {
        /// kind string as found in the schema
        kind: String,
        /// name carried by the offending type, or `<unnamed>`
        name: String,
    },

    #[error("failed to read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// true if the error looks like an auth failure
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::GraphQl { status: Some(401 | 403), .. })
            || matches!(self, Error::Http(err) if err.status() == Some(reqwest::StatusCode::UNAUTHORIZED))
    }

    /// true if the error happened before the schema catalog was available
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            Error::Http(_)
                | Error::Url(_)
                | Error::Json(_)
                | Error::GraphQl { .. }
                | Error::Parse(_)
                | Error::FileRead { .. }
                | Error::InvalidTypeRef(_)
        )
    }
}

impl fmt::Display for GraphQlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}
