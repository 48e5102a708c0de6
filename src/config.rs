//! generator configuration
//!
//! build a [`GeneratorConfig`] with the schema endpoint and optional
//! overrides, then pass it to [`crate::SchemaFetcher::new`].

use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;
use url::Url;

/// environment variable consulted by [`GeneratorConfig::from_env`]
pub const SCHEMA_URL_ENV: &str = "GQL_OPGEN_SCHEMA_URL";

/// how the introspection document is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMethod {
    /// `GET` an endpoint that serves introspection json directly
    #[default]
    Get,
    /// `POST` the standard introspection query to a graphql endpoint
    Post,
}

/// configuration for a generator run
#[derive(Clone)]
pub struct GeneratorConfig {
    /// original schema url input
    pub(crate) raw_schema_url: String,

    /// parsed schema endpoint
    pub(crate) schema_url: Url,

    /// whether the provided schema url parsed successfully
    pub(crate) schema_url_valid: bool,

    /// bearer token, if the endpoint needs one
    pub(crate) token: Option<String>,

    /// request method for the fetch
    pub(crate) method: FetchMethod,

    /// request timeout duration
    pub(crate) timeout: Duration,

    /// user agent string
    pub(crate) user_agent: String,

    /// additional headers to send with the fetch
    pub(crate) extra_headers: HeaderMap,

    /// prebuilt http client (takes precedence over token, headers, and timeout)
    pub(crate) http_client: Option<reqwest::Client>,
}

impl GeneratorConfig {
    /// create a configuration for a schema endpoint
    ///
    /// # example
    ///
    /// ```
    /// use gql_opgen::GeneratorConfig;
    ///
    /// let config = GeneratorConfig::new("https://api.example.com/graphql");
    /// ```
    pub fn new(schema_url: impl AsRef<str>) -> Self {
        let raw = schema_url.as_ref();

        let (schema_url, schema_url_valid) = match Url::parse(raw) {
            Ok(url) => (url, true),
            Err(_) => (placeholder_url(), false),
        };

        Self {
            raw_schema_url: raw.to_string(),
            schema_url,
            schema_url_valid,
            token: None,
            method: FetchMethod::Get,
            timeout: Duration::from_secs(30),
            user_agent: format!("gql-opgen/{} (Rust)", env!("CARGO_PKG_VERSION")),
            extra_headers: HeaderMap::new(),
            http_client: None,
        }
    }

    /// create a configuration from `GQL_OPGEN_SCHEMA_URL`
    pub fn from_env() -> Result<Self> {
        let url = std::env::var(SCHEMA_URL_ENV)
            .map_err(|_| Error::Config(format!("{SCHEMA_URL_ENV} is not set")))?;
        Ok(Self::new(url))
    }

    /// send `Authorization: Bearer <token>`
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// choose how the schema is requested
    ///
    /// default: [`FetchMethod::Get`]
    pub fn with_method(mut self, method: FetchMethod) -> Self {
        self.method = method;
        self
    }

    /// set the request timeout
    ///
    /// default: 30 seconds
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// set a custom user agent string
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// add a header to the fetch
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.extra_headers.insert(name, value);
        self
    }

    /// add a set of headers to the fetch
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.extra_headers.extend(headers);
        self
    }

    /// inject a prebuilt http client. token, headers, timeout, and user
    /// agent are then left to the caller.
    pub fn with_http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// schema endpoint
    pub fn schema_url(&self) -> &Url {
        &self.schema_url
    }

    /// validate the configuration
    pub(crate) fn validate(&self) -> Result<()> {
        if !self.schema_url_valid {
            return Err(Error::Config(format!(
                "invalid schema url: {}",
                self.raw_schema_url
            )));
        }

        if self.schema_url.scheme() != "http" && self.schema_url.scheme() != "https" {
            return Err(Error::Config(format!(
                "invalid url scheme: {}. must be http or https",
                self.schema_url.scheme()
            )));
        }

        if matches!(&self.token, Some(token) if token.is_empty()) {
            return Err(Error::Config("api token cannot be empty".to_string()));
        }

        Ok(())
    }
}

fn placeholder_url() -> Url {
    Url::parse("https://invalid.invalid").expect("static url parses")
}

impl std::fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("schema_url", &self.schema_url)
            .field("method", &self.method)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("extra_headers", &self.extra_headers.len())
            .field("http_client", &self.http_client.is_some())
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
