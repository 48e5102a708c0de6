//! schema fetcher
//!
//! retrieves an introspection document over http, or reads one from disk,
//! and turns it into a [`TypeCatalog`].

use crate::config::{FetchMethod, GeneratorConfig};
use crate::error::{Error, Result};
use crate::schema::TypeCatalog;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// standard introspection query, posted when [`FetchMethod::Post`] is set
pub const INTROSPECTION_QUERY: &str = r#"
query IntrospectionQuery {
  __schema {
    queryType { name }
    mutationType { name }
    subscriptionType { name }
    types {
      kind
      name
      fields(includeDeprecated: true) {
        name
        args { name type { ...TypeRef } }
        type { ...TypeRef }
      }
      inputFields { name type { ...TypeRef } }
    }
  }
}

fragment TypeRef on __Type {
  kind
  name
  ofType {
    kind
    name
    ofType {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
            ofType {
              kind
              name
              ofType {
                kind
                name
              }
            }
          }
        }
      }
    }
  }
}
"#;

/// fetches introspection documents for a configured endpoint
#[derive(Clone)]
pub struct SchemaFetcher {
    config: Arc<GeneratorConfig>,
    http: reqwest::Client,
}

impl SchemaFetcher {
    /// create a new fetcher
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;

        let http = match &config.http_client {
            Some(http) => http.clone(),
            None => {
                let mut headers = HeaderMap::new();
                if let Some(token) = &config.token {
                    headers.insert(
                        AUTHORIZATION,
                        HeaderValue::from_str(&format!("Bearer {token}")).map_err(|err| {
                            Error::Config(format!("invalid api token header value: {err}"))
                        })?,
                    );
                }
                headers.extend(config.extra_headers.clone());

                reqwest::Client::builder()
                    .default_headers(headers)
                    .user_agent(config.user_agent.clone())
                    .timeout(config.timeout)
                    .build()?
            }
        };

        Ok(Self {
            config: Arc::new(config),
            http,
        })
    }

    /// access the fetcher configuration
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// fetch the schema and build the catalog
    pub async fn fetch(&self) -> Result<TypeCatalog> {
        self.fetch_with(|url, body| async move {
            let request = match body {
                Some(body) => self.http.post(url).json(&body),
                None => self.http.get(url),
            };
            let response = request.send().await?;
            let status = response.status();
            let text = response.text().await?;
            Ok((status, text))
        })
        .await
    }

    pub(crate) async fn fetch_with<F, Fut>(&self, send: F) -> Result<TypeCatalog>
    where
        F: FnOnce(Url, Option<serde_json::Value>) -> Fut,
        Fut: Future<Output = Result<(StatusCode, String)>>,
    {
        let url = self.config.schema_url.clone();
        let body = match self.config.method {
            FetchMethod::Get => None,
            FetchMethod::Post => Some(serde_json::json!({
                "query": INTROSPECTION_QUERY,
                "operationName": "IntrospectionQuery",
            })),
        };

        info!(url = %url, method = ?self.config.method, "fetching schema");
        let (status, text) = send(url, body).await?;
        let catalog = parse_introspection_response(status, text)?;
        debug!(types = catalog.len(), "schema catalog ready");
        Ok(catalog)
    }
}

fn parse_introspection_response(status: StatusCode, text: String) -> Result<TypeCatalog> {
    if !status.is_success() {
        return Err(Error::GraphQl {
            status: Some(status.as_u16()),
            errors: Vec::new(),
            body: text,
            message: format!("schema http error: {}", status),
        });
    }

    TypeCatalog::from_introspection(&text).map_err(|err| match err {
        Error::GraphQl {
            errors,
            body,
            message,
            ..
        } => Error::GraphQl {
            status: Some(status.as_u16()),
            errors,
            body,
            message,
        },
        other => other,
    })
}

/// load a catalog from a local file: `.json` is read as introspection,
/// anything else as sdl
pub fn load_schema_file(path: &Path) -> Result<TypeCatalog> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), "loading schema file");
    if path.extension().is_some_and(|ext| ext == "json") {
        TypeCatalog::from_introspection(&text)
    } else {
        TypeCatalog::from_sdl(&text)
    }
}
