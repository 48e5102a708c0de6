//! graphql operation generator
//!
//! this crate turns a graphql schema into one standalone operation document
//! per root field. fetch a catalog with [`SchemaFetcher`] (or load one with
//! [`load_schema_file`]), then write documents with [`Generator`]. the
//! `gql-opgen` binary wraps both steps.
//!
//! ## quick start
//!
//! ```no_run
//! use gql_opgen::{Generator, GeneratorConfig, SchemaFetcher};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GeneratorConfig::new("https://api.example.com/schema.json");
//! let catalog = SchemaFetcher::new(config)?.fetch().await?;
//! let written = Generator::new(&catalog).generate(Path::new("operations"))?;
//! println!("wrote {} documents", written.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## output
//!
//! each root field `token(input: TokenInput!): Token` becomes
//! `token.graphql`:
//!
//! ```text
//! query TokenQuery($input: TokenInput!) { token(input: $input) { id name network { id name } } }
//! ```
//!
//! [`scan_operations`] reads such a directory back for wrapper generators.

mod config;
mod document;
mod emitter;
mod error;
mod fetch;
mod graphql;
mod manifest;
mod operation;
mod schema;
mod sdl;
mod selection;
mod signature;
mod variables;

pub use config::{FetchMethod, GeneratorConfig, SCHEMA_URL_ENV};
pub use document::{render_selection, OperationDocument, RootSelection};
pub use emitter::{write_document, Generator};
pub use error::{Error, Result};
pub use fetch::{load_schema_file, SchemaFetcher, INTROSPECTION_QUERY};
pub use graphql::{GraphQlError, GraphQlLocation, GraphQlResponse};
pub use manifest::{scan_operations, OperationFile};
pub use operation::OperationKind;
pub use schema::{ArgSpec, CatalogEntry, FieldSpec, LeafKind, TypeCatalog, TypeRef};
pub use selection::{SelectionBuilder, SelectionNode, DEFAULT_MAX_DEPTH};
pub use signature::{render_args, render_type_signature};
pub use variables::{resolve_arg_descriptor, resolve_variables, VariableDescriptor, VariableMap};
