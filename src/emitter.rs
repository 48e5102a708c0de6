//! document emission
//!
//! walks the query, mutation, and subscription roots in order and writes one
//! `<field>.graphql` file per root field. runs strictly sequentially; the
//! first failure stops the run and files already written stay on disk.

use crate::document::OperationDocument;
use crate::error::{Error, Result};
use crate::schema::{is_graphql_name, TypeCatalog};
use crate::selection::{SelectionBuilder, DEFAULT_MAX_DEPTH};
use crate::signature::{render_args, render_type_signature};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// generates operation documents from a catalog
#[derive(Debug, Clone, Copy)]
pub struct Generator<'a> {
    catalog: &'a TypeCatalog,
    max_depth: usize,
}

impl<'a> Generator<'a> {
    pub fn new(catalog: &'a TypeCatalog) -> Self {
        Self {
            catalog,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// set the selection depth limit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn selections(&self) -> SelectionBuilder<'a> {
        SelectionBuilder::new(self.catalog).with_max_depth(self.max_depth)
    }

    /// build every document in emission order without writing anything
    pub fn documents(&self) -> Result<Vec<OperationDocument>> {
        let selections = self.selections();
        let mut docs = Vec::new();
        for (kind, root) in self.catalog.roots() {
            for field in &root.fields {
                docs.push(OperationDocument::build(kind, field, &selections)?);
            }
        }
        Ok(docs)
    }

    /// one line per root field: `query token(input: TokenInput!): Token`
    pub fn signatures(&self) -> Vec<String> {
        self.catalog
            .roots()
            .flat_map(|(kind, root)| {
                root.fields.iter().map(move |field| {
                    format!(
                        "{} {}{}: {}",
                        kind.keyword(),
                        field.name,
                        render_args(&field.args),
                        render_type_signature(&field.ty)
                    )
                })
            })
            .collect()
    }

    /// write every document into `out_dir`, returning the written paths
    pub fn generate(&self, out_dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(out_dir).map_err(|source| Error::FileWrite {
            path: out_dir.to_path_buf(),
            source,
        })?;

        let selections = self.selections();
        let mut written = Vec::new();
        for (kind, root) in self.catalog.roots() {
            debug!(kind = %kind, root = %root.name, fields = root.fields.len(), "emitting root type");
            for field in &root.fields {
                debug!(
                    "{} {}{}: {}",
                    kind,
                    field.name,
                    render_args(&field.args),
                    render_type_signature(&field.ty)
                );
                let doc = OperationDocument::build(kind, field, &selections)?;
                let path = write_document(out_dir, &doc)?;
                if written.contains(&path) {
                    warn!(
                        operation = %doc.operation_name(),
                        path = %path.display(),
                        "root field name collides with an earlier one; earlier document overwritten"
                    );
                } else {
                    written.push(path);
                }
            }
        }

        info!(count = written.len(), out_dir = %out_dir.display(), "generated operation documents");
        Ok(written)
    }
}

/// write one document as `<out_dir>/<field>.graphql`
///
/// fails with [`Error::Parse`] when the field name is not a graphql name, so
/// the file always lands directly inside `out_dir`.
pub fn write_document(out_dir: &Path, doc: &OperationDocument) -> Result<PathBuf> {
    if !is_graphql_name(&doc.field_name) {
        return Err(Error::Parse(format!(
            "invalid graphql name {:?}",
            doc.field_name
        )));
    }
    let path = out_dir.join(doc.file_name());
    fs::write(&path, doc.render()).map_err(|source| Error::FileWrite {
        path: path.clone(),
        source,
    })?;
    info!(operation = %doc.operation_name(), path = %path.display(), "wrote document");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CatalogEntry, FieldSpec, LeafKind, TypeRef};

    fn catalog() -> TypeCatalog {
        let mut catalog = TypeCatalog::new();
        catalog.insert(CatalogEntry::object(
            "Query",
            vec![
                FieldSpec::new("token", TypeRef::object("Token"))
                    .with_arg("input", TypeRef::non_null(TypeRef::input_object("TokenInput"))),
                FieldSpec::new("version", TypeRef::scalar("String")),
            ],
        ));
        catalog.insert(CatalogEntry::object(
            "Mutation",
            vec![FieldSpec::new("burn", TypeRef::non_null(TypeRef::scalar("Boolean")))
                .with_arg("amount", TypeRef::non_null(TypeRef::scalar("Int")))],
        ));
        catalog.insert(CatalogEntry::object(
            "Token",
            vec![
                FieldSpec::new("id", TypeRef::non_null(TypeRef::scalar("ID"))),
                FieldSpec::new("name", TypeRef::scalar("String")),
            ],
        ));
        catalog
    }

    #[test]
    fn test_documents_order() {
        let catalog = catalog();
        let docs = Generator::new(&catalog).documents().unwrap();
        let names: Vec<_> = docs.iter().map(|doc| doc.operation_name()).collect();
        assert_eq!(names, vec!["TokenQuery", "VersionQuery", "BurnMutation"]);
    }

    #[test]
    fn test_signatures() {
        let catalog = catalog();
        assert_eq!(
            Generator::new(&catalog).signatures(),
            vec![
                "query token(input: TokenInput!): Token",
                "query version: String",
                "mutation burn(amount: Int!): Boolean!",
            ]
        );
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn test_generate_writes_files() {
        let catalog = catalog();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("operations");

        let written = Generator::new(&catalog).generate(&out).unwrap();
        assert_eq!(written.len(), 3);
        assert_eq!(
            fs::read_to_string(out.join("token.graphql")).unwrap(),
            "query TokenQuery($input: TokenInput!) { token(input: $input) { id name } }\n"
        );
        assert_eq!(
            fs::read_to_string(out.join("burn.graphql")).unwrap(),
            "mutation BurnMutation($amount: Int!) { burn(amount: $amount) }\n"
        );
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn test_generate_is_idempotent() {
        let catalog = catalog();
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let generator = Generator::new(&catalog);

        let a = generator.generate(first.path()).unwrap();
        let b = generator.generate(second.path()).unwrap();
        for (left, right) in a.iter().zip(&b) {
            assert_eq!(left.file_name(), right.file_name());
            assert_eq!(fs::read(left).unwrap(), fs::read(right).unwrap());
        }
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn test_failure_keeps_earlier_files() {
        let mut catalog = catalog();
        catalog.insert(CatalogEntry::object(
            "Subscription",
            vec![FieldSpec::new("watch", TypeRef::object("Token")).with_arg(
                "node",
                TypeRef::named(LeafKind::Other("INTERFACE".to_string()), "Node"),
            )],
        ));
        let dir = tempfile::tempdir().unwrap();

        let err = Generator::new(&catalog).generate(dir.path()).unwrap_err();
        assert!(matches!(err, Error::UnknownKind { .. }));
        assert!(dir.path().join("token.graphql").exists());
        assert!(dir.path().join("burn.graphql").exists());
        assert!(!dir.path().join("watch.graphql").exists());
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn test_generate_refuses_path_like_field() {
        let mut catalog = TypeCatalog::new();
        catalog.insert(CatalogEntry::object(
            "Query",
            vec![
                FieldSpec::new("version", TypeRef::scalar("String")),
                FieldSpec::new("../escaped", TypeRef::scalar("String")),
            ],
        ));
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("ops");

        let err = Generator::new(&catalog).generate(&out).unwrap_err();
        assert!(matches!(err, Error::Parse(ref msg) if msg.contains("../escaped")));
        assert!(out.join("version.graphql").exists());
        assert!(!dir.path().join("escaped.graphql").exists());
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn test_colliding_field_names_keep_last() {
        let mut catalog = TypeCatalog::new();
        catalog.insert(CatalogEntry::object(
            "Query",
            vec![FieldSpec::new("token", TypeRef::scalar("String"))],
        ));
        catalog.insert(CatalogEntry::object(
            "Subscription",
            vec![FieldSpec::new("token", TypeRef::scalar("String"))],
        ));
        let dir = tempfile::tempdir().unwrap();

        let written = Generator::new(&catalog).generate(dir.path()).unwrap();
        assert_eq!(written, vec![dir.path().join("token.graphql")]);
        assert_eq!(
            fs::read_to_string(&written[0]).unwrap(),
            "subscription TokenSubscription { token }\n"
        );
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn test_write_error() {
        let catalog = catalog();
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();

        let err = Generator::new(&catalog).generate(&blocker).unwrap_err();
        assert!(matches!(err, Error::FileWrite { .. }));
    }
}
