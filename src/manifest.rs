//! generated document directory
//!
//! reads an output directory back as the list of operations a wrapper
//! generator binds: one entry per `<field>.graphql` file, in file-name order.

use crate::error::{Error, Result};
use crate::operation::OperationKind;
use graphql_parser::query::{parse_query, Definition, OperationDefinition};
use std::fs;
use std::path::{Path, PathBuf};

/// one emitted operation document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationFile {
    /// root field name, taken from the file stem
    pub field_name: String,
    pub kind: OperationKind,
    /// operation identifier declared in the document, e.g. `TokenQuery`
    pub operation_name: String,
    pub path: PathBuf,
    pub document: String,
}

/// list the operation documents in `dir`
pub fn scan_operations(dir: &Path) -> Result<Vec<OperationFile>> {
    let read_err = |source: std::io::Error| Error::FileRead {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if path.extension().is_some_and(|ext| ext == "graphql") {
            paths.push(path);
        }
    }
    paths.sort();

    paths.into_iter().map(read_operation).collect()
}

fn read_operation(path: PathBuf) -> Result<OperationFile> {
    let document = fs::read_to_string(&path).map_err(|source| Error::FileRead {
        path: path.clone(),
        source,
    })?;
    let field_name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| Error::Parse(format!("non-utf8 file name: {}", path.display())))?
        .to_string();

    let (kind, name) = operation_header(&document, &path)?;

    Ok(OperationFile {
        operation_name: name.unwrap_or_else(|| kind.operation_name(&field_name)),
        field_name,
        kind,
        path,
        document,
    })
}

fn operation_header(document: &str, path: &Path) -> Result<(OperationKind, Option<String>)> {
    let parsed = parse_query::<String>(document)
        .map_err(|err| Error::Parse(format!("{}: {err}", path.display())))?;
    let mut operations = parsed.definitions.iter().filter_map(|def| match def {
        Definition::Operation(op) => Some(op),
        Definition::Fragment(_) => None,
    });

    let header = match (operations.next(), operations.next()) {
        (Some(op), None) => match op {
            OperationDefinition::Query(query) => (OperationKind::Query, query.name.clone()),
            OperationDefinition::Mutation(mutation) => {
                (OperationKind::Mutation, mutation.name.clone())
            }
            OperationDefinition::Subscription(subscription) => {
                (OperationKind::Subscription, subscription.name.clone())
            }
            OperationDefinition::SelectionSet(_) => (OperationKind::Query, None),
        },
        _ => {
            return Err(Error::Parse(format!(
                "{}: expected exactly one operation",
                path.display()
            )))
        }
    };
    Ok(header)
}
