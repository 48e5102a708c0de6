//! schema model
//!
//! typed view of an introspection document: type references as a sum type,
//! field and argument specs, and a name-indexed catalog of schema types.

use crate::error::{Error, Result};
use crate::graphql::GraphQlResponse;
use crate::operation::OperationKind;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// kind of the named type at the end of a wrapper chain
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LeafKind {
    Scalar,
    Object,
    Enum,
    InputObject,
    Union,
    /// any kind outside the supported set (`INTERFACE`, or something newer)
    Other(String),
}

impl LeafKind {
    /// map an introspection `kind` string
    pub fn from_kind(kind: &str) -> Self {
        match kind {
            "SCALAR" => LeafKind::Scalar,
            "OBJECT" => LeafKind::Object,
            "ENUM" => LeafKind::Enum,
            "INPUT_OBJECT" => LeafKind::InputObject,
            "UNION" => LeafKind::Union,
            other => LeafKind::Other(other.to_string()),
        }
    }

    /// introspection `kind` string
    pub fn as_str(&self) -> &str {
        match self {
            LeafKind::Scalar => "SCALAR",
            LeafKind::Object => "OBJECT",
            LeafKind::Enum => "ENUM",
            LeafKind::InputObject => "INPUT_OBJECT",
            LeafKind::Union => "UNION",
            LeafKind::Other(kind) => kind,
        }
    }
}

impl fmt::Display for LeafKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// one occurrence of a schema type: a named leaf inside zero or more
/// non-null/list wrappers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Named { kind: LeafKind, name: String },
    NonNull(Box<TypeRef>),
    List(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(kind: LeafKind, name: impl Into<String>) -> Self {
        TypeRef::Named {
            kind,
            name: name.into(),
        }
    }

    pub fn scalar(name: impl Into<String>) -> Self {
        Self::named(LeafKind::Scalar, name)
    }

    pub fn object(name: impl Into<String>) -> Self {
        Self::named(LeafKind::Object, name)
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::named(LeafKind::Enum, name)
    }

    pub fn input_object(name: impl Into<String>) -> Self {
        Self::named(LeafKind::InputObject, name)
    }

    pub fn union(name: impl Into<String>) -> Self {
        Self::named(LeafKind::Union, name)
    }

    pub fn non_null(inner: TypeRef) -> Self {
        TypeRef::NonNull(Box::new(inner))
    }

    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    /// the leaf kind and name reached by unwrapping every wrapper
    pub fn leaf(&self) -> (&LeafKind, &str) {
        match self {
            TypeRef::Named { kind, name } => (kind, name),
            TypeRef::NonNull(inner) | TypeRef::List(inner) => inner.leaf(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::signature::render_type_signature(self))
    }
}

/// argument of a field, or a field of an input object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgSpec {
    pub name: String,
    pub ty: TypeRef,
}

impl ArgSpec {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// field of an object or root operation type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub ty: TypeRef,
    /// arguments in declaration order
    pub args: Vec<ArgSpec>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            args: Vec::new(),
        }
    }

    pub fn with_arg(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.args.push(ArgSpec::new(name, ty));
        self
    }
}

/// named schema type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub kind: LeafKind,
    pub name: String,
    /// output fields (objects and interfaces)
    pub fields: Vec<FieldSpec>,
    /// input fields (input objects)
    pub input_fields: Vec<ArgSpec>,
}

impl CatalogEntry {
    pub fn new(kind: LeafKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            fields: Vec::new(),
            input_fields: Vec::new(),
        }
    }

    pub fn object(name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            fields,
            ..Self::new(LeafKind::Object, name)
        }
    }
}

/// name-indexed schema types plus the root operation type names
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: BTreeMap<String, CatalogEntry>,
    roots: BTreeMap<OperationKind, String>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// add or replace a type
    pub fn insert(&mut self, entry: CatalogEntry) {
        self.types.insert(entry.name.clone(), entry);
    }

    /// override the type name used for a root operation kind
    pub fn with_root(mut self, kind: OperationKind, name: impl Into<String>) -> Self {
        self.roots.insert(kind, name.into());
        self
    }

    /// look up a type by name
    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.types.get(name)
    }

    /// name of the root type for a kind (`Query`, `Mutation`, `Subscription` by default)
    pub fn root_name(&self, kind: OperationKind) -> &str {
        self.roots
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_else(|| kind.suffix())
    }

    /// root type for a kind, if the schema declares it
    pub fn root(&self, kind: OperationKind) -> Option<&CatalogEntry> {
        self.get(self.root_name(kind))
    }

    /// root types present in the schema, in query/mutation/subscription order
    pub fn roots(&self) -> impl Iterator<Item = (OperationKind, &CatalogEntry)> + '_ {
        OperationKind::ALL
            .into_iter()
            .filter_map(move |kind| self.root(kind).map(|entry| (kind, entry)))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// reject any root, type, field, or argument name outside the graphql
    /// name grammar `[_A-Za-z][_0-9A-Za-z]*`
    ///
    /// field names become file names, so this runs before anything is written.
    pub fn check_names(&self) -> Result<()> {
        for root in self.roots.values() {
            check_name(root)?;
        }
        for entry in self.types.values() {
            check_name(&entry.name)?;
            for field in &entry.fields {
                check_name(&field.name)?;
                check_name(field.ty.leaf().1)?;
                check_arg_names(&field.args)?;
            }
            check_arg_names(&entry.input_fields)?;
        }
        Ok(())
    }

    /// build a catalog from introspection json, bare or inside a graphql response
    pub fn from_introspection(text: &str) -> Result<Self> {
        let document: IntrospectionDocument = serde_json::from_str(text)?;
        let schema = match document {
            IntrospectionDocument::Bare(data) => data.schema,
            IntrospectionDocument::Envelope(response) => {
                if response.has_errors() {
                    let message = response
                        .errors
                        .first()
                        .map(|err| err.message.clone())
                        .unwrap_or_else(|| "introspection error".to_string());
                    return Err(Error::GraphQl {
                        status: None,
                        errors: response.errors,
                        body: text.to_string(),
                        message,
                    });
                }
                response
                    .data
                    .ok_or_else(|| Error::GraphQl {
                        status: None,
                        errors: Vec::new(),
                        body: text.to_string(),
                        message: "introspection response has no data".to_string(),
                    })?
                    .schema
            }
        };
        Self::from_raw(schema)
    }

    /// build a catalog from sdl text
    pub fn from_sdl(text: &str) -> Result<Self> {
        crate::sdl::catalog_from_sdl(text)
    }

    fn from_raw(schema: RawSchema) -> Result<Self> {
        let mut catalog = TypeCatalog::new();
        for (kind, root) in [
            (OperationKind::Query, schema.query_type),
            (OperationKind::Mutation, schema.mutation_type),
            (OperationKind::Subscription, schema.subscription_type),
        ] {
            if let Some(root) = root {
                catalog.roots.insert(kind, root.name);
            }
        }

        for raw in schema.types {
            let mut entry = CatalogEntry::new(LeafKind::from_kind(&raw.kind), raw.name);
            for field in raw.fields.unwrap_or_default() {
                entry.fields.push(FieldSpec {
                    name: field.name,
                    ty: TypeRef::try_from(field.ty)?,
                    args: convert_args(field.args)?,
                });
            }
            entry.input_fields = convert_args(raw.input_fields.unwrap_or_default())?;
            catalog.insert(entry);
        }

        catalog.check_names()?;
        Ok(catalog)
    }
}

/// true when `name` matches `[_A-Za-z][_0-9A-Za-z]*`
pub(crate) fn is_graphql_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

fn check_name(name: &str) -> Result<()> {
    if is_graphql_name(name) {
        Ok(())
    } else {
        Err(Error::Parse(format!("invalid graphql name {name:?}")))
    }
}

fn check_arg_names(args: &[ArgSpec]) -> Result<()> {
    for arg in args {
        check_name(&arg.name)?;
        check_name(arg.ty.leaf().1)?;
    }
    Ok(())
}

fn convert_args(args: Vec<RawInputValue>) -> Result<Vec<ArgSpec>> {
    args.into_iter()
        .map(|arg| Ok(ArgSpec::new(arg.name, TypeRef::try_from(arg.ty)?)))
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IntrospectionDocument {
    Bare(SchemaData),
    Envelope(GraphQlResponse<SchemaData>),
}

#[derive(Debug, Deserialize)]
struct SchemaData {
    #[serde(rename = "__schema")]
    schema: RawSchema,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSchema {
    #[serde(default)]
    query_type: Option<RawNamed>,
    #[serde(default)]
    mutation_type: Option<RawNamed>,
    #[serde(default)]
    subscription_type: Option<RawNamed>,
    types: Vec<RawType>,
}

#[derive(Debug, Deserialize)]
struct RawNamed {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawType {
    kind: String,
    name: String,
    #[serde(default)]
    fields: Option<Vec<RawField>>,
    #[serde(default)]
    input_fields: Option<Vec<RawInputValue>>,
}

#[derive(Debug, Deserialize)]
struct RawField {
    name: String,
    #[serde(rename = "type")]
    ty: RawTypeRef,
    #[serde(default)]
    args: Vec<RawInputValue>,
}

#[derive(Debug, Deserialize)]
struct RawInputValue {
    name: String,
    #[serde(rename = "type")]
    ty: RawTypeRef,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTypeRef {
    kind: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    of_type: Option<Box<RawTypeRef>>,
}

impl TryFrom<RawTypeRef> for TypeRef {
    type Error = Error;

    fn try_from(raw: RawTypeRef) -> Result<Self> {
        match raw.kind.as_str() {
            "NON_NULL" | "LIST" => {
                let inner = raw.of_type.ok_or_else(|| {
                    Error::InvalidTypeRef(format!("{} without ofType", raw.kind))
                })?;
                let inner = Box::new(TypeRef::try_from(*inner)?);
                if raw.kind == "NON_NULL" {
                    Ok(TypeRef::NonNull(inner))
                } else {
                    Ok(TypeRef::List(inner))
                }
            }
            kind => {
                let name = raw
                    .name
                    .ok_or_else(|| Error::InvalidTypeRef(format!("{kind} without name")))?;
                Ok(TypeRef::named(LeafKind::from_kind(kind), name))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN_SCHEMA: &str = r#"{
        "__schema": {
            "queryType": { "name": "Query" },
            "mutationType": null,
            "types": [
                {
                    "kind": "OBJECT",
                    "name": "Query",
                    "fields": [
                        {
                            "name": "token",
                            "args": [
                                {
                                    "name": "input",
                                    "type": {
                                        "kind": "NON_NULL",
                                        "name": null,
                                        "ofType": { "kind": "INPUT_OBJECT", "name": "TokenInput", "ofType": null }
                                    }
                                }
                            ],
                            "type": { "kind": "OBJECT", "name": "Token", "ofType": null }
                        }
                    ],
                    "inputFields": null
                },
                {
                    "kind": "INPUT_OBJECT",
                    "name": "TokenInput",
                    "fields": null,
                    "inputFields": [
                        { "name": "id", "type": { "kind": "SCALAR", "name": "ID" } }
                    ]
                },
                { "kind": "SCALAR", "name": "ID" }
            ]
        }
    }"#;

    #[test]
    fn test_from_introspection_bare() {
        let catalog = TypeCatalog::from_introspection(TOKEN_SCHEMA).unwrap();
        assert_eq!(catalog.len(), 3);

        let query = catalog.root(OperationKind::Query).unwrap();
        assert_eq!(query.fields[0].name, "token");
        assert_eq!(
            query.fields[0].args[0].ty,
            TypeRef::non_null(TypeRef::input_object("TokenInput"))
        );
        assert!(catalog.root(OperationKind::Mutation).is_none());

        let input = catalog.get("TokenInput").unwrap();
        assert_eq!(input.kind, LeafKind::InputObject);
        assert_eq!(input.input_fields[0].ty, TypeRef::scalar("ID"));
    }

    #[test]
    fn test_from_introspection_envelope() {
        let text = format!("{{\"data\": {}}}", TOKEN_SCHEMA);
        let catalog = TypeCatalog::from_introspection(&text).unwrap();
        assert!(catalog.get("Query").is_some());
    }

    #[test]
    fn test_from_introspection_errors() {
        let text = r#"{"data": null, "errors": [{"message": "introspection disabled"}]}"#;
        let err = TypeCatalog::from_introspection(text).unwrap_err();
        assert!(matches!(err, Error::GraphQl { ref message, .. } if message == "introspection disabled"));
    }

    #[test]
    fn test_custom_root_names() {
        let text = r#"{
            "__schema": {
                "queryType": { "name": "RootQuery" },
                "types": [ { "kind": "OBJECT", "name": "RootQuery", "fields": [] } ]
            }
        }"#;
        let catalog = TypeCatalog::from_introspection(text).unwrap();
        assert_eq!(catalog.root_name(OperationKind::Query), "RootQuery");
        assert_eq!(catalog.root_name(OperationKind::Mutation), "Mutation");
        let roots: Vec<_> = catalog.roots().map(|(kind, _)| kind).collect();
        assert_eq!(roots, vec![OperationKind::Query]);
    }

    #[test]
    fn test_wrapper_without_of_type_is_rejected() {
        let text = r#"{
            "__schema": {
                "types": [
                    {
                        "kind": "OBJECT",
                        "name": "Query",
                        "fields": [ { "name": "broken", "args": [], "type": { "kind": "LIST", "name": null } } ]
                    }
                ]
            }
        }"#;
        let err = TypeCatalog::from_introspection(text).unwrap_err();
        assert!(matches!(err, Error::InvalidTypeRef(_)));
    }

    #[test]
    fn test_path_like_field_name_is_rejected() {
        let text = r#"{
            "__schema": {
                "queryType": { "name": "Query" },
                "types": [
                    {
                        "kind": "OBJECT",
                        "name": "Query",
                        "fields": [ { "name": "../escaped", "args": [], "type": { "kind": "SCALAR", "name": "String" } } ]
                    },
                    { "kind": "SCALAR", "name": "String" }
                ]
            }
        }"#;
        let err = TypeCatalog::from_introspection(text).unwrap_err();
        assert!(matches!(err, Error::Parse(ref msg) if msg.contains("../escaped")));
        assert!(err.is_fetch_error());
    }

    #[test]
    fn test_check_names() {
        assert!(is_graphql_name("_private"));
        assert!(is_graphql_name("renameToken2"));
        assert!(!is_graphql_name(""));
        assert!(!is_graphql_name("2fa"));
        assert!(!is_graphql_name("a/b"));
        assert!(!is_graphql_name("caf\u{e9}"));

        let mut catalog = TypeCatalog::new();
        catalog.insert(CatalogEntry::object(
            "Query",
            vec![FieldSpec::new("token", TypeRef::scalar("String"))
                .with_arg("bad-arg", TypeRef::scalar("String"))],
        ));
        assert!(matches!(catalog.check_names(), Err(Error::Parse(_))));

        let renamed = TypeCatalog::new().with_root(OperationKind::Query, "Root Query");
        assert!(renamed.check_names().is_err());
    }

    #[test]
    fn test_unsupported_kind_is_kept() {
        let raw = RawTypeRef {
            kind: "INTERFACE".to_string(),
            name: Some("Node".to_string()),
            of_type: None,
        };
        let ty = TypeRef::try_from(raw).unwrap();
        assert_eq!(ty.leaf(), (&LeafKind::Other("INTERFACE".to_string()), "Node"));
    }

    #[test]
    fn test_leaf_unwraps_chain() {
        let ty = TypeRef::non_null(TypeRef::list(TypeRef::non_null(TypeRef::object("Foo"))));
        assert_eq!(ty.leaf(), (&LeafKind::Object, "Foo"));
        assert_eq!(ty.to_string(), "[Foo!]!");
    }
}
