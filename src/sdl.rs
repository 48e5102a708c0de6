//! sdl schemas
//!
//! builds a [`TypeCatalog`] from schema definition language text, so a
//! checked-in `schema.graphql` can stand in for a live introspection fetch.

use crate::error::{Error, Result};
use crate::operation::OperationKind;
use crate::schema::{ArgSpec, CatalogEntry, FieldSpec, LeafKind, TypeCatalog, TypeRef};
use graphql_parser::schema::{parse_schema, Definition, Document, Type, TypeDefinition};
use std::collections::BTreeMap;

const BUILTIN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

pub(crate) fn catalog_from_sdl(text: &str) -> Result<TypeCatalog> {
    let document = parse_schema::<String>(text).map_err(|err| Error::Parse(err.to_string()))?;
    let kinds = collect_kinds(&document);

    let mut catalog = TypeCatalog::new();
    for def in &document.definitions {
        match def {
            Definition::SchemaDefinition(schema) => {
                for (kind, root) in [
                    (OperationKind::Query, &schema.query),
                    (OperationKind::Mutation, &schema.mutation),
                    (OperationKind::Subscription, &schema.subscription),
                ] {
                    if let Some(root) = root {
                        catalog = catalog.with_root(kind, root.clone());
                    }
                }
            }
            Definition::TypeDefinition(ty) => {
                let entry = match ty {
                    TypeDefinition::Object(obj) => CatalogEntry {
                        fields: convert_fields(&obj.fields, &kinds)?,
                        ..CatalogEntry::new(LeafKind::Object, obj.name.clone())
                    },
                    TypeDefinition::Interface(iface) => CatalogEntry {
                        fields: convert_fields(&iface.fields, &kinds)?,
                        ..CatalogEntry::new(LeafKind::Other("INTERFACE".to_string()), iface.name.clone())
                    },
                    TypeDefinition::InputObject(input) => CatalogEntry {
                        input_fields: convert_inputs(&input.fields, &kinds)?,
                        ..CatalogEntry::new(LeafKind::InputObject, input.name.clone())
                    },
                    TypeDefinition::Enum(enum_ty) => {
                        CatalogEntry::new(LeafKind::Enum, enum_ty.name.clone())
                    }
                    TypeDefinition::Union(union_ty) => {
                        CatalogEntry::new(LeafKind::Union, union_ty.name.clone())
                    }
                    TypeDefinition::Scalar(scalar_ty) => {
                        CatalogEntry::new(LeafKind::Scalar, scalar_ty.name.clone())
                    }
                };
                catalog.insert(entry);
            }
            _ => continue,
        }
    }

    for name in BUILTIN_SCALARS {
        if catalog.get(name).is_none() {
            catalog.insert(CatalogEntry::new(LeafKind::Scalar, name));
        }
    }

    catalog.check_names()?;
    Ok(catalog)
}

fn collect_kinds(document: &Document<'_, String>) -> BTreeMap<String, LeafKind> {
    let mut kinds: BTreeMap<String, LeafKind> = BUILTIN_SCALARS
        .iter()
        .map(|name| (name.to_string(), LeafKind::Scalar))
        .collect();

    for def in &document.definitions {
        if let Definition::TypeDefinition(ty) = def {
            let (name, kind) = match ty {
                TypeDefinition::Object(obj) => (&obj.name, LeafKind::Object),
                TypeDefinition::Interface(iface) => {
                    (&iface.name, LeafKind::Other("INTERFACE".to_string()))
                }
                TypeDefinition::InputObject(input) => (&input.name, LeafKind::InputObject),
                TypeDefinition::Enum(enum_ty) => (&enum_ty.name, LeafKind::Enum),
                TypeDefinition::Union(union_ty) => (&union_ty.name, LeafKind::Union),
                TypeDefinition::Scalar(scalar_ty) => (&scalar_ty.name, LeafKind::Scalar),
            };
            kinds.insert(name.clone(), kind);
        }
    }

    kinds
}

fn convert_fields(
    fields: &[graphql_parser::schema::Field<'_, String>],
    kinds: &BTreeMap<String, LeafKind>,
) -> Result<Vec<FieldSpec>> {
    fields
        .iter()
        .map(|field| {
            Ok(FieldSpec {
                name: field.name.clone(),
                ty: convert_type(&field.field_type, kinds)?,
                args: convert_inputs(&field.arguments, kinds)?,
            })
        })
        .collect()
}

fn convert_inputs(
    inputs: &[graphql_parser::schema::InputValue<'_, String>],
    kinds: &BTreeMap<String, LeafKind>,
) -> Result<Vec<ArgSpec>> {
    inputs
        .iter()
        .map(|input| Ok(ArgSpec::new(input.name.clone(), convert_type(&input.value_type, kinds)?)))
        .collect()
}

fn convert_type(ty: &Type<'_, String>, kinds: &BTreeMap<String, LeafKind>) -> Result<TypeRef> {
    match ty {
        Type::NamedType(name) => {
            let kind = kinds
                .get(name)
                .cloned()
                .ok_or_else(|| Error::Parse(format!("undefined type {name}")))?;
            Ok(TypeRef::named(kind, name.clone()))
        }
        Type::NonNullType(inner) => Ok(TypeRef::non_null(convert_type(inner, kinds)?)),
        Type::ListType(inner) => Ok(TypeRef::list(convert_type(inner, kinds)?)),
    }
}
