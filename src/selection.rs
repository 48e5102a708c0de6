//! selection sets
//!
//! expands a field's return type into the sub-fields a generated operation
//! requests. recursion depth counts object descents only; unwrapping a
//! non-null or list wrapper keeps the current level. there is no visited-set,
//! so self-referential types are cut off by the depth limit.

use crate::schema::{FieldSpec, LeafKind, TypeCatalog, TypeRef};
use tracing::warn;

/// deepest object level that still contributes fields
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// one entry of a selection set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionNode {
    /// scalar or enum field
    Field(String),
    /// object field with its own selection
    Group {
        name: String,
        children: Vec<SelectionNode>,
    },
}

impl SelectionNode {
    pub fn field(name: impl Into<String>) -> Self {
        SelectionNode::Field(name.into())
    }

    pub fn group(name: impl Into<String>, children: Vec<SelectionNode>) -> Self {
        SelectionNode::Group {
            name: name.into(),
            children,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SelectionNode::Field(name) | SelectionNode::Group { name, .. } => name,
        }
    }
}

/// builds selection trees against a catalog
#[derive(Debug, Clone, Copy)]
pub struct SelectionBuilder<'a> {
    catalog: &'a TypeCatalog,
    max_depth: usize,
}

impl<'a> SelectionBuilder<'a> {
    pub fn new(catalog: &'a TypeCatalog) -> Self {
        Self {
            catalog,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// selection for a root operation field. object children are spliced
    /// into the result directly rather than grouped under the field name.
    pub fn resolve_field(&self, field: &FieldSpec) -> Vec<SelectionNode> {
        self.resolve(&field.name, &field.ty, 0)
    }

    /// selection for a field named `name` of type `ty`, seen at `level`
    pub fn resolve(&self, name: &str, ty: &TypeRef, level: usize) -> Vec<SelectionNode> {
        let mut out = Vec::new();
        self.resolve_into(name, ty, level, &mut out);
        out
    }

    fn resolve_into(&self, name: &str, ty: &TypeRef, level: usize, out: &mut Vec<SelectionNode>) {
        if level > self.max_depth {
            return;
        }

        match ty {
            TypeRef::NonNull(inner) | TypeRef::List(inner) => {
                self.resolve_into(name, inner, level, out)
            }
            TypeRef::Named {
                kind: LeafKind::Scalar | LeafKind::Enum,
                ..
            } => out.push(SelectionNode::field(name)),
            TypeRef::Named {
                kind: LeafKind::Object,
                name: type_name,
            } => {
                let Some(entry) = self.catalog.get(type_name) else {
                    warn!(field = name, type_name = %type_name, "object type missing from catalog");
                    return;
                };

                let mut children = Vec::new();
                for field in &entry.fields {
                    self.resolve_into(&field.name, &field.ty, level + 1, &mut children);
                }

                if level == 0 {
                    out.extend(children);
                } else if !children.is_empty() {
                    out.push(SelectionNode::group(name, children));
                }
            }
            // unions, input objects, and unsupported kinds select nothing
            TypeRef::Named { .. } => {}
        }
    }
}
