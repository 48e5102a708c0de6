//! operation documents
//!
//! assembles one named operation per root field:
//! `query TokenQuery($input: TokenInput!) { token(input: $input) { id name } }`

use crate::error::Result;
use crate::operation::OperationKind;
use crate::schema::{FieldSpec, LeafKind, TypeCatalog};
use crate::selection::{SelectionBuilder, SelectionNode};
use crate::variables::{resolve_variables, VariableMap};

/// sub-selection of the root field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootSelection {
    /// scalar or enum root, selected bare
    Leaf,
    /// object root with its resolved fields
    Fields(Vec<SelectionNode>),
}

/// one generated operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDocument {
    pub kind: OperationKind,
    pub field_name: String,
    pub variables: VariableMap,
    pub selection: RootSelection,
}

impl OperationDocument {
    /// resolve variables and selection for a root field
    pub fn build(
        kind: OperationKind,
        field: &FieldSpec,
        selections: &SelectionBuilder<'_>,
    ) -> Result<Self> {
        let variables = resolve_variables(&field.args)?;
        let selection = match field.ty.leaf() {
            (LeafKind::Scalar | LeafKind::Enum, _) => RootSelection::Leaf,
            _ => RootSelection::Fields(selections.resolve_field(field)),
        };

        Ok(Self {
            kind,
            field_name: field.name.clone(),
            variables,
            selection,
        })
    }

    /// shorthand for [`OperationDocument::build`] with the default depth
    pub fn from_catalog(kind: OperationKind, field: &FieldSpec, catalog: &TypeCatalog) -> Result<Self> {
        Self::build(kind, field, &SelectionBuilder::new(catalog))
    }

    /// operation identifier, e.g. `TokenQuery`
    pub fn operation_name(&self) -> String {
        self.kind.operation_name(&self.field_name)
    }

    /// output file name, e.g. `token.graphql`
    pub fn file_name(&self) -> String {
        format!("{}.graphql", self.field_name)
    }

    /// document text, newline terminated
    pub fn render(&self) -> String {
        let mut out = format!("{} {}", self.kind.keyword(), self.operation_name());

        if !self.variables.is_empty() {
            let decls: Vec<String> = self
                .variables
                .iter()
                .map(|(name, descriptor)| format!("${}: {}", name, descriptor.declaration()))
                .collect();
            out.push_str(&format!("({})", decls.join(", ")));
        }

        out.push_str(" { ");
        out.push_str(&self.field_name);
        if !self.variables.is_empty() {
            let args: Vec<String> = self
                .variables
                .iter()
                .map(|(name, _)| format!("{name}: ${name}"))
                .collect();
            out.push_str(&format!("({})", args.join(", ")));
        }

        match &self.selection {
            RootSelection::Leaf => {}
            // keep the document valid when nothing was selectable
            RootSelection::Fields(nodes) if nodes.is_empty() => out.push_str(" { __typename }"),
            RootSelection::Fields(nodes) => {
                out.push(' ');
                out.push_str(&render_selection(nodes));
            }
        }

        out.push_str(" }\n");
        out
    }
}

/// render selection nodes as a braced set, e.g. `{ id network { id } }`
pub fn render_selection(nodes: &[SelectionNode]) -> String {
    let mut parts = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            SelectionNode::Field(name) => parts.push(name.clone()),
            SelectionNode::Group { name, children } => {
                parts.push(format!("{} {}", name, render_selection(children)))
            }
        }
    }
    format!("{{ {} }}", parts.join(" "))
}
