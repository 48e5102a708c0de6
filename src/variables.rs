//! variable descriptors
//!
//! flattens an argument's wrapper chain into the flags used to declare an
//! operation variable. nesting is not preserved: `[[Int]]` and `[Int]` both
//! come out as `list`, which is enough for the single-level lists the
//! generated documents declare.

use crate::error::{Error, Result};
use crate::schema::{ArgSpec, LeafKind, TypeRef};
use serde::Serialize;

/// declaration summary for one operation variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableDescriptor {
    /// leaf type name, with `!` when the leaf itself is non-null
    #[serde(rename = "type")]
    pub type_name: String,
    /// value slot, always null at generation time
    pub value: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub list: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
}

impl VariableDescriptor {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            value: None,
            list: false,
            required: false,
        }
    }

    /// the variable's declared type, e.g. `[Foo!]!`
    pub fn declaration(&self) -> String {
        let mut out = if self.list {
            format!("[{}]", self.type_name)
        } else {
            self.type_name.clone()
        };
        if self.required {
            out.push('!');
        }
        out
    }
}

/// ordered variables of one operation, keyed by argument name
pub type VariableMap = Vec<(String, VariableDescriptor)>;

/// resolve one argument type into a descriptor
///
/// fails with [`Error::UnknownKind`] when the chain ends in a kind outside
/// scalar/object/enum/input-object/union.
pub fn resolve_arg_descriptor(ty: &TypeRef) -> Result<VariableDescriptor> {
    match ty {
        TypeRef::NonNull(inner) => match &**inner {
            TypeRef::Named {
                kind: LeafKind::Scalar | LeafKind::Object | LeafKind::Enum | LeafKind::InputObject,
                name,
            } => Ok(VariableDescriptor::new(format!("{name}!"))),
            other => {
                let mut descriptor = resolve_arg_descriptor(other)?;
                descriptor.required = true;
                Ok(descriptor)
            }
        },
        TypeRef::List(inner) => {
            let mut descriptor = resolve_arg_descriptor(inner)?;
            descriptor.list = true;
            Ok(descriptor)
        }
        TypeRef::Named {
            kind: LeafKind::Other(kind),
            name,
        } => Err(Error::UnknownKind {
            kind: kind.clone(),
            name: name.clone(),
        }),
        TypeRef::Named { name, .. } => Ok(VariableDescriptor::new(name.clone())),
    }
}

/// resolve every argument of a field, keeping declaration order
pub fn resolve_variables(args: &[ArgSpec]) -> Result<VariableMap> {
    args.iter()
        .map(|arg| Ok((arg.name.clone(), resolve_arg_descriptor(&arg.ty)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_null_scalar() {
        let descriptor = resolve_arg_descriptor(&TypeRef::non_null(TypeRef::scalar("Int"))).unwrap();
        assert_eq!(descriptor, VariableDescriptor::new("Int!"));
        assert_eq!(
            serde_json::to_value(&descriptor).unwrap(),
            serde_json::json!({"type": "Int!", "value": null})
        );
    }

    #[test]
    fn test_bare_leaf() {
        let descriptor = resolve_arg_descriptor(&TypeRef::enumeration("Network")).unwrap();
        assert_eq!(descriptor.declaration(), "Network");
        assert!(!descriptor.list && !descriptor.required);
    }

    #[test]
    fn test_required_list_of_required_inputs() {
        let ty = TypeRef::non_null(TypeRef::list(TypeRef::non_null(TypeRef::input_object("Foo"))));
        let descriptor = resolve_arg_descriptor(&ty).unwrap();
        assert_eq!(
            serde_json::to_value(&descriptor).unwrap(),
            serde_json::json!({"type": "Foo!", "value": null, "list": true, "required": true})
        );
        assert_eq!(descriptor.declaration(), "[Foo!]!");
    }

    #[test]
    fn test_nested_lists_flatten() {
        let nested = TypeRef::list(TypeRef::list(TypeRef::scalar("Int")));
        let single = TypeRef::list(TypeRef::scalar("Int"));
        assert_eq!(
            resolve_arg_descriptor(&nested).unwrap(),
            resolve_arg_descriptor(&single).unwrap()
        );
    }

    #[test]
    fn test_non_null_union_is_required() {
        let descriptor = resolve_arg_descriptor(&TypeRef::non_null(TypeRef::union("Hit"))).unwrap();
        assert_eq!(descriptor.type_name, "Hit");
        assert!(descriptor.required);
    }

    #[test]
    fn test_unknown_kind_fails() {
        let ty = TypeRef::non_null(TypeRef::named(LeafKind::Other("INTERFACE".to_string()), "Node"));
        let err = resolve_arg_descriptor(&ty).unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownKind { ref kind, ref name } if kind == "INTERFACE" && name == "Node"
        ));
    }

    #[test]
    fn test_resolve_variables_order() {
        let args = vec![
            ArgSpec::new("where", TypeRef::input_object("TokenFilter")),
            ArgSpec::new("first", TypeRef::non_null(TypeRef::scalar("Int"))),
        ];
        let vars = resolve_variables(&args).unwrap();
        let names: Vec<_> = vars.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["where", "first"]);
        assert!(resolve_variables(&[]).unwrap().is_empty());
    }
}
