//! type signatures
//!
//! render wrapper chains and argument lists as graphql declaration text.

use crate::schema::{ArgSpec, TypeRef};

/// render a type reference as it appears in sdl, e.g. `[Foo!]!`
///
/// every leaf kind renders its name, including kinds the selection builder
/// skips.
pub fn render_type_signature(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Named { name, .. } => name.clone(),
        TypeRef::NonNull(inner) => format!("{}!", render_type_signature(inner)),
        TypeRef::List(inner) => format!("[{}]", render_type_signature(inner)),
    }
}

/// render an argument list as `(a: A, b: B)`, or an empty string when there
/// are no arguments. declaration order is kept.
pub fn render_args(args: &[ArgSpec]) -> String {
    if args.is_empty() {
        return String::new();
    }

    let parts: Vec<String> = args
        .iter()
        .map(|arg| format!("{}: {}", arg.name, render_type_signature(&arg.ty)))
        .collect();
    format!("({})", parts.join(", "))
}
