use crate::types::{Parameter, Type};
use declua_parser::ast::{Expr, FunctionDeclaration, Param, ReturnStatement, Stat};

/// Map an expression to its type tag. Total and pure: every binary
/// expression is classified as boolean (the engine's deliberate
/// simplification for comparison-heavy module code), and anything
/// unrecognized degrades to `Unknown`.
pub fn resolve_type(expr: &Expr) -> Type {
    match expr {
        Expr::String { .. } => Type::String,
        Expr::Number { .. } => Type::Number,
        Expr::Boolean { .. } => Type::Boolean,
        Expr::Binary { .. } => Type::Boolean,
        _ => Type::Unknown,
    }
}

/// Resolve the type of a return statement: zero arguments is `Void`,
/// one argument is its own tag, more than one is a tuple.
pub fn resolve_return_type(ret: &ReturnStatement) -> Type {
    match ret.arguments.as_slice() {
        [] => Type::Void,
        [single] => resolve_type(single),
        many => Type::Tuple(many.iter().map(resolve_type).collect()),
    }
}

/// Derive a function's parameter list. Named parameters are untyped
/// (`unknown`); a trailing vararg becomes a single variadic `arg`
/// parameter typed `unknown[]`.
pub fn derive_parameters(params: &[Param]) -> Vec<Parameter> {
    params
        .iter()
        .map(|param| match param {
            Param::Name(name) => Parameter::unknown(name.clone()),
            Param::Vararg => Parameter::vararg(),
        })
        .collect()
}

/// Derive a function's return type from the first top-level return
/// statement in its body; a function that never returns is `Void`.
pub fn derive_return_type(decl: &FunctionDeclaration) -> Type {
    derive_body_return_type(&decl.body.body)
}

pub fn derive_body_return_type(body: &[Stat]) -> Type {
    for stat in body {
        if let Stat::Return(ret) = stat {
            return resolve_return_type(ret);
        }
    }
    Type::Void
}
