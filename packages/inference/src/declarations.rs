use crate::diagnostics::Diagnostic;
use crate::types::{ClassShape, InterfaceShape, Parameter, Type};
use serde::Serialize;

/// One emitted declaration. The renderer decides concrete syntax.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Statement {
    Interface {
        name: String,
        shape: InterfaceShape,
    },

    Class {
        name: String,
        shape: ClassShape,
    },

    Function {
        name: String,
        parameters: Vec<Parameter>,
        return_type: Type,
    },

    Const {
        name: String,
        ty: Type,
    },

    /// Single default export (`export = name`)
    ExportAssignment { name: String },

    /// Named export list (`export { a, b as c }`)
    ExportList { specifiers: Vec<ExportSpecifier> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportSpecifier {
    pub name: String,
    pub alias: Option<String>,
}

impl ExportSpecifier {
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: Some(alias.into()),
        }
    }
}

/// Inference result for one document: the ordered declaration sequence
/// plus every degradation the engine recorded along the way.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ModuleDeclarations {
    pub statements: Vec<Statement>,
    pub diagnostics: Vec<Diagnostic>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Parameter, Type};

    #[test]
    fn test_statements_serialize_with_kind_tags() {
        let statement = Statement::Function {
            name: "add".to_string(),
            parameters: vec![Parameter::unknown("a"), Parameter::vararg()],
            return_type: Type::Boolean,
        };
        let json = serde_json::to_value(&statement).unwrap();

        assert_eq!(json["kind"], "Function");
        assert_eq!(json["name"], "add");
        assert_eq!(json["parameters"][1]["variadic"], true);
    }

    #[test]
    fn test_module_serializes_diagnostics() {
        let module = ModuleDeclarations {
            statements: vec![Statement::ExportAssignment {
                name: "T".to_string(),
            }],
            diagnostics: vec![Diagnostic::UnresolvedExportName {
                name: "T".to_string(),
            }],
        };
        let json = serde_json::to_value(&module).unwrap();

        assert_eq!(json["statements"][0]["kind"], "ExportAssignment");
        assert_eq!(json["diagnostics"][0]["UnresolvedExportName"]["name"], "T");
    }
}
