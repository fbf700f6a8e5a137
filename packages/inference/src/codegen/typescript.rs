use crate::codegen::CodeGenerator;
use crate::declarations::{ModuleDeclarations, Statement};
use crate::types::{ClassShape, InterfaceShape, Parameter, Type};

const GENERATED_MARKER: &str = "/* Generated by declua. Do not edit by hand. */";

/// Renders declaration statements as a TypeScript `.d.ts` document
pub struct TypeScriptGenerator;

impl TypeScriptGenerator {
    pub fn new() -> Self {
        Self
    }

    fn generate_parameter(&self, param: &Parameter) -> String {
        if param.variadic {
            format!("...{}: {}", param.name, self.generate_type(&param.ty))
        } else {
            format!("{}: {}", param.name, self.generate_type(&param.ty))
        }
    }

    fn generate_parameter_list(&self, params: &[Parameter]) -> String {
        params
            .iter()
            .map(|p| self.generate_parameter(p))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn generate_interface(&self, name: &str, shape: &InterfaceShape) -> String {
        let mut lines = vec![format!("declare interface {} {{", name)];

        for prop in &shape.properties {
            lines.push(format!("  {}: {};", prop.name, self.generate_type(&prop.ty)));
        }

        for method in &shape.methods {
            lines.push(format!(
                "  {}({}): {};",
                method.name,
                self.generate_parameter_list(&method.parameters),
                self.generate_type(&method.return_type)
            ));
        }

        lines.push("}".to_string());
        lines.join("\n")
    }

    fn generate_class(&self, name: &str, shape: &ClassShape) -> String {
        let mut lines = vec![format!("declare class {} {{", name)];

        for prop in &shape.properties {
            lines.push(format!("  {}: {};", prop.name, self.generate_type(&prop.ty)));
        }

        for ctor in &shape.constructors {
            lines.push(format!(
                "  constructor({});",
                self.generate_parameter_list(ctor)
            ));
        }

        for method in &shape.methods {
            let static_marker = if method.is_static { "static " } else { "" };
            lines.push(format!(
                "  {}{}({}): {};",
                static_marker,
                method.name,
                self.generate_parameter_list(&method.parameters),
                self.generate_type(&method.return_type)
            ));
        }

        lines.push("}".to_string());
        lines.join("\n")
    }
}

impl Default for TypeScriptGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGenerator for TypeScriptGenerator {
    fn generate_type(&self, ty: &Type) -> String {
        match ty {
            Type::Unknown => "unknown".to_string(),
            Type::Void => "void".to_string(),
            Type::String => "string".to_string(),
            Type::Number => "number".to_string(),
            Type::Boolean => "boolean".to_string(),
            Type::Tuple(types) => {
                let inner: Vec<String> = types.iter().map(|t| self.generate_type(t)).collect();
                format!("LuaTuple<[{}]>", inner.join(", "))
            }
            Type::Array(inner) => format!("{}[]", self.generate_type(inner)),
            Type::Function => "(...args: unknown[]) => unknown".to_string(),
            Type::Named(name) => name.clone(),
        }
    }

    fn generate_statement(&self, statement: &Statement) -> String {
        match statement {
            Statement::Interface { name, shape } => self.generate_interface(name, shape),

            Statement::Class { name, shape } => self.generate_class(name, shape),

            Statement::Function {
                name,
                parameters,
                return_type,
            } => format!(
                "declare function {}({}): {};",
                name,
                self.generate_parameter_list(parameters),
                self.generate_type(return_type)
            ),

            Statement::Const { name, ty } => {
                format!("declare const {}: {};", name, self.generate_type(ty))
            }

            Statement::ExportAssignment { name } => format!("export = {};", name),

            Statement::ExportList { specifiers } => {
                let rendered: Vec<String> = specifiers
                    .iter()
                    .map(|spec| match &spec.alias {
                        Some(alias) => format!("{} as {}", spec.name, alias),
                        None => spec.name.clone(),
                    })
                    .collect();
                format!("export {{ {} }};", rendered.join(", "))
            }
        }
    }

    fn generate_module(&self, module: &ModuleDeclarations) -> String {
        let mut output = String::from(GENERATED_MARKER);
        output.push('\n');

        for statement in &module.statements {
            output.push('\n');
            output.push_str(&self.generate_statement(statement));
            output.push('\n');
        }

        output
    }
}
