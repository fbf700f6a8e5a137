use crate::declarations::{ExportSpecifier, ModuleDeclarations, Statement};
use crate::diagnostics::Diagnostic;
use crate::resolve::{
    derive_body_return_type, derive_parameters, derive_return_type, resolve_type,
};
use crate::symbols::{Symbol, SymbolTable};
use crate::types::{
    CallConvention, MethodDeclaration, MethodSignature, Parameter, Property, Type,
};
use declua_parser::ast::{
    AssignmentStatement, Block, Expr, FunctionName, Indexer, LocalDeclaration, ReturnStatement,
    Stat, TableField,
};

/// Walks a parsed module, classifies its declarations against a
/// per-document symbol table, and produces the ordered declaration
/// sequence for the renderer.
pub struct InferenceEngine;

/// Per-document state threaded through the walk; never shared between
/// documents.
struct InferenceContext {
    symbols: SymbolTable,
    diagnostics: Vec<Diagnostic>,
}

enum BaseKind {
    Missing,
    Interface,
    Class,
}

impl InferenceEngine {
    pub fn new() -> Self {
        Self
    }

    /// Infer the declaration sequence for one module. Infallible:
    /// unrecognized shapes degrade to omission or `unknown` and are
    /// recorded in the returned diagnostics.
    pub fn infer_module(&self, module: &Block) -> ModuleDeclarations {
        let mut ctx = InferenceContext {
            symbols: SymbolTable::new(),
            diagnostics: Vec::new(),
        };

        let statements = self.walk_block(&module.body, &mut ctx);

        ModuleDeclarations {
            statements,
            diagnostics: ctx.diagnostics,
        }
    }

    /// Dispatch over a statement list. Mutates the symbol table as a
    /// side effect; emits statements only when a return (export) is hit.
    fn walk_block(&self, body: &[Stat], ctx: &mut InferenceContext) -> Vec<Statement> {
        let mut statements = Vec::new();

        for stat in body {
            match stat {
                Stat::Local(decl) => self.collect_interfaces(decl, ctx),

                Stat::Assign(assign) => self.detect_promotion(assign, ctx),

                Stat::Do { body: nested, .. } => {
                    statements.extend(self.walk_block(&nested.body, ctx));
                    self.classify_member_functions(&nested.body, ctx);
                }

                Stat::Return(ret) => {
                    self.classify_member_functions(body, ctx);
                    statements.extend(self.snapshot_symbols(ctx));
                    statements.extend(self.resolve_exports(ret, body, ctx));
                }

                _ => {}
            }
        }

        statements
    }

    /// `local NAME = { ... }` declares a table-as-interface shape
    fn collect_interfaces(&self, decl: &LocalDeclaration, ctx: &mut InferenceContext) {
        for (index, name) in decl.names.iter().enumerate() {
            let Some(Expr::Table(table)) = decl.values.get(index) else {
                continue;
            };

            let mut properties: Vec<Property> = Vec::new();
            for field in &table.fields {
                if let TableField::Named { key, value } = field {
                    let ty = resolve_type(value);
                    // later duplicate keys overwrite earlier ones
                    if let Some(existing) = properties.iter_mut().find(|p| p.name == *key) {
                        existing.ty = ty;
                    } else {
                        properties.push(Property {
                            name: key.clone(),
                            ty,
                        });
                    }
                }
            }

            ctx.symbols.declare_interface(name.clone(), properties);
        }
    }

    /// `target.__index = target` promotes the interface into a class
    fn detect_promotion(&self, assign: &AssignmentStatement, ctx: &mut InferenceContext) {
        for (target, value) in assign.targets.iter().zip(assign.values.iter()) {
            let Expr::Member { base, member, .. } = target else {
                continue;
            };
            if member.as_str() != "__index" {
                continue;
            }
            let Expr::Identifier { name: base_name, .. } = base.as_ref() else {
                continue;
            };
            let Expr::Identifier { name: value_name, .. } = value else {
                continue;
            };
            if base_name != value_name {
                continue;
            }

            if let Some(dropped) = ctx.symbols.promote(base_name) {
                if !dropped.is_empty() {
                    ctx.diagnostics.push(Diagnostic::PropertiesDroppedOnPromotion {
                        class: base_name.clone(),
                        properties: dropped,
                    });
                }
            }
        }
    }

    /// Attach every `function base.m` / `function base:m` declaration in
    /// the scope to the shape registered for its base.
    fn classify_member_functions(&self, body: &[Stat], ctx: &mut InferenceContext) {
        for stat in body {
            let Stat::Function(decl) = stat else {
                continue;
            };
            let FunctionName::Member {
                base,
                indexer,
                member,
            } = &decl.name
            else {
                continue;
            };

            let kind = match ctx.symbols.lookup(base) {
                None => BaseKind::Missing,
                Some(Symbol::Interface(_)) => BaseKind::Interface,
                Some(Symbol::Class(_)) => BaseKind::Class,
            };

            let mut parameters = derive_parameters(&decl.params);
            let return_type = derive_return_type(decl);

            match kind {
                BaseKind::Missing => {
                    ctx.diagnostics.push(Diagnostic::UnresolvedMemberBase {
                        base: base.clone(),
                        member: member.clone(),
                    });
                }

                BaseKind::Interface => {
                    let call = match indexer {
                        Indexer::Colon => CallConvention::Colon,
                        Indexer::Dot => CallConvention::Dot,
                    };
                    // dot-call passes no implicit receiver, so the
                    // signature carries an explicit one; `new` never does
                    if *indexer == Indexer::Dot && member.as_str() != "new" {
                        parameters.insert(
                            0,
                            Parameter {
                                name: "self".to_string(),
                                ty: Type::Named(base.clone()),
                                variadic: false,
                            },
                        );
                    }
                    ctx.symbols.record_interface_method(
                        base,
                        MethodSignature {
                            name: member.clone(),
                            parameters,
                            return_type,
                            call,
                        },
                    );
                }

                BaseKind::Class => match indexer {
                    Indexer::Colon => {
                        ctx.symbols.record_class_method(
                            base,
                            MethodDeclaration {
                                name: member.clone(),
                                parameters,
                                return_type,
                                is_static: false,
                            },
                        );
                    }
                    Indexer::Dot => {
                        let explicit_self =
                            parameters.first().map(|p| p.name == "self").unwrap_or(false);
                        if explicit_self {
                            // dot-call idiom emulating colon-call
                            parameters.remove(0);
                            ctx.symbols.record_class_method(
                                base,
                                MethodDeclaration {
                                    name: member.clone(),
                                    parameters,
                                    return_type,
                                    is_static: false,
                                },
                            );
                        } else if member.as_str() == "new" {
                            ctx.symbols.record_constructor(base, parameters);
                        } else {
                            ctx.symbols.record_class_method(
                                base,
                                MethodDeclaration {
                                    name: member.clone(),
                                    parameters,
                                    return_type,
                                    is_static: true,
                                },
                            );
                        }
                    }
                },
            }
        }
    }

    /// Snapshot the symbol table into declaration statements: interfaces
    /// first, then classes, each in insertion order.
    fn snapshot_symbols(&self, ctx: &InferenceContext) -> Vec<Statement> {
        let mut statements = Vec::new();

        for (name, shape) in ctx.symbols.interfaces() {
            statements.push(Statement::Interface {
                name: name.to_string(),
                shape: shape.clone(),
            });
        }

        for (name, shape) in ctx.symbols.classes() {
            statements.push(Statement::Class {
                name: name.to_string(),
                shape: shape.clone(),
            });
        }

        statements
    }

    /// Interpret the export statement's argument shapes (spec: bare
    /// identifier, table of name bindings, inline function, inline literal).
    fn resolve_exports(
        &self,
        ret: &ReturnStatement,
        body: &[Stat],
        ctx: &mut InferenceContext,
    ) -> Vec<Statement> {
        let mut statements = Vec::new();
        // each exported name resolves to at most one declaration, even
        // when it appears under several export keys
        let mut resolved: std::collections::HashSet<String> = std::collections::HashSet::new();

        for argument in &ret.arguments {
            match argument {
                Expr::Identifier { name, .. } => {
                    if resolved.insert(name.clone()) {
                        statements.extend(self.statements_for_name(name, body, ctx));
                    }
                    statements.push(Statement::ExportAssignment { name: name.clone() });
                }

                Expr::Table(table) => {
                    let mut specifiers = Vec::new();

                    for field in &table.fields {
                        let TableField::Named { key, value } = field else {
                            continue;
                        };

                        match value {
                            Expr::Identifier { name, .. } => {
                                if resolved.insert(name.clone()) {
                                    statements.extend(self.statements_for_name(name, body, ctx));
                                }
                                if name == key {
                                    specifiers.push(ExportSpecifier::plain(name.clone()));
                                } else {
                                    specifiers
                                        .push(ExportSpecifier::aliased(name.clone(), key.clone()));
                                }
                            }
                            Expr::String { .. } | Expr::Number { .. } | Expr::Boolean { .. } => {
                                statements.push(Statement::Const {
                                    name: key.clone(),
                                    ty: resolve_type(value),
                                });
                                specifiers.push(ExportSpecifier::plain(key.clone()));
                            }
                            _ => {
                                ctx.diagnostics.push(Diagnostic::UnsupportedExportField {
                                    key: key.clone(),
                                });
                            }
                        }
                    }

                    statements.push(Statement::ExportList { specifiers });
                }

                Expr::Function { params, body, .. } => {
                    statements.push(Statement::Function {
                        name: DEFAULT_EXPORT_NAME.to_string(),
                        parameters: derive_parameters(params),
                        return_type: derive_body_return_type(&body.body),
                    });
                    statements.push(Statement::ExportAssignment {
                        name: DEFAULT_EXPORT_NAME.to_string(),
                    });
                }

                Expr::String { .. } | Expr::Number { .. } | Expr::Boolean { .. } => {
                    statements.push(Statement::Const {
                        name: DEFAULT_EXPORT_NAME.to_string(),
                        ty: resolve_type(argument),
                    });
                    statements.push(Statement::ExportAssignment {
                        name: DEFAULT_EXPORT_NAME.to_string(),
                    });
                }

                other => {
                    ctx.diagnostics.push(Diagnostic::UnsupportedExportShape {
                        kind: describe_expr(other).to_string(),
                    });
                }
            }
        }

        statements
    }

    /// Resolve a bare exported identifier against the top-level body.
    /// A name already registered as a class needs no extra statement:
    /// the class declaration itself binds the value.
    fn statements_for_name(
        &self,
        name: &str,
        body: &[Stat],
        ctx: &mut InferenceContext,
    ) -> Vec<Statement> {
        if matches!(ctx.symbols.lookup(name), Some(Symbol::Class(_))) {
            return Vec::new();
        }

        for stat in body {
            match stat {
                Stat::Function(decl) if decl.name == FunctionName::Name(name.to_string()) => {
                    return vec![Statement::Function {
                        name: name.to_string(),
                        parameters: derive_parameters(&decl.params),
                        return_type: derive_return_type(decl),
                    }];
                }
                Stat::Local(decl) if decl.names.iter().any(|n| n.as_str() == name) => {
                    let ty = if matches!(ctx.symbols.lookup(name), Some(Symbol::Interface(_))) {
                        Type::Named(name.to_string())
                    } else {
                        Type::Unknown
                    };
                    return vec![Statement::Const {
                        name: name.to_string(),
                        ty,
                    }];
                }
                _ => {}
            }
        }

        ctx.diagnostics.push(Diagnostic::UnresolvedExportName {
            name: name.to_string(),
        });
        Vec::new()
    }
}

impl Default for InferenceEngine {
    fn default() -> Self {
        Self::new()
    }
}

const DEFAULT_EXPORT_NAME: &str = "defaultExport";

fn describe_expr(expr: &Expr) -> &'static str {
    match expr {
        Expr::Nil { .. } => "nil",
        Expr::Vararg { .. } => "vararg",
        Expr::Member { .. } => "member expression",
        Expr::Index { .. } => "index expression",
        Expr::Binary { .. } => "binary expression",
        Expr::Unary { .. } => "unary expression",
        Expr::Call { .. } => "call expression",
        Expr::Identifier { .. } => "identifier",
        Expr::Table(_) => "table constructor",
        Expr::Function { .. } => "function expression",
        Expr::String { .. } | Expr::Number { .. } | Expr::Boolean { .. } => "literal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use declua_parser::parse;

    fn infer(source: &str) -> ModuleDeclarations {
        let block = parse(source).unwrap();
        InferenceEngine::new().infer_module(&block)
    }

    #[test]
    fn test_class_module_scenario() {
        let output = infer(
            r#"
            local T = {}
            T.__index = T
            function T.new() end
            function T:getX() end
            return T
        "#,
        );

        assert_eq!(output.statements.len(), 2);

        match &output.statements[0] {
            Statement::Class { name, shape } => {
                assert_eq!(name, "T");
                assert_eq!(shape.constructors.len(), 1);
                assert!(shape.constructors[0].is_empty());
                assert_eq!(shape.methods.len(), 1);
                assert_eq!(shape.methods[0].name, "getX");
                assert!(shape.methods[0].parameters.is_empty());
                assert_eq!(shape.methods[0].return_type, Type::Void);
                assert!(!shape.methods[0].is_static);
            }
            other => panic!("expected class declaration, got {:?}", other),
        }

        assert_eq!(
            output.statements[1],
            Statement::ExportAssignment {
                name: "T".to_string()
            }
        );
    }

    #[test]
    fn test_function_module_scenario() {
        let output = infer(
            r#"
            local function add(a, b)
                return a + b
            end
            return add
        "#,
        );

        assert_eq!(
            output.statements,
            vec![
                Statement::Function {
                    name: "add".to_string(),
                    parameters: vec![Parameter::unknown("a"), Parameter::unknown("b")],
                    return_type: Type::Boolean,
                },
                Statement::ExportAssignment {
                    name: "add".to_string()
                },
            ]
        );
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn test_literal_table_export_scenario() {
        let output = infer(r#"return { X = 1, Y = "s" }"#);

        assert_eq!(
            output.statements,
            vec![
                Statement::Const {
                    name: "X".to_string(),
                    ty: Type::Number,
                },
                Statement::Const {
                    name: "Y".to_string(),
                    ty: Type::String,
                },
                Statement::ExportList {
                    specifiers: vec![
                        ExportSpecifier::plain("X"),
                        ExportSpecifier::plain("Y"),
                    ]
                },
            ]
        );
    }

    #[test]
    fn test_interface_export_is_typed_as_itself() {
        let output = infer(
            r#"
            local Config = { debug = false, name = "app" }
            return Config
        "#,
        );

        match &output.statements[0] {
            Statement::Interface { name, shape } => {
                assert_eq!(name, "Config");
                assert_eq!(shape.properties.len(), 2);
                assert_eq!(shape.properties[0].ty, Type::Boolean);
                assert_eq!(shape.properties[1].ty, Type::String);
            }
            other => panic!("expected interface, got {:?}", other),
        }
        assert_eq!(
            output.statements[1],
            Statement::Const {
                name: "Config".to_string(),
                ty: Type::Named("Config".to_string()),
            }
        );
        assert_eq!(
            output.statements[2],
            Statement::ExportAssignment {
                name: "Config".to_string()
            }
        );
    }

    #[test]
    fn test_promotion_drops_properties_with_diagnostic() {
        let output = infer(
            r#"
            local T = { x = 1 }
            T.__index = T
            return T
        "#,
        );

        match &output.statements[0] {
            Statement::Class { shape, .. } => assert!(shape.properties.is_empty()),
            other => panic!("expected class, got {:?}", other),
        }
        assert_eq!(
            output.diagnostics,
            vec![Diagnostic::PropertiesDroppedOnPromotion {
                class: "T".to_string(),
                properties: vec!["x".to_string()],
            }]
        );
    }

    #[test]
    fn test_dot_method_with_self_is_instance() {
        let output = infer(
            r#"
            local T = {}
            T.__index = T
            function T.getX(self) end
            function T.helper(n) end
            return T
        "#,
        );

        let Statement::Class { shape, .. } = &output.statements[0] else {
            panic!("expected class");
        };

        let get_x = shape.methods.iter().find(|m| m.name == "getX").unwrap();
        assert!(!get_x.is_static);
        assert!(get_x.parameters.is_empty());

        let helper = shape.methods.iter().find(|m| m.name == "helper").unwrap();
        assert!(helper.is_static);
        assert_eq!(helper.parameters, vec![Parameter::unknown("n")]);
    }

    #[test]
    fn test_interface_dot_method_gets_synthetic_receiver() {
        let output = infer(
            r#"
            local T = {}
            function T.area(w, h) return w * h end
            function T:reset() end
            function T.new() end
            return T
        "#,
        );

        let Statement::Interface { shape, .. } = &output.statements[0] else {
            panic!("expected interface");
        };

        let area = shape.methods.iter().find(|m| m.name == "area").unwrap();
        assert_eq!(area.call, CallConvention::Dot);
        assert_eq!(area.parameters[0].name, "self");
        assert_eq!(area.parameters[0].ty, Type::Named("T".to_string()));
        assert_eq!(area.parameters.len(), 3);

        let reset = shape.methods.iter().find(|m| m.name == "reset").unwrap();
        assert_eq!(reset.call, CallConvention::Colon);
        assert!(reset.parameters.is_empty());

        // `new` on an interface never gets a synthetic receiver
        let new = shape.methods.iter().find(|m| m.name == "new").unwrap();
        assert!(new.parameters.is_empty());
    }

    #[test]
    fn test_unresolved_member_base_is_diagnosed() {
        let output = infer(
            r#"
            function Missing:method() end
            return 1
        "#,
        );

        assert!(output.diagnostics.contains(&Diagnostic::UnresolvedMemberBase {
            base: "Missing".to_string(),
            member: "method".to_string(),
        }));
    }

    #[test]
    fn test_aliased_table_export() {
        let output = infer(
            r#"
            local function run() end
            return { start = run, run = run }
        "#,
        );

        let Some(Statement::ExportList { specifiers }) = output.statements.last() else {
            panic!("expected export list");
        };
        assert_eq!(
            specifiers,
            &vec![
                ExportSpecifier::aliased("run", "start"),
                ExportSpecifier::plain("run"),
            ]
        );
    }

    #[test]
    fn test_inline_function_export() {
        let output = infer("return function(a, ...) return 1 end");

        assert_eq!(
            output.statements,
            vec![
                Statement::Function {
                    name: "defaultExport".to_string(),
                    parameters: vec![Parameter::unknown("a"), Parameter::vararg()],
                    return_type: Type::Number,
                },
                Statement::ExportAssignment {
                    name: "defaultExport".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_inline_literal_export() {
        let output = infer("return 42");

        assert_eq!(
            output.statements,
            vec![
                Statement::Const {
                    name: "defaultExport".to_string(),
                    ty: Type::Number,
                },
                Statement::ExportAssignment {
                    name: "defaultExport".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_unsupported_export_shape_is_logged_only() {
        let output = infer("return foo()");

        assert!(output.statements.is_empty());
        assert_eq!(
            output.diagnostics,
            vec![Diagnostic::UnsupportedExportShape {
                kind: "call expression".to_string()
            }]
        );
    }

    #[test]
    fn test_nested_do_block_members_are_classified() {
        let output = infer(
            r#"
            local M = {}
            do
                function M:helper() end
            end
            return M
        "#,
        );

        let Statement::Interface { shape, .. } = &output.statements[0] else {
            panic!("expected interface");
        };
        assert_eq!(shape.methods.len(), 1);
        assert_eq!(shape.methods[0].name, "helper");
    }

    #[test]
    fn test_no_state_leaks_across_documents() {
        let engine = InferenceEngine::new();

        let first = parse("local T = {}\nT.__index = T\nreturn T").unwrap();
        let output = engine.infer_module(&first);
        assert!(matches!(output.statements[0], Statement::Class { .. }));

        let second = parse("return T").unwrap();
        let output = engine.infer_module(&second);
        // T is unknown in the second document
        assert_eq!(
            output.statements,
            vec![Statement::ExportAssignment {
                name: "T".to_string()
            }]
        );
        assert_eq!(
            output.diagnostics,
            vec![Diagnostic::UnresolvedExportName {
                name: "T".to_string()
            }]
        );
    }
}
