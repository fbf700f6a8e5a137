use declua_inference::{CodeGenerator, InferenceEngine, TypeScriptGenerator};
use declua_parser::parse;

fn generate(source: &str) -> String {
    let module = parse(source).unwrap();
    let declarations = InferenceEngine::new().infer_module(&module);
    TypeScriptGenerator::new().generate_module(&declarations)
}

#[test]
fn test_class_module_declaration_file() {
    let dts = generate(
        r#"
        local T = {}
        T.__index = T

        function T.new()
        end

        function T:getX()
        end

        return T
    "#,
    );

    assert!(dts.starts_with("/* Generated by declua."));
    assert!(dts.contains("declare class T {"));
    assert!(dts.contains("  constructor();"));
    assert!(dts.contains("  getX(): void;"));
    assert!(dts.contains("export = T;"));
    assert!(!dts.contains("declare interface"));
}

#[test]
fn test_function_module_declaration_file() {
    let dts = generate(
        r#"
        local function add(a, b)
            return a + b
        end

        return add
    "#,
    );

    assert!(dts.contains("declare function add(a: unknown, b: unknown): boolean;"));
    assert!(dts.contains("export = add;"));
}

#[test]
fn test_literal_table_declaration_file() {
    let dts = generate(r#"return { X = 1, Y = "s" }"#);

    assert!(dts.contains("declare const X: number;"));
    assert!(dts.contains("declare const Y: string;"));
    assert!(dts.contains("export { X, Y };"));
}

#[test]
fn test_tuple_return_declaration() {
    let dts = generate(
        r#"
        local function pair()
            return "s", 1
        end

        return pair
    "#,
    );

    assert!(dts.contains("declare function pair(): LuaTuple<[string, number]>;"));
}

#[test]
fn test_vararg_function_declaration() {
    let dts = generate(
        r#"
        local function log(level, ...)
        end

        return log
    "#,
    );

    assert!(dts.contains("declare function log(level: unknown, ...arg: unknown[]): void;"));
}

#[test]
fn test_interface_module_declaration_file() {
    let dts = generate(
        r#"
        local Config = { debug = false, retries = 3 }

        function Config:reload()
        end

        return Config
    "#,
    );

    assert!(dts.contains("declare interface Config {"));
    assert!(dts.contains("  debug: boolean;"));
    assert!(dts.contains("  retries: number;"));
    assert!(dts.contains("  reload(): void;"));
    assert!(dts.contains("declare const Config: Config;"));
    assert!(dts.contains("export = Config;"));
}

#[test]
fn test_mixed_export_table() {
    let dts = generate(
        r#"
        local Shape = {}
        Shape.__index = Shape

        function Shape.new(kind)
            return setmetatable({}, Shape)
        end

        local function area(w, h)
            return w * h
        end

        return { Shape = Shape, computeArea = area, VERSION = "2.0" }
    "#,
    );

    assert!(dts.contains("declare class Shape {"));
    assert!(dts.contains("  constructor(kind: unknown);"));
    assert!(dts.contains("declare function area(w: unknown, h: unknown): boolean;"));
    assert!(dts.contains("declare const VERSION: string;"));
    assert!(dts.contains("export { Shape, area as computeArea, VERSION };"));
}

#[test]
fn test_diagnostics_do_not_block_output() {
    let module = parse(
        r#"
        function Unknown:method() end
        return { ok = true, bad = foo() }
    "#,
    )
    .unwrap();

    let declarations = InferenceEngine::new().infer_module(&module);

    // degraded parts are omitted but recorded, the rest still renders
    assert_eq!(declarations.diagnostics.len(), 2);
    let dts = TypeScriptGenerator::new().generate_module(&declarations);
    assert!(dts.contains("declare const ok: boolean;"));
    assert!(dts.contains("export { ok };"));
}
