//! # declua inference engine
//!
//! Infers static type information from parsed Lua modules and emits an
//! ordered sequence of declaration statements describing the module's
//! public surface (functions, tables-as-interfaces, tables-as-classes,
//! exported values).
//!
//! The walk is best-effort by design: idioms outside the recognized
//! shapes degrade to `unknown` or omission, and every degradation is
//! recorded in a per-document diagnostics list rather than raised.
//!
//! ## Example
//!
//! ```rust
//! use declua_inference::{CodeGenerator, InferenceEngine, TypeScriptGenerator};
//! use declua_parser::parse;
//!
//! let source = r#"
//!     local Point = {}
//!     Point.__index = Point
//!
//!     function Point.new(x, y) end
//!     function Point:getX() return 0 end
//!
//!     return Point
//! "#;
//!
//! let module = parse(source).unwrap();
//! let declarations = InferenceEngine::new().infer_module(&module);
//! let dts = TypeScriptGenerator::new().generate_module(&declarations);
//! assert!(dts.contains("declare class Point"));
//! ```

pub mod codegen;
pub mod declarations;
pub mod diagnostics;
pub mod engine;
pub mod resolve;
pub mod symbols;
pub mod types;

pub use codegen::{typescript::TypeScriptGenerator, CodeGenerator};
pub use declarations::{ExportSpecifier, ModuleDeclarations, Statement};
pub use diagnostics::Diagnostic;
pub use engine::InferenceEngine;
pub use symbols::{Symbol, SymbolTable};
pub use types::{
    CallConvention, ClassShape, InterfaceShape, MethodDeclaration, MethodSignature, Parameter,
    Property, Type,
};
