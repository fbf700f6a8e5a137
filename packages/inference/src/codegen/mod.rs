pub mod typescript;

use crate::declarations::{ModuleDeclarations, Statement};
use crate::types::Type;

/// Plugin trait for rendering inferred declarations.
/// The engine produces language-neutral statements; implementations
/// own the concrete textual syntax.
pub trait CodeGenerator {
    /// Render a single type
    fn generate_type(&self, ty: &Type) -> String;

    /// Render a single declaration statement
    fn generate_statement(&self, statement: &Statement) -> String;

    /// Render a whole declaration document, including the leading
    /// machine-generated marker
    fn generate_module(&self, module: &ModuleDeclarations) -> String;
}
