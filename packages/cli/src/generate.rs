use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use declua_inference::{CodeGenerator, InferenceEngine, TypeScriptGenerator};
use declua_parser::parse;
use std::fs;
use std::path::{Path, PathBuf};

/// Run the whole pipeline for one module: read, parse, infer, render,
/// persist. The declaration file lands next to the input with the same
/// base name and a `.d.ts` suffix.
pub fn generate(input: &Path) -> Result<PathBuf> {
    let source = fs::read_to_string(input)
        .with_context(|| format!("cannot read {}", input.display()))?;

    let module = parse(&source)
        .map_err(|e| anyhow!("parse error in {}: {}", input.display(), e))?;

    let declarations = InferenceEngine::new().infer_module(&module);

    for diagnostic in &declarations.diagnostics {
        eprintln!("  {} {}", "warning:".yellow(), diagnostic);
    }

    let dts = TypeScriptGenerator::new().generate_module(&declarations);

    let output = output_path(input);
    fs::write(&output, dts)
        .with_context(|| format!("cannot write {}", output.display()))?;

    Ok(output)
}

/// `foo.lua` → `foo.d.ts`, in the same directory as the input
fn output_path(input: &Path) -> PathBuf {
    input.with_extension("d.ts")
}
