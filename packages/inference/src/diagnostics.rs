use serde::Serialize;
use thiserror::Error;

/// Non-fatal degradation events collected while inferring one document.
/// The engine never fails on unrecognized input; it records what it had
/// to skip or weaken here so callers can surface it.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum Diagnostic {
    #[error("member function '{base}.{member}' ignored: '{base}' is not a known table")]
    UnresolvedMemberBase { base: String, member: String },

    #[error("unsupported export expression ({kind}); no declaration emitted")]
    UnsupportedExportShape { kind: String },

    #[error("promotion of '{class}' dropped interface properties: {}", properties.join(", "))]
    PropertiesDroppedOnPromotion {
        class: String,
        properties: Vec<String>,
    },

    #[error("export table field '{key}' has an unsupported value; skipped")]
    UnsupportedExportField { key: String },

    #[error("export of '{name}' has no matching top-level binding")]
    UnresolvedExportName { name: String },
}
