//! Lowers an LSP metaModel JSON schema into a single C++23 header declaring
//! the protocol's data types and request/notification traits.
//!
//! The pipeline is parse → name map → dependency sort → emit, entirely
//! synchronous and in-memory; see [`generate`] for the single entry point.

pub mod diagnostics;
pub mod emit;
pub mod error;
pub mod flatten;
pub mod graph;
pub mod ident;
pub mod model;
pub mod namemap;
pub mod parse;
pub mod render;

use std::path::Path;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::GenError;

/// The result of a successful [`generate`] call: the assembled header text
/// plus every non-fatal diagnostic raised while producing it.
#[derive(Debug, Clone)]
pub struct GenerateOutput {
    pub header: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse, lower, and emit a complete C++23 header from a metaModel JSON
/// document. Fatal schema/IO problems short-circuit as [`GenError`];
/// everything else (keyword collisions, unsafe overrides, suspicious
/// optional-bool docs, member-name collisions, dependency-graph cycles) is
/// surfaced as a [`Diagnostic`] in the returned output instead.
pub fn generate(schema_json: &str) -> Result<GenerateOutput, GenError> {
    let model = parse::parse(schema_json)?;
    let mut diagnostics = Diagnostics::new();
    let header = emit::assemble(&model, &mut diagnostics);
    Ok(GenerateOutput {
        header,
        diagnostics: diagnostics.iter().cloned().collect(),
    })
}

/// Convenience wrapper around [`generate`] that also writes the header to
/// disk, creating the output file's parent directory if needed.
pub fn generate_to_file(schema_json: &str, output_path: &Path) -> Result<GenerateOutput, GenError> {
    let output = generate(schema_json)?;
    emit::write_header_to(output_path, &output.header)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_on_minimal_schema_produces_a_well_formed_header() {
        let json = r#"{
            "structures": [
                { "name": "Position", "properties": [
                    { "name": "line", "type": { "kind": "base", "name": "uinteger" } }
                ] }
            ]
        }"#;
        let output = generate(json).unwrap();
        assert!(output.header.contains("struct Position {"));
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn malformed_schema_is_a_bad_schema_error() {
        let err = generate("{ not json").unwrap_err();
        assert!(matches!(err, GenError::BadSchema { .. }));
    }
}
