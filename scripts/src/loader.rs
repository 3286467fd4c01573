use std::fs;
use std::path::Path;

use primitives::circuit::CircuitArtifact;
use tracing::{debug, instrument};

use crate::error::LoadError;

/// Reads and validates a compiled circuit. A missing file is a configuration
/// error and is never retried.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_circuit(path: impl AsRef<Path>) -> Result<CircuitArtifact, LoadError> {
    let path = path.as_ref();

    let contents = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let circuit: CircuitArtifact =
        serde_json::from_str(&contents).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let bytecode = circuit
        .decode_bytecode()
        .map_err(|source| LoadError::Bytecode {
            path: path.to_path_buf(),
            source: Some(source),
        })?;
    if bytecode.is_empty() {
        return Err(LoadError::Bytecode {
            path: path.to_path_buf(),
            source: None,
        });
    }

    debug!(
        noir_version = circuit.noir_version.as_deref().unwrap_or("unknown"),
        bytecode_len = bytecode.len(),
        inputs = ?circuit.input_names(),
        "Circuit loaded"
    );

    Ok(circuit)
}
