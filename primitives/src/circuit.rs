//! Model of the artifact `nargo compile` writes to `target/<package>.json`.
//!
//! Only the fields the proving pipeline touches are modelled. The format itself
//! belongs to the Noir toolchain.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

use crate::inputs::ProofInputs;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CircuitArtifact {
    /// Compiler version that produced the artifact, e.g. `1.0.0-beta.3+...`.
    #[serde(default)]
    pub noir_version: Option<String>,

    /// Named input slots of the circuit's `main`.
    #[serde(default)]
    pub abi: CircuitAbi,

    /// Base64 of the gzipped ACIR program.
    pub bytecode: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CircuitAbi {
    #[serde(default)]
    pub parameters: Vec<AbiParameter>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AbiParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub typ: AbiType,
    #[serde(default)]
    pub visibility: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AbiType {
    pub kind: String,
}

impl AbiType {
    pub fn is_field(&self) -> bool {
        self.kind == "field"
    }
}

impl CircuitArtifact {
    /// Decodes the program bytes. The result is still gzip-compressed.
    pub fn decode_bytecode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(self.bytecode.trim())
    }

    /// Input names the circuit expects. Artifacts stripped of their ABI fall
    /// back to the two panagram inputs.
    pub fn input_names(&self) -> Vec<&str> {
        if self.abi.parameters.is_empty() {
            return ProofInputs::FIELDS.to_vec();
        }
        self.abi.parameters.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn parameter(&self, name: &str) -> Option<&AbiParameter> {
        self.abi.parameters.iter().find(|p| p.name == name)
    }
}
