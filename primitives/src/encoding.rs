//! Contract ABI encoding of a proof.
//!
//! The verifier contract takes the proof as a single `bytes` parameter, so the
//! encoding is the parameter list `(bytes)`: a `0x20` offset word, a length word
//! and the proof right-padded to a multiple of 32 bytes.

use alloy_primitives::Bytes;
use alloy_sol_types::{SolType, sol_data};

type ProofParams = (sol_data::Bytes,);

/// Raw proof bytes as emitted by the proving backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proof(Bytes);

impl Proof {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    #[error("proof is empty")]
    EmptyProof,
    #[error("malformed proof encoding")]
    Abi(#[from] alloy_sol_types::Error),
}

pub fn encode_proof(proof: &Proof) -> Result<Bytes, EncodingError> {
    if proof.is_empty() {
        return Err(EncodingError::EmptyProof);
    }
    Ok(ProofParams::abi_encode_params(&(proof.0.clone(),)).into())
}

pub fn decode_proof(data: &[u8]) -> Result<Proof, EncodingError> {
    let (bytes,) = ProofParams::abi_decode_params_validate(data)?;
    Ok(Proof(bytes))
}
