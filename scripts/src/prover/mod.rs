//! Witness generation and proving, both delegated to external tools.

pub mod bb;
pub mod nargo;
pub mod quiet;

use std::time::Instant;

use async_trait::async_trait;
use primitives::circuit::CircuitArtifact;
use primitives::encoding::Proof;
use primitives::inputs::ProofInputs;
use tracing::{error, info, instrument};

use crate::error::{Chain, ProverError, Result};

pub use bb::{BackendOptions, BbBackend, OracleHash};
pub use nargo::NargoExecutor;

/// Solved witness as written by the executor. Never inspected here, only
/// handed on to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Witness(pub Vec<u8>);

#[async_trait]
pub trait CircuitExecutor: Sync {
    async fn execute(&self, circuit: &CircuitArtifact, inputs: &ProofInputs) -> Result<Witness>;
}

/// A prover bound to one circuit. Proving consumes the backend, so an instance
/// produces exactly one proof.
#[async_trait]
pub trait ProvingBackend: Send + Sized {
    async fn generate_proof(self, witness: Witness) -> Result<Proof>;
}

/// Runs the executor, then the backend. Backend diagnostics are muted for the
/// duration of proving; failures are logged once the usual output is back and
/// returned unchanged.
#[instrument(skip_all)]
pub async fn generate_proof<E, B>(
    executor: &E,
    backend: B,
    circuit: &CircuitArtifact,
    inputs: &ProofInputs,
) -> Result<Proof>
where
    E: CircuitExecutor,
    B: ProvingBackend,
{
    let result = async {
        let witness = executor.execute(circuit, inputs).await?;
        info!(bytes = witness.0.len(), "Witness generated");

        let started = Instant::now();
        let proof = quiet::muted(backend.generate_proof(witness)).await?;
        info!(
            bytes = proof.len(),
            elapsed = ?started.elapsed(),
            "Proof generated"
        );

        Ok::<_, ProverError>(proof)
    }
    .await;

    result.inspect_err(|err| error!(error = %Chain(err), "Error generating proof"))
}

/// Last few lines of a tool's stderr, for error messages.
fn stderr_tail(stderr: &[u8]) -> String {
    const LINES: usize = 20;

    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.trim_end().lines().collect();
    lines[lines.len().saturating_sub(LINES)..].join("\n")
}
