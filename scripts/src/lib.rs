pub mod config;
pub mod error;
pub mod loader;
pub mod prover;


use alloy_primitives::Bytes;
use primitives::circuit::CircuitArtifact;
use primitives::encoding::encode_proof;
use primitives::inputs::ProofInputs;
use tracing::{error, instrument};

use config::Config;
use error::{Chain, ProverError, Result};
use loader::load_circuit;
use prover::{BackendOptions, BbBackend, NargoExecutor, generate_proof};

/// `../circuits/target/zk_panagram.json`, resolved against this crate's own
/// directory at build time.
pub const DEFAULT_CIRCUIT_PATH: &str = env!("CIRCUIT_ARTIFACT_PATH");

/// Loads the circuit, proves `inputs` against it and returns the contract ABI
/// encoding of the proof.
///
/// The circuit is loaded before either external tool is touched, so a bad
/// artifact path fails without starting any proving work. Every failure is
/// logged exactly once before it is returned.
#[instrument(skip_all, fields(circuit = %config.circuit_path.display()))]
pub async fn prove_and_encode(config: &Config, inputs: &ProofInputs) -> Result<Bytes> {
    let (circuit, executor, backend) =
        prepare(config).inspect_err(|err| error!(error = %Chain(err), "Failed to set up proving"))?;

    // logs its own failures
    let proof = generate_proof(&executor, backend, &circuit, inputs).await?;

    encode_proof(&proof)
        .map_err(ProverError::from)
        .inspect_err(|err| error!(error = %Chain(err), "Failed to encode proof"))
}

fn prepare(config: &Config) -> Result<(CircuitArtifact, NargoExecutor, BbBackend)> {
    let circuit = load_circuit(&config.circuit_path)?;

    let executor = NargoExecutor::init(
        &config.nargo_bin,
        config.program_dir()?,
        &config.circuit_path,
    )?;
    let backend = BbBackend::new(&config.bb_bin, &circuit.bytecode, BackendOptions::default())?;

    Ok((circuit, executor, backend))
}
