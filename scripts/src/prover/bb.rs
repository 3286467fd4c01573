use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use eyre::{WrapErr, eyre};
use primitives::encoding::Proof;
use tempfile::TempDir;
use tokio::process::Command;
use tracing::{debug, instrument};

use super::{ProvingBackend, Witness, stderr_tail};
use crate::error::{PipelineError, Result};

const CIRCUIT_FILE: &str = "circuit.json";
const WITNESS_FILE: &str = "witness.gz";
const PROOF_FILE: &str = "proof";

/// Transcript hash used for Fiat-Shamir challenges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OracleHash {
    Poseidon2,
    /// Required by the Solidity verifier.
    Keccak,
}

impl OracleHash {
    pub fn as_str(&self) -> &'static str {
        match self {
            OracleHash::Poseidon2 => "poseidon2",
            OracleHash::Keccak => "keccak",
        }
    }
}

#[derive(Clone, Debug)]
pub struct BackendOptions {
    /// Worker threads for `bb`, passed as `HARDWARE_CONCURRENCY`.
    pub threads: usize,
    pub oracle_hash: OracleHash,
    /// Zero-knowledge UltraHonk flavour.
    pub zk: bool,
}

/// Single-threaded Keccak ZK proving, matching the on-chain verifier.
impl Default for BackendOptions {
    fn default() -> Self {
        Self {
            threads: 1,
            oracle_hash: OracleHash::Keccak,
            zk: true,
        }
    }
}

/// UltraHonk prover driving the Barretenberg `bb` binary.
///
/// The circuit bytecode is staged in a private working directory when the
/// backend is built; the directory is removed with the backend.
#[derive(Debug)]
pub struct BbBackend {
    bb: PathBuf,
    options: BackendOptions,
    workdir: TempDir,
}

impl BbBackend {
    pub fn new(bb: impl AsRef<Path>, bytecode: &str, options: BackendOptions) -> Result<Self, PipelineError> {
        let program = bb.as_ref();
        let bb = which::which(program).map_err(|source| PipelineError::ToolNotFound {
            program: program.to_path_buf(),
            env: "BB_BIN",
            source,
        })?;

        let workdir = tempfile::Builder::new()
            .prefix("bb-")
            .tempdir()
            .map_err(|source| PipelineError::Staging {
                what: "backend working directory",
                source,
            })?;

        // bb reads the `bytecode` field when handed a JSON artifact.
        let circuit = serde_json::json!({ "bytecode": bytecode });
        std::fs::write(workdir.path().join(CIRCUIT_FILE), circuit.to_string()).map_err(
            |source| PipelineError::Staging {
                what: "circuit bytecode",
                source,
            },
        )?;

        Ok(Self {
            bb,
            options,
            workdir,
        })
    }

    fn prove_args(&self) -> Vec<OsString> {
        let dir = self.workdir.path();
        let mut args: Vec<OsString> = vec![
            "prove".into(),
            "--scheme".into(),
            "ultra_honk".into(),
            "-b".into(),
            dir.join(CIRCUIT_FILE).into(),
            "-w".into(),
            dir.join(WITNESS_FILE).into(),
            "-o".into(),
            dir.into(),
            "--oracle_hash".into(),
            self.options.oracle_hash.as_str().into(),
        ];
        if self.options.zk {
            args.push("--zk".into());
        }
        args
    }
}

#[async_trait]
impl ProvingBackend for BbBackend {
    #[instrument(skip_all, fields(threads = self.options.threads))]
    async fn generate_proof(self, witness: Witness) -> Result<Proof> {
        let dir = self.workdir.path();
        tokio::fs::write(dir.join(WITNESS_FILE), &witness.0)
            .await
            .map_err(|source| PipelineError::Staging {
                what: "witness",
                source,
            })?;

        debug!("Running bb prove");
        let output = Command::new(&self.bb)
            .args(self.prove_args())
            .env("HARDWARE_CONCURRENCY", self.options.threads.to_string())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| PipelineError::Spawn {
                program: self.bb.clone(),
                source,
            })?;

        if !output.status.success() {
            let report = eyre!("{}", stderr_tail(&output.stderr))
                .wrap_err(format!("bb prove exited with {}", output.status));
            return Err(PipelineError::ProofGeneration(report).into());
        }

        let proof = tokio::fs::read(dir.join(PROOF_FILE))
            .await
            .wrap_err("bb did not write a proof")
            .map_err(PipelineError::ProofGeneration)?;

        Ok(Proof::new(proof))
    }
}
