use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use eyre::{WrapErr, eyre};
use primitives::circuit::CircuitArtifact;
use primitives::inputs::{ProofInputs, parse_field_element};
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use super::{CircuitExecutor, Witness, stderr_tail};
use crate::error::{InputError, PipelineError, Result};

/// Solves witnesses with `nargo execute` inside the circuit's package directory.
///
/// `nargo execute` recompiles the package and rewrites its artifact, so the
/// artifact is checked afterwards against the bytecode the backend was built
/// with.
#[derive(Debug)]
pub struct NargoExecutor {
    nargo: PathBuf,
    program_dir: PathBuf,
    artifact: PathBuf,
}

impl NargoExecutor {
    /// Resolves the `nargo` binary up front so a missing toolchain is reported
    /// before any input is written.
    pub fn init(
        nargo: impl AsRef<Path>,
        program_dir: impl Into<PathBuf>,
        artifact: impl Into<PathBuf>,
    ) -> Result<Self, PipelineError> {
        let program = nargo.as_ref();
        let nargo = which::which(program).map_err(|source| PipelineError::ToolNotFound {
            program: program.to_path_buf(),
            env: "NARGO_BIN",
            source,
        })?;

        Ok(Self {
            nargo,
            program_dir: program_dir.into(),
            artifact: artifact.into(),
        })
    }

    /// Fails when the package artifact no longer holds `expected`, i.e. the
    /// witness was solved for a different program than the one being proven.
    async fn ensure_bytecode_unchanged(&self, expected: &str) -> eyre::Result<()> {
        let contents = tokio::fs::read_to_string(&self.artifact)
            .await
            .wrap_err_with(|| format!("failed to re-read {}", self.artifact.display()))?;
        let current: CircuitArtifact = serde_json::from_str(&contents)
            .wrap_err_with(|| format!("failed to parse {}", self.artifact.display()))?;

        if current.bytecode.trim() != expected.trim() {
            return Err(eyre!(
                "{} was recompiled by nargo and no longer matches the loaded circuit, run `nargo compile` and retry",
                self.artifact.display()
            ));
        }
        Ok(())
    }

    fn execute_args(&self, run_name: &str) -> Vec<OsString> {
        vec![
            "execute".into(),
            run_name.into(),
            "--prover-name".into(),
            run_name.into(),
            "--program-dir".into(),
            self.program_dir.clone().into(),
        ]
    }
}

/// Checks that every input the circuit declares has a value and that `field`
/// inputs hold a BN254 scalar.
pub fn validate_inputs(circuit: &CircuitArtifact, inputs: &ProofInputs) -> Result<(), InputError> {
    for name in circuit.input_names() {
        let value = inputs.get(name).ok_or_else(|| InputError::Missing {
            name: name.to_string(),
        })?;

        let is_field = circuit.parameter(name).map_or(true, |p| p.typ.is_field());
        if is_field && parse_field_element(value).is_none() {
            return Err(InputError::Malformed {
                name: name.to_string(),
                value: value.to_string(),
            });
        }
    }
    Ok(())
}

#[async_trait]
impl CircuitExecutor for NargoExecutor {
    #[instrument(skip_all, fields(program_dir = %self.program_dir.display()))]
    async fn execute(&self, circuit: &CircuitArtifact, inputs: &ProofInputs) -> Result<Witness> {
        validate_inputs(circuit, inputs)?;
        let rendered = inputs.to_prover_toml().map_err(InputError::from)?;

        // nargo resolves `--prover-name` against the package directory, so the
        // inputs file has to live there. Removed when `prover_file` drops.
        let prover_file = tempfile::Builder::new()
            .prefix("Prover-")
            .suffix(".toml")
            .tempfile_in(&self.program_dir)
            .map_err(|source| PipelineError::Staging {
                what: "prover inputs",
                source,
            })?;
        tokio::fs::write(prover_file.path(), rendered)
            .await
            .map_err(|source| PipelineError::Staging {
                what: "prover inputs",
                source,
            })?;

        let run_name = prover_file
            .path()
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!(%run_name, "Executing circuit");

        let output = Command::new(&self.nargo)
            .args(self.execute_args(&run_name))
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| PipelineError::Spawn {
                program: self.nargo.clone(),
                source,
            })?;

        if !output.status.success() {
            let report = eyre!("{}", stderr_tail(&output.stderr))
                .wrap_err(format!("nargo execute exited with {}", output.status));
            return Err(PipelineError::WitnessGeneration(report).into());
        }

        let witness_path = self
            .program_dir
            .join("target")
            .join(format!("{run_name}.gz"));
        let witness = tokio::fs::read(&witness_path)
            .await
            .wrap_err_with(|| format!("nargo did not write {}", witness_path.display()))
            .map_err(PipelineError::WitnessGeneration)?;

        if let Err(err) = tokio::fs::remove_file(&witness_path).await {
            warn!(error = %err, path = %witness_path.display(), "Failed to remove witness file");
        }

        self.ensure_bytecode_unchanged(&circuit.bytecode)
            .await
            .map_err(PipelineError::WitnessGeneration)?;

        Ok(Witness(witness))
    }
}
