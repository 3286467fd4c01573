use std::io;
use std::path::PathBuf;

use primitives::encoding::EncodingError;

pub type Result<T, E = ProverError> = std::result::Result<T, E>;

/// Every way a proof run can fail. The CLI maps all of them to exit code 1.
#[derive(Debug, thiserror::Error)]
pub enum ProverError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} has invalid value {value:?}, expected one of: {expected}")]
    InvalidValue {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("cannot derive the nargo program directory from {0}, set NARGO_PROGRAM_DIR")]
    ProgramDir(PathBuf),
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read circuit file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse circuit file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("circuit file {path} has invalid bytecode")]
    Bytecode {
        path: PathBuf,
        #[source]
        source: Option<base64::DecodeError>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("missing value for circuit input `{name}`")]
    Missing { name: String },
    #[error("value {value:?} for circuit input `{name}` is not a field element")]
    Malformed { name: String, value: String },
    #[error("failed to render prover inputs")]
    Render(#[from] toml::ser::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("`{program}` not found, install it or point {env} at it")]
    ToolNotFound {
        program: PathBuf,
        env: &'static str,
        #[source]
        source: which::Error,
    },
    #[error("failed to spawn `{program}`")]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to stage {what}")]
    Staging {
        what: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("failed to generate witness")]
    WitnessGeneration(#[source] eyre::Report),
    #[error("failed to generate proof")]
    ProofGeneration(#[source] eyre::Report),
}

/// Displays an error followed by each of its sources, `outer: inner: root`.
pub struct Chain<'a>(pub &'a (dyn std::error::Error + 'static));

impl std::fmt::Display for Chain<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)?;
        let mut source = self.0.source();
        while let Some(err) = source {
            write!(f, ": {err}")?;
            source = err.source();
        }
        Ok(())
    }
}
