use std::env;
use std::path::{Path, PathBuf};

use crate::DEFAULT_CIRCUIT_PATH;
use crate::error::ConfigError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub circuit_path: PathBuf,
    pub nargo_bin: PathBuf,
    pub program_dir: Option<PathBuf>,
    pub bb_bin: PathBuf,
    pub log_format: LogFormat,
}

impl Config {
    /// Reads the environment (call `dotenvy::dotenv()` first to pick up `.env`).
    /// Every variable is optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let log_format = match var("LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    name: "LOG_FORMAT",
                    value: other.to_string(),
                    expected: "text, json",
                });
            }
        };

        Ok(Self {
            circuit_path: var("PANAGRAM_CIRCUIT")
                .unwrap_or_else(|| DEFAULT_CIRCUIT_PATH.to_string())
                .into(),
            nargo_bin: var("NARGO_BIN").unwrap_or_else(|| "nargo".to_string()).into(),
            program_dir: var("NARGO_PROGRAM_DIR").map(PathBuf::from),
            bb_bin: var("BB_BIN").unwrap_or_else(|| "bb".to_string()).into(),
            log_format,
        })
    }

    pub fn with_circuit_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.circuit_path = path.into();
        self
    }

    /// Package directory `nargo execute` runs in. Unless configured, this is the
    /// directory holding the artifact's `target/`.
    pub fn program_dir(&self) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = &self.program_dir {
            return Ok(dir.clone());
        }

        let dir = self
            .circuit_path
            .parent()
            .and_then(Path::parent)
            .ok_or_else(|| ConfigError::ProgramDir(self.circuit_path.clone()))?;

        if dir.as_os_str().is_empty() {
            Ok(PathBuf::from("."))
        } else {
            Ok(dir.to_path_buf())
        }
    }
}
