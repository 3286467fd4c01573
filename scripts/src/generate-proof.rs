use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use primitives::inputs::ProofInputs;
use scripts::config::{Config, LogFormat};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "generate-proof")]
#[command(about = "Generate a panagram proof and print its contract ABI encoding", long_about = None)]
struct Args {
    /// Circuit inputs in order: GUESS_HASH ANSWER_HASH
    #[arg(value_name = "INPUTS")]
    inputs: Vec<String>,

    /// Compiled circuit (defaults to ../circuits/target/zk_panagram.json next to this crate)
    #[arg(long, value_name = "PATH")]
    circuit: Option<PathBuf>,

    /// How the encoded proof is written to stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Hex)]
    format: OutputFormat,

    /// Also save the encoded proof to this file
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// `0x`-prefixed hex, as read by Foundry's `vm.ffi`
    Hex,
    /// The encoded bytes themselves
    Raw,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Any failure exits with 1, including bad arguments.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(path) = &args.circuit {
        config = config.with_circuit_path(path);
    }

    init_tracing(config.log_format);

    let inputs = ProofInputs::from_positional(&args.inputs);

    // Failures are already logged by the library.
    let Ok(encoded) = scripts::prove_and_encode(&config, &inputs).await else {
        return ExitCode::FAILURE;
    };

    match emit(&encoded, &args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Failed to write encoded proof");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; stdout only ever carries the encoded proof.
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("error,scripts=info,generate_proof=info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn emit(encoded: &[u8], args: &Args) -> std::io::Result<()> {
    let payload = match args.format {
        OutputFormat::Hex => format!("0x{}", hex::encode(encoded)).into_bytes(),
        OutputFormat::Raw => encoded.to_vec(),
    };

    if let Some(path) = &args.output {
        std::fs::write(path, &payload)?;
        info!(path = %path.display(), "Encoded proof saved");
    }

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&payload)?;
    stdout.flush()
}
