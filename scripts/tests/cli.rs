use std::fs;
use std::path::{Path, PathBuf};
use std::process::Output;

use assert_cmd::Command;

const CIRCUIT: &str = r#"{
    "abi": { "parameters": [
        { "name": "guess_hash", "type": { "kind": "field" }, "visibility": "private" },
        { "name": "answer_hash", "type": { "kind": "field" }, "visibility": "public" }
    ] },
    "bytecode": "H4sIAAAAAAAA/wEAAP//AAAAAAAAAAA="
}"#;

const FAKE_NARGO: &str = r#"#!/bin/sh
set -e
name="$2"
while [ $# -gt 0 ]; do
  case "$1" in
    --program-dir) dir="$2"; shift ;;
  esac
  shift
done
echo "[nargo] solved"
mkdir -p "$dir/target"
printf 'witness' > "$dir/target/$name.gz"
"#;

const FAKE_BB: &str = r#"#!/bin/sh
set -e
echo "[bb] proving"
while [ $# -gt 0 ]; do
  case "$1" in
    -o) out="$2"; shift ;;
  esac
  shift
done
printf '\001\002\003' > "$out/proof"
"#;

const FAILING_BB: &str = r#"#!/bin/sh
echo "Failed constraint: circuit is not satisfied" >&2
exit 3
"#;

struct Fixture {
    root: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("circuits/target");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("zk_panagram.json"), CIRCUIT).unwrap();

        let fixture = Self { root };
        fixture.script("nargo", FAKE_NARGO);
        fixture.script("bb", FAKE_BB);
        fixture
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    fn circuit(&self) -> PathBuf {
        self.path("circuits/target/zk_panagram.json")
    }

    #[cfg(unix)]
    fn script(&self, name: &str, body: &str) {
        use std::os::unix::fs::PermissionsExt;

        let path = self.path(name);
        fs::write(&path, body).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(not(unix))]
    fn script(&self, _name: &str, _body: &str) {}

    fn run(&self, args: &[&str]) -> Output {
        Command::cargo_bin("generate-proof")
            .unwrap()
            .current_dir(self.root.path())
            .env_remove("PANAGRAM_CIRCUIT")
            .env_remove("NARGO_PROGRAM_DIR")
            .env_remove("LOG_FORMAT")
            .env_remove("RUST_LOG")
            .env("NARGO_BIN", self.path("nargo"))
            .env("BB_BIN", self.path("bb"))
            .args(args)
            .output()
            .unwrap()
    }
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

/// `0x20` offset, length 3, then `010203` padded to a word.
const ENCODED: &str = concat!(
    "0x",
    "0000000000000000000000000000000000000000000000000000000000000020",
    "0000000000000000000000000000000000000000000000000000000000000003",
    "0102030000000000000000000000000000000000000000000000000000000000",
);

#[cfg(unix)]
#[test]
fn prints_encoded_proof_as_hex() {
    let fixture = Fixture::new();
    let circuit = fixture.circuit();

    let output = fixture.run(&["--circuit", arg(&circuit), "0xabc123", "0xdef456"]);

    assert_eq!(output.status.code(), Some(0), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8(output.stdout).unwrap(), ENCODED);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("[bb] proving"), "{stderr}");
}

#[cfg(unix)]
#[test]
fn raw_format_writes_bytes() {
    let fixture = Fixture::new();
    let circuit = fixture.circuit();

    let output = fixture.run(&[
        "--circuit",
        arg(&circuit),
        "--format",
        "raw",
        "0xabc123",
        "0xdef456",
    ]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(output.stdout.len(), 96);
    assert_eq!(output.stdout[31], 0x20);
    assert!(output.stdout[..31].iter().all(|b| *b == 0));
    assert_eq!(&output.stdout[64..67], &[1, 2, 3]);
}

#[cfg(unix)]
#[test]
fn output_file_gets_the_same_payload() {
    let fixture = Fixture::new();
    let circuit = fixture.circuit();
    let saved = fixture.path("proof.hex");

    let output = fixture.run(&["--circuit", arg(&circuit), "--output", arg(&saved), "1", "2"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(fs::read(&saved).unwrap(), output.stdout);
}

#[cfg(unix)]
#[test]
fn one_input_fails_without_output() {
    let fixture = Fixture::new();
    let circuit = fixture.circuit();

    let output = fixture.run(&["--circuit", arg(&circuit), "0xabc123"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("answer_hash"));
}

#[test]
fn no_inputs_fails_without_output() {
    let fixture = Fixture::new();
    let circuit = fixture.circuit();

    let output = fixture.run(&["--circuit", arg(&circuit)]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn missing_circuit_fails_fast() {
    let fixture = Fixture::new();
    let missing = fixture.path("circuits/target/absent.json");

    let output = fixture.run(&["--circuit", arg(&missing), "0xabc123", "0xdef456"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read circuit file"), "{stderr}");
    assert!(!stderr.contains("Witness generated"), "{stderr}");
}

#[test]
fn unknown_flag_exits_with_one() {
    let fixture = Fixture::new();

    let output = fixture.run(&["--threads", "8", "0xabc123", "0xdef456"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[cfg(unix)]
#[test]
fn proving_failure_is_reported_once() {
    let fixture = Fixture::new();
    fixture.script("bb", FAILING_BB);
    let circuit = fixture.circuit();

    let output = fixture.run(&["--circuit", arg(&circuit), "0xabc123", "0xdef456"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("failed to generate proof").count(), 1, "{stderr}");
}
