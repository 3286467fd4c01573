use std::env;
use std::path::PathBuf;

const CIRCUIT_ARTIFACT: &str = "../circuits/target/zk_panagram.json";

fn main() {
    let manifest_dir =
        PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo"));
    let artifact = manifest_dir.join(CIRCUIT_ARTIFACT);

    println!("cargo:rerun-if-changed=build.rs");

    if !artifact.exists() {
        println!(
            "cargo:warning=circuit artifact not found at {}, run `nargo compile` in ../circuits",
            artifact.display()
        );
    }

    println!("cargo:rustc-env=CIRCUIT_ARTIFACT_PATH={}", artifact.display());
}
