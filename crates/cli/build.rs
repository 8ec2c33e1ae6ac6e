//! Build script for the ocr-review CLI
//!
//! Records build metadata shown by `ocr-review --version`

use std::env;

fn emit(key: &str, value: String) {
    println!("cargo:rustc-env={}={}", key, value);
}

fn main() {
    built::write_built_file().expect("Failed to acquire build-time information");

    let or_unknown = |var: &str| env::var(var).unwrap_or_else(|_| "unknown".to_string());
    emit("BUILT_HOST", or_unknown("HOST"));
    emit("BUILT_GIT_COMMIT_HASH", or_unknown("GIT_COMMIT_HASH"));
    emit("BUILT_TIME_UTC", chrono::Utc::now().to_rfc3339());
    println!("cargo:rerun-if-env-changed=GIT_COMMIT_HASH");
}
