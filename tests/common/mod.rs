// Shared helpers for the CLI integration tests.
#![allow(dead_code)]

use assert_cmd::Command;
use std::io::Write;
use std::path::Path;

/// The `bfi` binary with the caller's limits, REPL mode and config file kept
/// out of the picture.
pub fn cargo_bin() -> Command {
    cargo_bin_with_config(&std::env::temp_dir().join("bfi-tests-no-config"))
}

/// Like [`cargo_bin`], but reading `bfi.toml` from `config_home`.
pub fn cargo_bin_with_config(config_home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("bfi").expect("bfi binary");
    cmd.env_remove("BFI_MAX_STEPS")
        .env_remove("BFI_TIMEOUT_MS")
        .env_remove("BFI_REPL_MODE")
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", config_home);
    cmd
}

pub fn source_file(content: &str) -> tempfile::NamedTempFile {
    let mut tf = tempfile::NamedTempFile::new().expect("tempfile");
    write!(tf, "{}", content).unwrap();
    tf
}
