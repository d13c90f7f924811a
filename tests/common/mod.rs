use assert_cmd::cargo_bin;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// The CLI with configuration pinned, so a developer's `.env` or shell
/// variables do not leak into assertions.
pub fn cli() -> Command {
    let mut cmd = Command::new(cargo_bin!());
    cmd.env("PAYMENTS_API_VERSION", "legacy")
        .env("MARKETPLACE_SERVICE_NAME", "Sharetribe")
        .env("APP_LOG_LEVEL", "warn")
        .env("FEATURE_APPROVE_LISTINGS", "false")
        .env("FEATURE_LOCATION_SEARCH", "false")
        .env("FEATURE_STRIPE_PAYMENTS", "false")
        .env_remove("RUST_LOG");
    cmd
}

pub fn write_json(dir: &Path, name: &str, value: &Value) -> Result<PathBuf, std::io::Error> {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_vec_pretty(value)?)?;
    Ok(path)
}
