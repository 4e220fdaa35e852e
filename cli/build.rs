//! Build script for riser-cli
//! Exposes GIT_HASH and BUILD_TIME to `utils::version_info`

use std::env;
use std::process::Command;

use chrono::{SecondsFormat, Utc};

fn main() {
    // Release pipelines pass the commit explicitly
    let git_hash = env::var("RISER_GIT_HASH").ok().or_else(git_short_hash);

    println!(
        "cargo:rustc-env=GIT_HASH={}",
        git_hash.unwrap_or_else(|| "unknown".to_string())
    );
    println!(
        "cargo:rustc-env=BUILD_TIME={}",
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
    );

    println!("cargo:rerun-if-env-changed=RISER_GIT_HASH");
    println!("cargo:rerun-if-changed=../.git/HEAD");
}

fn git_short_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
}
