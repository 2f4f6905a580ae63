//! Embeds the build identity the CLI logs at startup

use std::env;
use std::process::Command;

/// Stdout of a git command, or `None` outside a checkout
fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|stdout| stdout.trim().to_string())
}

fn main() {
    let revision = match (
        git(&["rev-parse", "--short=8", "HEAD"]),
        git(&["status", "--porcelain", "--untracked-files=no"]),
    ) {
        (Some(hash), Some(changes)) if !changes.is_empty() => format!("{}-dirty", hash),
        (Some(hash), _) => hash,
        (None, _) => "unknown".to_string(),
    };

    let built_at = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    let target = env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());

    for (key, value) in [
        ("FRAMESCRIBE_GIT_REVISION", revision),
        ("FRAMESCRIBE_BUILT_AT", built_at.to_string()),
        ("FRAMESCRIBE_BUILD_PROFILE", profile),
        ("FRAMESCRIBE_BUILD_TARGET", target),
    ] {
        println!("cargo:rustc-env={}={}", key, value);
    }

    println!("cargo:rerun-if-changed=../.git/HEAD");
    println!("cargo:rerun-if-changed=../.git/index");
}
