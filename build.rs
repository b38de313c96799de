// SPDX-License-Identifier: MPL-2.0

use std::process::Command;

fn main() {
    // Re-run build script if git HEAD changes
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-changed=.git/refs/tags");
    println!("cargo::rerun-if-env-changed=SINEWAVE_VERSION");

    // Version can be pinned from outside (e.g. distribution packaging)
    let version = std::env::var("SINEWAVE_VERSION").unwrap_or_else(|_| version_from_git());

    println!("cargo::rustc-env=GIT_VERSION={}", version);
}

/// Package version, annotated with the commit when built from a checkout
///
/// - "0.1.0" outside a git checkout
/// - "0.1.0-abcdef1" on a clean checkout
/// - "0.1.0-dirty-abcdef1" with uncommitted changes
fn version_from_git() -> String {
    let package_version = std::env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".into());

    let Some(hash) = git(&["rev-parse", "--short", "HEAD"]) else {
        return package_version;
    };

    let dirty = git(&["status", "--porcelain", "--untracked-files=no"])
        .map(|status| !status.is_empty())
        .unwrap_or(false);

    if dirty {
        format!("{}-dirty-{}", package_version, hash)
    } else {
        format!("{}-{}", package_version, hash)
    }
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;

    if output.status.success() {
        Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        None
    }
}
