// SPDX-License-Identifier: GPL-3.0-only

use std::process::Command;

fn main() {
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-changed=.git/refs/tags");
    println!("cargo::rerun-if-env-changed=QRSCANNER_VERSION");

    // Packagers building from a tarball set the version explicitly
    let version = std::env::var("QRSCANNER_VERSION").unwrap_or_else(|_| git_version());

    println!("cargo::rustc-env=GIT_VERSION={}", version);
}

/// Version from the nearest `v*` tag
///
/// An exact tag gives `0.1.0-<hash>`, later commits give
/// `0.1.0-dirty-<hash>`. Without tags the bare commit hash is used, and the
/// package version outside a git checkout.
fn git_version() -> String {
    let described = Command::new("git")
        .args(["describe", "--tags", "--always", "--match", "v*"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string());

    let Some(described) = described else {
        return commit_hash().unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());
    };
    let described = described.strip_prefix('v').unwrap_or(&described);

    let parts: Vec<&str> = described.rsplitn(3, '-').collect();
    match parts.as_slice() {
        [hash, _commits, base] => {
            format!("{}-dirty-{}", base, hash.strip_prefix('g').unwrap_or(hash))
        }
        _ => match commit_hash() {
            Some(hash) if hash != described => format!("{}-{}", described, hash),
            _ => described.to_string(),
        },
    }
}

fn commit_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;

    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}
