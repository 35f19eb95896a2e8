//! Stamps the binary with `<package version>+<git revision>`, reported by
//! `--version` and the startup log.

use std::env;
use std::process::Command;

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn main() {
    let revision = git(&["describe", "--always", "--dirty=-modified"])
        .unwrap_or_else(|| "unknown".to_string());
    let version = env::var("CARGO_PKG_VERSION").unwrap_or_default();

    println!("cargo:rustc-env=BUILD_VERSION={}+{}", version, revision);

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");
}
