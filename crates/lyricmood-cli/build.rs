use chrono::Local;
use std::process::Command;

/// Short commit hash, or `None` outside a git checkout.
fn git_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// True when tracked files differ from HEAD (untracked files don't count).
fn is_dirty() -> bool {
    Command::new("git")
        .args(["diff", "--quiet", "HEAD"])
        .status()
        .map(|s| !s.success())
        .unwrap_or(false)
}

fn main() {
    let hash = git_hash().unwrap_or_else(|| "unknown".to_string());
    let build_hash = if is_dirty() {
        format!("{hash}-dirty-{}", Local::now().format("%Y%m%d-%H%M%S"))
    } else {
        hash
    };
    println!("cargo:rustc-env=BUILD_HASH={build_hash}");

    // .git lives at the workspace root, two levels up
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/index");
}
