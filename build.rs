fn main() {
    // Release builds set TICKLIST_VERSION (e.g., "0.1.0-abc1234"); otherwise derive from git.
    if let Ok(version) = std::env::var("TICKLIST_VERSION") {
        println!("cargo:rustc-env=TICKLIST_VERSION={version}");
    } else {
        let hash = std::process::Command::new("git")
            .args(["rev-parse", "--short=7", "HEAD"])
            .output()
            .ok()
            .filter(|o| o.status.success())
            .and_then(|o| String::from_utf8(o.stdout).ok())
            .unwrap_or_default()
            .trim()
            .to_string();

        let pkg = std::env::var("CARGO_PKG_VERSION").unwrap_or_default();
        if hash.is_empty() {
            println!("cargo:rustc-env=TICKLIST_VERSION={pkg}");
        } else {
            println!("cargo:rustc-env=TICKLIST_VERSION={pkg}-{hash}");
        }
    }
    println!("cargo:rerun-if-env-changed=TICKLIST_VERSION");
}
