use std::env;

fn main() {
    // Version string shown by the CLI
    let version = env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=WAYFINDER_VERSION={version}");

    println!("cargo:rerun-if-changed=src/");
    println!("cargo:rerun-if-changed=data/");
    println!("cargo:rerun-if-changed=Cargo.toml");
}
