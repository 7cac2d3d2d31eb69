//! Build script for the web crate.
//!
//! Fingerprints the polls stylesheet so templates can append a cache-busting
//! version to its URL.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

fn main() {
    hash_stylesheet();
}

/// Hash `static/polls/style.css`.
///
/// Sets `STYLE_HASH` for use with `env!("STYLE_HASH")`. An empty hash means
/// templates link the stylesheet without a version.
fn hash_stylesheet() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let css_path = Path::new(&manifest_dir).join("static/polls/style.css");

    println!("cargo:rerun-if-changed={}", css_path.display());

    let content = match fs::read(&css_path) {
        Ok(content) => content,
        Err(e) => {
            println!("cargo:warning=Could not read style.css: {e}");
            println!("cargo:rustc-env=STYLE_HASH=");
            return;
        }
    };

    // First 8 hex chars of SHA-256
    let hash = format!("{:x}", Sha256::digest(&content));
    let short_hash = hash.get(..8).unwrap_or(&hash);

    println!("cargo:rustc-env=STYLE_HASH={short_hash}");
}
