//! Version command implementation

use crate::error::Result;

/// Run version command
pub fn run() -> Result<()> {
    println!("appbundle {}", env!("CARGO_PKG_VERSION"));
    println!("Minimum Rust: {}", env!("CARGO_PKG_RUST_VERSION"));
    println!(
        "Profile: {}",
        if cfg!(debug_assertions) { "debug" } else { "release" }
    );
    Ok(())
}
