//! netpix-test - Regression test framework for netpix
//!
//! Every crate's `tests/*_reg.rs` drives its checks through a
//! [`RegParams`], which numbers each comparison, records failures instead
//! of panicking at the first one, and reports a summary from
//! [`RegParams::cleanup`].
//!
//! # Usage
//!
//! ```ignore
//! use netpix_test::RegParams;
//!
//! let mut rp = RegParams::new("threshold");
//! rp.compare_values(104.0, t as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "display" to also write produced rasters as
//!   NetPBM files under `tests/regout/`

mod error;
mod params;
pub mod synth;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // netpix-test is at crates/netpix-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
