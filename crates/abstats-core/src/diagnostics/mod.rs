//! Distributional diagnostics
//!
//! Pre-checks run before a test; their verdicts warn but never block.

mod jarque_bera;

pub use jarque_bera::{jarque_bera, JarqueBeraResult};
