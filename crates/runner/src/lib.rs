//! Program loader library for the bytevm runner.

use vm_core as _;
#[cfg(test)]
use tempfile as _;

/// Textual program parsing into a byte image.
pub mod loader;
