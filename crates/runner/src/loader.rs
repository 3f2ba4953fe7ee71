//! Textual program parsing into a byte image.
//!
//! A program file is UTF-8 text carrying one instruction byte per non-blank
//! line, written as a base-2 literal (e.g. `10000010`). A `#` starts a
//! comment running to end of line; blank and comment-only lines are
//! skipped. Bytes are produced in line order for loading at address 0.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Error preventing a program byte sequence from being produced.
///
/// Every variant aborts the run before any instruction executes; the
/// loader never touches machine state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The program source could not be read.
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Rendered underlying I/O error.
        message: String,
    },
    /// A non-blank line is not a valid base-2 byte literal.
    InvalidLiteral {
        /// 1-indexed source line number.
        line: usize,
        /// The offending token, comment and whitespace stripped.
        token: String,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => {
                write!(f, "cannot read {}: {message}", path.display())
            }
            Self::InvalidLiteral { line, token } => {
                write!(f, "line {line}: `{token}` is not a base-2 byte literal")
            }
        }
    }
}

impl std::error::Error for LoadError {}

/// Parses program text into the byte sequence to load at address 0.
///
/// # Errors
///
/// Returns [`LoadError::InvalidLiteral`] for the first line whose
/// non-blank token does not parse as a base-2 integer in `[0, 255]`.
pub fn parse_program(text: &str) -> Result<Vec<u8>, LoadError> {
    let mut bytes = Vec::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        let token = match line.split_once('#') {
            Some((code, _comment)) => code.trim(),
            None => line,
        };
        if token.is_empty() {
            continue;
        }

        let byte = u8::from_str_radix(token, 2).map_err(|_| LoadError::InvalidLiteral {
            line: idx + 1,
            token: token.to_string(),
        })?;
        bytes.push(byte);
    }

    Ok(bytes)
}

/// Reads and parses a program file.
///
/// # Errors
///
/// Returns [`LoadError::Io`] when the file cannot be read, and propagates
/// parse failures from [`parse_program`].
pub fn load_program(path: &Path) -> Result<Vec<u8>, LoadError> {
    let text = fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse_program(&text)
}
