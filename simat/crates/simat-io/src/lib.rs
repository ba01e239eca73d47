//! simat-io - Input Readers and Output Writers
//!
//! Readers populate the input array with raw byte-form strings (plus label
//! and source tag); writers serialize one filled matrix. Both sides are
//! selected by format name:
//!
//! - input: `dir` (one file per string), `lines` (one line per string,
//!   plain or gzip), `archive` (one tar member per string)
//! - output: `text` (separator-joined rows with optional `#` headers),
//!   `json`, `libsvm`
//!
//! The core never looks inside this crate; it sees a `Vec<HString>` going
//! in and hands a `&HMatrix` out.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod input;
pub mod output;
mod round;

pub use input::{open_reader, Reader};
pub use output::{open_writer, Writer};
pub use round::round_sig;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("unknown input format '{0}'")]
    UnknownInputFormat(String),

    #[error("unknown output format '{0}'")]
    UnknownOutputFormat(String),

    #[error("invalid label pattern: {0}")]
    LabelPattern(#[from] regex::Error),

    #[error("{path}: {source}")]
    Path {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl IoError {
    fn path(path: &Path, source: std::io::Error) -> Self {
        IoError::Path {
            path: path.display().to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, IoError>;

/// The `input.*` configuration group, minus the preprocessing knobs that
/// live with `simat-str`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputConfig {
    /// Reader format; empty means infer from the path.
    #[serde(default)]
    pub format: String,

    /// Regex extracting a numeric label from a filename or archive member
    /// name; the first capture group is parsed as a float.
    #[serde(default)]
    pub decode_label: Option<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            format: String::new(),
            decode_label: None,
        }
    }
}

/// The `output.*` configuration group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// Writer format; empty means `text`.
    #[serde(default)]
    pub format: String,

    /// Value separator for the text format.
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Significant digits kept in the output; 0 disables rounding.
    #[serde(default)]
    pub precision: usize,

    #[serde(default)]
    pub save_indices: bool,
    #[serde(default)]
    pub save_labels: bool,
    #[serde(default)]
    pub save_sources: bool,

    /// Emit only non-zero entries in the libsvm format.
    #[serde(default)]
    pub sparse: bool,

    /// Gzip-compress the output stream (text format).
    #[serde(default)]
    pub compress: bool,
}

fn default_separator() -> String {
    ",".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: String::new(),
            separator: default_separator(),
            precision: 0,
            save_indices: false,
            save_labels: false,
            save_sources: false,
            sparse: false,
            compress: false,
        }
    }
}
