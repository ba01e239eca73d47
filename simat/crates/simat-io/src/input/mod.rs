//! Input readers.

use std::path::Path;

use regex::Regex;
use simat_str::HString;

use crate::{InputConfig, IoError, Result};

pub mod archive;
pub mod dir;
pub mod lines;

pub use archive::ArchiveReader;
pub use dir::DirReader;
pub use lines::LineReader;

/// A stateful input source.
///
/// Each call yields up to `max` fresh raw strings (byte form, with label
/// and source attached); an empty batch signals end of input.
pub trait Reader {
    fn read(&mut self, max: usize) -> Result<Vec<HString>>;
}

/// Open the reader selected by `format`, inferring one from the path when
/// the format is empty: a directory reads as `dir`, a tar-ish extension as
/// `archive`, anything else as `lines`.
pub fn open_reader(format: &str, path: &Path, cfg: &InputConfig) -> Result<Box<dyn Reader>> {
    let format = if format.is_empty() {
        infer_format(path)
    } else {
        format
    };
    match format {
        "dir" => Ok(Box::new(DirReader::open(path, cfg)?)),
        "lines" => Ok(Box::new(LineReader::open(path)?)),
        "archive" => Ok(Box::new(ArchiveReader::open(path, cfg)?)),
        other => Err(IoError::UnknownInputFormat(other.to_string())),
    }
}

fn infer_format(path: &Path) -> &'static str {
    if path.is_dir() {
        return "dir";
    }
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    if name.ends_with(".tar") || name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        "archive"
    } else {
        "lines"
    }
}

/// Compiled `input.decode_label` pattern.
pub(crate) struct LabelDecoder {
    pattern: Option<Regex>,
}

impl LabelDecoder {
    pub(crate) fn new(cfg: &InputConfig) -> Result<Self> {
        let pattern = cfg
            .decode_label
            .as_deref()
            .map(Regex::new)
            .transpose()?;
        Ok(Self { pattern })
    }

    /// Extract a numeric label from a source name. A name the pattern does
    /// not match, or a capture that does not parse, is a per-item warning
    /// and the item simply stays unlabeled.
    pub(crate) fn decode(&self, name: &str) -> Option<f32> {
        let pattern = self.pattern.as_ref()?;
        let captured = pattern
            .captures(name)
            .and_then(|c| c.get(1).or_else(|| c.get(0)));
        match captured {
            Some(m) => match m.as_str().parse::<f32>() {
                Ok(l) => Some(l),
                Err(_) => {
                    tracing::warn!(name, capture = m.as_str(), "label does not parse");
                    None
                }
            },
            None => {
                tracing::warn!(name, "no label in source name");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_inference() {
        assert_eq!(infer_format(Path::new("data.txt")), "lines");
        assert_eq!(infer_format(Path::new("data.tar")), "archive");
        assert_eq!(infer_format(Path::new("data.tar.gz")), "archive");
        assert_eq!(infer_format(Path::new("data.tgz")), "archive");
    }

    #[test]
    fn label_decoder_extracts_first_group() {
        let cfg = InputConfig {
            decode_label: Some(r"^(\d+)_".to_string()),
            ..Default::default()
        };
        let d = LabelDecoder::new(&cfg).unwrap();
        assert_eq!(d.decode("42_sample.txt"), Some(42.0));
        assert_eq!(d.decode("unlabeled.txt"), None);
    }

    #[test]
    fn missing_pattern_means_no_labels() {
        let d = LabelDecoder::new(&InputConfig::default()).unwrap();
        assert_eq!(d.decode("7_x"), None);
    }

    #[test]
    fn broken_pattern_is_fatal() {
        let cfg = InputConfig {
            decode_label: Some("(".to_string()),
            ..Default::default()
        };
        assert!(LabelDecoder::new(&cfg).is_err());
    }
}
