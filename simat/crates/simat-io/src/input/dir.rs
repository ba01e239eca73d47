//! Directory reader: one regular file per string.

use std::fs;
use std::path::{Path, PathBuf};

use simat_str::HString;

use crate::{InputConfig, IoError, Result};

use super::{LabelDecoder, Reader};

/// Reads every regular file of a directory as one string. The file name
/// becomes the source tag and, through `input.decode_label`, the label.
/// Entries are read in sorted name order so input indices are stable
/// across runs and platforms.
pub struct DirReader {
    files: Vec<PathBuf>,
    next: usize,
    labels: LabelDecoder,
}

impl DirReader {
    pub fn open(path: &Path, cfg: &InputConfig) -> Result<Self> {
        let mut files = Vec::new();
        for entry in fs::read_dir(path).map_err(|e| IoError::path(path, e))? {
            let entry = entry.map_err(|e| IoError::path(path, e))?;
            let p = entry.path();
            if p.is_file() {
                files.push(p);
            }
        }
        files.sort();
        Ok(Self {
            files,
            next: 0,
            labels: LabelDecoder::new(cfg)?,
        })
    }
}

impl Reader for DirReader {
    fn read(&mut self, max: usize) -> Result<Vec<HString>> {
        let mut batch = Vec::new();
        while batch.len() < max && self.next < self.files.len() {
            let path = &self.files[self.next];
            self.next += 1;

            let bytes = match fs::read(path) {
                Ok(b) => b,
                Err(e) => {
                    // One unreadable file skips that item, not the run.
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file");
                    continue;
                }
            };
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("")
                .to_string();

            let mut s = HString::new(bytes).with_source(&name);
            if let Some(label) = self.labels.decode(&name) {
                s = s.with_label(label);
            }
            batch.push(s);
        }
        Ok(batch)
    }
}
