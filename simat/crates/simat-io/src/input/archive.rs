//! Archive reader: one tar member per string.

use std::collections::VecDeque;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use flate2::read::MultiGzDecoder;
use simat_str::HString;
use tar::Archive;

use crate::{InputConfig, IoError, Result};

use super::{LabelDecoder, Reader};

/// Reads every regular member of a tar archive (optionally gzipped) as
/// one string; the member path becomes the source tag.
///
/// tar streams cannot be rewound, so the archive is drained at open time
/// and batches are served from memory.
pub struct ArchiveReader {
    members: VecDeque<HString>,
}

impl ArchiveReader {
    pub fn open(path: &Path, cfg: &InputConfig) -> Result<Self> {
        let file = File::open(path).map_err(|e| IoError::path(path, e))?;
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        let gz = name.ends_with(".tar.gz") || name.ends_with(".tgz");
        let reader: Box<dyn Read> = if gz {
            Box::new(MultiGzDecoder::new(file))
        } else {
            Box::new(file)
        };

        let labels = LabelDecoder::new(cfg)?;
        let mut members = VecDeque::new();
        let mut archive = Archive::new(reader);
        for entry in archive.entries().map_err(|e| IoError::path(path, e))? {
            let mut entry = entry.map_err(|e| IoError::path(path, e))?;
            if !entry.header().entry_type().is_file() {
                continue;
            }
            let member = entry
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            let mut bytes = Vec::new();
            if let Err(e) = entry.read_to_end(&mut bytes) {
                tracing::warn!(member, error = %e, "skipping unreadable archive member");
                continue;
            }
            let mut s = HString::new(bytes).with_source(&member);
            if let Some(label) = labels.decode(&member) {
                s = s.with_label(label);
            }
            members.push_back(s);
        }
        Ok(Self { members })
    }
}

impl Reader for ArchiveReader {
    fn read(&mut self, max: usize) -> Result<Vec<HString>> {
        let take = max.min(self.members.len());
        Ok(self.members.drain(..take).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn build_tar(members: &[(&str, &str)]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        for (name, content) in members {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, name, content.as_bytes())
                .unwrap();
        }
        builder.into_inner().unwrap()
    }

    #[test]
    fn members_become_strings_with_sources() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.tar");
        std::fs::write(&path, build_tar(&[("x/a.txt", "alpha"), ("b.txt", "bravo")])).unwrap();

        let mut r = ArchiveReader::open(&path, &InputConfig::default()).unwrap();
        let batch = r.read(10).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].source(), Some("x/a.txt"));
        assert_eq!(batch[0].as_bytes(), Some(&b"alpha"[..]));
        assert_eq!(batch[1].as_bytes(), Some(&b"bravo"[..]));
    }

    #[test]
    fn gzipped_archive_reads_transparently() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.tar.gz");
        let f = File::create(&path).unwrap();
        let mut enc = GzEncoder::new(f, Compression::default());
        enc.write_all(&build_tar(&[("only.txt", "data")])).unwrap();
        enc.finish().unwrap();

        let mut r = ArchiveReader::open(&path, &InputConfig::default()).unwrap();
        let batch = r.read(10).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].as_bytes(), Some(&b"data"[..]));
    }

    #[test]
    fn member_labels_use_the_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.tar");
        std::fs::write(&path, build_tar(&[("3_x.txt", "x")])).unwrap();

        let cfg = InputConfig {
            decode_label: Some(r"(\d+)_".to_string()),
            ..Default::default()
        };
        let mut r = ArchiveReader::open(&path, &cfg).unwrap();
        let batch = r.read(10).unwrap();
        assert_eq!(batch[0].label(), Some(3.0));
    }

    #[test]
    fn batching_drains_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.tar");
        std::fs::write(
            &path,
            build_tar(&[("1", "a"), ("2", "b"), ("3", "c")]),
        )
        .unwrap();

        let mut r = ArchiveReader::open(&path, &InputConfig::default()).unwrap();
        assert_eq!(r.read(2).unwrap().len(), 2);
        assert_eq!(r.read(2).unwrap().len(), 1);
        assert!(r.read(2).unwrap().is_empty());
    }
}
