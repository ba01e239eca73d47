//! Line reader: one non-empty line per string.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use simat_str::HString;

use crate::{IoError, Result};

use super::Reader;

/// Reads a text file line by line; a `.gz` suffix switches to a gzip
/// stream transparently. Empty lines are skipped. A line may carry a
/// leading `label:` prefix; when the prefix parses as a number it becomes
/// the label and is stripped from the content. The source tag is
/// `<path>:<lineno>`.
pub struct LineReader {
    lines: Box<dyn BufRead>,
    path: String,
    lineno: usize,
}

impl LineReader {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| IoError::path(path, e))?;
        let gz = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("gz"));
        let lines: Box<dyn BufRead> = if gz {
            Box::new(BufReader::new(MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };
        Ok(Self {
            lines,
            path: path.display().to_string(),
            lineno: 0,
        })
    }
}

/// Split an optional numeric `label:` prefix off a line.
fn split_label(line: &[u8]) -> (Option<f32>, &[u8]) {
    if let Some(colon) = line.iter().position(|&b| b == b':') {
        let head = &line[..colon];
        if !head.is_empty() {
            if let Ok(label) = std::str::from_utf8(head).unwrap_or("").parse::<f32>() {
                return (Some(label), &line[colon + 1..]);
            }
        }
    }
    (None, line)
}

impl Reader for LineReader {
    fn read(&mut self, max: usize) -> Result<Vec<HString>> {
        let mut batch = Vec::new();
        let mut buf = Vec::new();
        while batch.len() < max {
            buf.clear();
            let n = self.lines.read_until(b'\n', &mut buf)?;
            if n == 0 {
                break;
            }
            self.lineno += 1;
            while buf.last().is_some_and(|&b| b == b'\n' || b == b'\r') {
                buf.pop();
            }
            if buf.is_empty() {
                continue;
            }
            let (label, content) = split_label(&buf);
            let mut s = HString::new(content.to_vec())
                .with_source(format!("{}:{}", self.path, self.lineno));
            if let Some(label) = label {
                s = s.with_label(label);
            }
            batch.push(s);
        }
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn reader_for(content: &str) -> (LineReader, tempfile::NamedTempFile) {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        let r = LineReader::open(f.path()).unwrap();
        (r, f)
    }

    #[test]
    fn skips_empty_lines_and_strips_newlines() {
        let (mut r, _f) = reader_for("alpha\n\nbravo\r\n\n");
        let batch = r.read(10).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].as_bytes(), Some(&b"alpha"[..]));
        assert_eq!(batch[1].as_bytes(), Some(&b"bravo"[..]));
    }

    #[test]
    fn numeric_label_prefix_is_parsed() {
        let (mut r, _f) = reader_for("1:spam text\n-0.5:odd one\nno label here\n");
        let batch = r.read(10).unwrap();
        assert_eq!(batch[0].label(), Some(1.0));
        assert_eq!(batch[0].as_bytes(), Some(&b"spam text"[..]));
        assert_eq!(batch[1].label(), Some(-0.5));
        assert_eq!(batch[2].label(), None);
        assert_eq!(batch[2].as_bytes(), Some(&b"no label here"[..]));
    }

    #[test]
    fn source_tags_carry_line_numbers() {
        let (mut r, _f) = reader_for("a\nb\n");
        let batch = r.read(10).unwrap();
        assert!(batch[0].source().unwrap().ends_with(":1"));
        assert!(batch[1].source().unwrap().ends_with(":2"));
    }

    #[test]
    fn gzip_input_reads_transparently() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.gz");
        let f = File::create(&path).unwrap();
        let mut enc = GzEncoder::new(f, Compression::default());
        enc.write_all(b"one\ntwo\n").unwrap();
        enc.finish().unwrap();

        let mut r = LineReader::open(&path).unwrap();
        let batch = r.read(10).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[1].as_bytes(), Some(&b"two"[..]));
    }

    #[test]
    fn last_line_without_newline_is_read() {
        let (mut r, _f) = reader_for("a\nfinal");
        let batch = r.read(10).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[1].as_bytes(), Some(&b"final"[..]));
    }
}
