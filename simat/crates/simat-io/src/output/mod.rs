//! Output writers.

use std::fs::File;
use std::io;
use std::path::Path;

use simat_matrix::HMatrix;

use crate::{IoError, OutputConfig, Result};

pub mod json;
pub mod libsvm;
pub mod text;

pub use json::JsonWriter;
pub use libsvm::LibsvmWriter;
pub use text::TextWriter;

/// Serializes one filled matrix.
pub trait Writer {
    /// Write the matrix; returns the number of values written.
    fn write(&mut self, matrix: &HMatrix<'_>, measure: &str) -> Result<usize>;
}

/// Open the writer selected by `format` (empty means `text`), targeting
/// `path` or standard output.
pub fn open_writer(
    format: &str,
    path: Option<&Path>,
    cfg: &OutputConfig,
) -> Result<Box<dyn Writer>> {
    let format = if format.is_empty() { "text" } else { format };
    match format {
        "text" => Ok(Box::new(TextWriter::new(sink(path, cfg.compress)?, cfg))),
        "json" => Ok(Box::new(JsonWriter::new(sink(path, false)?, cfg))),
        "libsvm" => Ok(Box::new(LibsvmWriter::new(sink(path, false)?, cfg))),
        other => Err(IoError::UnknownOutputFormat(other.to_string())),
    }
}

/// Build the byte sink: a file or stdout, optionally gzip-wrapped.
fn sink(path: Option<&Path>, compress: bool) -> Result<Box<dyn io::Write>> {
    let raw: Box<dyn io::Write> = match path {
        Some(p) => Box::new(File::create(p).map_err(|e| IoError::path(p, e))?),
        None => Box::new(io::stdout()),
    };
    if compress {
        Ok(Box::new(flate2::write::GzEncoder::new(
            raw,
            flate2::Compression::default(),
        )))
    } else {
        Ok(raw)
    }
}

/// Format a float the short way, like `%g`: `1` instead of `1.0`.
pub(crate) fn fmt_value(v: f32) -> String {
    if v == v.trunc() && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

#[cfg(test)]
pub(crate) mod tests_support {
    use std::io;
    use std::sync::atomic::AtomicBool;
    use std::sync::{Arc, Mutex};

    use simat_matrix::{compute, ComputeConfig, HMatrix};
    use simat_measures::{measure_for, MeasuresConfig};
    use simat_str::{HString, Preproc, PreprocConfig};
    use simat_util::VCache;

    /// A small labeled 3x3 Levenshtein matrix over `aa`, `ab`, `bb`:
    ///
    /// ```text
    ///   0 1 2
    ///   1 0 1
    ///   2 1 0
    /// ```
    ///
    /// The inputs are leaked so the borrowed matrix can outlive the call.
    pub(crate) fn matrix_fixture() -> HMatrix<'static> {
        let p = Preproc::new(&PreprocConfig::default());
        let strings: Vec<HString> = [
            ("aa", 1.0, "a.txt"),
            ("ab", 2.0, "b.txt"),
            ("bb", 3.0, "c.txt"),
        ]
        .into_iter()
        .map(|(s, label, src)| {
            p.apply(
                HString::new(s.as_bytes().to_vec())
                    .with_label(label)
                    .with_source(src),
            )
        })
        .collect();
        let strings: &'static [HString] = Box::leak(strings.into_boxed_slice());

        let measure = measure_for("dist_levenshtein", &MeasuresConfig::default()).unwrap();
        let cache = VCache::new(4096);
        let cfg = ComputeConfig {
            num_threads: Some(1),
            ..Default::default()
        };
        compute(
            strings,
            measure.as_ref(),
            &cache,
            &cfg,
            &AtomicBool::new(false),
            None,
        )
        .unwrap()
    }

    /// In-memory sink that stays readable after the writer is done.
    #[derive(Clone)]
    pub(crate) struct Sink(Arc<Mutex<Vec<u8>>>);

    impl Sink {
        pub(crate) fn new() -> Self {
            Sink(Arc::new(Mutex::new(Vec::new())))
        }

        pub(crate) fn boxed(&self) -> Box<dyn io::Write> {
            Box::new(SinkHandle(Arc::clone(&self.0)))
        }

        pub(crate) fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    struct SinkHandle(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SinkHandle {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}
