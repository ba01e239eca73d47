//! libsvm writer.

use std::io::Write;

use simat_matrix::HMatrix;

use crate::round::round_sig;
use crate::{OutputConfig, Result};

use super::{fmt_value, Writer};

/// One `label index:value ...` line per matrix row; feature indices are
/// 1-based column positions. Rows without a label fall back to 0. The
/// `sparse` knob drops zero entries, which libsvm-style consumers treat
/// as implicit.
pub struct LibsvmWriter {
    sink: Box<dyn Write>,
    precision: usize,
    sparse: bool,
}

impl LibsvmWriter {
    pub fn new(sink: Box<dyn Write>, cfg: &OutputConfig) -> Self {
        Self {
            sink,
            precision: cfg.precision,
            sparse: cfg.sparse,
        }
    }
}

impl Writer for LibsvmWriter {
    fn write(&mut self, m: &HMatrix<'_>, _measure: &str) -> Result<usize> {
        let strings = m.strings();
        let mut written = 0usize;
        for i in m.y().start..m.y().end {
            let label = strings[i].label().unwrap_or(0.0);
            write!(self.sink, "{}", fmt_value(label))?;
            for (feat, j) in (m.x().start..m.x().end).enumerate() {
                let v = round_sig(m.get(j, i), self.precision);
                if self.sparse && v == 0.0 {
                    continue;
                }
                write!(self.sink, " {}:{}", feat + 1, fmt_value(v))?;
                written += 1;
            }
            writeln!(self.sink)?;
        }
        self.sink.flush()?;
        Ok(written)
    }
}
