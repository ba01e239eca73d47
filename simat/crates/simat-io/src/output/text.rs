//! Text writer: separator-joined rows with optional `#` annotations.

use std::io::Write;

use simat_matrix::HMatrix;

use crate::round::round_sig;
use crate::{OutputConfig, Result};

use super::{fmt_value, Writer};

/// One matrix row per output line. Optional comment lines up front carry
/// the column indices, labels and sources; the same fields can trail each
/// row after a ` #` marker. All of it is off by default, so the plain
/// output is just the values.
pub struct TextWriter {
    sink: Box<dyn Write>,
    separator: String,
    precision: usize,
    save_indices: bool,
    save_labels: bool,
    save_sources: bool,
}

impl TextWriter {
    pub fn new(sink: Box<dyn Write>, cfg: &OutputConfig) -> Self {
        Self {
            sink,
            separator: cfg.separator.clone(),
            precision: cfg.precision,
            save_indices: cfg.save_indices,
            save_labels: cfg.save_labels,
            save_sources: cfg.save_sources,
        }
    }

    fn annotating(&self) -> bool {
        self.save_indices || self.save_labels || self.save_sources
    }
}

impl Writer for TextWriter {
    fn write(&mut self, m: &HMatrix<'_>, measure: &str) -> Result<usize> {
        let strings = m.strings();
        writeln!(
            self.sink,
            "# simat {} - {}",
            env!("CARGO_PKG_VERSION"),
            measure
        )?;

        if self.save_indices {
            write!(self.sink, "#")?;
            for j in m.x().start..m.x().end {
                write!(self.sink, " {j}")?;
            }
            writeln!(self.sink)?;
        }
        if self.save_labels {
            write!(self.sink, "#")?;
            for j in m.x().start..m.x().end {
                write!(self.sink, " {}", fmt_value(strings[j].label().unwrap_or(0.0)))?;
            }
            writeln!(self.sink)?;
        }
        if self.save_sources {
            write!(self.sink, "#")?;
            for j in m.x().start..m.x().end {
                write!(self.sink, " {}", strings[j].source().unwrap_or(""))?;
            }
            writeln!(self.sink)?;
        }

        let mut written = 0usize;
        for i in m.y().start..m.y().end {
            for j in m.x().start..m.x().end {
                if j > m.x().start {
                    write!(self.sink, "{}", self.separator)?;
                }
                let v = round_sig(m.get(j, i), self.precision);
                write!(self.sink, "{}", fmt_value(v))?;
                written += 1;
            }
            if self.annotating() {
                write!(self.sink, " #")?;
                if self.save_indices {
                    write!(self.sink, " {i}")?;
                }
                if self.save_labels {
                    write!(self.sink, " {}", fmt_value(strings[i].label().unwrap_or(0.0)))?;
                }
                if self.save_sources {
                    write!(self.sink, " {}", strings[i].source().unwrap_or(""))?;
                }
            }
            writeln!(self.sink)?;
        }
        self.sink.flush()?;
        Ok(written)
    }
}
