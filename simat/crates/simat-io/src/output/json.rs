//! JSON writer.

use std::io::Write;

use serde_json::json;
use simat_matrix::HMatrix;

use crate::round::round_sig;
use crate::{OutputConfig, Result};

use super::Writer;

/// Emits one object with `matrix`, `labels`, `sources`, `indices` and
/// `measure` fields. The matrix is expanded to full rectangular rows, so
/// consumers never see the triangular packing; labels, sources and
/// indices are split into the `x` (column) and `y` (row) views.
pub struct JsonWriter {
    sink: Box<dyn Write>,
    precision: usize,
}

impl JsonWriter {
    pub fn new(sink: Box<dyn Write>, cfg: &OutputConfig) -> Self {
        Self {
            sink,
            precision: cfg.precision,
        }
    }
}

impl Writer for JsonWriter {
    fn write(&mut self, m: &HMatrix<'_>, measure: &str) -> Result<usize> {
        let strings = m.strings();
        let xs: Vec<usize> = (m.x().start..m.x().end).collect();
        let ys: Vec<usize> = (m.y().start..m.y().end).collect();

        let rows: Vec<Vec<f32>> = ys
            .iter()
            .map(|&i| {
                xs.iter()
                    .map(|&j| round_sig(m.get(j, i), self.precision))
                    .collect()
            })
            .collect();

        let labels = |idx: &[usize]| -> Vec<Option<f32>> {
            idx.iter().map(|&k| strings[k].label()).collect()
        };
        let sources = |idx: &[usize]| -> Vec<Option<&str>> {
            idx.iter().map(|&k| strings[k].source()).collect()
        };

        let doc = json!({
            "matrix": rows,
            "labels": { "x": labels(&xs), "y": labels(&ys) },
            "sources": { "x": sources(&xs), "y": sources(&ys) },
            "indices": { "x": xs, "y": ys },
            "measure": measure,
        });
        serde_json::to_writer(&mut self.sink, &doc)?;
        writeln!(self.sink)?;
        self.sink.flush()?;
        Ok(xs.len() * ys.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests_support::{matrix_fixture, Sink};

    #[test]
    fn document_shape_and_values() {
        let m = matrix_fixture();
        let sink = Sink::new();
        let mut w = JsonWriter::new(sink.boxed(), &OutputConfig::default());
        let n = w.write(&m, "dist_levenshtein").unwrap();
        assert_eq!(n, 9);

        let doc: serde_json::Value = serde_json::from_str(&sink.contents()).unwrap();
        assert_eq!(doc["measure"], "dist_levenshtein");
        assert_eq!(doc["matrix"][0][2], 2.0);
        assert_eq!(doc["matrix"][2][0], 2.0);
        assert_eq!(doc["indices"]["x"], serde_json::json!([0, 1, 2]));
        assert_eq!(doc["labels"]["y"][1], 2.0);
        assert_eq!(doc["sources"]["x"][0], "a.txt");
    }

    #[test]
    fn triangular_matrix_expands_symmetrically() {
        let m = matrix_fixture();
        let sink = Sink::new();
        let mut w = JsonWriter::new(sink.boxed(), &OutputConfig::default());
        w.write(&m, "dist_levenshtein").unwrap();

        let doc: serde_json::Value = serde_json::from_str(&sink.contents()).unwrap();
        let rows = doc["matrix"].as_array().unwrap();
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(rows[i][j], rows[j][i]);
            }
        }
    }
}
