//! Stderr progress bar.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use simat_matrix::Progress;

const BAR_WIDTH: u64 = 40;

/// Draws a carriage-return progress bar on stderr.
///
/// Workers report cell counts concurrently and possibly out of order; the
/// bar only ever advances, and redraws only when the permille changes so
/// terminal traffic stays negligible next to the computation.
pub struct StderrProgress {
    permille: AtomicU64,
    start: Instant,
}

impl StderrProgress {
    pub fn new() -> Self {
        Self {
            permille: AtomicU64::new(0),
            start: Instant::now(),
        }
    }

    /// Terminate the bar line once the matrix is done.
    pub fn finish(&self) {
        let _ = writeln!(io::stderr());
    }
}

impl Default for StderrProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for StderrProgress {
    fn update(&self, done_cells: u64, total_cells: u64) {
        let permille = if total_cells == 0 {
            1000
        } else {
            done_cells * 1000 / total_cells
        };
        let seen = self.permille.fetch_max(permille, Ordering::Relaxed);
        if permille <= seen {
            return;
        }

        let filled = (permille * BAR_WIDTH / 1000) as usize;
        let elapsed = self.start.elapsed().as_secs_f64();
        let _ = write!(
            io::stderr(),
            "\r[{}{}] {:5.1}% ({done_cells} cells, {elapsed:.1}s)",
            "=".repeat(filled),
            " ".repeat(BAR_WIDTH as usize - filled),
            permille as f64 / 10.0,
        );
        let _ = io::stderr().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permille_only_advances() {
        let p = StderrProgress::new();
        p.update(500, 1000);
        assert_eq!(p.permille.load(Ordering::Relaxed), 500);
        // A lagging report does not move the bar back.
        p.update(100, 1000);
        assert_eq!(p.permille.load(Ordering::Relaxed), 500);
        p.update(1000, 1000);
        assert_eq!(p.permille.load(Ordering::Relaxed), 1000);
    }

    #[test]
    fn empty_matrix_counts_as_done() {
        let p = StderrProgress::new();
        p.update(0, 0);
        assert_eq!(p.permille.load(Ordering::Relaxed), 1000);
    }
}
