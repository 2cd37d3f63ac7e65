//! Solution trace writer.
//!
//! [`TraceWriter`] streams one line per replanned cycle to any `Write`
//! sink:
//!
//! ```text
//! <x> <y> <replan_secs> <epsilon>
//! ```
//!
//! `x y` is the pose the cycle started from; the two reals carry five
//! decimals. [`finish`](TraceWriter::finish) appends the
//! [`PlanTimeHistogram`] summary line.

use std::io::Write;

use fathom_core::NavError;

use crate::driver::CycleReport;
use crate::metrics::PlanTimeHistogram;

/// Writes the per-cycle solution trace.
///
/// Generic over `W: Write` so tests can use `Vec<u8>` and production
/// code can use `BufWriter<File>`.
///
/// # Examples
///
/// ```
/// use fathom_engine::{PlanTimeHistogram, TraceWriter};
///
/// let mut trace = TraceWriter::new(Vec::new());
/// trace.finish(&PlanTimeHistogram::default()).unwrap();
/// let text = String::from_utf8(trace.into_inner()).unwrap();
/// assert!(text.starts_with("stats: plantimes over 1 secs=0;"));
/// ```
pub struct TraceWriter<W: Write> {
    writer: W,
    lines_written: u64,
}

impl<W: Write> TraceWriter<W> {
    /// Wrap `writer`. Nothing is written until the first record.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            lines_written: 0,
        }
    }

    /// Append the line for `report`.
    ///
    /// Reports without a replan (arrival) produce no line.
    pub fn record(&mut self, report: &CycleReport) -> Result<(), NavError> {
        let Some(replan) = &report.replan else {
            return Ok(());
        };
        writeln!(
            self.writer,
            "{} {} {:.5} {:.5}",
            report.pose.x,
            report.pose.y,
            replan.elapsed.as_secs_f64(),
            replan.epsilon
        )
        .map_err(trace_error)?;
        self.lines_written += 1;
        Ok(())
    }

    /// Append the summary line and flush.
    pub fn finish(&mut self, histogram: &PlanTimeHistogram) -> Result<(), NavError> {
        writeln!(self.writer, "{histogram}").map_err(trace_error)?;
        self.flush()
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> Result<(), NavError> {
        self.writer.flush().map_err(trace_error)
    }

    /// Number of cycle lines written so far.
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    /// Consume the trace writer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn trace_error(e: std::io::Error) -> NavError {
    NavError::Trace {
        reason: e.to_string(),
    }
}
