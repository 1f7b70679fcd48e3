//! Per-pass progress hook and the throttled console table built on top of it.

use std::io::{self, Write};
use std::ops::ControlFlow;

use crate::solving::{PassProgress, RelaxationSummary};

/// Receives `(iteration, max_change)` after every committed pass.
///
/// Returning [`ControlFlow::Break`] cancels the solve before the next pass starts.
pub trait PassObserver {
    fn on_pass(&mut self, progress: &PassProgress) -> ControlFlow<()>;
}

impl<F> PassObserver for F
where
    F: FnMut(&PassProgress) -> ControlFlow<()>,
{
    fn on_pass(&mut self, progress: &PassProgress) -> ControlFlow<()> {
        self(progress)
    }
}

/// Observer that ignores every pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl PassObserver for NoopObserver {
    fn on_pass(&mut self, _progress: &PassProgress) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// Writes a progress table line at iterations 1, 2, 4, 8, ...
///
/// Output volume grows with the logarithm of the pass count, so long runs
/// stay readable. Write failures do not interrupt the solve; the first one is
/// kept and returned by [`finish`](Self::finish).
#[derive(Debug)]
pub struct PowerOfTwoReporter<W: Write> {
    writer: W,
    next_report: usize,
    header_written: bool,
    error: Option<io::Error>,
}

impl<W: Write> PowerOfTwoReporter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            next_report: 1,
            header_written: false,
            error: None,
        }
    }

    /// Iteration number at which the next line will be written.
    pub fn next_report(&self) -> usize {
        self.next_report
    }

    /// Writes the final iteration line and hands back the writer.
    pub fn finish(mut self, summary: &RelaxationSummary) -> io::Result<W> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        writeln!(self.writer)?;
        write_row(&mut self.writer, summary.iterations, summary.max_change)?;
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn report(&mut self, progress: &PassProgress) -> io::Result<()> {
        if !self.header_written {
            write!(self.writer, "\n Iteration  Change\n\n")?;
            self.header_written = true;
        }
        write_row(&mut self.writer, progress.iteration, progress.max_change)
    }
}

impl<W: Write> PassObserver for PowerOfTwoReporter<W> {
    fn on_pass(&mut self, progress: &PassProgress) -> ControlFlow<()> {
        if progress.iteration == self.next_report {
            self.next_report = self.next_report.saturating_mul(2);
            if self.error.is_none() {
                if let Err(error) = self.report(progress) {
                    log::warn!("progress output failed: {error}");
                    self.error = Some(error);
                }
            }
        }
        ControlFlow::Continue(())
    }
}

fn write_row<W: Write>(writer: &mut W, iteration: usize, max_change: f64) -> io::Result<()> {
    writeln!(writer, "  {iteration:>8}  {}", significant(max_change))
}

/// Six significant digits with trailing zeros dropped, switching to
/// exponent notation outside `[1e-4, 1e6)`.
fn significant(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return value.to_string();
    }
    let exponent = value.abs().log10().floor() as i32;
    if (-4..6).contains(&exponent) {
        let decimals = (5 - exponent).max(0) as usize;
        trim_zeros(format!("{value:.decimals$}"))
    } else {
        let text = format!("{value:.5e}");
        match text.split_once('e') {
            Some((mantissa, exp)) => format!("{}e{exp}", trim_zeros(mantissa.to_string())),
            None => text,
        }
    }
}

fn trim_zeros(text: String) -> String {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}
