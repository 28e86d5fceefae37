//! `SimOutputObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use fleet_core::Tick;
use fleet_sim::{LiveFrame, SimObserver};
use fleet_stats::Report;

use crate::row::{AgentReportRow, PositionRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes positions, tick summaries and the final
/// per-agent report to any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `engine.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:             W,
    /// Positions are written every this many ticks; summaries every tick.
    position_interval:  u64,
    last_error:         Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W, position_interval: u64) -> Self {
        Self { writer, position_interval: position_interval.max(1), last_error: None }
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Write the report and close the writer.  For drivers that stop an
    /// engine without going through `run`.
    pub fn finish_with(&mut self, report: &Report) {
        let result = self.write_report(report);
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
    }

    fn write_report(&mut self, report: &Report) -> OutputResult<()> {
        let rows: Vec<AgentReportRow> = report.per_agent.iter().map(AgentReportRow::from).collect();
        self.writer.write_agent_report(&rows)
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, frame: &LiveFrame) {
        let result = self.writer.write_tick_summary(&TickSummaryRow::from(frame));
        self.store_err(result);

        if frame.time.0 % self.position_interval == 0 {
            let rows = PositionRow::from_frame(frame);
            if !rows.is_empty() {
                let result = self.writer.write_positions(&rows);
                self.store_err(result);
            }
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick, report: &Report) {
        self.finish_with(report);
    }
}
