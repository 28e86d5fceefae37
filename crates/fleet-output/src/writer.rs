//! The `OutputWriter` trait implemented by backend writers.

use crate::{AgentReportRow, OutputResult, PositionRow, TickSummaryRow};

/// Sink for engine output.
///
/// All methods are infallible from the observer's perspective; errors are
/// stored and retrieved with
/// [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write a batch of agent positions.
    fn write_positions(&mut self, rows: &[PositionRow]) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Write the final per-agent report.
    fn write_agent_report(&mut self, rows: &[AgentReportRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
