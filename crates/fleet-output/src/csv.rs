//! CSV output backend.
//!
//! Creates three files in the output directory:
//! - `positions.csv`
//! - `tick_summaries.csv`
//! - `agent_report.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{AgentReportRow, OutputResult, PositionRow, TickSummaryRow};

/// Writes simulation output to three CSV files.
pub struct CsvWriter {
    positions: Writer<File>,
    summaries: Writer<File>,
    report:    Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open the CSV files and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut positions = Writer::from_path(dir.join("positions.csv"))?;
        positions.write_record(["tick", "agent_id", "x", "y", "loaded"])?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(["tick", "delivered", "paused"])?;

        let mut report = Writer::from_path(dir.join("agent_report.csv"))?;
        report.write_record(["agent_id", "pickups", "deliveries", "avg_cycle_ticks", "utilization"])?;

        Ok(Self { positions, summaries, report, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_positions(&mut self, rows: &[PositionRow]) -> OutputResult<()> {
        for row in rows {
            self.positions.write_record(&[
                row.tick.to_string(),
                row.agent_id.to_string(),
                format!("{:.3}", row.x),
                format!("{:.3}", row.y),
                (row.loaded as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.delivered.to_string(),
            (row.paused as u8).to_string(),
        ])?;
        Ok(())
    }

    fn write_agent_report(&mut self, rows: &[AgentReportRow]) -> OutputResult<()> {
        for row in rows {
            self.report.write_record(&[
                row.agent_id.to_string(),
                row.pickups.to_string(),
                row.deliveries.to_string(),
                format!("{:.2}", row.avg_cycle_ticks),
                format!("{:.4}", row.utilization),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.positions.flush()?;
        self.summaries.flush()?;
        self.report.flush()?;
        Ok(())
    }
}
