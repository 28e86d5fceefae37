//! Integration tests for fleet-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::row::{AgentReportRow, PositionRow, TickSummaryRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn headers(path: &std::path::Path) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.headers().unwrap().iter().map(str::to_owned).collect()
    }

    fn records(path: &std::path::Path) -> Vec<csv::StringRecord> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.records().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn csv_files_and_headers() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        assert_eq!(headers(&dir.path().join("positions.csv")), ["tick", "agent_id", "x", "y", "loaded"]);
        assert_eq!(headers(&dir.path().join("tick_summaries.csv")), ["tick", "delivered", "paused"]);
        assert_eq!(
            headers(&dir.path().join("agent_report.csv")),
            ["agent_id", "pickups", "deliveries", "avg_cycle_ticks", "utilization"]
        );
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tmp();
        let nested = dir.path().join("runs").join("a");
        let _w = CsvWriter::new(&nested).unwrap();
        assert!(nested.join("positions.csv").exists());
    }

    #[test]
    fn position_rows_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let rows = [
            PositionRow { tick: 4, agent_id: 0, x: 2.25, y: 3.0, loaded: false },
            PositionRow { tick: 4, agent_id: 1, x: 8.0, y: 2.0, loaded: true },
        ];
        w.write_positions(&rows).unwrap();
        w.finish().unwrap();

        let read = records(&dir.path().join("positions.csv"));
        assert_eq!(read.len(), 2);
        assert_eq!(&read[0][0], "4");
        assert_eq!(&read[0][2], "2.250");
        assert_eq!(&read[1][1], "1");
        assert_eq!(&read[1][4], "1");
    }

    #[test]
    fn summary_and_report_rows_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&TickSummaryRow { tick: 9, delivered: 3, paused: true }).unwrap();
        w.write_agent_report(&[AgentReportRow {
            agent_id:        2,
            pickups:         5,
            deliveries:      4,
            avg_cycle_ticks: 41.5,
            utilization:     0.75,
        }])
        .unwrap();
        w.finish().unwrap();

        let s = records(&dir.path().join("tick_summaries.csv"));
        assert_eq!((&s[0][0], &s[0][1], &s[0][2]), ("9", "3", "1"));

        let r = records(&dir.path().join("agent_report.csv"));
        assert_eq!(&r[0][0], "2");
        assert_eq!(&r[0][3], "41.50");
        assert_eq!(&r[0][4], "0.7500");
    }

    #[test]
    fn finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}

#[cfg(test)]
mod observer_tests {
    use fleet_core::FleetConfig;
    use fleet_sim::{EngineBuilder, SimObserver};

    use crate::{
        AgentReportRow, OutputError, OutputResult, OutputWriter, PositionRow, SimOutputObserver,
        TickSummaryRow,
    };

    /// In-memory writer that can be told to fail.
    #[derive(Default)]
    struct Memory {
        positions: Vec<PositionRow>,
        summaries: Vec<TickSummaryRow>,
        report:    Vec<AgentReportRow>,
        finished:  u32,
        fail:      bool,
    }

    impl OutputWriter for Memory {
        fn write_positions(&mut self, rows: &[PositionRow]) -> OutputResult<()> {
            self.positions.extend_from_slice(rows);
            Ok(())
        }

        fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
            if self.fail {
                return Err(OutputError::Io(std::io::Error::other("disk full")));
            }
            self.summaries.push(*row);
            Ok(())
        }

        fn write_agent_report(&mut self, rows: &[AgentReportRow]) -> OutputResult<()> {
            self.report.extend_from_slice(rows);
            Ok(())
        }

        fn finish(&mut self) -> OutputResult<()> {
            self.finished += 1;
            Ok(())
        }
    }

    #[test]
    fn run_writes_every_stream() {
        let mut engine = EngineBuilder::new(FleetConfig::default())
            .agent_count(3)
            .duration(20)
            .build()
            .unwrap();
        let mut obs = SimOutputObserver::new(Memory::default(), 5);
        engine.run(&mut obs);
        assert!(obs.take_error().is_none());

        let mem = obs.into_writer();
        assert_eq!(mem.summaries.len(), 20);
        assert_eq!(mem.summaries.last().map(|s| s.tick), Some(20));
        // Ticks 5, 10, 15, 20 for three agents.
        assert_eq!(mem.positions.len(), 12);
        assert!(mem.positions.iter().all(|p| p.tick % 5 == 0));
        assert_eq!(mem.report.len(), 3);
        assert_eq!(mem.finished, 1);
    }

    #[test]
    fn first_error_is_kept() {
        let engine = EngineBuilder::new(FleetConfig::default()).agent_count(1).build().unwrap();
        let mut obs = SimOutputObserver::new(Memory { fail: true, ..Memory::default() }, 1);
        obs.on_tick_end(&engine.live_frame());
        obs.on_tick_end(&engine.live_frame());
        assert!(matches!(obs.take_error(), Some(OutputError::Io(_))));
        assert!(obs.take_error().is_none());
    }

    #[test]
    fn csv_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = EngineBuilder::new(FleetConfig::default())
            .grid(fleet_grid::layouts::warehouse_9x7().unwrap())
            .agent_count(2)
            .duration(30)
            .build()
            .unwrap();
        let writer = crate::CsvWriter::new(dir.path()).unwrap();
        let mut obs = SimOutputObserver::new(writer, 10);
        engine.run(&mut obs);
        assert!(obs.take_error().is_none());

        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        assert_eq!(rdr.records().count(), 30);
        let mut rdr = csv::Reader::from_path(dir.path().join("agent_report.csv")).unwrap();
        assert_eq!(rdr.records().count(), 2);
    }
}
