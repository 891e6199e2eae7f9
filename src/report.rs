//! Timing capture and the speedup table.

use std::fmt;
use std::time::Instant;

/// Efficiency (percent) above which a table row is flagged as suspect.
///
/// Parallel speedup cannot honestly exceed the worker count, so anything much
/// past 100% points at a timing problem such as a perturbed serial baseline.
pub const EFFICIENCY_FLAG_PCT: f64 = 105.0;

/// Wall-clock timing for one strategy run.
#[derive(Debug, Clone)]
pub struct StrategyTiming {
    pub name: &'static str,
    pub workers: usize,
    pub seconds: f64,
}

/// Time `run`, charging everything inside it to the strategy.
///
/// Callers put projector construction and the projection loop inside `run`,
/// and keep point generation and validation outside it. A failed run yields
/// no timing; the error passes through unchanged.
pub fn time_strategy<E>(
    name: &'static str,
    workers: usize,
    run: impl FnOnce() -> Result<(), E>,
) -> Result<StrategyTiming, E> {
    let start = Instant::now();
    run()?;
    let seconds = start.elapsed().as_secs_f64();
    Ok(StrategyTiming {
        name,
        workers,
        seconds,
    })
}

/// One row of the speedup table.
#[derive(Debug, Clone)]
pub struct ReportRow {
    pub name: &'static str,
    pub workers: usize,
    pub seconds: f64,
    pub speedup: f64,
    pub efficiency_pct: f64,
}

/// Speedup table over a serial baseline.
#[derive(Debug, Clone)]
pub struct Report {
    rows: Vec<ReportRow>,
}

impl Report {
    /// Build a table from timings. The first entry is the serial baseline;
    /// every speedup is that baseline divided by the row's own time.
    pub fn build(timings: &[StrategyTiming]) -> Self {
        let baseline = timings.first().map_or(0.0, |t| t.seconds);
        let rows = timings
            .iter()
            .map(|t| {
                let speedup = baseline / t.seconds;
                ReportRow {
                    name: t.name,
                    workers: t.workers,
                    seconds: t.seconds,
                    speedup,
                    efficiency_pct: speedup / t.workers as f64 * 100.0,
                }
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Rows whose efficiency exceeds [`EFFICIENCY_FLAG_PCT`].
    pub fn suspect_rows(&self) -> impl Iterator<Item = &ReportRow> {
        self.rows
            .iter()
            .filter(|row| row.efficiency_pct > EFFICIENCY_FLAG_PCT)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>16} | {:>7} | {:>10} | {:>8} | {:>10}",
            "strategy", "workers", "seconds", "speedup", "efficiency"
        )?;
        writeln!(
            f,
            "{:-<16}-+-{:-<7}-+-{:-<10}-+-{:-<8}-+-{:-<10}",
            "", "", "", "", ""
        )?;
        for row in &self.rows {
            let flag = if row.efficiency_pct > EFFICIENCY_FLAG_PCT {
                " !"
            } else {
                ""
            };
            writeln!(
                f,
                "{:>16} | {:>7} | {:>10.3} | {:>8.2} | {:>9.1}%{}",
                row.name, row.workers, row.seconds, row.speedup, row.efficiency_pct, flag
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_timings() -> Vec<StrategyTiming> {
        vec![
            StrategyTiming {
                name: "serial",
                workers: 1,
                seconds: 2.0,
            },
            StrategyTiming {
                name: "static-partition",
                workers: 4,
                seconds: 0.4,
            },
            StrategyTiming {
                name: "work-stealing",
                workers: 4,
                seconds: 0.6,
            },
        ]
    }

    #[test]
    fn serial_row_is_the_unit_baseline() {
        let report = Report::build(&sample_timings());
        let serial = &report.rows()[0];
        assert_eq!(serial.speedup, 1.0);
        assert_eq!(serial.efficiency_pct, 100.0);
    }

    #[test]
    fn speedups_divide_the_baseline() {
        let report = Report::build(&sample_timings());
        let partition = &report.rows()[1];
        assert!((partition.speedup - 5.0).abs() < 1e-12);
        assert!((partition.efficiency_pct - 125.0).abs() < 1e-12);

        let stealing = &report.rows()[2];
        assert!((stealing.speedup - 2.0 / 0.6).abs() < 1e-12);
    }

    #[test]
    fn superlinear_rows_are_flagged() {
        let report = Report::build(&sample_timings());
        let suspects: Vec<&str> = report.suspect_rows().map(|row| row.name).collect();
        assert_eq!(suspects, vec!["static-partition"]);

        let table = report.to_string();
        assert!(table.contains("125.0% !"));
        assert!(!table.contains("100.0% !"));
    }

    #[test]
    fn honest_efficiencies_are_not_flagged() {
        let timings = vec![
            StrategyTiming {
                name: "serial",
                workers: 1,
                seconds: 1.0,
            },
            StrategyTiming {
                name: "work-stealing",
                workers: 4,
                seconds: 0.25,
            },
        ];
        let report = Report::build(&timings);
        assert_eq!(report.suspect_rows().count(), 0);
        assert_eq!(report.rows()[1].efficiency_pct, 100.0);
    }

    #[test]
    fn failed_runs_yield_no_timing() {
        let result = time_strategy("serial", 1, || Err::<(), &str>("boom"));
        assert_eq!(result.unwrap_err(), "boom");
    }

    #[test]
    fn successful_runs_record_elapsed_time() {
        let timing = time_strategy("serial", 1, || Ok::<(), &str>(())).unwrap();
        assert_eq!(timing.name, "serial");
        assert_eq!(timing.workers, 1);
        assert!(timing.seconds >= 0.0);
    }
}
