//! @ai:module:intent Render the run summary table, failure digest, and JSON export
//! @ai:module:layer infrastructure
//! @ai:module:public_api Reporter

use crate::classify::RunStatus;
use crate::smoke::RunRecord;
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

/// @ai:intent Machine-readable mirror of one run's report
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    timestamp: String,
    passed: usize,
    total: usize,
    records: &'a [RunRecord],
}

/// @ai:intent Renders accumulated run records and decides the exit status
pub struct Reporter;

impl Reporter {
    /// @ai:intent Create a new reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Print the fixed-width table, pass count, and non-PASS digest
    /// @ai:effects io
    pub fn print_summary(&self, records: &[RunRecord]) {
        println!();
        println!("{}", "=".repeat(60));
        println!("{:<12} | {:<6} | {:<10} | {}", "BUILD", "CASE", "STATUS", "DETAIL");
        println!("{}", "-".repeat(60));

        for r in records {
            println!(
                "{:<12} | {:<6} | {} | {}",
                r.build,
                r.workload,
                colored_status_cell(r.status),
                r.detail
            );
        }

        println!("{}", "-".repeat(60));
        println!("Summary: {}/{} Passed", pass_count(records), records.len());

        let failed: Vec<&RunRecord> = records
            .iter()
            .filter(|r| r.status != RunStatus::Pass)
            .collect();

        if failed.is_empty() {
            println!();
            println!("{}", "ALL PASSED.".green().bold());
        } else {
            println!();
            println!("{}", "FAILED TESTS:".red().bold());

            for r in failed {
                println!(" - {} Case {}: {}", r.build, r.workload, r.detail);
            }
        }
    }

    /// @ai:intent Whether every record passed (drives process exit status)
    /// @ai:effects pure
    pub fn all_passed(&self, records: &[RunRecord]) -> bool {
        records.iter().all(|r| r.status == RunStatus::Pass)
    }

    /// @ai:intent Write the full record sequence as timestamped JSON
    /// @ai:effects fs:write
    pub fn write_json(&self, records: &[RunRecord], path: &Path) -> Result<()> {
        let report = JsonReport {
            timestamp: chrono::Utc::now().to_rfc3339(),
            passed: pass_count(records),
            total: records.len(),
            records,
        };

        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)?;

        tracing::info!("JSON report saved to {}", path.display());
        Ok(())
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

/// @ai:intent Number of PASS records
/// @ai:effects pure
fn pass_count(records: &[RunRecord]) -> usize {
    records.iter().filter(|r| r.status == RunStatus::Pass).count()
}

/// @ai:intent Status cell padded before coloring so ANSI codes keep the columns aligned
/// @ai:effects pure
fn colored_status_cell(status: RunStatus) -> colored::ColoredString {
    let cell = format!("{:<10}", status.as_str());

    match status {
        RunStatus::Pass => cell.green(),
        RunStatus::Fail => cell.red().bold(),
        RunStatus::Warn => cell.yellow(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(build: &str, workload: u32, status: RunStatus, detail: &str) -> RunRecord {
        RunRecord {
            build: build.to_string(),
            workload,
            status,
            detail: detail.to_string(),
            success: if status == RunStatus::Pass { 100 } else { 0 },
            failed: 0,
            duration_secs: 3.1,
        }
    }

    #[test]
    fn test_all_passed_requires_every_record_green() {
        let reporter = Reporter::new();

        let all_green = vec![
            record("Mock", 201, RunStatus::Pass, ""),
            record("ASan", 900, RunStatus::Pass, ""),
        ];
        assert!(reporter.all_passed(&all_green));

        let with_warn = vec![
            record("Mock", 201, RunStatus::Pass, ""),
            record("Mock", 202, RunStatus::Warn, "0 Success"),
        ];
        assert!(!reporter.all_passed(&with_warn));

        let with_fail = vec![record("ASan", 201, RunStatus::Fail, "ASan Error")];
        assert!(!reporter.all_passed(&with_fail));
    }

    #[test]
    fn test_empty_record_set_counts_as_passed() {
        // An empty sequence only occurs when the pipeline failed, and
        // that path forces exit 1 before the reporter is consulted.
        assert!(Reporter::new().all_passed(&[]));
    }

    #[test]
    fn test_json_report_round_trips() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("results.json");
        let reporter = Reporter::new();

        let records = vec![
            record("Mock", 201, RunStatus::Pass, ""),
            record("Mock", 202, RunStatus::Fail, "Crash(Exit 137)"),
        ];

        reporter.write_json(&records, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert_eq!(value["total"], 2);
        assert_eq!(value["passed"], 1);
        assert_eq!(value["records"][1]["detail"], "Crash(Exit 137)");
        assert!(value["timestamp"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn test_status_cell_pads_before_coloring() {
        let cell = colored_status_cell(RunStatus::Warn);
        assert!(cell.to_string().contains("WARN      "));
    }
}
