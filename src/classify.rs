//! @ai:module:intent Classify one benchmark run from its exit code and captured output
//! @ai:module:layer domain
//! @ai:module:public_api classify, parse_stats, ParsedStats, RunStatus, SANITIZER_MARKER
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::fmt;

/// Literal substring an instrumented build prints when it detects a
/// memory-safety violation, independent of its exit code.
pub const SANITIZER_MARKER: &str = "AddressSanitizer";

/// @ai:intent Outcome of one (build, workload) smoke-test run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Pass,
    Fail,
    Warn,
}

impl RunStatus {
    /// @ai:intent Uppercase label used in the report table
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Pass => "PASS",
            RunStatus::Fail => "FAIL",
            RunStatus::Warn => "WARN",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// @ai:intent Business counters extracted from benchmark output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParsedStats {
    pub success: u64,
    pub failed: u64,
}

/// @ai:intent Extract the two summary counters from captured output
///
/// Two independent line patterns: the first occurrence of `Success:`
/// (resp. `Failed:`) followed by optional whitespace and an unsigned
/// integer captures that integer. An absent pattern yields zero for
/// that counter; absence is not an error.
/// @ai:effects pure
pub fn parse_stats(output: &str) -> ParsedStats {
    ParsedStats {
        success: scan_counter(output, "Success:").unwrap_or(0),
        failed: scan_counter(output, "Failed:").unwrap_or(0),
    }
}

/// @ai:intent Scan line by line for `key` followed by an unsigned integer
/// @ai:effects pure
fn scan_counter(output: &str, key: &str) -> Option<u64> {
    for line in output.lines() {
        let Some(idx) = line.find(key) else { continue };

        let rest = line[idx + key.len()..].trim_start();
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();

        if digits.is_empty() {
            continue;
        }

        if let Ok(value) = digits.parse() {
            return Some(value);
        }
    }

    None
}

/// @ai:intent Apply the deterministic status rule set to one run
///
/// Decision order, first match wins:
/// 1. non-zero exit -> FAIL "Crash(Exit N)", upgraded to "ASan Error"
///    when the sanitizer marker is present;
/// 2. zero exit with the marker -> FAIL "ASan Error (Exit 0)";
/// 3. failed counter > 0 -> FAIL "Business Fail (N errs)";
/// 4. success counter == 0 -> WARN "0 Success";
/// 5. otherwise PASS with an empty detail.
///
/// A sanitizer violation or crash always outranks a business failure
/// count, and a business failure outranks the zero-success warning.
/// @ai:effects pure
pub fn classify(exit_code: i32, output: &str) -> (ParsedStats, RunStatus, String) {
    let stats = parse_stats(output);
    let has_marker = output.contains(SANITIZER_MARKER);

    if exit_code != 0 {
        let detail = if has_marker {
            "ASan Error".to_string()
        } else {
            format!("Crash(Exit {exit_code})")
        };
        return (stats, RunStatus::Fail, detail);
    }

    if has_marker {
        return (stats, RunStatus::Fail, "ASan Error (Exit 0)".to_string());
    }

    if stats.failed > 0 {
        return (
            stats,
            RunStatus::Fail,
            format!("Business Fail ({} errs)", stats.failed),
        );
    }

    if stats.success == 0 {
        return (stats, RunStatus::Warn, "0 Success".to_string());
    }

    (stats, RunStatus::Pass, String::new())
}
