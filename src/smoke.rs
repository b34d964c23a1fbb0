//! @ai:module:intent Run every workload against every cached binary and record outcomes
//! @ai:module:layer application
//! @ai:module:public_api run_all, RunRecord

use crate::build::BuildTask;
use crate::classify::{classify, RunStatus};
use crate::error::HarnessError;
use crate::interrupt::InterruptFlag;
use crate::process::{CommandRunner, CommandSpec};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// @ai:intent Immutable outcome of one (build, workload) run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub build: String,
    pub workload: u32,
    pub status: RunStatus,
    pub detail: String,
    pub success: u64,
    pub failed: u64,
    pub duration_secs: f64,
}

/// @ai:intent Smoke-test every cached artifact against every workload, in order
///
/// Build order outer, workload order inner; the record sequence keeps
/// that insertion order. A FAIL or WARN classification never aborts
/// the loops — every configured combination runs. No timeout is
/// imposed on the child. The interrupt flag is polled between runs
/// and short-circuits the whole stage.
/// @ai:effects io
pub fn run_all(
    runner: &dyn CommandRunner,
    tasks: &[BuildTask],
    workloads: &[u32],
    work_dir: &Path,
    cache_dir: &Path,
    lib_dir: &Path,
    interrupt: &InterruptFlag,
) -> Result<Vec<RunRecord>, HarnessError> {
    let lib_path = library_search_path(lib_dir);
    let mut records = Vec::with_capacity(tasks.len() * workloads.len());

    for task in tasks {
        tracing::info!("--- Testing build: {} ---", task.name);
        let binary = cache_dir.join(task.artifact);

        for &workload in workloads {
            if interrupt.is_set() {
                return Err(HarnessError::Interrupted);
            }

            let spec = CommandSpec::new(binary.display().to_string())
                .arg(workload.to_string())
                .cwd(work_dir)
                .env("LD_LIBRARY_PATH", &lib_path);

            let out = runner.run(&spec);
            let (stats, status, detail) = classify(out.exit_code, &out.output);

            tracing::info!(
                "  Case {:<4} {} (Succ:{}, Fail:{}, {:.1}s)",
                workload,
                status,
                stats.success,
                stats.failed,
                out.duration.as_secs_f64()
            );

            records.push(RunRecord {
                build: task.name.to_string(),
                workload,
                status,
                detail,
                success: stats.success,
                failed: stats.failed,
                duration_secs: out.duration.as_secs_f64(),
            });
        }
    }

    Ok(records)
}

/// @ai:intent LD_LIBRARY_PATH value: absolute lib dir, inherited paths preserved
/// @ai:effects io
fn library_search_path(lib_dir: &Path) -> String {
    let lib = std::path::absolute(lib_dir)
        .unwrap_or_else(|_| lib_dir.to_path_buf())
        .display()
        .to_string();

    match std::env::var("LD_LIBRARY_PATH") {
        Ok(existing) if !existing.is_empty() => format!("{lib}:{existing}"),
        _ => lib,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::BUILD_TASKS;
    use crate::process::testing::ScriptedRunner;
    use tempfile::TempDir;

    const WORKLOADS: &[u32] = &[201, 202];

    fn pass_output() -> crate::process::CommandOutput {
        ScriptedRunner::reply(0, "Success: 100\nFailed: 0\n")
    }

    #[test]
    fn test_record_order_is_build_outer_workload_inner() {
        let temp = TempDir::new().unwrap();
        let tasks = &BUILD_TASKS[..2];

        let responses = (0..4).map(|_| pass_output()).collect();
        let runner = ScriptedRunner::new(responses);
        let interrupt = InterruptFlag::new();

        let records = run_all(
            &runner,
            tasks,
            WORKLOADS,
            temp.path(),
            &temp.path().join("cache"),
            &temp.path().join("lib"),
            &interrupt,
        )
        .unwrap();

        let order: Vec<(&str, u32)> = records
            .iter()
            .map(|r| (r.build.as_str(), r.workload))
            .collect();
        assert_eq!(
            order,
            vec![("Mock", 201), ("Mock", 202), ("Standard", 201), ("Standard", 202)]
        );
    }

    #[test]
    fn test_failures_never_abort_the_loops() {
        let temp = TempDir::new().unwrap();
        let tasks = &BUILD_TASKS[..1];

        let runner = ScriptedRunner::new(vec![
            ScriptedRunner::reply(139, "Segmentation fault\n"),
            pass_output(),
        ]);
        let interrupt = InterruptFlag::new();

        let records = run_all(
            &runner,
            tasks,
            WORKLOADS,
            temp.path(),
            &temp.path().join("cache"),
            &temp.path().join("lib"),
            &interrupt,
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].status, RunStatus::Fail);
        assert_eq!(records[0].detail, "Crash(Exit 139)");
        assert_eq!(records[1].status, RunStatus::Pass);
    }

    #[test]
    fn test_workload_id_is_the_sole_argument() {
        let temp = TempDir::new().unwrap();
        let tasks = &BUILD_TASKS[..1];

        let runner = ScriptedRunner::new(vec![pass_output(), pass_output()]);
        let interrupt = InterruptFlag::new();

        run_all(
            &runner,
            tasks,
            WORKLOADS,
            temp.path(),
            &temp.path().join("cache"),
            &temp.path().join("lib"),
            &interrupt,
        )
        .unwrap();

        let invocations = runner.invocations.borrow();
        assert_eq!(invocations[0].args, vec!["201".to_string()]);
        assert_eq!(invocations[1].args, vec!["202".to_string()]);
        assert!(invocations[0].program.ends_with("obs_c_bench_mock"));
        assert!(invocations[0]
            .env
            .iter()
            .any(|(k, _)| k == "LD_LIBRARY_PATH"));
    }

    #[test]
    fn test_interrupt_short_circuits_before_next_run() {
        let temp = TempDir::new().unwrap();
        let interrupt = InterruptFlag::new();
        interrupt.set();

        let runner = ScriptedRunner::new(vec![]);
        let result = run_all(
            &runner,
            &BUILD_TASKS[..1],
            WORKLOADS,
            temp.path(),
            &temp.path().join("cache"),
            &temp.path().join("lib"),
            &interrupt,
        );

        assert!(matches!(result, Err(HarnessError::Interrupted)));
        assert_eq!(runner.invocation_count(), 0);
    }

    #[test]
    fn test_library_search_path_is_absolute() {
        let path = library_search_path(Path::new("lib"));
        let first = path.split(':').next().unwrap();
        assert!(first.starts_with('/'));
        assert!(first.ends_with("/lib"));
    }
}
