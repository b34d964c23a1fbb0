//! @ai:module:intent Fail-fast compilation of every build variant into the artifact cache
//! @ai:module:layer application
//! @ai:module:public_api compile_all, BuildTask, BuildFailure, BUILD_TASKS

use crate::process::{CommandRunner, CommandSpec};
use std::path::Path;
use thiserror::Error;

/// @ai:intent One named build configuration and its expected artifact
#[derive(Debug, Clone, Copy)]
pub struct BuildTask {
    pub name: &'static str,
    /// Make target; `None` is the default target.
    pub make_target: Option<&'static str>,
    /// Filename the build leaves in the working directory on success.
    pub artifact: &'static str,
}

/// Execution order is fail-fast priority order: the cheap mock build
/// fails before the expensive instrumented variants are attempted.
pub const BUILD_TASKS: &[BuildTask] = &[
    BuildTask {
        name: "Mock",
        make_target: Some("mock"),
        artifact: "obs_c_bench_mock",
    },
    BuildTask {
        name: "Standard",
        make_target: None,
        artifact: "obs_c_bench",
    },
    BuildTask {
        name: "Mock_ASan",
        make_target: Some("mock_asan"),
        artifact: "obs_c_bench_mock_asan",
    },
    BuildTask {
        name: "ASan",
        make_target: Some("asan"),
        artifact: "obs_c_bench_asan",
    },
];

/// Bound on the diagnostic excerpt kept from a failing build.
pub const LOG_TAIL_CHARS: usize = 1000;

/// @ai:intent Why the pipeline stopped
#[derive(Debug, Error)]
pub enum BuildFailure {
    #[error("[{task}] build failed with exit {exit_code} after {elapsed_secs:.1}s")]
    CommandFailed {
        task: &'static str,
        exit_code: i32,
        elapsed_secs: f64,
        /// Last `LOG_TAIL_CHARS` characters of combined build output.
        log_tail: String,
    },

    #[error("[{task}] artifact not produced: {artifact}")]
    ArtifactMissing {
        task: &'static str,
        artifact: &'static str,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// @ai:intent Build every variant in order, caching each artifact; abort on first failure
///
/// Each task runs a full clean first, then its build command. A
/// non-zero exit or a missing artifact stops the pipeline immediately;
/// later variants are never attempted. A verified artifact is moved
/// into the cache and marked executable (0755). The only postcondition
/// checked on the artifact is existence.
/// @ai:effects io, fs:write
pub fn compile_all(
    runner: &dyn CommandRunner,
    tasks: &[BuildTask],
    work_dir: &Path,
    cache_dir: &Path,
) -> Result<(), BuildFailure> {
    for task in tasks {
        tracing::info!("[{}] Compiling...", task.name);

        // Clean output is irrelevant; the build command's is not.
        runner.run(&make_spec(Some("clean"), work_dir));

        let out = runner.run(&make_spec(task.make_target, work_dir));
        let elapsed_secs = out.duration.as_secs_f64();

        if !out.success() {
            tracing::error!("[{}] FAIL ({:.1}s)", task.name, elapsed_secs);
            return Err(BuildFailure::CommandFailed {
                task: task.name,
                exit_code: out.exit_code,
                elapsed_secs,
                log_tail: tail(&out.output, LOG_TAIL_CHARS),
            });
        }

        let produced = work_dir.join(task.artifact);
        if !produced.exists() {
            tracing::error!("[{}] FAIL (artifact {} not generated)", task.name, task.artifact);
            return Err(BuildFailure::ArtifactMissing {
                task: task.name,
                artifact: task.artifact,
            });
        }

        let cached = cache_dir.join(task.artifact);
        std::fs::rename(&produced, &cached)?;
        make_executable(&cached)?;

        tracing::info!("[{}] PASS ({:.1}s) -> cached", task.name, elapsed_secs);
    }

    tracing::info!("All compilations successful");
    Ok(())
}

/// @ai:intent Build a make invocation for the given target in the source tree
/// @ai:effects pure
fn make_spec(target: Option<&str>, work_dir: &Path) -> CommandSpec {
    let mut spec = CommandSpec::new("make").cwd(work_dir);
    if let Some(target) = target {
        spec = spec.arg(target);
    }
    spec
}

/// @ai:intent Set owner/group/other executable bits on a cached artifact
/// @ai:effects fs:write
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
}

/// @ai:intent Last `max_chars` characters of a string, char-boundary safe
/// @ai:effects pure
fn tail(s: &str, max_chars: usize) -> String {
    let count = s.chars().count();

    if count <= max_chars {
        s.to_string()
    } else {
        s.chars().skip(count - max_chars).collect()
    }
}
