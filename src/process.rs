//! @ai:module:intent Subprocess boundary: argument-vector invocation with captured output
//! @ai:module:layer infrastructure
//! @ai:module:public_api CommandRunner, SystemRunner, CommandSpec, CommandOutput
//! @ai:module:stateless true

use std::path::PathBuf;
use std::process::Command;
use std::time::{Duration, Instant};

/// @ai:intent One subprocess invocation: program, argument vector, and execution context
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    /// @ai:intent Create a spec for the given program with no arguments
    /// @ai:effects pure
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
        }
    }

    /// @ai:intent Append one argument
    /// @ai:effects pure
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// @ai:intent Set the working directory for the child
    /// @ai:effects pure
    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// @ai:intent Add an environment variable visible to the child
    /// @ai:effects pure
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

/// @ai:intent Captured result of a finished subprocess
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code; signal deaths are reported as 128 + signal number.
    pub exit_code: i32,
    /// Combined stdout and stderr, lossily decoded.
    pub output: String,
    pub duration: Duration,
}

impl CommandOutput {
    /// @ai:intent Whether the child exited zero
    /// @ai:effects pure
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// @ai:intent Trait for running subprocesses, mockable in tests
///
/// A failure to spawn is not an error at this boundary: it is reported
/// as exit code -1 with the OS error text as the captured output, so
/// callers interpret every outcome through the same (code, text) pair.
/// No timeout is imposed; a hung child blocks the caller indefinitely.
pub trait CommandRunner {
    /// @ai:intent Run the spec to completion and capture combined output
    fn run(&self, spec: &CommandSpec) -> CommandOutput;
}

/// @ai:intent Runs subprocesses via std::process, blocking until exit
pub struct SystemRunner;

impl SystemRunner {
    /// @ai:intent Create a new system runner
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for SystemRunner {
    /// @ai:intent Spawn, wait, and capture stdout+stderr with wall-clock duration
    /// @ai:effects io
    fn run(&self, spec: &CommandSpec) -> CommandOutput {
        let started = Instant::now();

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);

        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }

        for (key, value) in &spec.env {
            cmd.env(key, value);
        }

        tracing::debug!("Running: {} {}", spec.program, spec.args.join(" "));

        match cmd.output() {
            Ok(out) => {
                let mut combined = String::from_utf8_lossy(&out.stdout).into_owned();
                combined.push_str(&String::from_utf8_lossy(&out.stderr));

                CommandOutput {
                    exit_code: exit_code_of(&out.status),
                    output: combined,
                    duration: started.elapsed(),
                }
            }
            Err(e) => CommandOutput {
                exit_code: -1,
                output: e.to_string(),
                duration: started.elapsed(),
            },
        }
    }
}

/// @ai:intent Normalize an exit status to a single integer, mapping signal deaths to 128+N
/// @ai:effects pure
fn exit_code_of(status: &std::process::ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt as _;

        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    status.code().unwrap_or(-1)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_builder_accumulates() {
        let spec = CommandSpec::new("make")
            .arg("clean")
            .cwd("/tmp")
            .env("LD_LIBRARY_PATH", "/tmp/lib");

        assert_eq!(spec.program, "make");
        assert_eq!(spec.args, vec!["clean".to_string()]);
        assert_eq!(spec.cwd.as_deref(), Some(std::path::Path::new("/tmp")));
        assert_eq!(
            spec.env,
            vec![("LD_LIBRARY_PATH".to_string(), "/tmp/lib".to_string())]
        );
    }

    #[test]
    fn test_missing_program_reports_spawn_failure_as_output() {
        let runner = SystemRunner::new();
        let out = runner.run(&CommandSpec::new("nonexistent_tool_xyz"));

        assert_eq!(out.exit_code, -1);
        assert!(!out.output.is_empty());
    }

    #[test]
    fn test_true_exits_zero() {
        let runner = SystemRunner::new();
        let out = runner.run(&CommandSpec::new("true"));

        assert!(out.success());
        assert!(out.output.is_empty());
    }

    #[test]
    fn test_false_exits_nonzero() {
        let runner = SystemRunner::new();
        let out = runner.run(&CommandSpec::new("false"));

        assert!(!out.success());
        assert_eq!(out.exit_code, 1);
    }
}
