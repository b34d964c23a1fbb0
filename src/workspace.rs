//! @ai:module:intent Prepare and tear down the working directory for one run
//! @ai:module:layer infrastructure
//! @ai:module:public_api RunGuard, SetupError

use crate::benchconf;
use crate::process::{CommandRunner, CommandSpec};
use crate::settings::SmokeConfig;
use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Fatal errors during environment preparation
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to generate test data {path}: {detail}")]
    DataGeneration { path: PathBuf, detail: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// @ai:intent Scoped ownership of the artifact cache and config snapshot
///
/// Acquiring the guard resets the cache directory, ensures test data
/// exists, and snapshots (or synthesizes) the benchmark config file.
/// Dropping it restores the config from the snapshot and deletes the
/// cache — on every exit path, including setup failure, abort, and
/// interrupt. Both teardown halves are no-ops when their target is
/// already gone.
#[derive(Debug)]
pub struct RunGuard {
    bench_config: PathBuf,
    config_backup: PathBuf,
    cache_dir: PathBuf,
}

impl RunGuard {
    /// @ai:intent Prepare the environment and take ownership of its teardown
    /// @ai:effects fs:write, io
    pub fn acquire(runner: &dyn CommandRunner, settings: &SmokeConfig) -> Result<Self, SetupError> {
        let guard = Self {
            bench_config: settings.paths.bench_config.clone(),
            config_backup: settings.paths.config_backup.clone(),
            cache_dir: settings.paths.cache_dir.clone(),
        };

        guard.prepare(runner, settings)?;
        Ok(guard)
    }

    /// @ai:intent Reset cache, ensure test data, snapshot or synthesize config
    /// @ai:effects fs:write, io
    fn prepare(&self, runner: &dyn CommandRunner, settings: &SmokeConfig) -> Result<(), SetupError> {
        tracing::info!("Preparing environment...");

        if self.cache_dir.exists() {
            std::fs::remove_dir_all(&self.cache_dir)?;
        }
        std::fs::create_dir_all(&self.cache_dir)?;

        ensure_test_data(runner, settings)?;

        if self.bench_config.exists() {
            std::fs::copy(&self.bench_config, &self.config_backup)?;
            tracing::info!(
                "Config snapshot: {} -> {}",
                self.bench_config.display(),
                self.config_backup.display()
            );
        } else {
            benchconf::write_default(
                &self.bench_config,
                settings.run.duration_secs,
                &settings.paths.test_data,
            )?;
            tracing::info!("Synthesized default config: {}", self.bench_config.display());
        }

        Ok(())
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if self.config_backup.exists() {
            let _ = std::fs::rename(&self.config_backup, &self.bench_config);
        }

        if self.cache_dir.exists() {
            let _ = std::fs::remove_dir_all(&self.cache_dir);
        }
    }
}

/// @ai:intent Generate the test data file from an OS random source if absent
///
/// Existence is the whole check: the content of a present file is never
/// re-validated. Generation failure is the one fatal setup error.
/// @ai:effects io, fs:write
fn ensure_test_data(runner: &dyn CommandRunner, settings: &SmokeConfig) -> Result<(), SetupError> {
    let path = &settings.paths.test_data;

    if path.exists() {
        tracing::info!("Test data exists: {}", path.display());
        return Ok(());
    }

    tracing::info!(
        "Generating {}MB test data: {} ...",
        settings.run.data_size_mb,
        path.display()
    );

    // /dev/urandom so compression inside the storage path cannot cheat
    let spec = CommandSpec::new("dd")
        .arg("if=/dev/urandom")
        .arg(format!("of={}", path.display()))
        .arg("bs=1M")
        .arg(format!("count={}", settings.run.data_size_mb))
        .arg("status=none");

    let out = runner.run(&spec);

    if !out.success() || !path.exists() {
        return Err(SetupError::DataGeneration {
            path: path.clone(),
            detail: out.output.trim().to_string(),
        });
    }

    Ok(())
}
