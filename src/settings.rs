//! @ai:module:intent Harness settings with TOML persistence and serde defaults
//! @ai:module:layer infrastructure
//! @ai:module:public_api SmokeConfig, PathSettings, RunSettings
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// @ai:intent Top-level harness settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmokeConfig {
    #[serde(default)]
    pub paths: PathSettings,
    #[serde(default)]
    pub run: RunSettings,
}

/// @ai:intent Filesystem locations the harness owns or touches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Live benchmark configuration file, mutated for the run.
    #[serde(default = "default_bench_config")]
    pub bench_config: PathBuf,
    /// Snapshot location the live file is restored from on teardown.
    #[serde(default = "default_config_backup")]
    pub config_backup: PathBuf,
    /// Artifact cache, owned exclusively by one invocation.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    /// Shared runtime libraries the benchmark binary links against.
    #[serde(default = "default_lib_dir")]
    pub lib_dir: PathBuf,
    /// Local binary test data consumed by upload workloads.
    #[serde(default = "default_test_data")]
    pub test_data: PathBuf,
}

/// @ai:intent Knobs for one smoke-test run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSettings {
    /// Benchmark run duration written into the config file.
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u32,
    /// Test data size in megabytes, checked only when generating.
    #[serde(default = "default_data_size_mb")]
    pub data_size_mb: u32,
    /// Workload IDs exercised against every cached binary, in order.
    #[serde(default = "default_workloads")]
    pub workloads: Vec<u32>,
}

impl Default for SmokeConfig {
    fn default() -> Self {
        Self {
            paths: PathSettings::default(),
            run: RunSettings::default(),
        }
    }
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            bench_config: default_bench_config(),
            config_backup: default_config_backup(),
            cache_dir: default_cache_dir(),
            lib_dir: default_lib_dir(),
            test_data: default_test_data(),
        }
    }
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            duration_secs: default_duration_secs(),
            data_size_mb: default_data_size_mb(),
            workloads: default_workloads(),
        }
    }
}

fn default_bench_config() -> PathBuf {
    PathBuf::from("config.dat")
}

fn default_config_backup() -> PathBuf {
    PathBuf::from("config.dat.bak")
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("test_bin_cache")
}

fn default_lib_dir() -> PathBuf {
    PathBuf::from("lib")
}

fn default_test_data() -> PathBuf {
    PathBuf::from("test_data.bin")
}

fn default_duration_secs() -> u32 {
    3
}

fn default_data_size_mb() -> u32 {
    5
}

fn default_workloads() -> Vec<u32> {
    // put, get, delete, multipart, resumable, mixed
    vec![201, 202, 204, 216, 230, 900]
}

impl SmokeConfig {
    /// @ai:intent Load settings from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// @ai:intent Save settings to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// @ai:intent Load from an explicit path, the default path, or fall back to defaults
    /// @ai:effects fs:read
    pub fn load_or_default(path: Option<PathBuf>) -> anyhow::Result<Self> {
        match path {
            Some(p) => Self::load(&p),
            None => {
                let default_path = PathBuf::from("smoke.toml");

                if default_path.exists() {
                    Self::load(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
