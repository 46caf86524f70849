//! Tool configuration stored in `goinsight.toml` at the project root.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Default file name looked up under the project root.
pub const CONFIG_FILE_NAME: &str = "goinsight.toml";

/// Orchestrator configuration (TOML).
///
/// Every field has a default, so a missing file or a partial file is valid.
/// Loaded once at start-up and passed by reference to each operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ToolConfig {
    pub paths: PathsConfig,
    pub engine: EngineConfig,
    pub tuning: TuningConfig,
}

/// Project-relative locations of generated and input files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    pub venv: PathBuf,
    pub manifest: PathBuf,
    pub tests: PathBuf,
    pub docs_source: PathBuf,
    pub docs_build: PathBuf,
    pub model_dir: PathBuf,
    pub neuralnet_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            venv: PathBuf::from(".venv"),
            manifest: PathBuf::from("requirements.txt"),
            tests: PathBuf::from("tests"),
            docs_source: PathBuf::from("docs"),
            docs_build: PathBuf::from("docs/_build"),
            model_dir: PathBuf::from("model"),
            neuralnet_dir: PathBuf::from("neuralnet"),
            log_dir: PathBuf::from("gtp_logs"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Upstream release tag used to build the archive URL.
    pub version: String,

    /// Overrides the platform-derived archive URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_url: Option<String>,

    pub weights_url: String,

    /// Engine config file name inside the model directory.
    pub config_name: String,

    /// Pins the engine executable instead of searching the model directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: "v1.16.3".to_string(),
            archive_url: None,
            weights_url:
                "https://katagoarchive.org/g170/neuralnets/g170e-b10c128-s1141046784-d204142634.bin.gz"
                    .to_string(),
            config_name: "default_gtp.cfg".to_string(),
            executable: None,
        }
    }
}

impl EngineConfig {
    /// File name of the weights, taken from the last URL path segment.
    pub fn weights_file_name(&self) -> Option<&str> {
        let path = self.weights_url.split(['?', '#']).next().unwrap_or_default();
        path.rsplit('/').next().filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TuningConfig {
    /// Seconds to wait before the benchmark starts, so the operator can cancel.
    pub pause_secs: u64,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self { pause_secs: 5 }
    }
}

impl ToolConfig {
    pub fn validate(&self) -> Result<()> {
        let paths = [
            ("paths.venv", &self.paths.venv),
            ("paths.manifest", &self.paths.manifest),
            ("paths.tests", &self.paths.tests),
            ("paths.docs_source", &self.paths.docs_source),
            ("paths.docs_build", &self.paths.docs_build),
            ("paths.model_dir", &self.paths.model_dir),
            ("paths.neuralnet_dir", &self.paths.neuralnet_dir),
            ("paths.log_dir", &self.paths.log_dir),
        ];
        for (key, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(anyhow!("{key} must not be empty"));
            }
        }
        if self.engine.version.trim().is_empty() {
            return Err(anyhow!("engine.version must not be empty"));
        }
        if self.engine.weights_url.trim().is_empty() {
            return Err(anyhow!("engine.weights_url must not be empty"));
        }
        if self.engine.weights_file_name().is_none() {
            return Err(anyhow!(
                "engine.weights_url must end with a file name: {}",
                self.engine.weights_url
            ));
        }
        if self.engine.config_name.trim().is_empty() {
            return Err(anyhow!("engine.config_name must not be empty"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ToolConfig::default()`.
pub fn load_config(path: &Path) -> Result<ToolConfig> {
    if !path.exists() {
        let cfg = ToolConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ToolConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
