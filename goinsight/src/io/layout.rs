//! Canonical project paths, resolved once from the root and the tool config.

use std::path::{Path, PathBuf};

use crate::core::platform::Platform;
use crate::io::config::ToolConfig;

/// Archive file name for the downloaded engine inside the model directory.
pub const ENGINE_ARCHIVE_NAME: &str = "katago.zip";
pub const BENCHMARK_LOG_NAME: &str = "benchmark.log";

/// All canonical paths for a project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    pub root: PathBuf,
    pub venv_dir: PathBuf,
    pub venv_python: PathBuf,
    pub venv_sphinx_build: PathBuf,
    pub manifest_path: PathBuf,
    pub tests_dir: PathBuf,
    pub docs_source_dir: PathBuf,
    pub docs_build_dir: PathBuf,
    pub docs_html_dir: PathBuf,
    pub docs_index_path: PathBuf,
    pub model_dir: PathBuf,
    pub engine_archive_path: PathBuf,
    pub engine_executable_name: String,
    pub engine_config_path: PathBuf,
    pub neuralnet_dir: PathBuf,
    pub weights_path: PathBuf,
    pub log_dir: PathBuf,
    pub benchmark_log_path: PathBuf,
}

impl ProjectLayout {
    /// Resolve every path for the current platform.
    pub fn new(root: impl Into<PathBuf>, config: &ToolConfig) -> Self {
        Self::for_platform(root, config, Platform::current())
    }

    pub fn for_platform(
        root: impl Into<PathBuf>,
        config: &ToolConfig,
        platform: Platform<'_>,
    ) -> Self {
        let root = root.into();
        let paths = &config.paths;
        let venv_dir = root.join(&paths.venv);
        let (venv_python, venv_sphinx_build) = if platform.os == "windows" {
            let scripts = venv_dir.join("Scripts");
            (scripts.join("python.exe"), scripts.join("sphinx-build.exe"))
        } else {
            let bin = venv_dir.join("bin");
            (bin.join("python"), bin.join("sphinx-build"))
        };
        let docs_build_dir = root.join(&paths.docs_build);
        let docs_html_dir = docs_build_dir.join("html");
        let model_dir = root.join(&paths.model_dir);
        let neuralnet_dir = root.join(&paths.neuralnet_dir);
        let log_dir = root.join(&paths.log_dir);
        let weights_name = config.engine.weights_file_name().unwrap_or("weights.bin.gz");

        Self {
            venv_dir,
            venv_python,
            venv_sphinx_build,
            manifest_path: root.join(&paths.manifest),
            tests_dir: root.join(&paths.tests),
            docs_source_dir: root.join(&paths.docs_source),
            docs_index_path: docs_html_dir.join("index.html"),
            docs_build_dir,
            docs_html_dir,
            engine_archive_path: model_dir.join(ENGINE_ARCHIVE_NAME),
            engine_executable_name: platform.engine_executable().to_string(),
            engine_config_path: model_dir.join(&config.engine.config_name),
            model_dir,
            weights_path: neuralnet_dir.join(weights_name),
            neuralnet_dir,
            benchmark_log_path: log_dir.join(BENCHMARK_LOG_NAME),
            log_dir,
            root,
        }
    }

    /// Directories removed by `clean`, in removal order.
    pub fn generated_dirs(&self) -> [&Path; 5] {
        [
            &self.venv_dir,
            &self.docs_build_dir,
            &self.model_dir,
            &self.neuralnet_dir,
            &self.log_dir,
        ]
    }
}
