//! The immutable per-invocation context handed to every operation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::platform::Platform;
use crate::io::config::{ToolConfig, load_config};
use crate::io::layout::ProjectLayout;

/// Configuration, resolved paths and target platform for one invocation.
#[derive(Debug, Clone)]
pub struct Project {
    pub config: ToolConfig,
    pub layout: ProjectLayout,
    pub platform: Platform<'static>,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>, config: ToolConfig) -> Self {
        let platform = Platform::current();
        let layout = ProjectLayout::for_platform(root, &config, platform);
        Self {
            config,
            layout,
            platform,
        }
    }

    /// Load `config_path` (defaults when missing) and resolve paths under `root`.
    pub fn load(root: &Path, config_path: &Path) -> Result<Self> {
        let config = load_config(config_path).context("load tool config")?;
        debug!(root = %root.display(), config = %config_path.display(), "project loaded");
        Ok(Self::new(root, config))
    }

    pub fn root(&self) -> &Path {
        &self.layout.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::config::CONFIG_FILE_NAME;

    #[test]
    fn load_applies_config_paths() {
        let temp = tempfile::tempdir().expect("tempdir");
        let config_path = temp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&config_path, "[paths]\nmodel_dir = \"engine\"\n").expect("write");

        let project = Project::load(temp.path(), &config_path).expect("load");
        assert_eq!(project.layout.model_dir, temp.path().join("engine"));
        assert_eq!(project.root(), temp.path());
    }

    #[test]
    fn load_reports_invalid_toml() {
        let temp = tempfile::tempdir().expect("tempdir");
        let config_path = temp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&config_path, "[paths\n").expect("write");

        let err = Project::load(temp.path(), &config_path).expect_err("invalid toml");
        assert!(format!("{err:#}").contains("parse"));
    }
}
