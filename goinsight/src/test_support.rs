//! Test-only helpers: a scripted [`Host`] and throwaway project trees.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::io::config::ToolConfig;
use crate::io::host::Host;
use crate::io::layout::ProjectLayout;
use crate::io::process::CommandSpec;
use crate::project::Project;

/// One recorded interaction with the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Run(CommandSpec),
    RunTee { spec: CommandSpec, log_path: PathBuf },
    Download { url: String, dest: PathBuf },
    Open(PathBuf),
    Pause(Duration),
}

type RunResponder = Box<dyn Fn(&CommandSpec) -> i32>;
type TeeResponder = Box<dyn Fn(&CommandSpec) -> (String, i32)>;
type DownloadResponder = Box<dyn Fn(&str, &Path) -> Result<()>>;

/// Host that records every call and answers from scripted responders.
///
/// Defaults: every run exits 0, tee'd runs print nothing, downloads write a
/// small placeholder file.
pub struct ScriptedHost {
    programs: HashMap<String, PathBuf>,
    calls: RefCell<Vec<HostCall>>,
    run: RunResponder,
    tee: TeeResponder,
    download: DownloadResponder,
}

impl Default for ScriptedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self {
            programs: HashMap::new(),
            calls: RefCell::new(Vec::new()),
            run: Box::new(|_: &CommandSpec| 0),
            tee: Box::new(|_: &CommandSpec| (String::new(), 0)),
            download: Box::new(|url: &str, dest: &Path| {
                write_file(dest, format!("downloaded from {url}"))
            }),
        }
    }

    pub fn with_program(mut self, name: &str, path: impl Into<PathBuf>) -> Self {
        self.programs.insert(name.to_string(), path.into());
        self
    }

    pub fn on_run(mut self, responder: impl Fn(&CommandSpec) -> i32 + 'static) -> Self {
        self.run = Box::new(responder);
        self
    }

    /// Script tee'd runs: the returned text is written to the log path.
    pub fn on_tee(
        mut self,
        responder: impl Fn(&CommandSpec) -> (String, i32) + 'static,
    ) -> Self {
        self.tee = Box::new(responder);
        self
    }

    pub fn on_download(
        mut self,
        responder: impl Fn(&str, &Path) -> Result<()> + 'static,
    ) -> Self {
        self.download = Box::new(responder);
        self
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.borrow().clone()
    }

    /// Specs of every plain (non-tee) run, in order.
    pub fn runs(&self) -> Vec<CommandSpec> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                HostCall::Run(spec) => Some(spec.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn downloads(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                HostCall::Download { url, .. } => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: HostCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl Host for ScriptedHost {
    fn find_program(&self, name: &str) -> Option<PathBuf> {
        self.programs.get(name).cloned()
    }

    fn run(&self, spec: &CommandSpec) -> Result<i32> {
        self.record(HostCall::Run(spec.clone()));
        Ok((self.run)(spec))
    }

    fn run_tee(&self, spec: &CommandSpec, log_path: &Path) -> Result<i32> {
        self.record(HostCall::RunTee {
            spec: spec.clone(),
            log_path: log_path.to_path_buf(),
        });
        let (output, code) = (self.tee)(spec);
        write_file(log_path, output)?;
        Ok(code)
    }

    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        self.record(HostCall::Download {
            url: url.to_string(),
            dest: dest.to_path_buf(),
        });
        (self.download)(url, dest)
    }

    fn open(&self, path: &Path) -> Result<()> {
        self.record(HostCall::Open(path.to_path_buf()));
        Ok(())
    }

    fn pause(&self, duration: Duration) {
        self.record(HostCall::Pause(duration));
    }
}

/// Write a file, creating parent directories.
pub fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("write {}", path.display()))
}

/// Build a zip archive from `(name, contents, unix mode)` entries.
pub fn write_zip(path: &Path, entries: &[(&str, &[u8], u32)]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = zip::ZipWriter::new(file);
    for (name, contents, mode) in entries {
        let options = zip::write::SimpleFileOptions::default().unix_permissions(*mode);
        writer.start_file(*name, options).context("start zip entry")?;
        writer.write_all(contents).context("write zip entry")?;
    }
    writer.finish().context("finish zip")?;
    Ok(())
}

/// A project root in a temp directory with a resolved layout.
///
/// The benchmark pause is disabled so tests never sleep.
pub struct TestProject {
    _temp: tempfile::TempDir,
    pub project: Project,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        Self::with_config(|_| {})
    }

    /// Build a project after adjusting the default config.
    pub fn with_config(adjust: impl FnOnce(&mut ToolConfig)) -> Result<Self> {
        let temp = tempfile::tempdir().context("create tempdir")?;
        let mut config = ToolConfig::default();
        config.tuning.pause_secs = 0;
        adjust(&mut config);
        let project = Project::new(temp.path(), config);
        Ok(Self {
            _temp: temp,
            project,
        })
    }

    pub fn root(&self) -> &Path {
        self.project.root()
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.project.layout
    }

    /// Pretend `setup` already ran: interpreter and doc generator exist.
    pub fn seed_env(&self) -> Result<()> {
        write_file(&self.layout().venv_python, "python")?;
        write_file(&self.layout().venv_sphinx_build, "sphinx-build")
    }

    /// Pretend `get-model` already ran, with the given engine config text.
    pub fn seed_engine(&self, engine_config: &str) -> Result<PathBuf> {
        let layout = self.layout();
        let executable = layout.model_dir.join(&layout.engine_executable_name);
        write_file(&executable, "engine")?;
        write_file(&layout.engine_config_path, engine_config)?;
        write_file(&layout.weights_path, "weights")?;
        Ok(executable)
    }
}
