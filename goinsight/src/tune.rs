//! Orchestration for `opt-model`: benchmark the engine and tune its thread count.
//!
//! The engine config is only rewritten after the benchmark succeeded and its
//! log yielded a recommendation.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::core::tuning::{THREADS_KEY, apply_thread_count, parse_recommended_threads};
use crate::engine::{GET_MODEL_HINT, require_file, resolve_engine};
use crate::errors::ensure_success;
use crate::io::host::Host;
use crate::io::process::CommandSpec;
use crate::project::Project;

/// Outcome of `goinsight opt-model`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuneOutcome {
    pub threads: u32,
    pub config_path: PathBuf,
}

pub fn tune_model<H: Host>(host: &H, project: &Project) -> Result<TuneOutcome> {
    let layout = &project.layout;
    let engine = resolve_engine(host, project)?;
    require_file("neural network weights", &layout.weights_path, Some(GET_MODEL_HINT))?;
    require_file("engine config", &layout.engine_config_path, Some(GET_MODEL_HINT))?;

    let pause = Duration::from_secs(project.config.tuning.pause_secs);
    warn!(
        "the benchmark takes several minutes; press Ctrl-C within {}s to cancel",
        pause.as_secs()
    );
    host.pause(pause);

    fs::create_dir_all(&layout.log_dir)
        .with_context(|| format!("create {}", layout.log_dir.display()))?;
    let spec = CommandSpec::new(&engine)
        .args(["benchmark", "-model"])
        .arg(&layout.weights_path)
        .arg("-config")
        .arg(&layout.engine_config_path)
        .current_dir(&layout.root);
    info!(log = %layout.benchmark_log_path.display(), "running engine benchmark");
    let code = host
        .run_tee(&spec, &layout.benchmark_log_path)
        .context("run engine benchmark")?;
    ensure_success("katago benchmark", code)?;

    let raw_log = fs::read(&layout.benchmark_log_path)
        .with_context(|| format!("read {}", layout.benchmark_log_path.display()))?;
    let threads = parse_recommended_threads(&String::from_utf8_lossy(&raw_log))
        .with_context(|| format!("parse {}", layout.benchmark_log_path.display()))?;

    let config = fs::read_to_string(&layout.engine_config_path)
        .with_context(|| format!("read {}", layout.engine_config_path.display()))?;
    write_atomic(&layout.engine_config_path, &apply_thread_count(&config, threads))?;
    info!(threads, config = %layout.engine_config_path.display(), "set {THREADS_KEY}");

    Ok(TuneOutcome {
        threads,
        config_path: layout.engine_config_path.clone(),
    })
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let tmp_path = path.with_extension("cfg.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
