//! Orchestration for `get-model`: fetch the engine distribution and weights.
//!
//! Both downloads are single attempts. The archive is only fetched when the
//! engine is missing from the model directory and no archive is on disk yet;
//! the weight file is only fetched when absent.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::core::platform::EngineSource;
use crate::engine::{engine_source, require_file};
use crate::errors::MissingPrerequisite;
use crate::io::archive::extract_zip;
use crate::io::host::Host;
use crate::io::locate::find_file;
use crate::project::Project;

/// Outcome of `goinsight get-model`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOutcome {
    pub engine: PathBuf,
    pub archive_downloaded: bool,
    /// Number of files extracted; zero when extraction was skipped.
    pub extracted: usize,
    pub weights_downloaded: bool,
}

pub fn fetch_model<H: Host>(host: &H, project: &Project) -> Result<FetchOutcome> {
    let layout = &project.layout;
    for dir in [&layout.model_dir, &layout.neuralnet_dir] {
        fs::create_dir_all(dir).with_context(|| format!("create directory {}", dir.display()))?;
    }

    let mut outcome = FetchOutcome::default();
    let engine = fetch_engine(host, project, &mut outcome)?;
    outcome.engine = engine;

    if layout.weights_path.is_file() {
        info!(path = %layout.weights_path.display(), "weights already present; skipping download");
    } else {
        info!(url = %project.config.engine.weights_url, "downloading neural network weights");
        host.download(&project.config.engine.weights_url, &layout.weights_path)
            .context("download neural network weights")?;
        outcome.weights_downloaded = true;
    }

    Ok(outcome)
}

fn fetch_engine<H: Host>(
    host: &H,
    project: &Project,
    outcome: &mut FetchOutcome,
) -> Result<PathBuf> {
    let layout = &project.layout;
    if let Some(pinned) = &project.config.engine.executable {
        let path = layout.root.join(pinned);
        require_file("pinned engine executable", &path, None)?;
        info!(path = %path.display(), "engine pinned in config; skipping archive");
        return Ok(path);
    }

    if let Some(found) = find_file(&layout.model_dir, &layout.engine_executable_name) {
        info!(path = %found.display(), "engine already present; skipping extraction");
        return Ok(found);
    }

    match engine_source(project)? {
        EngineSource::Archive(url) => {
            if layout.engine_archive_path.is_file() {
                info!(path = %layout.engine_archive_path.display(), "reusing downloaded archive");
            } else {
                info!(url = %url, "downloading engine archive");
                host.download(&url, &layout.engine_archive_path)
                    .context("download engine archive")?;
                outcome.archive_downloaded = true;
            }

            outcome.extracted = extract_zip(&layout.engine_archive_path, &layout.model_dir)?;
            info!(files = outcome.extracted, "engine archive extracted");

            find_file(&layout.model_dir, &layout.engine_executable_name).ok_or_else(|| {
                MissingPrerequisite::Path {
                    what: "engine executable in extracted archive",
                    path: layout.model_dir.join(&layout.engine_executable_name),
                    hint: None,
                }
                .into()
            })
        }
        EngineSource::SystemPath { install_hint } => {
            let found = host
                .find_program(&layout.engine_executable_name)
                .ok_or_else(|| MissingPrerequisite::Program {
                    what: "engine executable",
                    hint: install_hint.to_string(),
                })?;
            info!(path = %found.display(), "using engine from the search path");
            Ok(found)
        }
        EngineSource::Unsupported { os, arch } => bail!("unsupported platform {os}/{arch}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{HostCall, ScriptedHost, TestProject, write_file, write_zip};

    fn linux_project() -> TestProject {
        let mut test = TestProject::new().expect("project");
        test.project.platform = crate::core::platform::Platform {
            os: "linux",
            arch: "x86_64",
        };
        test
    }

    #[test]
    fn downloads_and_extracts_when_engine_missing() {
        let test = linux_project();
        let name = test.layout().engine_executable_name.clone();
        let host = ScriptedHost::new().on_download(move |url, dest| {
            if url.ends_with(".zip") {
                let entry = format!("katago-v1.16.3/{name}");
                write_zip(
                    dest,
                    &[
                        (entry.as_str(), b"engine".as_slice(), 0o755),
                        ("katago-v1.16.3/default_gtp.cfg", b"cfg".as_slice(), 0o644),
                    ],
                )
            } else {
                write_file(dest, "weights")
            }
        });

        let outcome = fetch_model(&host, &test.project).expect("fetch");
        assert!(outcome.archive_downloaded);
        assert_eq!(outcome.extracted, 2);
        assert!(outcome.weights_downloaded);
        assert!(outcome.engine.starts_with(&test.layout().model_dir));
        assert!(test.layout().weights_path.is_file());
        assert_eq!(host.downloads().len(), 2);
    }

    #[test]
    fn present_engine_skips_archive() {
        let test = linux_project();
        let engine = test.seed_engine("").expect("seed");
        let host = ScriptedHost::new();

        let outcome = fetch_model(&host, &test.project).expect("fetch");
        assert_eq!(outcome.engine, engine);
        assert!(!outcome.archive_downloaded);
        assert_eq!(outcome.extracted, 0);
        assert!(!outcome.weights_downloaded);
        assert!(host.calls().is_empty());
        assert!(!test.layout().engine_archive_path.exists());
    }

    #[test]
    fn archive_on_disk_is_not_downloaded_again() {
        let test = linux_project();
        let entry = format!("bin/{}", test.layout().engine_executable_name);
        fs::create_dir_all(&test.layout().model_dir).expect("model dir");
        write_zip(
            &test.layout().engine_archive_path,
            &[(entry.as_str(), b"engine".as_slice(), 0o755)],
        )
        .expect("zip");

        let host = ScriptedHost::new();
        let outcome = fetch_model(&host, &test.project).expect("fetch");
        assert!(!outcome.archive_downloaded);
        assert_eq!(outcome.extracted, 1);
        assert_eq!(host.downloads(), vec![test.project.config.engine.weights_url.clone()]);
    }

    #[test]
    fn archive_without_engine_is_fatal() {
        let test = linux_project();
        let host = ScriptedHost::new().on_download(|_, dest| {
            write_zip(dest, &[("README.txt", b"nothing here".as_slice(), 0o644)])
        });

        let err = fetch_model(&host, &test.project).expect_err("no engine in archive");
        assert!(err.downcast_ref::<MissingPrerequisite>().is_some());
    }

    #[test]
    fn download_failure_propagates() {
        let test = linux_project();
        let host = ScriptedHost::new()
            .on_download(|url, _| Err(anyhow::anyhow!("GET {url}: connection refused")));

        let err = fetch_model(&host, &test.project).expect_err("network failure");
        assert!(format!("{err:#}").contains("connection refused"));
        assert_eq!(host.calls().len(), 1);
    }

    #[test]
    fn system_path_engine_needs_no_archive() {
        let mut test = TestProject::new().expect("project");
        test.project.platform = crate::core::platform::Platform {
            os: "macos",
            arch: "aarch64",
        };
        let name = test.layout().engine_executable_name.clone();
        let host = ScriptedHost::new().with_program(&name, "/opt/homebrew/bin/katago");

        let outcome = fetch_model(&host, &test.project).expect("fetch");
        assert_eq!(outcome.engine, PathBuf::from("/opt/homebrew/bin/katago"));
        let archive_downloads = host
            .calls()
            .into_iter()
            .filter(|call| matches!(call, HostCall::Download { url, .. } if url.ends_with(".zip")))
            .count();
        assert_eq!(archive_downloads, 0);
    }
}
