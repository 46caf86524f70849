//! Operation-level tests driving `dispatch` with a scripted host.
//!
//! Each test builds a throwaway project, scripts the child processes and
//! downloads, and checks the filesystem afterwards.

use std::fs;

use goinsight::core::operation::Operation;
use goinsight::dispatch::dispatch;
use goinsight::exit_codes;
use goinsight::test_support::{HostCall, ScriptedHost, TestProject, write_file, write_zip};

/// Host whose `-m venv` and `sphinx-build` runs create what the real tools would.
fn provisioning_host(test: &TestProject) -> ScriptedHost {
    let layout = test.layout().clone();
    ScriptedHost::new()
        .with_program("python3", "/usr/bin/python3")
        .with_program("python", "/usr/bin/python")
        .on_run(move |spec| {
            if spec.display_args().iter().any(|arg| arg == "venv") {
                write_file(&layout.venv_python, "python").expect("python");
                write_file(&layout.venv_sphinx_build, "sphinx-build").expect("sphinx");
            } else if spec.program == layout.venv_sphinx_build {
                write_file(&layout.docs_index_path, "<html>").expect("index");
            }
            0
        })
}

#[test]
fn setup_twice_creates_environment_once() {
    let test = TestProject::new().expect("project");
    write_file(&test.layout().manifest_path, "pytest\n").expect("manifest");
    let host = provisioning_host(&test);

    for _ in 0..2 {
        let code = dispatch(Operation::Setup, &host, &test.project).expect("setup");
        assert_eq!(code, exit_codes::OK);
    }

    let venv_runs = host
        .runs()
        .iter()
        .filter(|spec| spec.display_args().iter().any(|arg| arg == "venv"))
        .count();
    assert_eq!(venv_runs, 1);
    let opens = host
        .calls()
        .iter()
        .filter(|call| matches!(call, HostCall::Open(_)))
        .count();
    assert_eq!(opens, 2);
}

#[test]
fn get_model_skips_extraction_when_engine_present() {
    let test = TestProject::new().expect("project");
    let engine = test.seed_engine("numSearchThreads = 4\n").expect("seed");
    let before = fs::read_dir(&test.layout().model_dir)
        .expect("read model dir")
        .count();
    let host = ScriptedHost::new();

    let code = dispatch(Operation::GetModel, &host, &test.project).expect("get-model");

    assert_eq!(code, exit_codes::OK);
    assert!(host.downloads().is_empty());
    assert_eq!(fs::read_to_string(&engine).expect("engine"), "engine");
    assert_eq!(
        fs::read_dir(&test.layout().model_dir)
            .expect("read model dir")
            .count(),
        before
    );
}

#[test]
fn get_model_downloads_and_extracts_archive() {
    let test = TestProject::with_config(|config| {
        config.engine.archive_url = Some("https://mirror.example/katago.zip".to_string());
    })
    .expect("project");
    let executable = test.layout().engine_executable_name.clone();
    let host = ScriptedHost::new().on_download(move |url, dest| {
        if url.ends_with("katago.zip") {
            let entry = format!("dist/{executable}");
            write_zip(
                dest,
                &[
                    (entry.as_str(), b"#!/bin/sh\n".as_slice(), 0o755),
                    ("dist/default_gtp.cfg", b"numSearchThreads = 4\n".as_slice(), 0o644),
                ],
            )
        } else {
            write_file(dest, "weights")
        }
    });

    dispatch(Operation::GetModel, &host, &test.project).expect("get-model");

    let layout = test.layout();
    assert!(
        layout
            .model_dir
            .join("dist")
            .join(&layout.engine_executable_name)
            .is_file()
    );
    assert!(layout.weights_path.is_file());
    assert_eq!(
        host.downloads(),
        vec![
            "https://mirror.example/katago.zip".to_string(),
            test.project.config.engine.weights_url.clone(),
        ]
    );
}

#[test]
fn get_model_keeps_existing_weights() {
    let test = TestProject::new().expect("project");
    test.seed_engine("").expect("seed");
    fs::write(&test.layout().weights_path, "local weights").expect("weights");
    let host = ScriptedHost::new();

    dispatch(Operation::GetModel, &host, &test.project).expect("get-model");

    assert!(host.downloads().is_empty());
    assert_eq!(
        fs::read_to_string(&test.layout().weights_path).expect("weights"),
        "local weights"
    );
}

#[test]
fn opt_model_rewrites_only_the_thread_line() {
    let test = TestProject::new().expect("project");
    let config = "# engine config\nlogDir = gtp_logs\r\nnumSearchThreads = 4\nmaxVisits = 500\n";
    test.seed_engine(config).expect("seed");
    let host = ScriptedHost::new().on_tee(|_| {
        (
            "numSearchThreads = 12: (baseline + 67 Elo) (recommended)\n\
             numSearchThreads = 16: (baseline + 60 Elo) (recommended)\n"
                .to_string(),
            0,
        )
    });

    let code = dispatch(Operation::OptModel, &host, &test.project).expect("opt-model");

    assert_eq!(code, exit_codes::OK);
    assert_eq!(
        fs::read_to_string(&test.layout().engine_config_path).expect("config"),
        "# engine config\nlogDir = gtp_logs\r\nnumSearchThreads = 12\nmaxVisits = 500\n"
    );
    let tee = host
        .calls()
        .into_iter()
        .find_map(|call| match call {
            HostCall::RunTee { spec, log_path } => Some((spec, log_path)),
            _ => None,
        })
        .expect("benchmark ran");
    assert_eq!(tee.0.display_args()[0], "benchmark");
    assert_eq!(tee.1, test.layout().benchmark_log_path);
}

#[test]
fn opt_model_appends_missing_thread_line() {
    let test = TestProject::new().expect("project");
    test.seed_engine("logDir = gtp_logs\nmaxVisits = 500").expect("seed");
    let host =
        ScriptedHost::new().on_tee(|_| ("numSearchThreads = 3 (recommended)\n".to_string(), 0));

    dispatch(Operation::OptModel, &host, &test.project).expect("opt-model");

    assert_eq!(
        fs::read_to_string(&test.layout().engine_config_path).expect("config"),
        "logDir = gtp_logs\nmaxVisits = 500\nnumSearchThreads = 3\n"
    );
}

#[test]
fn opt_model_parse_failure_leaves_config_unmodified() {
    let test = TestProject::new().expect("project");
    let config = "numSearchThreads = 4\n";
    test.seed_engine(config).expect("seed");
    let host = ScriptedHost::new().on_tee(|_| ("benchmark aborted\n".to_string(), 0));

    let err = dispatch(Operation::OptModel, &host, &test.project).expect_err("no recommendation");

    assert!(format!("{err:#}").contains("could not find recommended thread count"));
    assert_eq!(
        fs::read_to_string(&test.layout().engine_config_path).expect("config"),
        config
    );
}

#[test]
fn clean_removes_only_existing_directories() {
    let test = TestProject::new().expect("project");
    let layout = test.layout();
    fs::create_dir_all(&layout.neuralnet_dir).expect("neuralnet");
    fs::create_dir_all(layout.docs_html_dir.join("_static")).expect("docs build");
    write_file(&layout.docs_source_dir.join("index.rst"), "GoInsight").expect("docs source");

    let code = dispatch(Operation::Clean, &ScriptedHost::new(), &test.project).expect("clean");

    assert_eq!(code, exit_codes::OK);
    assert!(!layout.neuralnet_dir.exists());
    assert!(!layout.docs_build_dir.exists());
    assert!(layout.docs_source_dir.join("index.rst").is_file());
}

#[test]
fn tests_forward_runner_exit_code() {
    for expected in [0, 1, 2] {
        let test = TestProject::new().expect("project");
        test.seed_env().expect("seed env");
        let host = ScriptedHost::new().on_run(move |spec| {
            if spec.display_args().iter().any(|arg| arg == "--version") {
                0
            } else {
                expected
            }
        });

        let code = dispatch(Operation::Tests, &host, &test.project).expect("tests");
        assert_eq!(code, expected);
    }
}

#[test]
fn docs_install_generator_on_demand() {
    let test = TestProject::new().expect("project");
    write_file(&test.layout().venv_python, "python").expect("python");
    let layout = test.layout().clone();
    let host = ScriptedHost::new().on_run(move |spec| {
        if spec.display_args().iter().any(|arg| arg == "sphinx") {
            write_file(&layout.venv_sphinx_build, "sphinx-build").expect("sphinx");
        } else if spec.program == layout.venv_sphinx_build {
            write_file(&layout.docs_index_path, "<html>").expect("index");
        }
        0
    });

    dispatch(Operation::Docs, &host, &test.project).expect("docs");

    assert!(test.layout().docs_index_path.is_file());
    assert_eq!(
        host.calls().last(),
        Some(&HostCall::Open(test.layout().docs_index_path.clone()))
    );
}

#[test]
fn run_model_forwards_engine_exit_code() {
    let test = TestProject::new().expect("project");
    test.seed_engine("numSearchThreads = 4\n").expect("seed");
    let host = ScriptedHost::new().on_run(|_| 7);

    let code = dispatch(Operation::RunModel, &host, &test.project).expect("run-model");

    assert_eq!(code, 7);
    assert!(test.layout().log_dir.is_dir());
}
