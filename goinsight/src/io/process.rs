//! Helpers for running child processes with inherited stdio or tee'd output.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, error, instrument, warn};

use crate::exit_codes;

/// A child process invocation: program, arguments and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_os_string()));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Arguments as lossy UTF-8, for logs and assertions.
    pub fn display_args(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    /// File name of the program (falls back to the full path).
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .into_owned()
    }

    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        cmd
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in self.display_args() {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Map an exit status to a process exit code.
///
/// Signals become `128 + signal` on unix, matching shell conventions.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    exit_codes::FAILURE
}

/// Run a command with the operator's terminal attached and wait for it.
#[instrument(skip_all, fields(program = %spec.program_name()))]
pub fn run_inherited(spec: &CommandSpec) -> Result<i32> {
    debug!(command = %spec, "spawning child process");
    let status = spec
        .to_command()
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("spawn {}", spec.program.display()))?;
    let code = exit_code(status);
    debug!(exit_code = code, "command finished");
    Ok(code)
}

type SharedLog = Arc<Mutex<BufWriter<File>>>;

/// Run a command, duplicating stdout and stderr to the terminal and to `log_path`.
///
/// Both streams are drained concurrently so the child never blocks on a full
/// pipe. Each line is written to the log and flushed as soon as it arrives.
#[instrument(skip_all, fields(program = %spec.program_name(), log = %log_path.display()))]
pub fn run_tee(spec: &CommandSpec, log_path: &Path) -> Result<i32> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create log dir {}", parent.display()))?;
    }
    let file = File::create(log_path)
        .with_context(|| format!("create log file {}", log_path.display()))?;
    let log: SharedLog = Arc::new(Mutex::new(BufWriter::new(file)));

    debug!(command = %spec, "spawning child process");
    let mut child = match spec
        .to_command()
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(c) => c,
        Err(e) => {
            error!(err = %e, "failed to spawn command");
            return Err(e).with_context(|| format!("spawn {}", spec.program.display()));
        }
    };

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr was not piped"))?;

    let stdout_log = Arc::clone(&log);
    let stdout_handle = thread::spawn(move || tee_stream(stdout, std::io::stdout(), &stdout_log));
    let stderr_log = Arc::clone(&log);
    let stderr_handle = thread::spawn(move || tee_stream(stderr, std::io::stderr(), &stderr_log));

    let status = child.wait().context("wait for command")?;
    join_tee(stdout_handle).context("join stdout")?;
    join_tee(stderr_handle).context("join stderr")?;

    let code = exit_code(status);
    debug!(exit_code = code, "command finished");
    Ok(code)
}

fn join_tee(handle: thread::JoinHandle<Result<u64>>) -> Result<u64> {
    match handle.join() {
        Ok(result) => result,
        Err(_) => Err(anyhow!("output reader thread panicked")),
    }
}

/// Copy `reader` line by line to `terminal` and `log`, returning bytes copied.
///
/// Terminal write failures are logged and ignored; log failures are errors,
/// since the log is what later steps parse.
fn tee_stream<R: Read, W: Write>(reader: R, mut terminal: W, log: &SharedLog) -> Result<u64> {
    let mut buf_reader = BufReader::new(reader);
    let mut copied = 0u64;
    let mut terminal_ok = true;

    loop {
        let mut line = Vec::new();
        let n = buf_reader
            .read_until(b'\n', &mut line)
            .context("read line")?;
        if n == 0 {
            break;
        }

        if terminal_ok && let Err(e) = terminal.write_all(&line).and_then(|()| terminal.flush()) {
            warn!(err = %e, "failed to write to terminal, continuing with log only");
            terminal_ok = false;
        }

        let mut writer = log
            .lock()
            .map_err(|_| anyhow!("log writer lock poisoned"))?;
        writer.write_all(&line).context("write log")?;
        writer.flush().context("flush log")?;
        copied += n as u64;
    }

    Ok(copied)
}
