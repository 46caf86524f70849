//! Benchmark-log parsing and engine config rewriting for `opt-model`.
//!
//! Both functions are pure: the caller reads the log, decides, and only then
//! writes the config, so a parse failure never touches the config file.

use std::sync::LazyLock;

use thiserror::Error;

/// Engine config key tuned by the benchmark.
pub const THREADS_KEY: &str = "numSearchThreads";

const RECOMMENDED_MARKER: &str = "(recommended)";

static RECOMMENDED_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\bnumSearchThreads\s*=\s*([^\s:(]*)").unwrap());

/// Group 1 is the assignment's value token.
static ACTIVE_ASSIGNMENT_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^[ \t]*numSearchThreads[ \t]*=[ \t]*([^ \t#\r\n]*)").unwrap()
});

const BOM: &str = "\u{feff}";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TuneError {
    #[error("could not find recommended thread count in benchmark output")]
    RecommendationMissing,
    #[error("recommended thread count is not a positive integer: {0:?}")]
    InvalidThreadCount(String),
}

/// Extract the first recommended `numSearchThreads` value from benchmark output.
///
/// Accepts both `numSearchThreads = 12: ... (recommended)` (upstream summary
/// format) and `numSearchThreads = 12 (recommended)`. Later recommendations
/// are ignored.
pub fn parse_recommended_threads(log: &str) -> Result<u32, TuneError> {
    let raw = log
        .lines()
        .filter(|line| line.contains(RECOMMENDED_MARKER))
        .find_map(|line| RECOMMENDED_RE.captures(line))
        .map(|caps| caps.get(1).map_or("", |m| m.as_str()).to_string())
        .ok_or(TuneError::RecommendationMissing)?;

    match raw.parse::<u32>() {
        Ok(threads) if threads > 0 => Ok(threads),
        _ => Err(TuneError::InvalidThreadCount(raw)),
    }
}

/// Set `numSearchThreads` in an engine config, returning the new text.
///
/// Only the value of the first active assignment is replaced, so its
/// indentation, spacing, trailing comment and line ending survive. Later
/// active duplicates are dropped and every other line is kept byte-for-byte.
/// A leading byte order mark is kept and ignored when matching. Without an
/// active assignment a new line is appended.
pub fn apply_thread_count(config: &str, threads: u32) -> String {
    let assignment = format!("{THREADS_KEY} = {threads}");
    let mut out = String::with_capacity(config.len() + assignment.len() + 2);
    let mut replaced = false;

    for (index, line) in config.split_inclusive('\n').enumerate() {
        let (bom, line) = match line.strip_prefix(BOM) {
            Some(rest) if index == 0 => (BOM, rest),
            _ => ("", line),
        };
        out.push_str(bom);

        let (body, _) = split_line_ending(line);
        let Some(value) = ACTIVE_ASSIGNMENT_RE
            .captures(body)
            .and_then(|caps| caps.get(1))
        else {
            out.push_str(line);
            continue;
        };
        if !replaced {
            out.push_str(&line[..value.start()]);
            out.push_str(&threads.to_string());
            out.push_str(&line[value.end()..]);
            replaced = true;
        }
    }

    if !replaced {
        let newline = if config.contains("\r\n") { "\r\n" } else { "\n" };
        if !out.is_empty() && out != BOM && !out.ends_with('\n') {
            out.push_str(newline);
        }
        out.push_str(&assignment);
        out.push_str(newline);
    }
    out
}

fn split_line_ending(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}
