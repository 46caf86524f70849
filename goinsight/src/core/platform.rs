//! Platform-specific engine distribution details.

/// Base URL of upstream KataGo release downloads.
pub const RELEASE_BASE_URL: &str = "https://github.com/lightvector/KataGo/releases/download";

/// Where the engine comes from on a given platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineSource {
    /// Prebuilt archive downloaded from this URL.
    Archive(String),
    /// No upstream prebuilt; the engine must be installed on the search path.
    SystemPath { install_hint: &'static str },
    Unsupported { os: String, arch: String },
}

/// Operating system and architecture pair, as reported by `std::env::consts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform<'a> {
    pub os: &'a str,
    pub arch: &'a str,
}

impl Platform<'static> {
    pub fn current() -> Self {
        Self {
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
        }
    }
}

impl Platform<'_> {
    /// Engine executable file name.
    pub fn engine_executable(&self) -> &'static str {
        if self.os == "windows" {
            "katago.exe"
        } else {
            "katago"
        }
    }

    pub fn engine_source(&self, version: &str) -> EngineSource {
        match (self.os, self.arch) {
            ("linux", "x86_64") => EngineSource::Archive(archive_url(version, "linux-x64")),
            ("windows", "x86_64") => EngineSource::Archive(archive_url(version, "windows-x64")),
            ("macos", _) => EngineSource::SystemPath {
                install_hint: "install it with `brew install katago`",
            },
            (os, arch) => EngineSource::Unsupported {
                os: os.to_string(),
                arch: arch.to_string(),
            },
        }
    }
}

fn archive_url(version: &str, target: &str) -> String {
    format!("{RELEASE_BASE_URL}/{version}/katago-{version}-eigen-{target}.zip")
}
