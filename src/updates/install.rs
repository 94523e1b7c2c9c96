//! Install method detection.
//!
//! Detects how milaidy was installed to determine the update mechanism.
//! Detection is a pure function of `PATH` and the filesystem at call time;
//! nothing is cached between runs.

use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the installed executable.
pub const BINARY_NAME: &str = "milaidy";

/// Flatpak application id.
pub const FLATPAK_APP_ID: &str = "ai.milaidy.Milaidy";

const DEPENDENCY_TREE_MARKER: &str = "/node_modules/";

/// How milaidy was installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstallMethod {
    /// `npm install -g`
    NpmGlobal,
    /// `bun add -g`
    BunGlobal,
    /// `pnpm add -g`
    PnpmGlobal,
    /// Homebrew formula
    Homebrew,
    /// Snap package
    Snap,
    /// Debian package
    Apt,
    /// Flatpak application
    Flatpak,
    /// Built from a source checkout
    LocalDev,
    /// Could not determine install method
    Unknown,
}

impl InstallMethod {
    /// Get a human-readable name for this install method.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NpmGlobal => "npm-global",
            Self::BunGlobal => "bun-global",
            Self::PnpmGlobal => "pnpm-global",
            Self::Homebrew => "homebrew",
            Self::Snap => "snap",
            Self::Apt => "apt",
            Self::Flatpak => "flatpak",
            Self::LocalDev => "local-dev",
            Self::Unknown => "unknown",
        }
    }

    /// Check if this method supports automatic updates.
    pub fn supports_auto_update(&self) -> bool {
        !matches!(self, Self::LocalDev)
    }
}

impl fmt::Display for InstallMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn in_dependency_tree(path: &str) -> bool {
    path.contains(DEPENDENCY_TREE_MARKER)
}

/// Ordered classification rules. Paths can match several predicates
/// (a Homebrew prefix may contain `node_modules`), so the first match wins.
const RULES: &[(fn(&str) -> bool, InstallMethod)] = &[
    (
        |p: &str| p.contains("/Cellar/") || p.contains("/homebrew/"),
        InstallMethod::Homebrew,
    ),
    (|p: &str| p.contains("/snap/"), InstallMethod::Snap),
    (
        |p: &str| p.contains("/flatpak/") || p.contains(FLATPAK_APP_ID),
        InstallMethod::Flatpak,
    ),
    (
        |p: &str| p.starts_with("/usr/") && !in_dependency_tree(p),
        InstallMethod::Apt,
    ),
    (|p: &str| p.contains("/.bun/"), InstallMethod::BunGlobal),
    (|p: &str| p.contains("/pnpm/"), InstallMethod::PnpmGlobal),
    (in_dependency_tree, InstallMethod::NpmGlobal),
];

/// Classify a resolved binary path.
pub fn classify_install_path(path: &Path) -> InstallMethod {
    let normalized = path.to_string_lossy().replace('\\', "/");

    RULES
        .iter()
        .find(|(matches, _)| matches(&normalized))
        .map(|(_, method)| *method)
        .unwrap_or(InstallMethod::Unknown)
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// Find an executable named `name` in `dirs`, in order.
pub fn find_on_path(name: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    let candidates: Vec<String> = if cfg!(windows) {
        vec![format!("{}.exe", name), format!("{}.cmd", name), name.to_string()]
    } else {
        vec![name.to_string()]
    };

    dirs.iter()
        .flat_map(|dir| candidates.iter().map(move |c| dir.join(c)))
        .find(|candidate| candidate.is_file())
}

fn declares_dev_dependencies(manifest: &str) -> bool {
    manifest.lines().map(str::trim).any(|line| {
        line == "[dev-dependencies]"
            || line.starts_with("[dev-dependencies.")
            || (line.starts_with("[target.") && line.contains(".dev-dependencies"))
    })
}

/// Walk up from `start` looking for a `Cargo.toml` with dev-dependencies.
pub fn find_dev_manifest(start: &Path) -> Option<PathBuf> {
    start.ancestors().map(|dir| dir.join("Cargo.toml")).find(|manifest| {
        fs::read_to_string(manifest)
            .map(|content| declares_dev_dependencies(&content))
            .unwrap_or(false)
    })
}

/// Detect the install method from an already-located binary.
///
/// `binary` is the PATH hit, if any. `manifest_start` is where to begin the
/// source checkout search when nothing is on PATH.
pub fn detect_from(binary: Option<PathBuf>, manifest_start: Option<&Path>) -> InstallMethod {
    let Some(binary) = binary else {
        let local = manifest_start.and_then(find_dev_manifest);
        tracing::debug!("{} not on PATH; dev manifest: {:?}", BINARY_NAME, local);
        return if local.is_some() {
            InstallMethod::LocalDev
        } else {
            InstallMethod::Unknown
        };
    };

    let resolved = fs::canonicalize(&binary).unwrap_or(binary);
    let method = classify_install_path(&resolved);
    tracing::debug!("Resolved {} to {} ({})", BINARY_NAME, resolved.display(), method);
    method
}

/// Detect how milaidy was installed.
pub fn detect_install_method() -> InstallMethod {
    let binary = find_on_path(BINARY_NAME, &parse_system_path());
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    detect_from(binary, exe_dir.as_deref())
}
