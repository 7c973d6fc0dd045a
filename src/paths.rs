use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Name of the Git config file, both global and directory-local
pub const GITCONFIG_FILE: &str = ".gitconfig";
/// SSH directory in user's home directory
const SSH_DIR: &str = ".ssh";

/// Locations the setup reads from and writes to
#[derive(Debug, Clone)]
pub struct Environment {
    /// Directory the target directory is created under
    pub cwd: PathBuf,
    /// User's home directory
    pub home: PathBuf,
    /// Whether paths are written in Windows form and need converting for Git
    pub windows: bool,
}

impl Environment {
    /// Resolves the current and home directories of the running process
    pub fn detect() -> Result<Self, AppError> {
        let cwd: PathBuf = std::env::current_dir()
            .map_err(AppError::fs("get current directory", "."))?;
        let home: PathBuf = dirs::home_dir().ok_or(AppError::HomeDirNotFound)?;
        Ok(Self::new(cwd, home))
    }

    /// Builds an environment rooted at explicit directories
    pub fn new(cwd: impl Into<PathBuf>, home: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            home: home.into(),
            windows: cfg!(windows),
        }
    }

    /// Gets the path to the user's SSH directory
    pub fn ssh_dir(&self) -> PathBuf {
        self.home.join(SSH_DIR)
    }

    /// Gets the path to the global Git config
    pub fn global_gitconfig(&self) -> PathBuf {
        self.home.join(GITCONFIG_FILE)
    }

    /// Converts a native path to the form Git and ssh expect inside config values
    pub fn posix_path(&self, path: &Path) -> String {
        to_posix_path(&path.to_string_lossy(), self.windows)
    }
}

/// Converts a Windows path (`C:\Users\X`) to a POSIX-like one (`/c/Users/X`).
/// Non-Windows paths are returned unchanged.
pub fn to_posix_path(path: &str, windows: bool) -> String {
    if !windows {
        return path.to_string();
    }

    let slashed: String = forward_slashes(path);
    let mut chars = slashed.chars();
    match (chars.next(), chars.next()) {
        (Some(drive), Some(':')) if drive.is_ascii_alphabetic() => {
            format!("/{}{}", drive.to_ascii_lowercase(), &slashed[2..])
        }
        _ => slashed,
    }
}

/// Condition of the `includeIf "gitdir:..."` section for `target`.
/// Always ends with `/` so Git matches everything below the directory.
pub fn gitdir_pattern(target: &Path) -> String {
    let mut pattern: String = forward_slashes(&target.to_string_lossy());
    if !pattern.ends_with('/') {
        pattern.push('/');
    }
    pattern
}

/// Value of the include's `path` key: the target directory's local config
pub fn include_path(target: &Path) -> String {
    forward_slashes(&target.join(GITCONFIG_FILE).to_string_lossy())
}

fn forward_slashes(path: &str) -> String {
    path.replace('\\', "/")
}
