use std::{path::PathBuf, process::ExitStatus};

use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Error during file I/O operations
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// File I/O error on a known path
    #[error("failed to {action} '{}': {source}", .path.display())]
    Fs {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Error during JSON serialization
    #[error("json error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    /// Error when user input fails or is cancelled.
    #[error("form cancelled or failed: {0}")]
    Inquire(#[from] inquire::InquireError),
    /// Error when an external program cannot be started
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },
    /// Error when executing Git commands
    #[error("git command failed: {0}")]
    GitCommand(String),
    /// ssh-keygen exited unsuccessfully
    #[error("ssh-keygen failed (output: {output}): {status}")]
    Keygen { output: String, status: ExitStatus },
    /// Refusing to overwrite an existing key file
    #[error("SSH {kind} file already exists: {}. Please remove or rename it to generate a new one", .path.display())]
    KeyExists { kind: &'static str, path: PathBuf },
    /// Target path exists but is something other than a directory
    #[error("'{}' exists and is not a directory", .0.display())]
    NotADirectory(PathBuf),
    /// Clipboard could not be written
    #[error("{0}")]
    Clipboard(String),
    /// Error when the home directory cannot be determined
    #[error("failed to find the home directory")]
    HomeDirNotFound,
    /// Error during input validation.
    #[error("validation error: {0}")]
    Validation(String),
    /// Error during UTF-8 conversion.
    #[error("UTF-8 error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
    /// A setup step failed
    #[error("failed to {step}: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: Box<AppError>,
    },
}

impl AppError {
    /// Builds an [`AppError::Fs`] for `path`
    pub fn fs(action: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| AppError::Fs { action, path, source }
    }
}

/// Extension for attaching the failing setup step to an error
pub trait StepContext<T> {
    fn step(self, step: &'static str) -> Result<T, AppError>;
}

impl<T> StepContext<T> for Result<T, AppError> {
    fn step(self, step: &'static str) -> Result<T, AppError> {
        self.map_err(|source| AppError::Step {
            step,
            source: Box::new(source),
        })
    }
}
