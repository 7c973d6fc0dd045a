use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::AppError;

/// Permissions of a newly created target directory
#[cfg(unix)]
const DIR_MODE: u32 = 0o755;

/// Whether the target directory was made by this run
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DirectoryStatus {
    Created,
    Existing,
}

/// Ensures `cwd/name` exists as a directory, creating it if missing
///
/// # Arguments
/// * `cwd` - Directory the target is resolved against
/// * `name` - Validated directory name
pub fn ensure_directory(cwd: &Path, name: &str) -> Result<(PathBuf, DirectoryStatus), AppError> {
    let target: PathBuf = std::path::absolute(cwd.join(name))
        .map_err(AppError::fs("get absolute path for", cwd.join(name)))?;

    match fs::metadata(&target) {
        Ok(meta) if meta.is_dir() => {
            debug!(path = %target.display(), "directory already exists");
            Ok((target, DirectoryStatus::Existing))
        }
        Ok(_) => Err(AppError::NotADirectory(target)),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            create_dir(&target)?;
            info!(path = %target.display(), "created directory");
            Ok((target, DirectoryStatus::Created))
        }
        Err(err) => Err(AppError::fs("check directory status", target)(err)),
    }
}

fn create_dir(path: &Path) -> Result<(), AppError> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder
        .create(path)
        .map_err(AppError::fs("create directory", path))
}
