use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};

use crate::{
    clipboard,
    error::{AppError, StepContext},
    git::{self, GlobalUpdate},
    identity::{IdentityRequest, KeyType},
    keygen::{self, KeyPair},
    paths::Environment,
    workspace::{self, DirectoryStatus},
};

/// Switches for optional setup steps
#[derive(Debug, Clone, Copy)]
pub struct SetupOptions {
    /// Copy the public key to the system clipboard
    pub copy_to_clipboard: bool,
}

/// What happened to the public key on the clipboard
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ClipboardOutcome {
    Copied,
    Failed { error: String },
    Skipped,
}

/// Result of a completed setup
#[derive(Serialize, Debug, Clone)]
pub struct SetupSummary {
    /// Absolute path of the target directory
    pub directory: PathBuf,
    pub directory_status: DirectoryStatus,
    pub key_type: KeyType,
    pub keys: KeyPair,
    /// Public key text, without trailing newline
    pub public_key: String,
    /// Path of the directory-local Git config
    pub local_config: PathBuf,
    pub global_config: GlobalUpdate,
    pub sign_commits: bool,
    pub clipboard: ClipboardOutcome,
}

/// Runs every setup step for `request` in order
///
/// Steps already completed are not undone when a later one fails.
pub fn run(request: &IdentityRequest, env: &Environment, options: SetupOptions) -> Result<SetupSummary, AppError> {
    let (directory, directory_status) = workspace::ensure_directory(&env.cwd, &request.directory_name)?;

    let key_name: String = keygen::key_name(&request.directory_name);
    let keys: KeyPair = keygen::generate_key(&env.ssh_dir(), request.key_type, &key_name)
        .step("generate SSH key")?;
    let public_key: String = keygen::read_public_key(&keys).step("read public key")?;

    let clipboard = if options.copy_to_clipboard {
        match clipboard::copy(&public_key) {
            Ok(()) => ClipboardOutcome::Copied,
            Err(err) => {
                warn!(error = %err, "could not copy public key to clipboard");
                ClipboardOutcome::Failed {
                    error: err.to_string(),
                }
            }
        }
    } else {
        ClipboardOutcome::Skipped
    };

    let local_contents: String = git::render_local_config(
        request,
        &env.posix_path(&keys.private_key),
        &env.posix_path(&keys.public_key),
    );
    let local_config: PathBuf = git::write_local_config(&directory, &local_contents)
        .step("create local .gitconfig")?;

    let global_config: GlobalUpdate = git::update_global_config(&env.global_gitconfig(), &directory)
        .step("update global .gitconfig")?;

    info!(directory = %directory.display(), "setup completed");
    Ok(SetupSummary {
        directory,
        directory_status,
        key_type: request.key_type,
        keys,
        public_key: public_key.trim().to_string(),
        local_config,
        global_config,
        sign_commits: request.sign_commits,
        clipboard,
    })
}
