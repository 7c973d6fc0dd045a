use std::{
    ffi::OsString,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    process::{Command, Output, Stdio},
};

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{error::AppError, identity::KeyType};

const SSH_KEYGEN: &str = "ssh-keygen";
/// Permissions of a newly created SSH directory
#[cfg(unix)]
const SSH_DIR_MODE: u32 = 0o700;
/// Permissions of the private key
#[cfg(unix)]
const PRIVATE_KEY_MODE: u32 = 0o600;

/// Paths of a generated key pair
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub private_key: PathBuf,
    pub public_key: PathBuf,
}

impl KeyPair {
    /// Key pair named `key_name` inside `ssh_dir`
    pub fn in_dir(ssh_dir: &Path, key_name: &str) -> Self {
        let private_key: PathBuf = ssh_dir.join(key_name);
        let mut public_key: OsString = private_key.clone().into_os_string();
        public_key.push(".pub");
        Self {
            private_key,
            public_key: PathBuf::from(public_key),
        }
    }
}

/// Unique, filesystem-safe key name derived from the directory name
pub fn key_name(directory_name: &str) -> String {
    format!("{}-{}", directory_name, Uuid::new_v4()).replace(std::path::MAIN_SEPARATOR, "_")
}

/// Arguments for an unattended `ssh-keygen` run without passphrase
pub fn keygen_args(key_type: KeyType, private_key: &Path, comment: &str) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-t".into(),
        key_type.as_str().into(),
        "-f".into(),
        private_key.as_os_str().to_owned(),
        "-N".into(),
        "".into(),
        "-C".into(),
        comment.into(),
    ];
    if let Some(bits) = key_type.bits() {
        args.push("-b".into());
        args.push(bits.to_string().into());
    }
    args
}

/// Generates a new key pair in `ssh_dir`, refusing to overwrite existing files
///
/// # Arguments
/// * `ssh_dir` - User's SSH directory, created if missing
/// * `key_type` - Algorithm of the key
/// * `key_name` - File name of the private key, also used as the key comment
pub fn generate_key(ssh_dir: &Path, key_type: KeyType, key_name: &str) -> Result<KeyPair, AppError> {
    ensure_ssh_dir(ssh_dir)?;

    let pair = KeyPair::in_dir(ssh_dir, key_name);
    check_absent(&pair.private_key, "key")?;
    check_absent(&pair.public_key, "public key")?;

    let args: Vec<OsString> = keygen_args(key_type, &pair.private_key, key_name);
    debug!(?args, "running {}", SSH_KEYGEN);
    let output: Output = Command::new(SSH_KEYGEN)
        .args(&args)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| AppError::Spawn {
            program: SSH_KEYGEN,
            source,
        })?;

    if !output.status.success() {
        let mut combined: String = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        return Err(AppError::Keygen {
            output: combined.trim().to_string(),
            status: output.status,
        });
    }
    info!(path = %pair.private_key.display(), %key_type, "generated SSH key");

    restrict_private_key(&pair.private_key);
    Ok(pair)
}

/// Reads the public half of the key pair
pub fn read_public_key(pair: &KeyPair) -> Result<String, AppError> {
    fs::read_to_string(&pair.public_key).map_err(AppError::fs("read", &pair.public_key))
}

fn ensure_ssh_dir(ssh_dir: &Path) -> Result<(), AppError> {
    match fs::metadata(ssh_dir) {
        Ok(_) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            let mut builder = fs::DirBuilder::new();
            builder.recursive(true);
            #[cfg(unix)]
            {
                use std::os::unix::fs::DirBuilderExt;
                builder.mode(SSH_DIR_MODE);
            }
            builder
                .create(ssh_dir)
                .map_err(AppError::fs("create .ssh directory", ssh_dir))?;
            info!(path = %ssh_dir.display(), "created .ssh directory");
            Ok(())
        }
        Err(err) => Err(AppError::fs("check .ssh directory", ssh_dir)(err)),
    }
}

fn check_absent(path: &Path, kind: &'static str) -> Result<(), AppError> {
    if path.exists() {
        return Err(AppError::KeyExists {
            kind,
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(unix)]
fn restrict_private_key(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Err(err) = fs::set_permissions(path, fs::Permissions::from_mode(PRIVATE_KEY_MODE)) {
        warn!(path = %path.display(), error = %err, "could not set private key permissions (chmod 600)");
    }
}

#[cfg(not(unix))]
fn restrict_private_key(_path: &Path) {}
