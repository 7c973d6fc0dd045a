use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// SSH key algorithm passed to `ssh-keygen -t`
#[derive(Serialize, Deserialize, ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    Ed25519,
    Rsa,
}

impl KeyType {
    /// All key types in the order they are offered, recommended first
    pub const ALL: [KeyType; 2] = [KeyType::Ed25519, KeyType::Rsa];

    /// Name understood by `ssh-keygen -t`
    pub fn as_str(self) -> &'static str {
        match self {
            KeyType::Ed25519 => "ed25519",
            KeyType::Rsa => "rsa",
        }
    }

    /// Explicit key size, if the algorithm takes one
    pub fn bits(self) -> Option<u32> {
        match self {
            KeyType::Ed25519 => None,
            KeyType::Rsa => Some(4096),
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to set up one directory-scoped Git identity
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IdentityRequest {
    /// Name of the directory created under the current directory
    pub directory_name: String,
    /// Algorithm of the generated SSH key
    pub key_type: KeyType,
    /// Git username (user.name)
    pub git_username: String,
    /// Git email address (user.email)
    pub git_email: String,
    /// Whether commits and tags are signed with the SSH key
    pub sign_commits: bool,
}
