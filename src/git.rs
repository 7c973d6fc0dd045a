use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    error::AppError,
    identity::IdentityRequest,
    paths::{GITCONFIG_FILE, gitdir_pattern, include_path},
};

const GIT: &str = "git";

/// Whether the global config gained the conditional include
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IncludeStatus {
    Added,
    AlreadyPresent,
}

/// Outcome of updating the global Git config
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GlobalUpdate {
    /// Path of the global config
    pub path: PathBuf,
    /// Whether the file did not exist and was created empty
    pub created: bool,
    pub include: IncludeStatus,
}

/// Renders the directory-local config for `request`
///
/// # Arguments
/// * `request` - Identity to configure
/// * `private_key` - Private key path, already in the form Git expects
/// * `public_key` - Public key path, already in the form Git expects
pub fn render_local_config(request: &IdentityRequest, private_key: &str, public_key: &str) -> String {
    let mut user: Vec<(&str, String)> = vec![
        ("name", request.git_username.clone()),
        ("email", request.git_email.clone()),
    ];
    if request.sign_commits {
        user.push(("signingkey", public_key.to_string()));
    }

    let mut sections: Vec<(&str, Vec<(&str, String)>)> = vec![
        ("user", user),
        ("core", vec![("sshCommand", ssh_command(private_key))]),
    ];
    if request.sign_commits {
        sections.push(("gpg", vec![("format", "ssh".to_string())]));
        sections.push(("commit", vec![("gpgsign", "true".to_string())]));
        sections.push(("tag", vec![("gpgsign", "true".to_string())]));
    }

    let mut out = String::new();
    for (section, entries) in sections {
        out.push_str(&format!("[{}]\n", section));
        for (key, value) in entries {
            out.push_str(&format!("\t{} = {}\n", key, quote_value(&value)));
        }
    }
    out
}

/// Writes the local config into `target`, replacing any existing one
pub fn write_local_config(target: &Path, contents: &str) -> Result<PathBuf, AppError> {
    let path: PathBuf = target.join(GITCONFIG_FILE);
    fs::write(&path, contents).map_err(AppError::fs("save local .gitconfig to", &path))?;
    info!(path = %path.display(), "wrote local .gitconfig");
    Ok(path)
}

/// Adds an `includeIf "gitdir:<target>/"` pointing at the target's local config
///
/// # Arguments
/// * `global` - Path of the global config, created if missing
/// * `target` - Directory whose repositories pick up the local config
pub fn update_global_config(global: &Path, target: &Path) -> Result<GlobalUpdate, AppError> {
    let created: bool = !global.exists();
    if created {
        fs::File::create(global).map_err(AppError::fs("create global .gitconfig", global))?;
        info!(path = %global.display(), "created global .gitconfig");
    }

    let key: String = format!("includeIf.gitdir:{}.path", gitdir_pattern(target));
    let value: String = include_path(target);

    let include = if get_config_value(global, &key)?.as_deref() == Some(value.as_str()) {
        debug!(%key, "include already present");
        IncludeStatus::AlreadyPresent
    } else {
        set_config_value(global, &key, &value)?;
        info!(%key, %value, "added include to global .gitconfig");
        IncludeStatus::Added
    };

    Ok(GlobalUpdate {
        path: global.to_path_buf(),
        created,
        include,
    })
}

/// Executes a Git config get command against `file`
///
/// Returns `None` when the key is not set.
pub fn get_config_value(file: &Path, key: &str) -> Result<Option<String>, AppError> {
    let git_command_output: Output = git_config(file, &["--get", key])?;

    if git_command_output.status.code() == Some(1) {
        return Ok(None);
    }
    if !git_command_output.status.success() {
        return Err(AppError::GitCommand(
            String::from_utf8(git_command_output.stderr)?.trim().to_string(),
        ));
    }

    let value = String::from_utf8(git_command_output.stdout)?;
    Ok(Some(value.trim_end_matches(['\n', '\r']).to_string()))
}

/// Executes a Git config set command against `file`, replacing every existing value of `key`
pub fn set_config_value(file: &Path, key: &str, value: &str) -> Result<(), AppError> {
    let git_command_output: Output = git_config(file, &["--replace-all", key, value])?;

    if !git_command_output.status.success() {
        return Err(AppError::GitCommand(
            String::from_utf8(git_command_output.stderr)?.trim().to_string(),
        ));
    }

    Ok(())
}

fn git_config(file: &Path, args: &[&str]) -> Result<Output, AppError> {
    debug!(file = %file.display(), ?args, "running git config");
    Command::new(GIT)
        .arg("config")
        .arg("--file")
        .arg(file)
        .args(args)
        .output()
        .map_err(|source| AppError::Spawn { program: GIT, source })
}

fn ssh_command(private_key: &str) -> String {
    if private_key.contains(char::is_whitespace) {
        format!("ssh -i \"{}\" -o IdentitiesOnly=yes", private_key)
    } else {
        format!("ssh -i {} -o IdentitiesOnly=yes", private_key)
    }
}

/// Escapes a value for a git-config file, quoting it when needed
fn quote_value(value: &str) -> String {
    let escaped: String = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\t', "\\t");
    let needs_quotes = value.contains(['#', ';'])
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace);
    if needs_quotes {
        format!("\"{}\"", escaped)
    } else {
        escaped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::KeyType;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn git_available() -> bool {
        Command::new(GIT).arg("--version").output().is_ok()
    }

    fn request(sign_commits: bool) -> IdentityRequest {
        IdentityRequest {
            directory_name: "work".to_string(),
            key_type: KeyType::Ed25519,
            git_username: "Jane Doe".to_string(),
            git_email: "jane@example.com".to_string(),
            sign_commits,
        }
    }

    #[test]
    fn local_config_without_signing() {
        let config = render_local_config(&request(false), "/home/u/.ssh/work-1", "/home/u/.ssh/work-1.pub");
        assert_eq!(
            config,
            "[user]\n\
             \tname = Jane Doe\n\
             \temail = jane@example.com\n\
             [core]\n\
             \tsshCommand = ssh -i /home/u/.ssh/work-1 -o IdentitiesOnly=yes\n"
        );
    }

    #[test]
    fn local_config_with_signing() {
        let config = render_local_config(&request(true), "/home/u/.ssh/work-1", "/home/u/.ssh/work-1.pub");
        assert_eq!(
            config,
            "[user]\n\
             \tname = Jane Doe\n\
             \temail = jane@example.com\n\
             \tsigningkey = /home/u/.ssh/work-1.pub\n\
             [core]\n\
             \tsshCommand = ssh -i /home/u/.ssh/work-1 -o IdentitiesOnly=yes\n\
             [gpg]\n\
             \tformat = ssh\n\
             [commit]\n\
             \tgpgsign = true\n\
             [tag]\n\
             \tgpgsign = true\n"
        );
    }

    #[test]
    fn special_characters_are_quoted() {
        assert_eq!(quote_value("plain value"), "plain value");
        assert_eq!(quote_value("team #1"), "\"team #1\"");
        assert_eq!(quote_value(" padded"), "\" padded\"");
        assert_eq!(quote_value("say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(
            ssh_command("/home/my user/.ssh/k"),
            "ssh -i \"/home/my user/.ssh/k\" -o IdentitiesOnly=yes"
        );
    }

    #[test]
    fn local_config_replaces_existing_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".gitconfig"), "[user]\n\tname = old\n").unwrap();
        let path = write_local_config(dir.path(), "[user]\n\tname = new\n").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "[user]\n\tname = new\n");
    }

    #[test]
    fn local_config_is_readable_by_git() {
        if !git_available() {
            return;
        }
        let dir = tempdir().unwrap();
        let mut req = request(true);
        req.git_username = "Jane \"JD\" Doe #2".to_string();
        let contents = render_local_config(&req, "/home/my user/.ssh/k", "/home/my user/.ssh/k.pub");
        let path = write_local_config(dir.path(), &contents).unwrap();

        assert_eq!(
            get_config_value(&path, "user.name").unwrap().as_deref(),
            Some("Jane \"JD\" Doe #2")
        );
        assert_eq!(
            get_config_value(&path, "core.sshCommand").unwrap().as_deref(),
            Some("ssh -i \"/home/my user/.ssh/k\" -o IdentitiesOnly=yes")
        );
        assert_eq!(get_config_value(&path, "commit.gpgsign").unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn global_include_is_added_once() {
        if !git_available() {
            return;
        }
        let home = tempdir().unwrap();
        let global = home.path().join(".gitconfig");
        fs::write(&global, "[user]\n\tname = Global User\n").unwrap();
        let target = home.path().join("work.project");

        let first = update_global_config(&global, &target).unwrap();
        assert!(!first.created);
        assert_eq!(first.include, IncludeStatus::Added);

        let second = update_global_config(&global, &target).unwrap();
        assert_eq!(second.include, IncludeStatus::AlreadyPresent);

        let key = format!("includeIf.gitdir:{}.path", gitdir_pattern(&target));
        assert_eq!(
            get_config_value(&global, &key).unwrap(),
            Some(include_path(&target))
        );
        assert_eq!(
            get_config_value(&global, "user.name").unwrap().as_deref(),
            Some("Global User")
        );
        let text = fs::read_to_string(&global).unwrap();
        assert_eq!(text.matches("includeIf").count(), 1);
    }

    #[test]
    fn missing_global_config_is_created() {
        if !git_available() {
            return;
        }
        let home = tempdir().unwrap();
        let global = home.path().join(".gitconfig");
        let update = update_global_config(&global, &home.path().join("work")).unwrap();
        assert!(update.created);
        assert_eq!(update.include, IncludeStatus::Added);
        assert!(global.is_file());
    }

    #[test]
    fn missing_key_reads_as_none() {
        if !git_available() {
            return;
        }
        let home = tempdir().unwrap();
        let global = home.path().join(".gitconfig");
        fs::write(&global, "").unwrap();
        assert_eq!(get_config_value(&global, "user.email").unwrap(), None);
    }
}
