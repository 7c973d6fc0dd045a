use std::{
    io::{ErrorKind, Write},
    process::{Command, Stdio},
};

use tracing::debug;

use crate::error::AppError;

/// Clipboard programs tried in order, with their arguments
#[cfg(target_os = "macos")]
const CLIPBOARD_PROGRAMS: &[(&str, &[&str])] = &[("pbcopy", &[])];
#[cfg(windows)]
const CLIPBOARD_PROGRAMS: &[(&str, &[&str])] = &[("clip", &[])];
#[cfg(not(any(target_os = "macos", windows)))]
const CLIPBOARD_PROGRAMS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

/// Copies `text` to the system clipboard using the first available program
pub fn copy(text: &str) -> Result<(), AppError> {
    copy_with(CLIPBOARD_PROGRAMS, text)
}

fn copy_with(programs: &[(&'static str, &[&str])], text: &str) -> Result<(), AppError> {
    let mut last_failure: Option<AppError> = None;
    for &(program, args) in programs {
        match pipe_to(program, args, text) {
            Ok(()) => {
                debug!(program, "copied to clipboard");
                return Ok(());
            }
            Err(AppError::Spawn { source, .. }) if source.kind() == ErrorKind::NotFound => {
                debug!(program, "clipboard program not installed");
            }
            Err(err) => {
                debug!(program, error = %err, "clipboard program failed");
                last_failure = Some(err);
            }
        }
    }

    Err(last_failure.unwrap_or_else(|| {
        let names: Vec<&str> = programs.iter().map(|(program, _)| *program).collect();
        AppError::Clipboard(format!("no clipboard program found (tried {})", names.join(", ")))
    }))
}

fn pipe_to(program: &'static str, args: &[&str], text: &str) -> Result<(), AppError> {
    // xclip and wl-copy leave a background process owning the selection; it
    // must not inherit any pipe we wait on
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| AppError::Spawn { program, source })?;

    if let Some(mut stdin) = child.stdin.take() {
        // a program that exits early is judged by its exit status below
        if let Err(err) = stdin.write_all(text.as_bytes()) {
            if err.kind() != ErrorKind::BrokenPipe {
                return Err(err.into());
            }
        }
    }

    let status = child.wait()?;
    if !status.success() {
        return Err(AppError::Clipboard(format!("{} exited with {}", program, status)));
    }
    Ok(())
}
