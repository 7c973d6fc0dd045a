use colored::Colorize;
use inquire::{Confirm, Select};

use crate::{
    cli::SetupArgs,
    error::AppError,
    identity::{IdentityRequest, KeyType},
    validation::{prompt_until_valid, validate_input_directory, validate_input_email, validate_input_username},
};

/// Collects the identity request, prompting for anything not given on the command line
pub fn collect_request(args: &SetupArgs) -> Result<IdentityRequest, AppError> {
    let directory_name: String = text_field(
        args.directory.as_deref(),
        args.no_input,
        "--directory",
        TextPrompt {
            message: "Directory Name",
            placeholder: "projects",
            help: "Name of the directory to create or use (e.g., github-personal, work-project)",
        },
        validate_input_directory,
    )?;

    let key_type: KeyType = match args.key_type {
        Some(key_type) => key_type,
        None if args.no_input => return Err(missing("--key-type")),
        None => Select::new(&format!("{}", "SSH Key Type".blue()), KeyType::ALL.to_vec())
            .with_help_message("ed25519 recommended")
            .prompt()?,
    };

    let git_username: String = text_field(
        args.username.as_deref(),
        args.no_input,
        "--username",
        TextPrompt {
            message: "Git Username",
            placeholder: "username",
            help: "Git username for this context",
        },
        validate_input_username,
    )?;

    let git_email: String = text_field(
        args.email.as_deref(),
        args.no_input,
        "--email",
        TextPrompt {
            message: "Git Email",
            placeholder: "user@example.com",
            help: "Git email for this context",
        },
        validate_input_email,
    )?;

    let sign_commits: bool = match args.sign_commits {
        Some(sign) => sign,
        None if args.no_input => false,
        None => Confirm::new(&format!("{}", "Sign Commits?".blue()))
            .with_default(false)
            .with_help_message("Sign Git commits using this SSH key? (Requires Git 2.34+)")
            .prompt()?,
    };

    Ok(IdentityRequest {
        directory_name,
        key_type,
        git_username,
        git_email,
        sign_commits,
    })
}

struct TextPrompt {
    message: &'static str,
    placeholder: &'static str,
    help: &'static str,
}

/// Uses the flag value when given, otherwise prompts until the input is valid
fn text_field<F>(
    given: Option<&str>,
    no_input: bool,
    flag: &str,
    prompt: TextPrompt,
    input_validation: F,
) -> Result<String, AppError>
where
    F: Fn(&str) -> Result<(), AppError>,
{
    match given {
        Some(value) => {
            input_validation(value)?;
            Ok(value.to_string())
        }
        None if no_input => Err(missing(flag)),
        None => prompt_until_valid(
            &format!("{}", prompt.message.blue()),
            prompt.placeholder,
            prompt.help,
            input_validation,
        ),
    }
}

fn missing(flag: &str) -> AppError {
    AppError::Validation(format!("{} is required with --no-input", flag))
}
