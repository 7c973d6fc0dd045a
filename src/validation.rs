use colored::Colorize;
use inquire::Text;
use validator::ValidateEmail;

use crate::error::AppError;

/// Characters not allowed in the directory name
const INVALID_DIRECTORY_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Prompts user for input until valid input is provided
pub fn prompt_until_valid<F>(
    prompt_message: &str,
    placeholder: &str,
    help_message: &str,
    input_validation: F,
) -> Result<String, AppError>
where
    F: Fn(&str) -> Result<(), AppError>,
{
    loop {
        let input: String = Text::new(prompt_message)
            .with_placeholder(placeholder)
            .with_help_message(help_message)
            .prompt()?;
        match input_validation(&input) {
            Ok(_) => break Ok(input),
            Err(AppError::Validation(msg)) => println!("{}", msg.red()),
            Err(e) => return Err(e),
        }
    }
}

// Validate input helper functions

/// Validates the name of the directory to create or reuse
pub fn validate_input_directory(name: &str) -> Result<(), AppError> {
    if name.is_empty() {
        Err(AppError::Validation("directory name cannot be empty".to_string()))
    } else if name.contains(INVALID_DIRECTORY_CHARS) {
        Err(AppError::Validation("directory name contains invalid characters".to_string()))
    } else if name == "." || name == ".." {
        Err(AppError::Validation(format!("directory name cannot be '{}'", name)))
    } else {
        Ok(())
    }
}

/// Validates username input
pub fn validate_input_username(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        Err(AppError::Validation("git username cannot be empty".to_string()))
    } else {
        Ok(())
    }
}

/// Validates email input
pub fn validate_input_email(email: &str) -> Result<(), AppError> {
    if email.is_empty() || !email.validate_email() {
        Err(AppError::Validation("please enter a valid email address".to_string()))
    } else {
        Ok(())
    }
}
