use clap::{ArgAction, Args, Parser, Subcommand};

use crate::identity::KeyType;

/// CLI arguments parser using `clap`
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Sets up a directory with its own Git identity and SSH key",
    long_about = "Creates a directory, generates an SSH key for it, writes a .gitconfig inside it \
                  and adds an includeIf entry to the global .gitconfig so Git uses that identity \
                  for every repository below the directory."
)]
pub struct Cli {
    /// Subcommand chosen to execute, runs the setup when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub setup: SetupArgs,

    /// Increase log verbosity, can be used multiple times
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Prints the program name and version
    Version,
}

/// Answers to the setup form, any missing one is prompted for
#[derive(Args, Debug, Default)]
pub struct SetupArgs {
    /// Name of the directory to create or use
    #[arg(long)]
    pub directory: Option<String>,
    /// SSH key type
    #[arg(long, value_enum)]
    pub key_type: Option<KeyType>,
    /// Git username for this directory
    #[arg(long)]
    pub username: Option<String>,
    /// Git email for this directory
    #[arg(long)]
    pub email: Option<String>,
    /// Sign commits and tags with the generated key (requires Git 2.34+)
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub sign_commits: Option<bool>,
    /// Fail instead of prompting for missing answers
    #[arg(long)]
    pub no_input: bool,
    /// Do not copy the public key to the clipboard
    #[arg(long)]
    pub no_clipboard: bool,
    /// Print the result as JSON instead of a summary box
    #[arg(long)]
    pub json: bool,
}
