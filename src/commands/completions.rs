//! Completions command implementation
//!
//! Generates shell completion scripts via `clap_complete`, enabling
//! tab-completion for all `addon-packer` commands and options.
//!
//! ## Example
//!
//! ```bash
//! # Generate and install bash completions
//! addon-packer completions bash > ~/.local/share/bash-completion/completions/addon-packer
//!
//! # Generate zsh completions
//! addon-packer completions zsh > ~/.zfunc/_addon-packer
//! ```

use std::io;

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};

use crate::cli::Cli;

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// The shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Execute the `completions` command.
///
/// Writes the completion script for the requested shell to stdout; users
/// redirect it to the appropriate file for their shell configuration.
pub fn execute(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "addon-packer", &mut io::stdout());
    Ok(())
}
