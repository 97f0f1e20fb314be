//! `secretctl completions <shell>`.
//!
//! Needs no mapping file, so it works before a project is set up.

use clap::CommandFactory;
use std::io::Write;

use crate::cli::{Cli, Shell};
use crate::error::Result;

impl From<Shell> for clap_complete::Shell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => Self::Bash,
            Shell::Zsh => Self::Zsh,
            Shell::Fish => Self::Fish,
            Shell::PowerShell => Self::PowerShell,
        }
    }
}

/// Write the completion script for `shell` to `out`.
pub fn write_to(shell: Shell, out: &mut impl Write) {
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();
    clap_complete::generate(clap_complete::Shell::from(shell), &mut cmd, bin, out);
}

/// Print the completion script on stdout.
pub fn execute(shell: Shell) -> Result<()> {
    write_to(shell, &mut std::io::stdout().lock());
    Ok(())
}
