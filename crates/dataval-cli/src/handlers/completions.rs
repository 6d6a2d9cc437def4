//! Shell completions command handler

use crate::cli::{Cli, CompletionsArgs};
use crate::error::Result;
use clap::CommandFactory;
use std::io::Write;

/// Write the completion script for the requested shell
pub fn handle_completions<W: Write>(args: CompletionsArgs, out: &mut W) -> Result<()> {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    clap_complete::generate(args.shell.to_clap_shell(), &mut cmd, bin_name, out);
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Shell;

    #[test]
    fn test_bash_script_mentions_every_subcommand() {
        let mut script = Vec::new();
        handle_completions(CompletionsArgs { shell: Shell::Bash }, &mut script).unwrap();
        let script = String::from_utf8(script).unwrap();
        for name in ["dataval", "validate", "check", "types", "completions"] {
            assert!(script.contains(name), "missing {name}");
        }
    }
}
