//! completions command - Print shell completion scripts
//!
//! Needs no configuration or provider, so it runs before anything is loaded.

use clap::CommandFactory;
use clap_complete::Shell;

use super::Cli;
use crate::exit_code::ExitCode;

/// Arguments for the completions command
#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn execute(args: CompletionsArgs) -> ExitCode {
    write_completions(args.shell, &mut std::io::stdout());
    ExitCode::Success
}

fn write_completions(shell: Shell, out: &mut dyn std::io::Write) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_for_each_shell() {
        let cases = [
            (Shell::Bash, "complete"),
            (Shell::Zsh, "compdef"),
            (Shell::Fish, "complete"),
            (Shell::PowerShell, "Register-ArgumentCompleter"),
        ];
        for (shell, marker) in cases {
            let mut buf = Vec::new();
            write_completions(shell, &mut buf);
            let output = String::from_utf8(buf).unwrap();
            assert!(output.contains("csutil"), "{shell} output names the binary");
            assert!(output.contains(marker), "{shell} output contains {marker}");
        }
    }

    #[test]
    fn test_completions_include_subcommands() {
        let mut buf = Vec::new();
        write_completions(Shell::Bash, &mut buf);
        let output = String::from_utf8(buf).unwrap();
        assert!(output.contains("list-remote"));
        assert!(output.contains("push"));
    }
}
