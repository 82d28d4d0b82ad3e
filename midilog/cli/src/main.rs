mod panel;
mod ui;
mod utils;
pub use utils::*;

use clap::{Args, CommandFactory, Parser};
use std::io::Write;
use utils::terminal::with_terminal;

/// Monitor the messages of a MIDI input, and play notes from the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    opts: CommonOptions,

    #[command(flatten)]
    panel: panel::Options,

    /// Print a completion script for the given shell and exit,
    /// e.g. `midilog --completions zsh > _midilog`
    #[arg(long, value_enum)]
    completions: Option<clap_complete::Shell>,
}

#[derive(Args, Debug)]
pub struct CommonOptions {
    /// Log verbosity level
    #[arg(long, default_value_t = false)]
    verbose: bool,

    /// Path to log file to write to. Defaults
    /// to ~/.midilog/log/midilog.log
    #[arg(long)]
    log: Option<std::path::PathBuf>,
}

fn generate_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.flush()?;

    let mut cli = Cli::command();
    clap_complete::generate(shell, &mut cli, "midilog", &mut stdout);

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    if let Some(shell) = args.completions {
        return generate_completions(shell);
    }

    let app_result = with_terminal(move |term| panel::run(term, args.panel, args.opts));

    if let Err(e) = app_result {
        if logger::is_active() {
            log::error!("{e}");
        } else {
            use colored::*;
            eprintln!("{} {}", "Error:".red().bold(), format!("{e}").bold());
        }
    }

    Ok(())
}
