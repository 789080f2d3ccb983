mod cli;
mod commands;

use clap::{CommandFactory, Parser};
use cli::Cli;

fn main() {
    let cli = Cli::parse();

    let result = if cli.install {
        commands::install::run(&cli)
    } else if cli.input.is_some() {
        commands::convert::run(&cli)
    } else {
        Cli::command().print_help().map_err(Into::into)
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
