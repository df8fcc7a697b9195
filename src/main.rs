mod agents;
mod cli;
mod collector;
mod error;
mod maven;
mod utils;
mod workflow;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use std::process;

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        unsafe {
            std::env::set_var(utils::log::VERBOSE_ENV, "1");
        }
    }

    let result = match cli.command {
        Commands::Update(args) => workflow::execute_update(&cli.path, args),
        Commands::Dump(args) => workflow::execute_dump(&cli.path, &args),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}
