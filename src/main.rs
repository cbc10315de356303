use clap::Parser;
use colored::Colorize;

fn main() {
    let cli = confman::cli::Cli::parse();
    if let Err(err) = confman::cli::run(cli) {
        eprintln!("{} {}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}
