mod attribution;
mod cli;
mod config;
mod filter;
mod git;
mod mailmap;
mod reviewers;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("git_reviewer=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = reviewers::run(&cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
