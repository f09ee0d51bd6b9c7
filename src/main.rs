use bfi::commands::repl;
use bfi::commands::run::{self, RunArgs};
use clap::Parser;
use std::env;
use std::io;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "bfi", disable_help_flag = true, disable_help_subcommand = true)]
struct Cli {
    #[command(flatten)]
    run: RunArgs,
}

/// Structured logs go to stderr so stdout carries only program output.
/// `RUST_LOG` overrides the default `warn` filter.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    // We still pull the program name for help rendering consistency
    let program = env::args().next().unwrap_or_else(|| String::from("bfi"));

    init_logging();

    let cli = Cli::parse();
    let code = if cli.run.repl && !cli.run.help {
        repl::run(&program, cli.run)
    } else {
        run::run(&program, cli.run)
    };

    std::process::exit(code);
}
