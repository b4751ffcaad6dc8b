mod cli;

use clap::Parser;
use cli::setup::Cli;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = cli::commands::run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so they never mix with exported text on stdout.
/// `RUST_LOG` still takes effect; `--verbose` raises taab's own level.
fn init_tracing(verbose: bool) {
    let directive = if verbose { "taab=debug" } else { "taab=warn" };
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = directive.parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
