use anyhow::Result;
use repopulse::cli;
use repopulse::observability::{init_tracing, install_panic_hook};

fn main() -> Result<()> {
    let cli = cli::parse_args();

    install_panic_hook();
    init_tracing(cli.verbosity);

    cli::run(cli)
}
