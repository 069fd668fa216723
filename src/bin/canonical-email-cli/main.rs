mod args;
mod edits;
mod output;
mod transport;

use std::io::{self, BufRead};
use std::sync::Arc;

use anyhow::{Context, Result};
use canonical_email::{Canonicalizer, ProviderRegistry};

use args::{Cli, Commands};
use output::OutputRow;

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "with-tracing")]
    init_logging(cli.verbose);

    if let Some(Commands::Providers) = &cli.cmd {
        let registry = ProviderRegistry::builtin();
        return output::write_providers(registry.providers(), &cli);
    }

    if !cli.stdin && !cli.edits && cli.cmd.is_none() {
        Cli::clap_command().print_help()?;
        println!();
        return Ok(());
    }

    let transport = transport::build(&cli)?;
    let canonicalizer = Canonicalizer::with_options(transport, cli.canonicalizer_options());

    if cli.edits {
        let view = edits::run(Arc::new(canonicalizer), io::stdin().lock(), &cli)?;
        if view.error.is_some() {
            std::process::exit(2);
        }
        return Ok(());
    }

    let mut rows = Vec::new();
    if cli.stdin {
        for line in io::stdin().lock().lines() {
            let email = line.context("read stdin")?;
            if email.trim().is_empty() {
                continue;
            }
            rows.push(OutputRow::new(&email, canonicalizer.canonicalize(&email)));
        }
    } else if let Some(Commands::Canonicalize { email }) = &cli.cmd {
        rows.push(OutputRow::new(email, canonicalizer.canonicalize(email)));
    }

    output::write_reports(&rows, &cli)?;

    // exit codes: 0 OK, 2 at least one failure, 1 fatal
    if output::any_failed(&rows) {
        std::process::exit(2);
    }
    Ok(())
}

#[cfg(feature = "with-tracing")]
fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}
