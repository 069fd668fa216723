use clap::{Parser, Subcommand};
use canonical_email::CanonicalizerOptions;

#[cfg(feature = "with-mx")]
const DEFAULT_TRANSPORT: &str = "system";
#[cfg(not(feature = "with-mx"))]
const DEFAULT_TRANSPORT: &str = "doh";

#[derive(Parser)]
#[command(name = "canonical-email-cli", version)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Commands>,

    /// read addresses from stdin (one per line)
    #[arg(long)]
    pub stdin: bool,

    /// stdin lines are successive edits of a single input
    #[arg(long)]
    pub edits: bool,

    /// write report to file (JSON/NDJSON/CSV according to --format)
    #[arg(long)]
    pub out: Option<String>,

    /// format: human|json|ndjson|csv
    #[arg(long, default_value = "human")]
    pub format: String,

    /// MX transport: system (feature `with-mx`) | doh (feature `with-doh`)
    #[arg(long, default_value = DEFAULT_TRANSPORT)]
    pub transport: String,

    /// DNS-over-HTTPS JSON endpoint
    #[cfg(feature = "with-doh")]
    #[arg(long = "doh-endpoint")]
    pub doh_endpoint: Option<String>,

    /// do not cache failed MX resolutions
    #[arg(long = "retry-failures")]
    pub retry_failures: bool,

    /// debug logs on stderr (feature `with-tracing`)
    #[cfg(feature = "with-tracing")]
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// print the canonical form of an address
    Canonicalize { email: String },
    /// list the known mailbox providers
    Providers,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn clap_command() -> clap::Command {
        <Self as clap::CommandFactory>::command()
    }

    pub fn canonicalizer_options(&self) -> CanonicalizerOptions {
        CanonicalizerOptions::new().cache_failures(!self.retry_failures)
    }
}
