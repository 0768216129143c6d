use clap::{CommandFactory, Parser};

#[derive(clap::Parser, Debug)]
#[command(author, version, about = "OSINT-Probe: username presence and email breach lookups", long_about = None)]
pub struct Cli {
    /// Username to search for across the site registry
    #[arg(short = 'u', long)]
    pub username: Option<String>,

    /// Email address to check for breaches (needs an HIBP API key)
    #[arg(short = 'e', long)]
    pub email: Option<String>,

    /// JSON file with the sites to probe (defaults to the built-in list)
    #[arg(long, value_name = "FILE")]
    pub sites: Option<String>,

    /// Per-site request timeout in seconds (default: 5)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Maximum probes in flight (default: all at once)
    #[arg(short = 'c', long)]
    pub concurrency: Option<usize>,

    /// Give up on sites still pending after this many seconds
    #[arg(long)]
    pub deadline: Option<u64>,

    /// HIBP API key (overrides HIBP_API_KEY)
    #[arg(long, value_name = "KEY")]
    pub hibp_key: Option<String>,

    /// Write JSONL and CSV results into this directory
    #[arg(short = 'o', long)]
    pub out: Option<String>,

    /// List sites that could not be reached instead of folding them into "not found"
    #[arg(long, default_value_t = false)]
    pub show_errors: bool,

    /// Enable detailed debug logging
    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Enable verbose logging
    #[arg(long, default_value_t = false)]
    pub verbose: bool,
}

impl Cli {
    pub fn has_target(&self) -> bool {
        self.username.is_some() || self.email.is_some()
    }
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}

pub fn print_help() {
    let _ = Cli::command().print_help();
    println!();
}
