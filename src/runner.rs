use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::{print_help, Cli};
use osint_probe::breach::{BreachClient, BreachError};
use osint_probe::config::Config;
use osint_probe::http_client::create_probe_client;
use osint_probe::output::{render_breaches, render_report, render_username_header, write_csv, write_jsonl};
use osint_probe::{Prober, ProbeReport, SiteRegistry};

fn print_banner() {
    println!("\x1b[36m{}\x1b[0m", r#"
    ██████╗ ███████╗██╗ █████╗ ████████╗
    ██╔══██╗██╔════╝██║██╔══██╗╚══██╔══╝
    ██████╔╝███████╗██║███████║   ██║
    ██╔═══╝ ╚════██║██║██╔══██║   ██║
    ██║     ███████║██║██║  ██║   ██║
    ╚═╝     ╚══════╝╚═╝╚═╝  ╚═╝   ╚═╝
    OSINT-Probe v0.1.0
    "#);
}

fn init_logging(cli: &Cli) {
    // Keep reqwest/hyper at INFO so --debug shows our probes, not connection churn.
    use tracing_subscriber::EnvFilter;
    let crate_level = if cli.debug { "debug" } else if cli.verbose { "info" } else { "warn" };
    let filter_str = format!(
        "osint_probe={crate},reqwest=info,hyper=info,h2=info,rustls=warn",
        crate = crate_level
    );
    let env_filter = EnvFilter::try_new(&filter_str).unwrap_or_else(|_| EnvFilter::new(crate_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(true)
        .with_target(false)
        .init();
}

fn merge_config(cli: &Cli) -> Config {
    let mut cfg = Config::from_env();
    if let Some(t) = cli.timeout {
        cfg.timeout_secs = t;
    }
    if cli.concurrency.is_some() {
        cfg.concurrency = cli.concurrency;
    }
    if cli.deadline.is_some() {
        cfg.deadline_secs = cli.deadline;
    }
    if let Some(key) = cli.hibp_key.as_ref().filter(|k| !k.trim().is_empty()) {
        cfg.hibp_api_key = Some(key.clone());
    }
    cfg
}

pub async fn run_from_cli(cli: Cli) -> anyhow::Result<()> {
    init_logging(&cli);

    if !cli.has_target() {
        print_help();
        return Ok(());
    }

    print_banner();
    let cfg = merge_config(&cli);
    tracing::info!(timeout = cfg.timeout_secs, concurrency = ?cfg.concurrency, deadline = ?cfg.deadline_secs, "configuration loaded");

    if let Some(username) = cli.username.as_deref() {
        let registry = match cli.sites.as_deref() {
            Some(path) => SiteRegistry::from_json_file(Path::new(path))
                .with_context(|| format!("could not load sites from {}", path))?,
            None => SiteRegistry::builtin(),
        };
        let report = run_username(username, &registry, &cfg, cli.show_errors).await?;

        if let Some(out) = cli.out.as_deref() {
            let written = export_report(Path::new(out), &report)?;
            for p in written {
                println!("[+] Wrote {}", p.display());
            }
        }
    }

    if let Some(email) = cli.email.as_deref() {
        run_email(email, &cfg).await;
    }

    Ok(())
}

async fn run_username(username: &str, registry: &SiteRegistry, cfg: &Config, show_errors: bool) -> anyhow::Result<ProbeReport> {
    println!("{}", render_username_header(username, registry.len()));

    let client = create_probe_client(&cfg.user_agent, 16).context("failed to build HTTP client")?;
    let prober = Prober::new(client, cfg.probe_options());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("probing {} sites", registry.len()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = prober.probe_all(username, registry).await;
    spinner.finish_and_clear();

    let report = result.with_context(|| format!("username probe for '{}' failed", username))?;
    println!("{}", render_report(&report, show_errors));
    Ok(report)
}

/// Breach lookup failures are reported and the run goes on.
async fn run_email(email: &str, cfg: &Config) {
    let client = match BreachClient::new(cfg.hibp_api_key.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            println!("\n--- 📧 Email Breach Analysis for {} ---", email);
            println!("❌ {}", e);
            return;
        }
    };

    match client.check(email).await {
        Ok(status) => println!("{}", render_breaches(email, &status)),
        Err(BreachError::UnexpectedStatus { status, body }) => {
            println!("\n--- 📧 Email Breach Analysis for {} ---", email);
            println!("❌ Error: Received status code {}", status);
            println!("   Message: {}", body);
        }
        Err(e) => {
            tracing::debug!(error = ?e, "breach lookup failed");
            println!("\n--- 📧 Email Breach Analysis for {} ---", email);
            println!("An error occurred during the request: {:#}", anyhow::Error::new(e));
        }
    }
}

fn export_report(out_dir: &Path, report: &ProbeReport) -> anyhow::Result<Vec<PathBuf>> {
    osint_probe::utils::ensure_dir(out_dir)?;
    let stem = osint_probe::utils::file_stem(&report.identifier);
    let jsonl_path = out_dir.join(format!("{}_probe.jsonl", stem));
    let csv_path = out_dir.join(format!("{}_probe.csv", stem));

    // Fresh file per run; JSONL writer appends
    if jsonl_path.exists() {
        std::fs::remove_file(&jsonl_path)?;
    }
    write_jsonl(&jsonl_path, &report.results)?;
    write_csv(&csv_path, &report.results)?;
    Ok(vec![jsonl_path, csv_path])
}
