//! Tickerwatch CLI: fetch a price series, compute ROI and max drawdown, notify.
//!
//! ```text
//! tickerwatch aapl 2017-08-01 --recipient me@example.com
//! tickerwatch msft 2017-01-01 --end 2017-12-31 --dry-run
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{error, info};
use tickerwatch_core::domain::PriceRequest;
use tickerwatch_runner::{
    Notifier, Pipeline, RetryPolicy, RunOutcome, StdoutNotifier, TickerwatchConfig,
    UNEXPECTED_RESULT,
};

#[derive(Parser)]
#[command(
    name = "tickerwatch",
    about = "Compute ROI and max drawdown for a ticker and send the result"
)]
struct Cli {
    /// Ticker symbol (e.g., aapl).
    ticker: String,

    /// Start date (YYYY-MM-DD).
    date: String,

    /// End date (YYYY-MM-DD). Defaults to the latest available.
    #[arg(long)]
    end: Option<String>,

    /// Who receives the result. Overrides `notify.recipient` from the config.
    #[arg(long)]
    recipient: Option<String>,

    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Webhook URL to POST the result to. Overrides `notify.webhook_url`.
    #[arg(long)]
    webhook: Option<String>,

    /// Retries after a failed fetch. Overrides `retry.max_retries`.
    #[arg(long)]
    retries: Option<u32>,

    /// Print the result instead of delivering it.
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    match run(Cli::parse()) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("{e:#}");
            std::process::exit(1);
        }
    }
}

/// Returns whether a report was produced.
fn run(cli: Cli) -> Result<bool> {
    let request = PriceRequest::parse(&cli.ticker, &cli.date, cli.end.as_deref())
        .context("invalid request")?;

    let mut config = match &cli.config {
        Some(path) => TickerwatchConfig::from_file(path)?,
        None => TickerwatchConfig::default(),
    };
    if let Some(url) = cli.webhook {
        config.notify.webhook_url = Some(url);
    }
    if let Some(retries) = cli.retries {
        config.retry.max_retries = retries;
    }

    let notifier: Box<dyn Notifier> = if cli.dry_run {
        Box::new(StdoutNotifier)
    } else {
        config.build_notifier()?
    };
    let recipient = match cli.recipient.or_else(|| config.notify.recipient.clone()) {
        Some(r) => r,
        None if notifier.name() == "stdout" => "stdout".to_string(),
        None => bail!("no recipient: pass --recipient or set notify.recipient in the config"),
    };

    let provider = config.build_provider()?;
    let retry: RetryPolicy = config.retry.policy();
    info!(
        "{} since {} via {} (up to {} retries)",
        request.ticker(),
        request.start(),
        config.provider.base_url,
        retry.max_retries
    );

    let pipeline = Pipeline::new(&provider, notifier.as_ref()).with_retry(retry);
    match pipeline.run(&request, &recipient)? {
        RunOutcome::Notified(report) => {
            info!(
                "sent {} report ({} closes, {} to {})",
                report.ticker, report.points, report.first_date, report.last_date
            );
            Ok(true)
        }
        RunOutcome::Skipped => {
            eprintln!("{UNEXPECTED_RESULT}; nothing was sent");
            Ok(false)
        }
    }
}
