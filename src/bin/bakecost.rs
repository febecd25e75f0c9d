//! Bakecost
//!
//! Costs one order or quote from a fixture set and prints the report.
//!
//! Use `-f` to pick the fixture set, then `--order` or `--quote` with a reference

use std::{io, io::Write, path::PathBuf, time::Instant};

use anyhow::Result;
use clap::{ArgGroup, Parser};
use humanize_duration::{Truncate, prelude::DurationExt};
use tracing::info;
use tracing_subscriber::EnvFilter;

use bakecost::{fixtures::Fixture, report::write_report};

/// Arguments for the cake costing command
#[derive(Debug, Parser)]
#[command(version, about)]
#[command(group(ArgGroup::new("snapshot").required(true).args(["order", "quote"])))]
struct Args {
    /// Fixture set to load the catalog, settings, orders and quotes from
    #[arg(short, long, default_value = "house")]
    fixture: String,

    /// Order reference to cost
    #[arg(short, long)]
    order: Option<String>,

    /// Quote reference to cost
    #[arg(short, long)]
    quote: Option<String>,

    /// Directory holding the fixture sets
    #[arg(long, env = "BAKECOST_FIXTURES_DIR", default_value = "./fixtures")]
    fixtures_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG` is unset
    #[arg(short, long, env = "BAKECOST_LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

/// Cake costing entry point
pub fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .compact()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    let fixture = Fixture::from_set_in(&args.fixtures_dir, &args.fixture)?;

    info!(
        fixture = %args.fixture,
        orders = fixture.order_references().len(),
        quotes = fixture.quote_references().len(),
        "loaded fixture set"
    );

    let start = Instant::now();

    let (title, result) = match (&args.order, &args.quote) {
        (Some(reference), _) => {
            let order = fixture.order(reference)?;

            (
                format!("Order {} for {}", order.reference, order.customer),
                fixture.cost_order(reference)?,
            )
        }
        (None, Some(reference)) => {
            let quote = fixture.quote(reference)?;

            (
                format!("Quote {} for {}", quote.reference, quote.customer),
                fixture.cost_quote(reference)?,
            )
        }
        (None, None) => anyhow::bail!("either --order or --quote is required"),
    };

    let elapsed = start.elapsed();

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    writeln!(handle, "\n \x1b[1m{title}\x1b[0m")?;

    write_report(&result, &mut handle)?;

    writeln!(
        handle,
        " {} ({}s)",
        elapsed.human(Truncate::Nano),
        elapsed.as_secs_f32()
    )?;

    Ok(())
}
