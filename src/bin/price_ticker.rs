use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use price_dashboard::api::{
    CoinbaseClient, DashboardConfig, DashboardView, IntervalTimer, RefreshService,
};
use price_dashboard::telemetry::init_default_tracing;

/// Polls the pricing service and prints the dashboard summary on every update.
#[derive(Debug, Parser)]
#[command(name = "price_ticker", version)]
struct CliArgs {
    /// JSON dashboard config; defaults apply to missing fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Asset symbol to select, e.g. BTC.
    #[arg(long)]
    asset: Option<String>,

    /// Duration key to select, e.g. week.
    #[arg(long)]
    duration: Option<String>,

    /// Quote currency code, e.g. usd.
    #[arg(long)]
    currency: Option<String>,

    /// Poll interval in seconds.
    #[arg(long)]
    poll_secs: Option<u64>,

    /// Stop after this many published snapshots.
    #[arg(long)]
    max_updates: Option<usize>,

    /// Print each snapshot view as JSON instead of a text line.
    #[arg(long)]
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let _ = init_default_tracing("price_dashboard=info");
    if let Err(err) = run(CliArgs::parse()).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run(args: CliArgs) -> Result<(), String> {
    let config = resolve_config(&args)?;
    let client = CoinbaseClient::new(&config).map_err(|e| e.to_string())?;
    let timer = IntervalTimer::new(config.poll_interval());
    let (service, handle) =
        RefreshService::new(config.clone(), client, timer).map_err(|e| e.to_string())?;
    let mut snapshots = service.subscribe();

    let printer = async move {
        let mut updates = 0_usize;
        while snapshots.changed().await.is_ok() {
            let Some(snapshot) = snapshots.borrow_and_update().clone() else {
                continue;
            };
            let view =
                DashboardView::build(&config, snapshot.selection, Some(snapshot.as_ref()));
            if args.json {
                match serde_json::to_string(&view) {
                    Ok(line) => println!("{line}"),
                    Err(err) => eprintln!("failed to encode view: {err}"),
                }
            } else {
                println!(
                    "{}  {} {}  {} {}  [{} samples]",
                    view.title,
                    view.delta.label,
                    view.delta.text,
                    view.delta_percent.label,
                    view.delta_percent.text,
                    snapshot.price_history.len()
                );
            }

            updates += 1;
            if args.max_updates.is_some_and(|max| updates >= max) {
                handle.shutdown();
            }
        }
    };

    let (stats, ()) = tokio::join!(service.run(), printer);
    tracing::info!(
        published = stats.published,
        failed = stats.failed,
        discarded = stats.discarded,
        skipped_ticks = stats.skipped_ticks,
        "ticker finished"
    );
    Ok(())
}

fn resolve_config(args: &CliArgs) -> Result<DashboardConfig, String> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("failed to read config {}: {e}", path.display()))?;
            DashboardConfig::from_json_str(&text).map_err(|e| e.to_string())?
        }
        None => DashboardConfig::default(),
    };

    if let Some(currency) = &args.currency {
        config = config.with_currency(currency);
    }
    if let Some(secs) = args.poll_secs {
        config = config.with_poll_interval(Duration::from_secs(secs));
    }

    let mut selection = config.initial_selection;
    if let Some(asset) = &args.asset {
        let index = config
            .assets
            .iter()
            .position(|a| a.symbol.eq_ignore_ascii_case(asset))
            .ok_or_else(|| format!("unknown asset `{asset}`"))?;
        selection = selection.with_asset(index);
    }
    if let Some(duration) = &args.duration {
        let index = config
            .durations
            .iter()
            .position(|d| d.key.eq_ignore_ascii_case(duration))
            .ok_or_else(|| format!("unknown duration `{duration}`"))?;
        selection = selection.with_duration(index);
    }

    config
        .with_initial_selection(selection)
        .validate()
        .map_err(|e| e.to_string())
}
