//! Paceboard CLI - payment terminal performance dashboard.

mod render;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use paceboard_client::{ClientConfig, DashboardClient};
use paceboard_core::{calculate, DashboardView, MetricTotals, MonthCalendar};
use paceboard_monitor::{DashboardMonitor, DashboardState, MonitorConfig};
use render::{render_state, render_view, Layout, CLEAR_SCREEN};
use std::future::Future;
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{oneshot, watch};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "paceboard")]
#[command(about = "Payment terminal performance dashboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend base URL (overrides PACEBOARD_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds (overrides PACEBOARD_TIMEOUT_SECS)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Monthly transaction target (overrides PACEBOARD_TRANSACTIONS_TARGET)
    #[arg(long, global = true, value_parser = non_negative_target)]
    transactions_target: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Live dashboard, refreshed on a fixed interval
    Watch {
        /// Screen arrangement
        #[arg(long, value_enum, default_value = "compact")]
        layout: Layout,
        /// Force the wide layout for wall-mounted screens
        #[arg(long)]
        tv: bool,
        /// Refresh interval in seconds (overrides PACEBOARD_REFRESH_SECS)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
    },
    /// Fetch once and print the dashboard
    Show {
        /// Screen arrangement
        #[arg(long, value_enum, default_value = "compact")]
        layout: Layout,
        /// Force the wide layout
        #[arg(long)]
        tv: bool,
        /// Print the derived view as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compute month-end pacing for one metric
    Pace {
        /// Month-to-date actual
        #[arg(long)]
        actual: f64,
        /// Full-month target
        #[arg(long)]
        target: f64,
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the effective configuration
    Config,
}

fn non_negative_target(raw: &str) -> std::result::Result<f64, String> {
    let value: f64 = raw.trim().parse().map_err(|_| format!("`{}` is not a number", raw))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("`{}` must be a non-negative number", raw))
    }
}

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout belongs to the dashboard; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = ClientConfig::from_env().context("Invalid environment configuration")?;

    if let Some(url) = &cli.api_url {
        config = config.with_base_url(url.as_str())?;
    }
    if let Some(secs) = cli.timeout {
        config.request_timeout = Duration::from_secs(secs);
    }
    if let Some(target) = cli.transactions_target {
        config.transactions_target = target;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Watch { .. } => init_logging("warn"),
        _ => init_logging("info"),
    }

    let mut config = load_config(&cli)?;
    debug!("Using configuration: {:?}", config);

    match cli.command {
        Commands::Watch {
            layout,
            tv,
            interval,
        } => {
            if let Some(secs) = interval {
                config.refresh_interval = Duration::from_secs(secs);
            }
            watch_dashboard(config, Layout::resolve(layout, tv)).await?;
        }
        Commands::Show { layout, tv, json } => {
            let client = DashboardClient::new(config.clone())?;
            let snapshot = client
                .fetch()
                .await
                .context("Failed to load dashboard data")?;
            let view = DashboardView::build(
                snapshot,
                Local::now().date_naive(),
                config.transactions_target,
                Utc::now(),
            );

            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", render_view(&view, Layout::resolve(layout, tv)));
            }
        }
        Commands::Pace {
            actual,
            target,
            date,
            json,
        } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let calendar = MonthCalendar::for_date(date);
            let result = calculate(MetricTotals::new(actual, target), &calendar);

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("Pacing for {}", date);
                println!(
                    "  Day: {} of {} ({} remaining)",
                    result.days_elapsed, result.days_in_month, result.days_remaining
                );
                println!("  Daily run rate: {:.2}", result.daily_run_rate);
                println!("  Projected end of month: {:.2}", result.projected_end_of_month);
                println!("  Needed per day: {:.2}", result.needed_per_day);
                println!("  Pace: {}", result.pace_status.label());
            }
        }
        Commands::Config => {
            println!("Paceboard configuration");
            println!("  Endpoint: {}", config.dashboard_url());
            println!("  Request timeout: {}s", config.request_timeout.as_secs());
            println!("  Refresh interval: {}s", config.refresh_interval.as_secs());
            println!("  Transactions target: {}", config.transactions_target);
        }
    }

    Ok(())
}

/// Run the live dashboard until Ctrl-C.
async fn watch_dashboard(config: ClientConfig, layout: Layout) -> Result<()> {
    let client = DashboardClient::new(config.clone())?;
    let monitor = DashboardMonitor::new(client, MonitorConfig::from(&config));
    let states = monitor.subscribe();
    let retry = monitor.retry_handle();

    info!("Watching {}", config.dashboard_url());

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let runner = tokio::spawn(monitor.run_until(async {
        let _ = stop_rx.await;
    }));

    // Enter requests an immediate refresh (the retry action on the error screen)
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(_)) = lines.next_line().await {
            retry.request();
        }
    });

    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    redraw_until(states, layout, ctrl_c, draw).await?;

    let _ = stop_tx.send(());
    runner.await.context("Refresh task panicked")?;
    Ok(())
}

/// Redraw on every state change until `shutdown` resolves or the monitor goes away.
async fn redraw_until<F>(
    mut states: watch::Receiver<DashboardState>,
    layout: Layout,
    shutdown: F,
    mut draw: impl FnMut(&str) -> Result<()>,
) -> Result<()>
where
    F: Future<Output = ()>,
{
    // created once so a signal arriving mid-redraw is still observed
    tokio::pin!(shutdown);

    draw(&render_state(&states.borrow_and_update(), layout))?;

    loop {
        tokio::select! {
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let screen = render_state(&states.borrow_and_update(), layout);
                draw(&screen)?;
            }
            _ = &mut shutdown => {
                break;
            }
        }
    }

    Ok(())
}

fn draw(screen: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "{}{}", CLEAR_SCREEN, screen)?;
    stdout.flush()?;
    Ok(())
}
