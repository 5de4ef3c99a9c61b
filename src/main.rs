//! CLI entry point for the bus scheduler client.
//!
//! Provides subcommands for listing drivers and cities, viewing a driver's
//! weekly schedule on a 7-day-by-24-hour grid, and submitting new trips.

use anyhow::Result;
use bus_scheduler::fetch::BasicClient;
use bus_scheduler::infra::api::SchedulerClient;
use bus_scheduler::render::{GridRenderer, JsonRenderer, TextGrid};
use bus_scheduler::services::scheduling_api::{NewTrip, SchedulingApi};
use bus_scheduler::view::{ScheduleController, ViewState};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const DEFAULT_API_BASE_URL: &str = "https://bus-scheduler-backend-production.up.railway.app";

#[derive(Parser)]
#[command(name = "bus-scheduler")]
#[command(about = "A client for the bus scheduling API", long_about = None)]
struct Cli {
    /// Base URL of the scheduling API (overrides API_BASE_URL)
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all drivers
    Drivers,
    /// List all cities
    Cities,
    /// Show a driver's schedule for one week
    Schedule {
        /// Driver id to fetch the schedule for
        #[arg(short, long)]
        driver: String,

        /// Reference date inside the week to display (defaults to today)
        #[arg(short = 'D', long)]
        date: Option<NaiveDate>,

        /// Week offset relative to the reference date (-1 = previous week)
        #[arg(short, long, default_value_t = 0, allow_hyphen_values = true)]
        weeks: i64,

        /// Emit the grid as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Submit a new trip and show the affected week
    AddTrip {
        /// Driver id the trip belongs to
        #[arg(short, long)]
        driver: String,

        /// Departure city name
        #[arg(long)]
        departure: String,

        /// Destination city name
        #[arg(long)]
        destination: String,

        /// Departure time, RFC 3339 (e.g. 2026-08-31T06:00:00Z)
        #[arg(long)]
        date: DateTime<Utc>,

        /// Duration in whole hours
        #[arg(long)]
        duration: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bus_scheduler.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bus_scheduler.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let base_url = cli
        .api_url
        .or_else(|| std::env::var("API_BASE_URL").ok())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
    let api = SchedulerClient::new(base_url, BasicClient::new()?);

    match cli.command {
        Commands::Drivers => {
            let drivers = api.list_drivers().await?;
            info!(total = drivers.len(), "Driver list fetched");
            for driver in &drivers {
                println!("{}\t{}", driver.id, driver.name);
            }
        }
        Commands::Cities => {
            let cities = api.list_cities().await?;
            info!(total = cities.len(), "City list fetched");
            for city in &cities {
                println!("{}\t{}", city.id, city.name);
            }
        }
        Commands::Schedule {
            driver,
            date,
            weeks,
            json,
        } => {
            let reference =
                date.unwrap_or_else(|| Utc::now().date_naive()) + Duration::weeks(weeks);
            show_week(api, ViewState::new(driver, reference), json).await?;
        }
        Commands::AddTrip {
            driver,
            departure,
            destination,
            date,
            duration,
        } => {
            let trip = NewTrip {
                driver_id: driver.clone(),
                departure,
                destination,
                date,
                duration,
            };
            api.create_trip(&trip).await?;
            info!(driver_id = %driver, date = %date, duration, "Trip created");

            show_week(api, ViewState::new(driver, date.date_naive()), false).await?;
        }
    }

    Ok(())
}

/// Fetches one week for the given view state and prints it.
async fn show_week<A: SchedulingApi>(api: A, state: ViewState, json: bool) -> Result<()> {
    let mut controller = ScheduleController::new(api, state);
    println!("{}", controller.state().week_label());

    match controller.refresh().await? {
        Some(grid) => {
            let renderer: Box<dyn GridRenderer> = if json {
                Box::new(JsonRenderer)
            } else {
                Box::new(TextGrid)
            };
            println!("{}", renderer.render(&grid)?);
        }
        None => warn!("schedule response discarded as stale"),
    }

    Ok(())
}
