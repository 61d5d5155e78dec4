//! CLI entry point for the station traffic tool.
//!
//! Loads the bike-share station, trip and bike-lane datasets, then
//! summarizes traffic, filters it by time of day, profiles it by hour or
//! exports map-ready markers.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use station_traffic::config::{DEFAULT_FETCH_TIMEOUT, DatasetConfig};
use station_traffic::fetch::BasicClient;
use station_traffic::loader::{Dataset, load_dataset, load_lanes};
use station_traffic::output::{self, ExportFormat};
use station_traffic::render::BIKE_LANE_STYLE;
use station_traffic::scale::{RadiusCurve, StationMarker};
use station_traffic::session::TrafficMap;
use station_traffic::slider::parse_time_arg;
use station_traffic::traffic::{
    DEFAULT_TOLERANCE_MINUTES, HourlyProfile, TimeFilter, TrafficSummary, aggregate, busiest,
};
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "station-traffic")]
#[command(about = "Bike-share station traffic by time of day", long_about = None)]
struct Cli {
    #[command(flatten)]
    sources: SourceArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Station JSON document (URL or path)
    #[arg(long, global = true)]
    stations: Option<String>,

    /// Trip CSV, optionally gzipped (URL or path)
    #[arg(long, global = true)]
    trips: Option<String>,

    /// Bike-lane GeoJSON layer (URL or path); repeat once per layer
    #[arg(long = "lanes", global = true)]
    lanes: Vec<String>,

    /// Download timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_FETCH_TIMEOUT.as_secs())]
    timeout: u64,
}

#[derive(Args)]
struct WindowArgs {
    /// Time of day: HH:MM, "2:30 PM", a minute of day, or -1/any for no filter
    #[arg(short, long, default_value = "any", value_parser = parse_time_arg)]
    time: TimeFilter,

    /// Minutes either side of the time that still count
    #[arg(long, default_value_t = DEFAULT_TOLERANCE_MINUTES)]
    tolerance: u32,

    /// How traffic maps onto circle radius
    #[arg(long, value_enum, default_value_t = RadiusCurve::Sqrt)]
    curve: RadiusCurve,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate all trips and list the busiest stations
    Summary {
        /// Number of stations to list
        #[arg(short = 'n', long, default_value_t = 10)]
        top: usize,
    },
    /// Station traffic for trips around a time of day
    Window {
        #[command(flatten)]
        window: WindowArgs,

        /// Number of stations to list
        #[arg(short = 'n', long, default_value_t = 10)]
        top: usize,
    },
    /// Write station markers for a time of day to a file
    Export {
        #[command(flatten)]
        window: WindowArgs,

        #[arg(short, long, value_enum, default_value_t = ExportFormat::Geojson)]
        format: ExportFormat,

        /// Output file path
        #[arg(short, long)]
        output: String,
    },
    /// Trips per hour of day
    Profile,
    /// Bike-lane layer statistics
    Lanes,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/station_traffic.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("station_traffic.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let config = DatasetConfig::from_env().with_overrides(
        cli.sources.stations,
        cli.sources.trips,
        cli.sources.lanes,
    );
    let client = BasicClient::new(Duration::from_secs(cli.sources.timeout))?;

    match cli.command {
        Commands::Summary { top } => {
            let dataset = load(&client, &config).await?;
            summary(&dataset, top);
        }
        Commands::Window { window, top } => {
            let dataset = load(&client, &config).await?;
            let map = filtered_map(dataset, &window);
            report_window(&map, top)?;
        }
        Commands::Export {
            window,
            format,
            output: path,
        } => {
            let dataset = load(&client, &config).await?;
            let map = filtered_map(dataset, &window);
            output::export(&path, format, map.markers())?;
        }
        Commands::Profile => {
            let dataset = load(&client, &config).await?;
            profile(&HourlyProfile::from_trips(&dataset.trips));
        }
        Commands::Lanes => {
            info!(
                color = BIKE_LANE_STYLE.color,
                width = BIKE_LANE_STYLE.width,
                opacity = BIKE_LANE_STYLE.opacity,
                "Bike lane style"
            );
            for source in &config.lanes {
                if let Some(layer) = load_lanes(&client, source).await {
                    output::print_json(&layer.stats())?;
                }
            }
        }
    }

    Ok(())
}

/// Loads every dataset. A failure here ends the run: nothing is drawn from
/// partial data.
async fn load(client: &BasicClient, config: &DatasetConfig) -> Result<Dataset> {
    match load_dataset(client, config).await {
        Ok(dataset) => Ok(dataset),
        Err(e) => {
            error!(error = %format!("{e:#}"), "Dataset load failed");
            Err(e)
        }
    }
}

fn filtered_map(dataset: Dataset, window: &WindowArgs) -> TrafficMap {
    let mut map = TrafficMap::new(dataset.stations, dataset.trips, window.tolerance, window.curve);
    map.set_filter(window.time);
    map
}

fn summary(dataset: &Dataset, top: usize) {
    let traffic = aggregate(&dataset.stations, &dataset.trips);
    let summary = TrafficSummary::new(&traffic, dataset.trips.len());

    info!(
        stations = summary.stations,
        active_stations = summary.active_stations,
        trips = summary.trips,
        max_traffic = summary.max_traffic,
        mean_traffic = summary.mean_traffic,
        stddev_traffic = summary.stddev_traffic,
        lane_layers = dataset.lanes.len(),
        "Station traffic summary"
    );
    output::print_pretty(&summary);

    for (rank, t) in busiest(&traffic, top).iter().enumerate() {
        info!(
            rank = rank + 1,
            station_id = %t.station.id,
            name = t.station.name.as_deref().unwrap_or(""),
            departures = t.departures,
            arrivals = t.arrivals,
            total = t.total_traffic,
            "Station"
        );
    }
}

fn report_window(map: &TrafficMap, top: usize) -> Result<()> {
    let (min_radius, max_radius) = map.radius_range();
    info!(
        time = %map.label(),
        slider = map.slider_value(),
        active_trips = map.active_trips(),
        min_radius,
        max_radius,
        "Time window applied"
    );

    let mut ranked: Vec<&StationMarker> = map.markers().iter().collect();
    ranked.sort_by(|a, b| b.total_traffic.cmp(&a.total_traffic));
    ranked.truncate(top);

    output::print_json(&ranked)
}

fn profile(profile: &HourlyProfile) {
    for hour in 0..24 {
        info!(
            hour,
            departures = profile.departures[hour],
            arrivals = profile.arrivals[hour],
            "Hour"
        );
    }
    info!(
        peak_departure_hour = ?profile.peak_departure_hour(),
        peak_arrival_hour = ?profile.peak_arrival_hour(),
        "Hourly profile"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_defaults_to_fetch_timeout() {
        let cli = Cli::try_parse_from(["station-traffic", "summary"]).unwrap();
        assert_eq!(cli.sources.timeout, DEFAULT_FETCH_TIMEOUT.as_secs());
        assert_eq!(
            Duration::from_secs(cli.sources.timeout),
            DEFAULT_FETCH_TIMEOUT
        );
    }

    #[test]
    fn test_timeout_override() {
        let cli = Cli::try_parse_from(["station-traffic", "profile", "--timeout", "5"]).unwrap();
        assert_eq!(cli.sources.timeout, 5);
    }

    #[test]
    fn test_time_past_end_of_day_is_rejected() {
        assert!(Cli::try_parse_from(["station-traffic", "window", "--time", "1440"]).is_err());
        assert!(Cli::try_parse_from(["station-traffic", "window", "--time", "2000"]).is_err());
    }
}
