use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use rankbias::types::LocationsResponse;
use rankbias::utils::{MAX_STARS, MIN_STARS, RecruitFilter, RecruitStats};
use rankbias::{Geocoder, MemoryCache, PageFetcher, Pipeline, PipelineOutcome, sample_recruits};

#[derive(Parser)]
#[command(name = "rankbias")]
#[command(about = "Maps highly rated football recruits by hometown", long_about = None)]
struct Cli {
    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "info",
        global = true,
        help = "Set the logging level"
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the rankings, geocode qualifying recruits and print them
    Recruits {
        #[arg(
            long,
            default_value_t = MIN_STARS,
            help = "Minimum star rating to include",
            value_parser = clap::value_parser!(u32).range(MIN_STARS as i64..=MAX_STARS as i64)
        )]
        min_stars: u32,

        #[arg(
            long,
            help = "Maximum number of recruits to geocode",
            value_parser = clap::value_parser!(usize)
        )]
        limit: Option<usize>,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
    /// Resolve a single location to coordinates
    Geocode {
        #[arg(help = "Free-text location, e.g. \"Houston, TX\"")]
        location: String,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
}

fn serialize_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Error serializing to JSON: {}", e);
            process::exit(1);
        }
    }
}

fn build_geocoder() -> Geocoder {
    Geocoder::new(Arc::new(MemoryCache::new())).unwrap_or_else(|e| {
        log::error!("Error creating geocoder: {}", e);
        process::exit(1);
    })
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .init();

    match cli.command {
        Commands::Recruits {
            min_stars,
            limit,
            format,
        } => {
            let filter = RecruitFilter { min_stars, limit }
                .validate()
                .unwrap_or_else(|e| {
                    log::error!("Invalid args: {e}");
                    process::exit(1);
                });

            let fetcher = PageFetcher::new().unwrap_or_else(|e| {
                log::error!("Error creating fetcher: {}", e);
                process::exit(1);
            });

            let pipeline = Pipeline::new(fetcher, build_geocoder()).with_filter(filter);

            let recruits = match pipeline.run().await {
                PipelineOutcome::Recruits(recruits) => recruits,
                PipelineOutcome::Empty => {
                    log::warn!("No live recruits available, using sample data");
                    sample_recruits()
                }
            };

            match format {
                OutputFormat::Json => serialize_json(&LocationsResponse {
                    locations: recruits,
                }),
                OutputFormat::Text => {
                    for (i, recruit) in recruits.iter().enumerate() {
                        println!("{:>3}. {}", i + 1, recruit);
                    }
                    print!("{}", RecruitStats::from_recruits(&recruits));
                }
            }
        }

        Commands::Geocode { location, format } => {
            let geocoder = build_geocoder();

            let coords = geocoder.lookup(&location).await.unwrap_or_else(|e| {
                log::error!("Error geocoding '{}': {}", location, e);
                process::exit(1);
            });

            match format {
                OutputFormat::Json => serialize_json(&coords),
                OutputFormat::Text => println!("{}: {}", location, coords),
            }
        }
    }
}
