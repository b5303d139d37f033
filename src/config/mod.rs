pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "checkin-geo")]
#[command(about = "Great-circle distances and clock-in geofence checks")]
pub struct CliConfig {
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Distance between two latitude/longitude pairs
    Distance {
        #[arg(allow_negative_numbers = true)]
        lat1: f64,
        #[arg(allow_negative_numbers = true)]
        lon1: f64,
        #[arg(allow_negative_numbers = true)]
        lat2: f64,
        #[arg(allow_negative_numbers = true)]
        lon2: f64,

        #[arg(long, value_enum, default_value_t = DistanceUnit::M)]
        unit: DistanceUnit,
    },

    /// Check a single reported location against the configured workplaces
    Check {
        /// Path to TOML configuration file
        #[arg(short, long, default_value = "checkin-geo.toml")]
        config: String,

        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Workplace id; the nearest workplace is used when omitted
        #[arg(long)]
        workplace: Option<String>,
    },

    /// Evaluate a CSV export of check-ins and write a report
    Run {
        /// Path to TOML configuration file
        #[arg(short, long, default_value = "checkin-geo.toml")]
        config: String,

        /// Abort on the first rejected check-in
        #[arg(long)]
        strict: bool,

        /// Override input.max_records
        #[arg(long)]
        max_records: Option<usize>,

        /// Show what would be processed without reading or writing data
        #[arg(long)]
        dry_run: bool,
    },
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DistanceUnit {
    M,
    Km,
}

#[cfg(feature = "cli")]
impl DistanceUnit {
    pub fn convert(self, meters: f64) -> f64 {
        match self {
            DistanceUnit::M => meters,
            DistanceUnit::Km => meters / 1_000.0,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            DistanceUnit::M => "m",
            DistanceUnit::Km => "km",
        }
    }
}
