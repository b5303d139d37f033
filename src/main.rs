use checkin_geo::config::{Command, DistanceUnit};
use checkin_geo::core::ConfigProvider;
use checkin_geo::utils::error::GeoError;
use checkin_geo::utils::{logger, validation::Validate};
use checkin_geo::{
    distance_meters, CheckInPipeline, CliConfig, GeoCoordinate, GeofenceEngine, GeofencePolicy,
    LocalStorage, TomlConfig,
};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    let result = match cli.command.clone() {
        Command::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
            unit,
        } => {
            init_logging(&cli, None);
            print_distance(lat1, lon1, lat2, lon2, unit)
        }
        Command::Check {
            config,
            lat,
            lon,
            workplace,
        } => {
            let config = load_config(&config);
            init_logging(&cli, Some(&config));
            check_location(&config, lat, lon, workplace.as_deref())
        }
        Command::Run {
            config: path,
            strict,
            max_records,
            dry_run,
        } => {
            let mut config = load_config(&path);
            init_logging(&cli, Some(&config));

            if strict {
                config.input.strict = Some(true);
                tracing::info!("🔧 Strict mode enabled from command line");
            }
            if let Some(max) = max_records {
                config.input.max_records = Some(max);
                tracing::info!("🔧 max_records overridden to: {}", max);
            }

            run_pipeline(config, dry_run).await
        }
    };

    if let Err(e) = result {
        exit_with(&e);
    }

    Ok(())
}

fn load_config(path: &str) -> TomlConfig {
    match TomlConfig::from_file(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", path, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    }
}

fn init_logging(cli: &CliConfig, config: Option<&TomlConfig>) {
    let level = config.and_then(|c| c.logging_level());
    let json = cli.json_logs || config.map(|c| c.json_logging()).unwrap_or(false);

    if json {
        logger::init_json_logger(cli.verbose, level);
    } else {
        logger::init_cli_logger(cli.verbose, level);
    }
}

fn print_distance(
    lat1: f64,
    lon1: f64,
    lat2: f64,
    lon2: f64,
    unit: DistanceUnit,
) -> checkin_geo::Result<()> {
    let meters = distance_meters(lat1, lon1, lat2, lon2)?;
    tracing::debug!(
        "({}, {}) -> ({}, {}) = {} m",
        lat1,
        lon1,
        lat2,
        lon2,
        meters
    );
    println!("{:.3} {}", unit.convert(meters), unit.suffix());
    Ok(())
}

fn check_location(
    config: &TomlConfig,
    lat: f64,
    lon: f64,
    workplace_id: Option<&str>,
) -> checkin_geo::Result<()> {
    config.validate()?;

    let point = GeoCoordinate::new(lat, lon)?;
    let policy = GeofencePolicy::new(config.tolerance_m())?;
    let workplaces = config.workplaces()?;

    let (workplace, check) = policy.check_location(&workplaces, workplace_id, &point)?;

    let allowed = workplace.radius_m + policy.tolerance_m();
    if check.inside {
        println!(
            "✅ Within '{}' ({}): {:.1} m from site, limit {:.1} m",
            workplace.id, workplace.name, check.distance_m, allowed
        );
    } else {
        println!(
            "🚫 Outside '{}' ({}): {:.1} m from site, limit {:.1} m",
            workplace.id, workplace.name, check.distance_m, allowed
        );
    }

    if check.exit_code() != 0 {
        std::process::exit(check.exit_code());
    }

    Ok(())
}

async fn run_pipeline(config: TomlConfig, dry_run: bool) -> checkin_geo::Result<()> {
    config.validate()?;
    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, dry_run);

    if dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        return Ok(());
    }

    let storage = LocalStorage::new(".");
    let pipeline = CheckInPipeline::new(storage, config)?;
    let engine = GeofenceEngine::new(pipeline);

    let output_path = engine.run().await?;
    tracing::info!("✅ Check-in evaluation completed successfully!");
    println!("✅ Check-in evaluation completed successfully!");
    println!("📁 Report saved to: {}", output_path);

    Ok(())
}

fn display_config_summary(config: &TomlConfig, dry_run: bool) {
    println!("📋 Configuration Summary:");
    println!("  Input: {}", config.input_path());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    if let Some(archive) = config.compression_filename() {
        println!("  Compression: {} (ZIP)", archive);
    }
    if let Some(max_records) = config.max_records() {
        println!("  Max Records: {}", max_records);
    }
    println!("  Strict: {}", config.strict());
    println!("  Tolerance: {:.1} m", config.tolerance_m());

    println!("  Workplaces:");
    for workplace in &config.workplaces {
        println!(
            "    {} ({:.4}, {:.4}) radius {:.1} m",
            workplace.id, workplace.latitude, workplace.longitude, workplace.radius_m
        );
    }

    if dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn exit_with(e: &GeoError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    std::process::exit(e.severity().exit_code());
}
