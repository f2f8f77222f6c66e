use chrono::Local;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vinesight::cli::{CalcArgs, Cli, Commands};
use vinesight::config::Config;
use vinesight::datasources::{DailyWeather, OpenMeteoClient};
use vinesight::db::Database;
use vinesight::logic::season::typical_stage_for_date;
use vinesight::logic::{advise_with_reference, validate_against_reference, AdviceRequest};
use vinesight::models::{
    GrowthStage, IrrigationLog, IrrigationMethod, Location, PartialObservation, SoilType,
};
use vinesight::report;
use vinesight::{Result, VineSightError};

#[tokio::main]
async fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// RUST_LOG wins over -v. Logs go to stderr so `--json` output stays clean.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "vinesight=debug",
        _ => "vinesight=trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let data_dir = cli.data_dir.as_ref();

    match cli.command {
        Commands::Init => {
            Config::setup_interactive()?;
            Ok(())
        }
        Commands::Stages => {
            print!("{}", report::render_stages());
            Ok(())
        }
        Commands::Validate {
            computed,
            reference,
            json,
        } => {
            let validation = validate_against_reference(computed, reference).ok_or_else(|| {
                VineSightError::InvalidInput(
                    "reference ETo must be a positive, finite number".into(),
                )
            })?;
            if json {
                println!("{}", serde_json::to_string_pretty(&validation)?);
            } else {
                print!("{}", report::render_validation(&validation));
            }
            Ok(())
        }
        Commands::Calc(args) => {
            let config = load_config(cli.config)?;
            calc(&config, data_dir, args).await
        }
        Commands::History { from, to, delete } => {
            let config = load_config(cli.config)?;
            let db = Database::open(data_dir)?;
            if let Some(id) = delete {
                db.delete_irrigation_log(id)?;
                println!("Deleted entry {}", id);
            } else {
                let logs = db.logs_between(&config.farm.name, from, to)?;
                print!("{}", report::render_history(&logs));
            }
            Ok(())
        }
        Commands::Check => check(cli.config, data_dir).await,
    }
}

fn load_config(config_override: Option<PathBuf>) -> Result<Config> {
    if config_override.is_none() && !Config::exists(None) {
        eprintln!("warning: no config found, using built-in defaults (run `vinesight init`)");
        return Ok(Config::default());
    }
    Config::load(config_override)
}

async fn fetch_weather(config: &Config, location: &Location, date: chrono::NaiveDate) -> Result<DailyWeather> {
    if !config.weather.enabled {
        return Err(VineSightError::DataSourceUnavailable(
            "weather provider is disabled in config".into(),
        ));
    }
    let client = OpenMeteoClient::new(config.weather.clone())?;
    client.fetch_daily(location, date).await
}

async fn calc(config: &Config, data_dir: Option<&PathBuf>, args: CalcArgs) -> Result<()> {
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());

    let mut location = config.farm.location();
    if let Some(latitude) = args.latitude {
        location.latitude = latitude;
    }
    if let Some(longitude) = args.longitude {
        location.longitude = longitude;
    }
    if let Some(elevation) = args.elevation {
        location.elevation_m = Some(elevation);
    }

    let mut farm = config.farm.farm_profile()?;
    if let Some(method) = args.method.as_deref() {
        farm.irrigation_method = Some(IrrigationMethod::parse(method)?);
    }
    if let Some(soil) = args.soil.as_deref() {
        farm.soil_type = Some(SoilType::parse(soil)?);
    }

    let stage = match args.stage.as_deref() {
        Some(name) => GrowthStage::parse(name)?,
        None => {
            let stage = typical_stage_for_date(date, location.latitude);
            eprintln!(
                "warning: no --stage given, assuming {} (typical for {})",
                stage.key(),
                date.format("%B")
            );
            stage
        }
    };

    let manual = PartialObservation {
        temperature_max: args.tmax,
        temperature_min: args.tmin,
        relative_humidity: args.humidity,
        humidity_max: args.humidity_max,
        humidity_min: args.humidity_min,
        wind_speed: args.wind,
        rainfall: args.rain,
        solar_radiation: args.solar,
        solar_radiation_lux: args.lux,
        sunshine_hours: args.sunshine,
    };

    let mut reference_eto = args.reference_eto;
    let observed = if args.fetch {
        match fetch_weather(config, &location, date).await {
            Ok(daily) => {
                tracing::debug!(?daily, "Fetched provider weather");
                if location.elevation_m.is_none() {
                    location.elevation_m = daily.elevation_m;
                }
                reference_eto = reference_eto.or(daily.reference_eto);
                manual.or(daily.weather)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Weather fetch failed");
                eprintln!("warning: fetch failed ({}), using manual values only", e);
                manual
            }
        }
    } else {
        manual
    };

    let weather = observed.into_observation(date)?;
    let request = AdviceRequest::new(weather, stage)
        .with_location(location)
        .with_farm(farm);
    let advice = advise_with_reference(&request, reference_eto)?;

    if args.save {
        let db = Database::open(data_dir)?;
        let log = IrrigationLog::from_result(&config.farm.name, date, &advice.result, reference_eto);
        let replaced = db.get_irrigation_log(&config.farm.name, date)?.is_some();
        let id = db.save_irrigation_log(&log)?;
        tracing::info!(id, farm = %config.farm.name, %date, replaced, "Saved irrigation advice");
        eprintln!(
            "{} entry {} for {} in {}",
            if replaced { "Replaced" } else { "Saved" },
            id,
            date,
            db.path().display()
        );
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&advice)?);
    } else {
        println!("{} on {}", config.farm.name, date.format("%Y-%m-%d"));
        println!();
        print!("{}", report::render_advice(&advice));
    }

    Ok(())
}

async fn check(config_override: Option<PathBuf>, data_dir: Option<&PathBuf>) -> Result<()> {
    println!("VineSight check");
    println!();

    let config = match Config::load(config_override) {
        Ok(c) => {
            println!("  Config:      OK");
            c
        }
        Err(e) => {
            println!("  Config:      FAILED ({})", e);
            println!();
            println!("Run `vinesight init` to create a config file.");
            return Ok(());
        }
    };

    match config.farm.farm_profile() {
        Ok(_) => println!("  Farm:        OK ({})", config.farm.name),
        Err(e) => println!("  Farm:        FAILED ({})", e),
    }

    match Database::open(data_dir) {
        Ok(db) => println!("  Database:    OK ({})", db.path().display()),
        Err(e) => println!("  Database:    FAILED ({})", e),
    }

    if !config.weather.enabled {
        println!("  Open-Meteo:  disabled");
    } else {
        let status = match OpenMeteoClient::new(config.weather.clone()) {
            Ok(client) => match client.test_connection(&config.farm.location()).await {
                Ok(true) => "OK".to_string(),
                Ok(false) => "FAILED (bad response)".to_string(),
                Err(e) => format!("FAILED ({})", e),
            },
            Err(e) => format!("FAILED ({})", e),
        };
        println!("  Open-Meteo:  {}", status);
    }

    println!();
    Ok(())
}
