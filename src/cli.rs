use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "vinesight",
    version,
    about = "Vineyard crop water use and irrigation advice"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override SQLite data directory
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute ETo, ETc and an irrigation recommendation for one day
    Calc(CalcArgs),
    /// Compare a computed ETo against a reference value
    Validate {
        /// Computed ETo, mm/day
        #[arg(long)]
        computed: f64,
        /// Reference ETo, mm/day
        #[arg(long)]
        reference: f64,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List growth stages with their crop coefficients
    Stages,
    /// Show saved irrigation advice
    History {
        /// First date to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last date to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Delete the entry with this id instead of listing
        #[arg(long, conflicts_with_all = ["from", "to"])]
        delete: Option<i64>,
    },
    /// Re-run interactive setup
    Init,
    /// Validate config and test the weather connection
    Check,
}

#[derive(Args, Debug, Default)]
pub struct CalcArgs {
    /// Date of the observation (YYYY-MM-DD, default today)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Maximum air temperature, °C
    #[arg(long, allow_negative_numbers = true)]
    pub tmax: Option<f64>,
    /// Minimum air temperature, °C
    #[arg(long, allow_negative_numbers = true)]
    pub tmin: Option<f64>,
    /// Mean relative humidity, %
    #[arg(long)]
    pub humidity: Option<f64>,
    /// Maximum relative humidity, %
    #[arg(long, requires = "humidity_min")]
    pub humidity_max: Option<f64>,
    /// Minimum relative humidity, %
    #[arg(long, requires = "humidity_max")]
    pub humidity_min: Option<f64>,
    /// Wind speed at 2 m, m/s
    #[arg(long, allow_negative_numbers = true)]
    pub wind: Option<f64>,
    /// Rainfall, mm
    #[arg(long, allow_negative_numbers = true)]
    pub rain: Option<f64>,
    /// Solar radiation, MJ/m²/day
    #[arg(long, allow_negative_numbers = true)]
    pub solar: Option<f64>,
    /// Illuminance, lux (converted to MJ/m²/day)
    #[arg(long)]
    pub lux: Option<f64>,
    /// Bright sunshine hours
    #[arg(long)]
    pub sunshine: Option<f64>,

    /// Latitude, decimal degrees (overrides config)
    #[arg(long, allow_negative_numbers = true)]
    pub latitude: Option<f64>,
    /// Longitude, decimal degrees (overrides config)
    #[arg(long, allow_negative_numbers = true)]
    pub longitude: Option<f64>,
    /// Elevation, m (overrides config)
    #[arg(long, allow_negative_numbers = true)]
    pub elevation: Option<f64>,

    /// Growth stage (dormant, bud_break, flowering, fruit_set, veraison, harvest, post_harvest)
    #[arg(long)]
    pub stage: Option<String>,
    /// Irrigation method (drip, sprinkler, surface)
    #[arg(long)]
    pub method: Option<String>,
    /// Soil type (sandy, loamy, clay)
    #[arg(long)]
    pub soil: Option<String>,

    /// Reference ETo to validate against, mm/day
    #[arg(long)]
    pub reference_eto: Option<f64>,

    /// Fill missing values from Open-Meteo
    #[arg(long)]
    pub fetch: bool,
    /// Save the result to the irrigation log
    #[arg(long)]
    pub save: bool,
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_calc_flags() {
        let cli = Cli::parse_from([
            "vinesight", "-v", "calc", "--tmax", "31.5", "--tmin", "-2", "--humidity", "70",
            "--wind", "2", "--stage", "veraison", "--json",
        ]);
        let Commands::Calc(args) = cli.command else {
            panic!("expected calc");
        };
        assert_eq!(cli.verbose, 1);
        assert_eq!(args.tmax, Some(31.5));
        assert_eq!(args.tmin, Some(-2.0));
        assert_eq!(args.stage.as_deref(), Some("veraison"));
        assert!(args.json);
        assert!(!args.fetch);
    }

    #[test]
    fn humidity_range_needs_both_ends() {
        let result = Cli::try_parse_from(["vinesight", "calc", "--humidity-max", "90"]);
        assert!(result.is_err());
    }

    #[test]
    fn parses_history_range() {
        let cli = Cli::parse_from(["vinesight", "history", "--from", "2024-07-01"]);
        let Commands::History { from, to, delete } = cli.command else {
            panic!("expected history");
        };
        assert_eq!(from, NaiveDate::from_ymd_opt(2024, 7, 1));
        assert!(to.is_none());
        assert!(delete.is_none());
    }
}
