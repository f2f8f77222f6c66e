use crate::error::{Result, VineSightError};
use crate::models::{FarmProfile, IrrigationMethod, IrrigationSystem, Location, SoilType};
use dialoguer::{Input, Select};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    pub farm: FarmConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FarmConfig {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub elevation_m: Option<f64>,
    #[serde(default)]
    pub coastal: bool,
    #[serde(default)]
    pub irrigation_method: Option<String>,
    #[serde(default)]
    pub soil_type: Option<String>,
    /// Irrigated area; only meaningful together with `discharge_l_per_h`
    #[serde(default)]
    pub area_m2: Option<f64>,
    #[serde(default)]
    pub discharge_l_per_h: Option<f64>,
}

impl FarmConfig {
    pub fn location(&self) -> Location {
        Location {
            latitude: self.latitude,
            longitude: self.longitude,
            elevation_m: self.elevation_m,
            coastal: self.coastal,
        }
    }

    /// Resolve the free-text settings. Unknown names are rejected rather than
    /// replaced with a default.
    pub fn farm_profile(&self) -> Result<FarmProfile> {
        let irrigation_method = self
            .irrigation_method
            .as_deref()
            .map(IrrigationMethod::parse)
            .transpose()?;
        let soil_type = self.soil_type.as_deref().map(SoilType::parse).transpose()?;

        let system = match (self.area_m2, self.discharge_l_per_h) {
            (Some(area), Some(discharge)) => Some(IrrigationSystem::new(area, discharge)?),
            (None, None) => None,
            _ => {
                return Err(VineSightError::Config(
                    "farm.area_m2 and farm.discharge_l_per_h must be set together".into(),
                ))
            }
        };

        Ok(FarmProfile {
            irrigation_method,
            soil_type,
            system,
        })
    }
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            name: "Home Block".into(),
            latitude: Location::DEFAULT_LATITUDE,
            longitude: Location::DEFAULT_LONGITUDE,
            elevation_m: Some(Location::DEFAULT_ELEVATION_M),
            coastal: false,
            irrigation_method: Some("drip".into()),
            soil_type: Some("loamy".into()),
            area_m2: None,
            discharge_l_per_h: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WeatherConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_base_url() -> String {
    "https://api.open-meteo.com/v1".into()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p,
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(VineSightError::Config(format!(
                "Config file not found at {:?}. Run `vinesight init` to set up.",
                config_path
            )));
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| VineSightError::Config(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&config_str)
    }

    /// Parse YAML after `${VAR}` substitution.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content)?;
        serde_yaml::from_str(&content)
            .map_err(|e| VineSightError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("vinesight").join("config.yaml");
            if xdg_config.exists() {
                return Ok(xdg_config);
            }
        }

        Self::default_config_path()
    }

    /// Returns true if a config file can be found in any standard location.
    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/vinesight/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| VineSightError::Config("Cannot determine config directory".into()))?
            .join("vinesight");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the loaded Config and the path it was written to.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        let input_err = |e: dialoguer::Error| VineSightError::Config(format!("Input error: {}", e));

        println!();
        println!("Let's set up VineSight!");
        println!();

        println!("Farm");
        let name: String = Input::new()
            .with_prompt("  Block name")
            .default("Home Block".into())
            .interact_text()
            .map_err(input_err)?;

        let latitude: f64 = Input::new()
            .with_prompt("  Latitude")
            .default(Location::DEFAULT_LATITUDE)
            .interact_text()
            .map_err(input_err)?;

        let longitude: f64 = Input::new()
            .with_prompt("  Longitude")
            .default(Location::DEFAULT_LONGITUDE)
            .interact_text()
            .map_err(input_err)?;

        let elevation_m: f64 = Input::new()
            .with_prompt("  Elevation (m)")
            .default(Location::DEFAULT_ELEVATION_M)
            .interact_text()
            .map_err(input_err)?;

        let methods = ["drip", "sprinkler", "surface"];
        let method_idx = Select::new()
            .with_prompt("  Irrigation method")
            .items(&methods)
            .default(0)
            .interact()
            .map_err(input_err)?;

        let soils = ["sandy", "loamy", "clay"];
        let soil_idx = Select::new()
            .with_prompt("  Soil type")
            .items(&soils)
            .default(1)
            .interact()
            .map_err(input_err)?;

        println!();
        println!("Irrigation system (enter 0 to use the method's default rate)");
        let area_m2: f64 = Input::new()
            .with_prompt("  Irrigated area (m²)")
            .default(0.0)
            .interact_text()
            .map_err(input_err)?;

        let discharge_l_per_h: f64 = if area_m2 > 0.0 {
            Input::new()
                .with_prompt("  Total system discharge (L/h)")
                .interact_text()
                .map_err(input_err)?
        } else {
            0.0
        };

        let (area_m2, discharge_l_per_h) = if area_m2 > 0.0 && discharge_l_per_h > 0.0 {
            (Some(area_m2), Some(discharge_l_per_h))
        } else {
            (None, None)
        };

        println!();

        let config = Config {
            farm: FarmConfig {
                name,
                latitude,
                longitude,
                elevation_m: Some(elevation_m),
                coastal: false,
                irrigation_method: Some(methods[method_idx].into()),
                soil_type: Some(soils[soil_idx].into()),
                area_m2,
                discharge_l_per_h,
            },
            weather: WeatherConfig::default(),
        };

        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| VineSightError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# VineSight Configuration\n# Generated by `vinesight init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let mut result = content.to_string();

        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| VineSightError::Config(format!("Bad substitution pattern: {}", e)))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        Ok(result)
    }

    pub fn data_dir(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        if let Some(dir) = data_dir_override {
            std::fs::create_dir_all(dir)?;
            return Ok(dir.clone());
        }

        if let Ok(dir) = std::env::var("VINESIGHT_DATA_DIR") {
            let p = PathBuf::from(dir);
            std::fs::create_dir_all(&p)?;
            return Ok(p);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| VineSightError::Config("Cannot determine data directory".into()))?
            .join("vinesight");

        std::fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn db_path(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        Ok(Self::data_dir(data_dir_override)?.join("vinesight.db"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
farm:
  name: North Block
  latitude: 20.01
  longitude: 73.70
  elevation_m: 590
  irrigation_method: drip
  soil_type: sandy
  area_m2: 8000
  discharge_l_per_h: 12000
weather:
  base_url: http://localhost:9000/v1
"#;

    #[test]
    fn parses_full_config() {
        let config = Config::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.farm.name, "North Block");
        assert_eq!(config.farm.location().elevation_m, Some(590.0));
        assert!(config.weather.enabled);
        assert_eq!(config.weather.timeout_secs, 10);
        assert_eq!(config.weather.base_url, "http://localhost:9000/v1");

        let profile = config.farm.farm_profile().unwrap();
        assert_eq!(profile.irrigation_method, Some(IrrigationMethod::Drip));
        assert_eq!(profile.soil_type, Some(SoilType::Sandy));
        let system = profile.system.unwrap();
        assert_eq!(system.area_m2, 8000.0);
        assert_eq!(system.discharge_l_per_h, 12000.0);
    }

    #[test]
    fn weather_section_is_optional() {
        let yaml = "farm:\n  name: A\n  latitude: 1.0\n  longitude: 2.0\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.weather.base_url, "https://api.open-meteo.com/v1");
        assert!(config.farm.farm_profile().unwrap().system.is_none());
    }

    #[test]
    fn unknown_method_is_rejected() {
        let mut farm = FarmConfig::default();
        farm.irrigation_method = Some("centre pivot".into());
        assert!(matches!(
            farm.farm_profile(),
            Err(VineSightError::Configuration { .. })
        ));
    }

    #[test]
    fn half_configured_system_is_rejected() {
        let mut farm = FarmConfig::default();
        farm.area_m2 = Some(5000.0);
        assert!(matches!(farm.farm_profile(), Err(VineSightError::Config(_))));
    }

    #[test]
    fn env_substitution() {
        std::env::set_var("VINESIGHT_TEST_FARM_NAME", "Substituted");
        let yaml = "farm:\n  name: ${VINESIGHT_TEST_FARM_NAME}\n  latitude: 1.0\n  longitude: 2.0\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.farm.name, "Substituted");
    }

    #[test]
    fn default_round_trips_through_yaml() {
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        let back = Config::from_yaml(&yaml).unwrap();
        assert_eq!(back.farm.name, "Home Block");
        assert_eq!(back.farm.irrigation_method.as_deref(), Some("drip"));
    }
}
