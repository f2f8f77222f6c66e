use crate::error::{Result, VineSightError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily weather for one field. Temperatures in °C, humidity in %, wind in
/// m/s at 2 m, rainfall in mm, radiation in MJ/m²/day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub date: NaiveDate,
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub relative_humidity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity_min: Option<f64>,
    pub wind_speed: f64,
    pub rainfall: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solar_radiation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solar_radiation_lux: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunshine_hours: Option<f64>,
}

impl WeatherObservation {
    pub fn new(
        date: NaiveDate,
        temperature_max: f64,
        temperature_min: f64,
        relative_humidity: f64,
        wind_speed: f64,
        rainfall: f64,
    ) -> Self {
        Self {
            date,
            temperature_max,
            temperature_min,
            relative_humidity,
            humidity_max: None,
            humidity_min: None,
            wind_speed,
            rainfall,
            solar_radiation: None,
            solar_radiation_lux: None,
            sunshine_hours: None,
        }
    }

    pub fn with_solar_radiation(mut self, mj_per_m2: f64) -> Self {
        self.solar_radiation = Some(mj_per_m2);
        self
    }

    pub fn with_solar_radiation_lux(mut self, lux: f64) -> Self {
        self.solar_radiation_lux = Some(lux);
        self
    }

    pub fn with_sunshine_hours(mut self, hours: f64) -> Self {
        self.sunshine_hours = Some(hours);
        self
    }

    pub fn with_humidity_range(mut self, max: f64, min: f64) -> Self {
        self.humidity_max = Some(max);
        self.humidity_min = Some(min);
        self
    }

    pub fn with_rainfall(mut self, rainfall: f64) -> Self {
        self.rainfall = rainfall;
        self
    }

    /// True when at least one radiation input is present.
    pub fn has_radiation_input(&self) -> bool {
        self.solar_radiation.is_some()
            || self.solar_radiation_lux.is_some()
            || self.sunshine_hours.is_some()
    }

    /// Rejects values that cannot be clamped into something meaningful.
    pub fn ensure_finite(&self) -> Result<()> {
        let required = [
            ("temperature_max", self.temperature_max),
            ("temperature_min", self.temperature_min),
            ("relative_humidity", self.relative_humidity),
            ("wind_speed", self.wind_speed),
            ("rainfall", self.rainfall),
        ];
        for (name, value) in required {
            if !value.is_finite() {
                return Err(VineSightError::InvalidInput(format!(
                    "{} must be a finite number, got {}",
                    name, value
                )));
            }
        }

        let optional = [
            ("humidity_max", self.humidity_max),
            ("humidity_min", self.humidity_min),
            ("solar_radiation", self.solar_radiation),
            ("solar_radiation_lux", self.solar_radiation_lux),
            ("sunshine_hours", self.sunshine_hours),
        ];
        for (name, value) in optional {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(VineSightError::InvalidInput(format!(
                        "{} must be a finite number, got {}",
                        name, v
                    )));
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub elevation_m: Option<f64>,
    /// Coastal sites use a higher Hargreaves radiation coefficient.
    #[serde(default)]
    pub coastal: bool,
}

impl Location {
    pub const DEFAULT_LATITUDE: f64 = 19.99;
    pub const DEFAULT_LONGITUDE: f64 = 73.79;
    pub const DEFAULT_ELEVATION_M: f64 = 565.0;

    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation_m: None,
            coastal: false,
        }
    }

    pub fn with_elevation(mut self, elevation_m: f64) -> Self {
        self.elevation_m = Some(elevation_m);
        self
    }

    pub fn elevation_or_default(&self) -> f64 {
        self.elevation_m
            .filter(|e| e.is_finite())
            .unwrap_or(Self::DEFAULT_ELEVATION_M)
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LATITUDE, Self::DEFAULT_LONGITUDE)
            .with_elevation(Self::DEFAULT_ELEVATION_M)
    }
}

/// Weather fields gathered from several places (manual entry, a provider)
/// before they are complete enough to become a [`WeatherObservation`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialObservation {
    pub temperature_max: Option<f64>,
    pub temperature_min: Option<f64>,
    pub relative_humidity: Option<f64>,
    pub humidity_max: Option<f64>,
    pub humidity_min: Option<f64>,
    pub wind_speed: Option<f64>,
    pub rainfall: Option<f64>,
    pub solar_radiation: Option<f64>,
    pub solar_radiation_lux: Option<f64>,
    pub sunshine_hours: Option<f64>,
}

impl PartialObservation {
    fn has_humidity(&self) -> bool {
        self.relative_humidity.is_some() || self.humidity_max.is_some() || self.humidity_min.is_some()
    }

    /// Fields present in `self` win; gaps are filled from `fallback`.
    /// Humidity is merged as one group: any humidity value in `self` replaces
    /// all of the fallback's.
    pub fn or(self, fallback: PartialObservation) -> PartialObservation {
        let humidity = if self.has_humidity() { &self } else { &fallback };
        let (relative_humidity, humidity_max, humidity_min) = (
            humidity.relative_humidity,
            humidity.humidity_max,
            humidity.humidity_min,
        );

        PartialObservation {
            temperature_max: self.temperature_max.or(fallback.temperature_max),
            temperature_min: self.temperature_min.or(fallback.temperature_min),
            relative_humidity,
            humidity_max,
            humidity_min,
            wind_speed: self.wind_speed.or(fallback.wind_speed),
            rainfall: self.rainfall.or(fallback.rainfall),
            solar_radiation: self.solar_radiation.or(fallback.solar_radiation),
            solar_radiation_lux: self.solar_radiation_lux.or(fallback.solar_radiation_lux),
            sunshine_hours: self.sunshine_hours.or(fallback.sunshine_hours),
        }
    }

    /// Builds a full observation. Mean humidity may be derived from the
    /// max/min pair; rainfall defaults to zero.
    pub fn into_observation(self, date: NaiveDate) -> Result<WeatherObservation> {
        let missing = |name: &str| {
            VineSightError::InvalidInput(format!("missing required weather field: {}", name))
        };

        let relative_humidity = match (self.relative_humidity, self.humidity_max, self.humidity_min)
        {
            (Some(rh), _, _) => rh,
            (None, Some(max), Some(min)) => (max + min) / 2.0,
            _ => return Err(missing("relative_humidity")),
        };

        let observation = WeatherObservation {
            date,
            temperature_max: self.temperature_max.ok_or_else(|| missing("temperature_max"))?,
            temperature_min: self.temperature_min.ok_or_else(|| missing("temperature_min"))?,
            relative_humidity,
            humidity_max: self.humidity_max,
            humidity_min: self.humidity_min,
            wind_speed: self.wind_speed.ok_or_else(|| missing("wind_speed"))?,
            rainfall: self.rainfall.unwrap_or(0.0),
            solar_radiation: self.solar_radiation,
            solar_radiation_lux: self.solar_radiation_lux,
            sunshine_hours: self.sunshine_hours,
        };
        observation.ensure_finite()?;
        Ok(observation)
    }
}
