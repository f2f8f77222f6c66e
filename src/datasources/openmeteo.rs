use crate::config::WeatherConfig;
use crate::error::{Result, VineSightError};
use crate::logic::calculations::wind_speed_at_2m;
use crate::models::{Location, PartialObservation};
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;

/// Open-Meteo reports wind at 10 m.
const PROVIDER_WIND_HEIGHT_M: f64 = 10.0;

const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,relative_humidity_2m_mean,\
relative_humidity_2m_max,relative_humidity_2m_min,wind_speed_10m_mean,precipitation_sum,\
shortwave_radiation_sum,sunshine_duration,et0_fao_evapotranspiration";

/// One day of provider weather, ready to be merged with manual entries.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyWeather {
    pub date: NaiveDate,
    pub weather: PartialObservation,
    /// Provider's own FAO-56 ETo, mm/day
    pub reference_eto: Option<f64>,
    pub elevation_m: Option<f64>,
}

pub struct OpenMeteoClient {
    client: reqwest::Client,
    config: WeatherConfig,
}

// Open-Meteo API response structures
#[derive(Debug, Deserialize)]
struct OmResponse {
    #[serde(default)]
    elevation: Option<f64>,
    daily: OmDaily,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OmDaily {
    time: Vec<String>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    relative_humidity_2m_mean: Vec<Option<f64>>,
    relative_humidity_2m_max: Vec<Option<f64>>,
    relative_humidity_2m_min: Vec<Option<f64>>,
    wind_speed_10m_mean: Vec<Option<f64>>,
    precipitation_sum: Vec<Option<f64>>,
    shortwave_radiation_sum: Vec<Option<f64>>,
    /// seconds
    sunshine_duration: Vec<Option<f64>>,
    et0_fao_evapotranspiration: Vec<Option<f64>>,
}

fn value_at(series: &[Option<f64>], index: usize) -> Option<f64> {
    series.get(index).copied().flatten()
}

impl OpenMeteoClient {
    pub fn new(config: WeatherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn daily_url(&self, location: &Location, date: NaiveDate) -> String {
        format!(
            "{}/forecast?latitude={}&longitude={}&daily={}&wind_speed_unit=ms&timezone=auto&start_date={}&end_date={}",
            self.config.base_url.trim_end_matches('/'),
            location.latitude,
            location.longitude,
            DAILY_FIELDS,
            date.format("%Y-%m-%d"),
            date.format("%Y-%m-%d"),
        )
    }

    /// Fetch daily aggregates for one date at the farm location.
    pub async fn fetch_daily(&self, location: &Location, date: NaiveDate) -> Result<DailyWeather> {
        let url = self.daily_url(location, date);
        tracing::debug!(%url, "Fetching Open-Meteo daily weather");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| VineSightError::DataSourceUnavailable(format!("Open-Meteo: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VineSightError::DataSourceUnavailable(format!(
                "Open-Meteo returned {}: {}",
                status, body
            )));
        }

        let body = response.text().await.map_err(|e| {
            VineSightError::DataSourceUnavailable(format!("Open-Meteo: {}", e))
        })?;

        parse_daily(&body, date)
    }

    /// Test connection to the Open-Meteo API
    pub async fn test_connection(&self, location: &Location) -> Result<bool> {
        let url = format!(
            "{}/forecast?latitude={}&longitude={}&current=temperature_2m",
            self.config.base_url.trim_end_matches('/'),
            location.latitude,
            location.longitude
        );

        let response =
            self.client.get(&url).send().await.map_err(|e| {
                VineSightError::DataSourceUnavailable(format!("Open-Meteo: {}", e))
            })?;

        Ok(response.status().is_success())
    }
}

/// Pick `date` out of a daily response body.
pub fn parse_daily(body: &str, date: NaiveDate) -> Result<DailyWeather> {
    let response: OmResponse = serde_json::from_str(body).map_err(|e| {
        VineSightError::DataSourceUnavailable(format!(
            "Failed to parse Open-Meteo response: {}",
            e
        ))
    })?;

    let wanted = date.format("%Y-%m-%d").to_string();
    let daily = &response.daily;
    let index = daily
        .time
        .iter()
        .position(|t| *t == wanted)
        .ok_or_else(|| {
            VineSightError::DataSourceUnavailable(format!("Open-Meteo has no data for {}", wanted))
        })?;

    let weather = PartialObservation {
        temperature_max: value_at(&daily.temperature_2m_max, index),
        temperature_min: value_at(&daily.temperature_2m_min, index),
        relative_humidity: value_at(&daily.relative_humidity_2m_mean, index),
        humidity_max: value_at(&daily.relative_humidity_2m_max, index),
        humidity_min: value_at(&daily.relative_humidity_2m_min, index),
        wind_speed: value_at(&daily.wind_speed_10m_mean, index)
            .map(|w| wind_speed_at_2m(w, PROVIDER_WIND_HEIGHT_M)),
        rainfall: value_at(&daily.precipitation_sum, index),
        solar_radiation: value_at(&daily.shortwave_radiation_sum, index),
        solar_radiation_lux: None,
        sunshine_hours: value_at(&daily.sunshine_duration, index).map(|s| s / 3600.0),
    };

    Ok(DailyWeather {
        date,
        weather,
        reference_eto: value_at(&daily.et0_fao_evapotranspiration, index),
        elevation_m: response.elevation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "latitude": 20.0,
        "longitude": 73.75,
        "elevation": 572.0,
        "daily": {
            "time": ["2024-07-13", "2024-07-14"],
            "temperature_2m_max": [30.1, 31.4],
            "temperature_2m_min": [22.0, 21.6],
            "relative_humidity_2m_mean": [78, 74],
            "relative_humidity_2m_max": [95, 92],
            "relative_humidity_2m_min": [58, 55],
            "wind_speed_10m_mean": [4.1, 3.2],
            "precipitation_sum": [12.4, 0.0],
            "shortwave_radiation_sum": [14.2, null],
            "sunshine_duration": [10800.0, 28800.0],
            "et0_fao_evapotranspiration": [3.1, 4.6]
        }
    }"#;

    fn sample_config() -> WeatherConfig {
        WeatherConfig {
            enabled: true,
            base_url: "https://api.open-meteo.com/v1/".to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn parses_requested_day() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 14).unwrap();
        let daily = parse_daily(SAMPLE, date).unwrap();

        assert_eq!(daily.weather.temperature_max, Some(31.4));
        assert_eq!(daily.weather.relative_humidity, Some(74.0));
        assert_eq!(daily.weather.rainfall, Some(0.0));
        assert_eq!(daily.weather.solar_radiation, None);
        assert_eq!(daily.weather.sunshine_hours, Some(8.0));
        assert_eq!(daily.reference_eto, Some(4.6));
        assert_eq!(daily.elevation_m, Some(572.0));

        let wind = daily.weather.wind_speed.unwrap();
        assert!((wind - 2.39).abs() < 0.01, "wind = {}", wind);
    }

    #[test]
    fn missing_day_is_unavailable() {
        let date = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
        assert!(matches!(
            parse_daily(SAMPLE, date),
            Err(VineSightError::DataSourceUnavailable(_))
        ));
    }

    #[test]
    fn malformed_body_is_unavailable() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 14).unwrap();
        assert!(parse_daily("<html>rate limited</html>", date).is_err());
    }

    #[test]
    fn fetched_day_becomes_observation() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 14).unwrap();
        let daily = parse_daily(SAMPLE, date).unwrap();
        let obs = daily.weather.into_observation(date).unwrap();
        assert_eq!(obs.humidity_max, Some(92.0));
        assert!(obs.has_radiation_input());
    }

    #[test]
    fn url_includes_location_and_date() {
        let client = OpenMeteoClient::new(sample_config()).unwrap();
        let url = client.daily_url(
            &Location::new(19.99, 73.79),
            NaiveDate::from_ymd_opt(2024, 7, 14).unwrap(),
        );
        assert!(url.starts_with("https://api.open-meteo.com/v1/forecast?"));
        assert!(url.contains("latitude=19.99"));
        assert!(url.contains("start_date=2024-07-14&end_date=2024-07-14"));
        assert!(url.contains("et0_fao_evapotranspiration"));
    }
}
