use super::calculations::{
    angstrom_radiation, clear_sky_radiation, hargreaves_radiation, lux_to_mj_per_day,
    net_longwave_radiation, psychrometric_constant, saturation_vapour_pressure, solar_geometry,
    vapour_pressure_slope, REFERENCE_SHORTWAVE_FRACTION,
};
use crate::error::{Result, VineSightError};
use crate::models::{Confidence, InputIssue, Location, RadiationSource, WeatherObservation};
use chrono::Datelike;
use tracing::{debug, warn};

/// Humidity this far outside 0-100 % is treated as rounding noise.
const HUMIDITY_ROUNDING_SLACK: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceEtEstimate {
    /// mm/day
    pub eto: f64,
    pub radiation_source: RadiationSource,
    pub confidence: Confidence,
    /// Solar radiation used, MJ/m²/day
    pub solar_radiation: f64,
    pub net_radiation: f64,
    pub extraterrestrial_radiation: f64,
    pub daylight_hours: f64,
    pub issues: Vec<InputIssue>,
}

/// Observation after clamping, with the issues found along the way.
#[derive(Debug, Clone)]
struct CleanInputs {
    t_max: f64,
    t_min: f64,
    rh_mean: f64,
    rh_range: Option<(f64, f64)>,
    wind: f64,
    latitude: f64,
    issues: Vec<InputIssue>,
}

fn clean_inputs(obs: &WeatherObservation, location: &Location) -> CleanInputs {
    let mut issues = Vec::new();

    let (t_max, t_min) = if obs.temperature_max < obs.temperature_min {
        issues.push(InputIssue::TemperaturesSwapped {
            max: obs.temperature_max,
            min: obs.temperature_min,
        });
        (obs.temperature_min, obs.temperature_max)
    } else {
        (obs.temperature_max, obs.temperature_min)
    };

    let mut clamp_humidity = |value: f64| {
        if !(-HUMIDITY_ROUNDING_SLACK..=100.0 + HUMIDITY_ROUNDING_SLACK).contains(&value) {
            issues.push(InputIssue::HumidityOutOfRange { value });
        }
        value.clamp(0.0, 100.0)
    };
    // Only the humidity that feeds actual vapour pressure is checked
    let rh_range = match (obs.humidity_max, obs.humidity_min) {
        (Some(max), Some(min)) => {
            let (max, min) = (clamp_humidity(max), clamp_humidity(min));
            Some((max.max(min), max.min(min)))
        }
        _ => None,
    };
    let rh_mean = match rh_range {
        Some(_) => obs.relative_humidity.clamp(0.0, 100.0),
        None => clamp_humidity(obs.relative_humidity),
    };

    let wind = if obs.wind_speed < 0.0 {
        issues.push(InputIssue::NegativeWindSpeed {
            value: obs.wind_speed,
        });
        0.0
    } else {
        obs.wind_speed
    };

    let latitude = if !(-90.0..=90.0).contains(&location.latitude) {
        issues.push(InputIssue::LatitudeOutOfRange {
            value: location.latitude,
        });
        location.latitude.clamp(-90.0, 90.0)
    } else {
        location.latitude
    };

    CleanInputs {
        t_max,
        t_min,
        rh_mean,
        rh_range,
        wind,
        latitude,
        issues,
    }
}

/// Picks the best available radiation input, in order: measured MJ/m²/day,
/// illuminance, sunshine hours, then the Hargreaves temperature estimate.
fn resolve_solar_radiation(
    obs: &WeatherObservation,
    inputs: &mut CleanInputs,
    extraterrestrial: f64,
    daylight_hours: f64,
    coastal: bool,
) -> (f64, RadiationSource) {
    if let Some(rs) = obs.solar_radiation {
        if rs >= 0.0 {
            return (rs, RadiationSource::Measured);
        }
        inputs.issues.push(InputIssue::NegativeRadiation { value: rs });
    }

    if let Some(lux) = obs.solar_radiation_lux {
        if lux >= 0.0 {
            return (lux_to_mj_per_day(lux), RadiationSource::Lux);
        }
        inputs.issues.push(InputIssue::NegativeRadiation { value: lux });
    }

    if let Some(hours) = obs.sunshine_hours {
        if hours >= 0.0 {
            if hours > daylight_hours {
                inputs.issues.push(InputIssue::SunshineExceedsDaylength {
                    hours,
                    daylength: daylight_hours,
                });
            }
            let rs = angstrom_radiation(hours.min(daylight_hours), daylight_hours, extraterrestrial);
            return (rs, RadiationSource::Sunshine);
        }
        inputs.issues.push(InputIssue::NegativeRadiation { value: hours });
    }

    let rs = hargreaves_radiation(inputs.t_max, inputs.t_min, extraterrestrial, coastal);
    (rs, RadiationSource::TemperatureEstimate)
}

/// Tier implied by the radiation source, one lower if any significant input
/// had to be clamped.
pub fn confidence_for(source: RadiationSource, issues: &[InputIssue]) -> Confidence {
    let confidence = source.confidence();
    if issues.iter().any(InputIssue::is_significant) {
        confidence.downgrade()
    } else {
        confidence
    }
}

/// FAO-56 Penman-Monteith reference evapotranspiration for one day.
///
/// Out-of-range readings are clamped and recorded as [`InputIssue`]s, which
/// cost one confidence tier. Only non-finite numbers are rejected.
pub fn reference_et(obs: &WeatherObservation, location: &Location) -> Result<ReferenceEtEstimate> {
    obs.ensure_finite()?;
    if !location.latitude.is_finite() || !location.longitude.is_finite() {
        return Err(VineSightError::InvalidInput(format!(
            "location must be finite, got ({}, {})",
            location.latitude, location.longitude
        )));
    }

    let mut inputs = clean_inputs(obs, location);
    let elevation = location.elevation_or_default();
    let geometry = solar_geometry(inputs.latitude, obs.date.ordinal());

    let (rs, radiation_source) = resolve_solar_radiation(
        obs,
        &mut inputs,
        geometry.extraterrestrial_radiation,
        geometry.daylight_hours,
        location.coastal,
    );

    let t_mean = (inputs.t_max + inputs.t_min) / 2.0;
    let es_max = saturation_vapour_pressure(inputs.t_max);
    let es_min = saturation_vapour_pressure(inputs.t_min);
    let es = (es_max + es_min) / 2.0;
    let ea = match inputs.rh_range {
        Some((rh_max, rh_min)) => (es_min * rh_max + es_max * rh_min) / 200.0,
        None => es * inputs.rh_mean / 100.0,
    };

    let delta = vapour_pressure_slope(t_mean);
    let gamma = psychrometric_constant(elevation);

    let rso = clear_sky_radiation(geometry.extraterrestrial_radiation, elevation);
    let rns = REFERENCE_SHORTWAVE_FRACTION * rs;
    let rnl = net_longwave_radiation(inputs.t_min, ea, rs, rso);
    let rn = rns - rnl;

    // Soil heat flux is negligible at a daily step
    let numerator = 0.408 * delta * rn
        + gamma * (900.0 / (t_mean + 273.0)) * inputs.wind * (es - ea);
    let denominator = delta + gamma * (1.0 + 0.34 * inputs.wind);
    let eto = (numerator / denominator).max(0.0);

    for issue in &inputs.issues {
        warn!(issue = %issue.message(), "Clamped weather input");
    }
    let confidence = confidence_for(radiation_source, &inputs.issues);

    debug!(
        date = %obs.date,
        source = ?radiation_source,
        rs,
        rn,
        ra = geometry.extraterrestrial_radiation,
        eto,
        "Computed reference ET"
    );

    Ok(ReferenceEtEstimate {
        eto,
        radiation_source,
        confidence,
        solar_radiation: rs,
        net_radiation: rn,
        extraterrestrial_radiation: geometry.extraterrestrial_radiation,
        daylight_hours: geometry.daylight_hours,
        issues: inputs.issues,
    })
}
