//! FAO-56 astronomical and psychrometric helpers shared by the ETo engine
//! and the weather provider.

use std::f64::consts::PI;

/// Solar constant, MJ/m²/min
pub const SOLAR_CONSTANT: f64 = 0.0820;

/// Stefan-Boltzmann constant, MJ/K⁴/m²/day
pub const STEFAN_BOLTZMANN: f64 = 4.903e-9;

/// Illuminance to irradiance for daylight, W/m² per lux
pub const LUX_TO_WATTS: f64 = 0.0079;

/// Mean W/m² over a day to MJ/m²/day
pub const WATTS_TO_MJ_PER_DAY: f64 = 0.0864;

/// Saturation vapour pressure at temperature `t_c` (°C), kPa
pub fn saturation_vapour_pressure(t_c: f64) -> f64 {
    0.6108 * ((17.27 * t_c) / (t_c + 237.3)).exp()
}

/// Slope of the saturation vapour pressure curve at `t_c` (°C), kPa/°C
pub fn vapour_pressure_slope(t_c: f64) -> f64 {
    4098.0 * saturation_vapour_pressure(t_c) / (t_c + 237.3).powi(2)
}

/// Atmospheric pressure from elevation (m), kPa
pub fn atmospheric_pressure(elevation_m: f64) -> f64 {
    101.3 * ((293.0 - 0.0065 * elevation_m) / 293.0).powf(5.26)
}

/// Psychrometric constant, kPa/°C
pub fn psychrometric_constant(elevation_m: f64) -> f64 {
    0.000665 * atmospheric_pressure(elevation_m)
}

/// Day-of-year dependent solar geometry for a latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarGeometry {
    /// Extraterrestrial radiation, MJ/m²/day
    pub extraterrestrial_radiation: f64,
    /// Maximum possible sunshine duration, hours
    pub daylight_hours: f64,
}

pub fn solar_geometry(latitude_deg: f64, day_of_year: u32) -> SolarGeometry {
    let phi = latitude_deg.clamp(-90.0, 90.0).to_radians();
    let j = day_of_year as f64;

    let inverse_distance = 1.0 + 0.033 * (2.0 * PI / 365.0 * j).cos();
    let declination = 0.409 * (2.0 * PI / 365.0 * j - 1.39).sin();
    // Clamped so polar day/night stay defined
    let sunset_angle = (-phi.tan() * declination.tan()).clamp(-1.0, 1.0).acos();

    let ra = 24.0 * 60.0 / PI
        * SOLAR_CONSTANT
        * inverse_distance
        * (sunset_angle * phi.sin() * declination.sin()
            + phi.cos() * declination.cos() * sunset_angle.sin());

    SolarGeometry {
        extraterrestrial_radiation: ra.max(0.0),
        daylight_hours: 24.0 / PI * sunset_angle,
    }
}

/// Clear-sky solar radiation, MJ/m²/day
pub fn clear_sky_radiation(extraterrestrial: f64, elevation_m: f64) -> f64 {
    (0.75 + 2e-5 * elevation_m) * extraterrestrial
}

/// Angstrom relation with the FAO default coefficients (as = 0.25, bs = 0.50)
/// Net shortwave fraction for the grass reference surface (albedo 0.23)
pub const REFERENCE_SHORTWAVE_FRACTION: f64 = 0.77;

/// Net outgoing longwave radiation, MJ/m²/day.
///
/// FAO-56 eq. 39 with two changes: emission is taken at the daily minimum
/// temperature, and the emission term is capped at `0.77 / 1.35 · Rso`.
/// With the cap, `0.77·Rs - Rnl` is never negative and never decreases as
/// `Rs` rises; without a `t_max` term it cannot fall as the afternoon warms.
pub fn net_longwave_radiation(
    t_min: f64,
    actual_vapour_pressure: f64,
    solar: f64,
    clear_sky: f64,
) -> f64 {
    if clear_sky <= 0.0 {
        return 0.0;
    }
    let relative = (solar / clear_sky).min(1.0);
    let cloudiness = (1.35 * relative - 0.35).max(0.0);
    let emissivity = (0.34 - 0.14 * actual_vapour_pressure.max(0.0).sqrt()).max(0.0);
    let emission = STEFAN_BOLTZMANN * (t_min + 273.16).powi(4) * emissivity;
    let cap = REFERENCE_SHORTWAVE_FRACTION / 1.35 * clear_sky;
    emission.min(cap) * cloudiness
}

pub fn angstrom_radiation(sunshine_hours: f64, daylight_hours: f64, extraterrestrial: f64) -> f64 {
    if daylight_hours <= 0.0 {
        return 0.25 * extraterrestrial;
    }
    let ratio = (sunshine_hours / daylight_hours).clamp(0.0, 1.0);
    (0.25 + 0.50 * ratio) * extraterrestrial
}

/// Hargreaves radiation estimate from the daily temperature range
pub fn hargreaves_radiation(t_max: f64, t_min: f64, extraterrestrial: f64, coastal: bool) -> f64 {
    let k_rs = if coastal { 0.19 } else { 0.16 };
    k_rs * (t_max - t_min).max(0.0).sqrt() * extraterrestrial
}

/// Mean daily illuminance (lux) to MJ/m²/day
pub fn lux_to_mj_per_day(lux: f64) -> f64 {
    lux * LUX_TO_WATTS * WATTS_TO_MJ_PER_DAY
}

/// Convert wind measured at `height_m` to the 2 m reference height
pub fn wind_speed_at_2m(speed: f64, height_m: f64) -> f64 {
    if (height_m - 2.0).abs() < f64::EPSILON {
        return speed;
    }
    speed * 4.87 / (67.8 * height_m - 5.42).ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturation_vapour_pressure_table_values() {
        // FAO-56 Annex 2, Table 2.3
        assert!((saturation_vapour_pressure(1.0) - 0.657).abs() < 0.001);
        assert!((saturation_vapour_pressure(20.0) - 2.338).abs() < 0.001);
        assert!((saturation_vapour_pressure(35.0) - 5.623).abs() < 0.001);
    }

    #[test]
    fn slope_table_value() {
        assert!((vapour_pressure_slope(20.0) - 0.145).abs() < 0.001);
    }

    #[test]
    fn pressure_at_altitude() {
        // FAO-56 example 2: 1800 m
        assert!((atmospheric_pressure(1800.0) - 81.8).abs() < 0.1);
        assert!((psychrometric_constant(1800.0) - 0.054).abs() < 0.001);
    }

    #[test]
    fn extraterrestrial_radiation_example() {
        // FAO-56 example 8: 20°S on 3 September
        let geo = solar_geometry(-20.0, 246);
        assert!((geo.extraterrestrial_radiation - 32.2).abs() < 0.1);
        // FAO-56 example 9: same place and day
        assert!((geo.daylight_hours - 11.7).abs() < 0.1);
    }

    #[test]
    fn polar_night_has_no_radiation() {
        let geo = solar_geometry(80.0, 355);
        assert_eq!(geo.extraterrestrial_radiation, 0.0);
        assert_eq!(geo.daylight_hours, 0.0);
    }

    #[test]
    fn angstrom_caps_sunshine_ratio() {
        let full = angstrom_radiation(12.0, 12.0, 30.0);
        let over = angstrom_radiation(15.0, 12.0, 30.0);
        assert!((full - 22.5).abs() < 1e-9);
        assert_eq!(full, over);
    }

    #[test]
    fn hargreaves_coastal_is_higher() {
        let interior = hargreaves_radiation(30.0, 14.0, 35.0, false);
        let coastal = hargreaves_radiation(30.0, 14.0, 35.0, true);
        assert!((interior - 0.16 * 4.0 * 35.0).abs() < 1e-9);
        assert!(coastal > interior);
        assert_eq!(hargreaves_radiation(10.0, 12.0, 35.0, false), 0.0);
    }

    #[test]
    fn longwave_matches_fao_on_clear_days() {
        // Uncapped case reduces to eq. 39 with T = t_min
        let rnl = net_longwave_radiation(20.0, 2.0, 20.0, 25.0);
        let expected = STEFAN_BOLTZMANN
            * 293.16_f64.powi(4)
            * (0.34 - 0.14 * 2.0_f64.sqrt())
            * (1.35 * 0.8 - 0.35);
        assert!((rnl - expected).abs() < 1e-9);
    }

    #[test]
    fn longwave_never_exceeds_net_shortwave() {
        for clear_sky in [0.5, 2.0, 6.0, 20.0] {
            let mut previous_net = 0.0;
            for step in 0..=40 {
                let solar = clear_sky * step as f64 / 40.0 * 1.2;
                let net = REFERENCE_SHORTWAVE_FRACTION * solar
                    - net_longwave_radiation(30.0, 0.2, solar, clear_sky);
                assert!(net >= 0.0, "rso {} rs {} net {}", clear_sky, solar, net);
                assert!(net >= previous_net - 1e-12);
                previous_net = net;
            }
        }
        assert_eq!(net_longwave_radiation(10.0, 1.0, 3.0, 0.0), 0.0);
    }

    #[test]
    fn lux_conversion() {
        let mj = lux_to_mj_per_day(40_000.0);
        assert!((mj - 40_000.0 * 0.0079 * 0.0864).abs() < 1e-9);
    }

    #[test]
    fn wind_profile_conversion() {
        // FAO-56 example 14: 3.2 m/s at 10 m
        assert!((wind_speed_at_2m(3.2, 10.0) - 2.4).abs() < 0.01);
        assert_eq!(wind_speed_at_2m(2.0, 2.0), 2.0);
    }
}
