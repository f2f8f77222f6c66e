use crate::models::{GrowthStage, InputIssue, IrrigationMethod, IrrigationSystem, SoilType};

/// Below this net depth (mm) a run is not worth starting.
pub const IRRIGATION_EPSILON_MM: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterBalance {
    /// ETo × Kc, mm/day
    pub etc: f64,
    /// The day's rainfall, taken in full
    pub effective_rainfall: f64,
    /// max(0, ETc - effective rainfall), mm
    pub irrigation_need: f64,
}

impl WaterBalance {
    pub fn should_irrigate(&self) -> bool {
        self.irrigation_need > IRRIGATION_EPSILON_MM
    }
}

/// Daily balance. Negative rainfall is treated as none and reported.
pub fn water_balance(eto: f64, kc: f64, rainfall: f64) -> (WaterBalance, Option<InputIssue>) {
    let (effective_rainfall, issue) = if rainfall < 0.0 {
        (0.0, Some(InputIssue::NegativeRainfall { value: rainfall }))
    } else {
        (rainfall, None)
    };

    let etc = eto.max(0.0) * kc;
    let balance = WaterBalance {
        etc,
        effective_rainfall,
        irrigation_need: (etc - effective_rainfall).max(0.0),
    };
    (balance, issue)
}

/// Hours needed to apply `depth_mm`.
///
/// With a measured system: depth (mm) × area (m²) / discharge (L/h), since
/// 1 mm over 1 m² is 1 L. Without one the method's default application rate
/// (mm/h) is used.
pub fn run_duration_hours(
    depth_mm: f64,
    method: IrrigationMethod,
    system: Option<&IrrigationSystem>,
) -> f64 {
    if depth_mm <= 0.0 {
        return 0.0;
    }
    match system {
        Some(s) => s.volume_litres(depth_mm) / s.discharge_l_per_h,
        None => depth_mm / method.application_rate_mm_per_h(),
    }
}

/// Days between runs at each stage on loamy soil.
pub fn base_interval_days(stage: GrowthStage) -> u32 {
    match stage {
        GrowthStage::Dormant => 14,
        GrowthStage::BudBreak => 7,
        GrowthStage::Flowering => 4,
        GrowthStage::FruitSet => 3,
        GrowthStage::Veraison => 4,
        GrowthStage::Harvest => 7,
        GrowthStage::PostHarvest => 10,
    }
}

fn soil_interval_factor(soil: Option<SoilType>) -> f64 {
    match soil {
        Some(SoilType::Sandy) => 0.5,
        Some(SoilType::Clay) => 1.5,
        Some(SoilType::Loamy) | None => 1.0,
    }
}

pub fn interval_days(stage: GrowthStage, soil: Option<SoilType>) -> u32 {
    let days = (base_interval_days(stage) as f64 * soil_interval_factor(soil)).round() as u32;
    days.max(1)
}

pub fn irrigation_frequency(stage: GrowthStage, soil: Option<SoilType>) -> String {
    match interval_days(stage, soil) {
        1 => "Daily".to_string(),
        n => format!("Every {} days", n),
    }
}

/// Sandy soil drains fast, so the run is split in two.
pub fn cycles(should_irrigate: bool, soil: Option<SoilType>) -> u32 {
    match (should_irrigate, soil) {
        (false, _) => 0,
        (true, Some(SoilType::Sandy)) => 2,
        (true, _) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_rain_need_equals_etc() {
        let (balance, issue) = water_balance(6.3, 0.85, 0.0);
        assert!(issue.is_none());
        assert!((balance.etc - 6.3 * 0.85).abs() < 1e-12);
        assert_eq!(balance.irrigation_need, balance.etc);
        assert!(balance.should_irrigate());
    }

    #[test]
    fn heavy_rain_clamps_need_to_zero() {
        let (balance, _) = water_balance(6.3, 0.85, 50.0);
        assert_eq!(balance.irrigation_need, 0.0);
        assert!(!balance.should_irrigate());
    }

    #[test]
    fn need_never_increases_with_rain() {
        let mut previous = f64::MAX;
        for rain in 0..20 {
            let (balance, _) = water_balance(5.0, 0.8, rain as f64 * 0.5);
            assert!(balance.irrigation_need <= previous);
            assert!(balance.irrigation_need >= 0.0);
            previous = balance.irrigation_need;
        }
    }

    #[test]
    fn negative_rain_is_reported() {
        let (balance, issue) = water_balance(4.0, 0.5, -2.0);
        assert_eq!(balance.effective_rainfall, 0.0);
        assert_eq!(balance.irrigation_need, 2.0);
        assert_eq!(issue, Some(InputIssue::NegativeRainfall { value: -2.0 }));
    }

    #[test]
    fn tiny_need_does_not_trigger_irrigation() {
        let (balance, _) = water_balance(1.0, 0.15, 0.12);
        assert!(balance.irrigation_need > 0.0);
        assert!(!balance.should_irrigate());
    }

    #[test]
    fn duration_with_measured_system() {
        // 4 mm over one hectare at 20 000 L/h
        let system = IrrigationSystem::new(10_000.0, 20_000.0).unwrap();
        let hours = run_duration_hours(4.0, IrrigationMethod::Drip, Some(&system));
        assert!((hours - 2.0).abs() < 1e-12);
    }

    #[test]
    fn duration_scales_with_need_and_discharge() {
        let slow = IrrigationSystem::new(5_000.0, 5_000.0).unwrap();
        let fast = IrrigationSystem::new(5_000.0, 10_000.0).unwrap();
        let a = run_duration_hours(3.0, IrrigationMethod::Drip, Some(&slow));
        let b = run_duration_hours(6.0, IrrigationMethod::Drip, Some(&slow));
        let c = run_duration_hours(3.0, IrrigationMethod::Drip, Some(&fast));
        assert!((b - 2.0 * a).abs() < 1e-12);
        assert!((a - 2.0 * c).abs() < 1e-12);
    }

    #[test]
    fn duration_from_method_rate() {
        assert!((run_duration_hours(3.0, IrrigationMethod::Drip, None) - 2.0).abs() < 1e-12);
        assert!((run_duration_hours(4.0, IrrigationMethod::Sprinkler, None) - 0.5).abs() < 1e-12);
        assert_eq!(run_duration_hours(0.0, IrrigationMethod::Surface, None), 0.0);
    }

    #[test]
    fn frequency_denser_in_fruit_set_than_dormancy() {
        assert!(
            interval_days(GrowthStage::FruitSet, None) < interval_days(GrowthStage::Dormant, None)
        );
        assert_eq!(irrigation_frequency(GrowthStage::FruitSet, None), "Every 3 days");
        assert_eq!(irrigation_frequency(GrowthStage::Dormant, None), "Every 14 days");
    }

    #[test]
    fn soil_adjusts_frequency() {
        assert_eq!(
            irrigation_frequency(GrowthStage::FruitSet, Some(SoilType::Sandy)),
            "Every 2 days"
        );
        assert_eq!(
            irrigation_frequency(GrowthStage::FruitSet, Some(SoilType::Clay)),
            "Every 5 days"
        );
        assert_eq!(
            irrigation_frequency(GrowthStage::FruitSet, Some(SoilType::Loamy)),
            "Every 3 days"
        );
    }

    #[test]
    fn sandy_soil_splits_runs() {
        assert_eq!(cycles(true, Some(SoilType::Sandy)), 2);
        assert_eq!(cycles(true, Some(SoilType::Clay)), 1);
        assert_eq!(cycles(false, Some(SoilType::Sandy)), 0);
    }
}
