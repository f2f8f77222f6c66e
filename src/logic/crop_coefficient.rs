use crate::error::Result;
use crate::models::GrowthStage;

/// Agronomic bounds every table entry must respect.
pub const KC_MIN: f64 = 0.1;
pub const KC_MAX: f64 = 1.2;

/// Every stage with its coefficient, in seasonal order.
pub fn kc_table() -> impl Iterator<Item = (GrowthStage, f64)> {
    GrowthStage::ALL
        .into_iter()
        .map(|stage| (stage, crop_coefficient(stage)))
}

/// Grapevine Kc for a growth stage (drip-irrigated, clean cultivated rows).
/// Irrigation method and soil type never change it.
pub fn crop_coefficient(stage: GrowthStage) -> f64 {
    match stage {
        GrowthStage::Dormant => 0.15,
        GrowthStage::BudBreak => 0.30,
        GrowthStage::Flowering => 0.70,
        GrowthStage::FruitSet => 0.85,
        GrowthStage::Veraison => 0.80,
        GrowthStage::Harvest => 0.65,
        GrowthStage::PostHarvest => 0.45,
    }
}

/// Resolve a stage name straight to Kc; unknown names are a configuration
/// error rather than a guessed coefficient.
pub fn resolve_crop_coefficient(stage_name: &str) -> Result<(GrowthStage, f64)> {
    let stage = GrowthStage::parse(stage_name)?;
    Ok((stage, crop_coefficient(stage)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VineSightError;

    #[test]
    fn table_covers_every_stage_in_order() {
        let stages: Vec<_> = kc_table().map(|(s, _)| s).collect();
        assert_eq!(stages, GrowthStage::ALL.to_vec());
    }

    #[test]
    fn coefficients_within_agronomic_bounds() {
        for (stage, kc) in kc_table() {
            assert!(kc > 0.0, "{:?}", stage);
            assert!((KC_MIN..=KC_MAX).contains(&kc), "{:?} kc {}", stage, kc);
        }
    }

    #[test]
    fn peak_demand_around_fruit_set() {
        let peak = kc_table()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(s, _)| s);
        assert_eq!(peak, Some(GrowthStage::FruitSet));
        assert!(crop_coefficient(GrowthStage::Dormant) < crop_coefficient(GrowthStage::BudBreak));
    }

    #[test]
    fn resolve_by_name() {
        let (stage, kc) = resolve_crop_coefficient("fruit_set").unwrap();
        assert_eq!(stage, GrowthStage::FruitSet);
        assert_eq!(kc, 0.85);

        let (stage, _) = resolve_crop_coefficient("budbreak").unwrap();
        assert_eq!(stage, GrowthStage::BudBreak);
    }

    #[test]
    fn unknown_stage_is_configuration_error() {
        let err = resolve_crop_coefficient("pruning").unwrap_err();
        assert!(matches!(err, VineSightError::Configuration { .. }));
    }
}
