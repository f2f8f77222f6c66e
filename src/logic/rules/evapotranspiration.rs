use super::{AdviceContext, Rule};

/// Reference ET above this (mm/day) marks a high-demand day.
pub const HIGH_ETO_THRESHOLD_MM: f64 = 6.0;

/// High evapotranspiration warning
///
/// Conditions:
/// - ETo above 6 mm/day
pub struct HighEvapotranspirationRule;

impl Rule for HighEvapotranspirationRule {
    fn id(&self) -> &'static str {
        "high_evapotranspiration"
    }

    fn name(&self) -> &'static str {
        "High Evapotranspiration"
    }

    fn evaluate(&self, ctx: &AdviceContext) -> Option<String> {
        if ctx.eto <= HIGH_ETO_THRESHOLD_MM {
            return None;
        }
        Some(format!(
            "High evapotranspiration day ({:.1} mm) - monitor soil moisture closely",
            ctx.eto
        ))
    }
}
