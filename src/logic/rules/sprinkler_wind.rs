use super::{AdviceContext, Rule};
use crate::models::IrrigationMethod;

/// Wind (m/s at 2 m) above which sprinkler coverage becomes uneven.
pub const SPRINKLER_WIND_LIMIT: f64 = 5.0;

pub struct SprinklerWindRule;

impl Rule for SprinklerWindRule {
    fn id(&self) -> &'static str {
        "sprinkler_wind"
    }

    fn name(&self) -> &'static str {
        "Sprinkler Wind Drift"
    }

    fn evaluate(&self, ctx: &AdviceContext) -> Option<String> {
        if ctx.method != IrrigationMethod::Sprinkler
            || !ctx.should_irrigate
            || ctx.wind_speed <= SPRINKLER_WIND_LIMIT
        {
            return None;
        }
        Some(format!(
            "Wind of {:.1} m/s reduces sprinkler uniformity - irrigate during calm hours",
            ctx.wind_speed
        ))
    }
}
