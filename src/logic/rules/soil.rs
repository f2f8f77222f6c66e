use super::{AdviceContext, Rule};
use crate::models::SoilType;

/// Sandy soils drain fast and need short, frequent runs; clay soils take
/// water slowly and need long, infrequent runs.
pub struct SoilTypeRule;

impl Rule for SoilTypeRule {
    fn id(&self) -> &'static str {
        "soil_type"
    }

    fn name(&self) -> &'static str {
        "Soil Type Scheduling"
    }

    fn evaluate(&self, ctx: &AdviceContext) -> Option<String> {
        match ctx.soil? {
            SoilType::Sandy => Some(
                "Sandy soil: split irrigation into shorter, more frequent cycles".to_string(),
            ),
            SoilType::Clay => Some(
                "Clay soil: apply longer, less frequent irrigation and watch for runoff"
                    .to_string(),
            ),
            SoilType::Loamy => None,
        }
    }
}
