use super::{AdviceContext, Rule};
use crate::models::GrowthStage;

/// Stage-specific water management guidance for grapevines.
pub struct GrowthStageRule;

impl Rule for GrowthStageRule {
    fn id(&self) -> &'static str {
        "growth_stage"
    }

    fn name(&self) -> &'static str {
        "Growth Stage Guidance"
    }

    fn evaluate(&self, ctx: &AdviceContext) -> Option<String> {
        let note = match ctx.stage {
            GrowthStage::Dormant => {
                "Vines are dormant - irrigate only to refill the root zone before bud break"
            }
            GrowthStage::BudBreak => {
                "Keep soil evenly moist through bud break for uniform shoot growth"
            }
            GrowthStage::Flowering => "Avoid water stress during flowering; it reduces fruit set",
            GrowthStage::FruitSet => {
                "Berry cell division is underway - maintain full irrigation"
            }
            GrowthStage::Veraison => {
                "Mild deficit irrigation after veraison improves berry colour and sugar"
            }
            GrowthStage::Harvest => {
                "Reduce irrigation ahead of harvest to concentrate sugars and limit berry splitting"
            }
            GrowthStage::PostHarvest => {
                "Post-harvest irrigation rebuilds vine reserves; avoid waterlogging"
            }
        };
        Some(note.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::rules::sample_context;

    #[test]
    fn every_stage_has_guidance() {
        for stage in GrowthStage::ALL {
            let ctx = AdviceContext {
                stage,
                ..sample_context()
            };
            assert!(GrowthStageRule.evaluate(&ctx).is_some(), "{:?}", stage);
        }
    }

    #[test]
    fn veraison_mentions_deficit() {
        let ctx = AdviceContext {
            stage: GrowthStage::Veraison,
            ..sample_context()
        };
        assert!(GrowthStageRule.evaluate(&ctx).unwrap().contains("deficit"));
    }
}
