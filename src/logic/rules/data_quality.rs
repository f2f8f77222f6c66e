use super::{AdviceContext, Rule};
use crate::models::RadiationSource;

/// Flags advice built on estimated rather than measured radiation.
pub struct DataQualityRule;

impl Rule for DataQualityRule {
    fn id(&self) -> &'static str {
        "data_quality"
    }

    fn name(&self) -> &'static str {
        "Radiation Data Quality"
    }

    fn evaluate(&self, ctx: &AdviceContext) -> Option<String> {
        match ctx.radiation_source {
            RadiationSource::Measured | RadiationSource::Lux => None,
            RadiationSource::Sunshine => {
                Some("Solar radiation derived from sunshine hours".to_string())
            }
            RadiationSource::TemperatureEstimate => Some(
                "Solar radiation estimated from temperature range - treat advice as approximate"
                    .to_string(),
            ),
        }
    }
}
