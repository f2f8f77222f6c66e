use super::{AdviceContext, Rule};

/// Explains how the day's rainfall relates to crop demand.
///
/// - Rain covered demand: hold irrigation
/// - Rain left only a negligible remainder: hold irrigation, say so
/// - Rain covered part of demand: say how much
/// - No rain and no demand: say so, so an empty schedule is not mistaken for
///   missing data
pub struct RainfallCoverageRule;

impl Rule for RainfallCoverageRule {
    fn id(&self) -> &'static str {
        "rainfall_coverage"
    }

    fn name(&self) -> &'static str {
        "Rainfall Coverage"
    }

    fn evaluate(&self, ctx: &AdviceContext) -> Option<String> {
        match (ctx.should_irrigate, ctx.rainfall > 0.0) {
            (false, true) if ctx.irrigation_need <= 0.0 => Some(format!(
                "No irrigation needed - rainfall ({:.1} mm) exceeded crop demand ({:.1} mm)",
                ctx.rainfall, ctx.etc
            )),
            (false, true) => Some(format!(
                "No irrigation needed - rainfall ({:.1} mm) left negligible remaining demand ({:.2} mm)",
                ctx.rainfall, ctx.irrigation_need
            )),
            (true, true) => Some(format!(
                "Rainfall of {:.1} mm offset part of today's crop demand ({:.1} mm)",
                ctx.rainfall, ctx.etc
            )),
            (false, false) => Some("Crop water demand is negligible today".to_string()),
            (true, false) => None,
        }
    }
}
