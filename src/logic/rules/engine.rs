use super::{
    data_quality::DataQualityRule, evapotranspiration::HighEvapotranspirationRule,
    rainfall::RainfallCoverageRule, soil::SoilTypeRule, sprinkler_wind::SprinklerWindRule,
    stage::GrowthStageRule, AdviceContext, Rule,
};
use crate::models::InputIssue;
use tracing::trace;

/// Runs the note rules in a fixed order so identical inputs always produce
/// identical notes.
pub struct NotesEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl NotesEngine {
    pub fn new() -> Self {
        let rules: Vec<Box<dyn Rule>> = vec![
            Box::new(RainfallCoverageRule),
            Box::new(HighEvapotranspirationRule),
            Box::new(GrowthStageRule),
            Box::new(SoilTypeRule),
            Box::new(SprinklerWindRule),
            Box::new(DataQualityRule),
        ];

        Self { rules }
    }

    /// Rule notes first, then one note per clamped input.
    pub fn evaluate(&self, ctx: &AdviceContext, issues: &[InputIssue]) -> Vec<String> {
        self.rules
            .iter()
            .filter_map(|rule| {
                let note = rule.evaluate(ctx)?;
                trace!(rule = rule.id(), name = rule.name(), %note, "Rule fired");
                Some(note)
            })
            .chain(issues.iter().map(InputIssue::message))
            .collect()
    }
}

impl Default for NotesEngine {
    fn default() -> Self {
        Self::new()
    }
}
