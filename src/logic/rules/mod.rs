pub mod data_quality;
pub mod engine;
pub mod evapotranspiration;
pub mod rainfall;
pub mod soil;
pub mod sprinkler_wind;
pub mod stage;

pub use engine::NotesEngine;

use crate::models::{GrowthStage, IrrigationMethod, RadiationSource, SoilType};

/// Everything a note rule may look at. Built once per advice request.
#[derive(Debug, Clone, Copy)]
pub struct AdviceContext {
    pub stage: GrowthStage,
    pub eto: f64,
    pub etc: f64,
    pub rainfall: f64,
    pub irrigation_need: f64,
    pub should_irrigate: bool,
    pub method: IrrigationMethod,
    pub soil: Option<SoilType>,
    pub wind_speed: f64,
    pub radiation_source: RadiationSource,
}

/// Trait for advisory note rules
pub trait Rule: Send + Sync {
    /// Unique identifier for this rule
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Evaluate the rule and return a note if conditions are met
    fn evaluate(&self, ctx: &AdviceContext) -> Option<String>;
}

#[cfg(test)]
pub(crate) fn sample_context() -> AdviceContext {
    AdviceContext {
        stage: GrowthStage::FruitSet,
        eto: 5.0,
        etc: 4.25,
        rainfall: 0.0,
        irrigation_need: 4.25,
        should_irrigate: true,
        method: IrrigationMethod::Drip,
        soil: None,
        wind_speed: 2.0,
        radiation_source: RadiationSource::Measured,
    }
}
