use super::advice::{Confidence, EtcResult};
use super::vineyard::GrowthStage;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One day of irrigation advice kept in the local log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrrigationLog {
    pub id: Option<i64>,
    pub farm_name: String,
    pub log_date: NaiveDate,
    pub growth_stage: GrowthStage,
    pub eto: f64,
    pub kc: f64,
    pub etc: f64,
    pub rainfall: f64,
    pub irrigation_need: f64,
    pub duration_hours: f64,
    pub confidence: Confidence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_eto: Option<f64>,
    pub notes: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl IrrigationLog {
    pub fn from_result(
        farm_name: impl Into<String>,
        log_date: NaiveDate,
        result: &EtcResult,
        reference_eto: Option<f64>,
    ) -> Self {
        Self {
            id: None,
            farm_name: farm_name.into(),
            log_date,
            growth_stage: result.growth_stage,
            eto: result.eto,
            kc: result.kc,
            etc: result.etc,
            rainfall: result.effective_rainfall,
            irrigation_need: result.irrigation_need,
            duration_hours: result.irrigation_recommendation.duration_hours,
            confidence: result.confidence,
            reference_eto,
            notes: result.irrigation_recommendation.notes.clone(),
            created_at: Utc::now(),
        }
    }

    pub fn should_irrigate(&self) -> bool {
        self.duration_hours > 0.0
    }
}
