//! Calendar heuristic: the growth stage a vineyard is *usually* in for a
//! month (northern-hemisphere, single-pruning cycle). The advice pipeline
//! never calls this; it is only a default the CLI offers when no stage is
//! given, and it is always reported as a guess.

use crate::models::GrowthStage;
use chrono::{Datelike, NaiveDate};

pub fn typical_stage_for_month(month: u32) -> Option<GrowthStage> {
    let stage = match month {
        12 | 1 | 2 => GrowthStage::Dormant,
        3 => GrowthStage::BudBreak,
        4 | 5 => GrowthStage::Flowering,
        6 => GrowthStage::FruitSet,
        7 | 8 => GrowthStage::Veraison,
        9 => GrowthStage::Harvest,
        10 | 11 => GrowthStage::PostHarvest,
        _ => return None,
    };
    Some(stage)
}

/// Southern-hemisphere sites are shifted by six months.
pub fn typical_stage_for_date(date: NaiveDate, latitude: f64) -> GrowthStage {
    let month = if latitude < 0.0 {
        (date.month() + 5) % 12 + 1
    } else {
        date.month()
    };
    typical_stage_for_month(month).unwrap_or(GrowthStage::Dormant)
}
