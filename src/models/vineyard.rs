use crate::error::{Result, VineSightError};
use serde::{Deserialize, Serialize};

/// Grapevine phenological stage. Supplied by the caller; the calculator never
/// derives it from the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthStage {
    Dormant,
    BudBreak,
    Flowering,
    FruitSet,
    Veraison,
    Harvest,
    PostHarvest,
}

impl GrowthStage {
    pub const ALL: [GrowthStage; 7] = [
        GrowthStage::Dormant,
        GrowthStage::BudBreak,
        GrowthStage::Flowering,
        GrowthStage::FruitSet,
        GrowthStage::Veraison,
        GrowthStage::Harvest,
        GrowthStage::PostHarvest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GrowthStage::Dormant => "Dormant",
            GrowthStage::BudBreak => "Bud Break",
            GrowthStage::Flowering => "Flowering",
            GrowthStage::FruitSet => "Fruit Set",
            GrowthStage::Veraison => "Veraison",
            GrowthStage::Harvest => "Harvest",
            GrowthStage::PostHarvest => "Post Harvest",
        }
    }

    /// Stable identifier used in config files, the CLI and the log store.
    pub fn key(&self) -> &'static str {
        match self {
            GrowthStage::Dormant => "dormant",
            GrowthStage::BudBreak => "bud_break",
            GrowthStage::Flowering => "flowering",
            GrowthStage::FruitSet => "fruit_set",
            GrowthStage::Veraison => "veraison",
            GrowthStage::Harvest => "harvest",
            GrowthStage::PostHarvest => "post_harvest",
        }
    }

    /// Typical seasonal period, for display only.
    pub fn period(&self) -> &'static str {
        match self {
            GrowthStage::Dormant => "December - February",
            GrowthStage::BudBreak => "March - April",
            GrowthStage::Flowering => "April - May",
            GrowthStage::FruitSet => "May - June",
            GrowthStage::Veraison => "July - August",
            GrowthStage::Harvest => "August - October",
            GrowthStage::PostHarvest => "October - November",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "dormant" | "dormancy" => Some(GrowthStage::Dormant),
            "budbreak" | "bud_break" | "bud break" | "bud-break" => Some(GrowthStage::BudBreak),
            "flowering" | "bloom" => Some(GrowthStage::Flowering),
            "fruitset" | "fruit_set" | "fruit set" | "fruit-set" => Some(GrowthStage::FruitSet),
            "veraison" => Some(GrowthStage::Veraison),
            "harvest" => Some(GrowthStage::Harvest),
            "postharvest" | "post_harvest" | "post harvest" | "post-harvest" => {
                Some(GrowthStage::PostHarvest)
            }
            _ => None,
        }
    }

    /// Like [`GrowthStage::from_str`] but rejects unknown names.
    pub fn parse(s: &str) -> Result<Self> {
        Self::from_str(s).ok_or_else(|| VineSightError::configuration("growth stage", s))
    }
}

impl std::fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IrrigationMethod {
    #[default]
    Drip,
    Sprinkler,
    Surface,
}

impl IrrigationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            IrrigationMethod::Drip => "Drip",
            IrrigationMethod::Sprinkler => "Sprinkler",
            IrrigationMethod::Surface => "Surface",
        }
    }

    /// Default application rate in mm/h (equivalently L/h per m²), used when
    /// the farm has no measured system discharge.
    pub fn application_rate_mm_per_h(&self) -> f64 {
        match self {
            IrrigationMethod::Drip => 1.5,
            IrrigationMethod::Sprinkler => 8.0,
            IrrigationMethod::Surface => 20.0,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "drip" | "trickle" => Some(IrrigationMethod::Drip),
            "sprinkler" | "overhead" => Some(IrrigationMethod::Sprinkler),
            "surface" | "flood" | "furrow" => Some(IrrigationMethod::Surface),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        Self::from_str(s).ok_or_else(|| VineSightError::configuration("irrigation method", s))
    }
}

impl std::fmt::Display for IrrigationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoilType {
    Sandy,
    #[default]
    Loamy,
    Clay,
}

impl SoilType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoilType::Sandy => "Sandy",
            SoilType::Loamy => "Loamy",
            SoilType::Clay => "Clay",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sandy" | "sand" => Some(SoilType::Sandy),
            "loamy" | "loam" => Some(SoilType::Loamy),
            "clay" | "clayey" => Some(SoilType::Clay),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        Self::from_str(s).ok_or_else(|| VineSightError::configuration("soil type", s))
    }
}

impl std::fmt::Display for SoilType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Measured irrigation system: field area and total discharge.
/// Duration (h) = depth (mm) × area (m²) / discharge (L/h).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrrigationSystem {
    pub area_m2: f64,
    pub discharge_l_per_h: f64,
}

impl IrrigationSystem {
    pub fn new(area_m2: f64, discharge_l_per_h: f64) -> Result<Self> {
        if !(area_m2.is_finite() && area_m2 > 0.0) {
            return Err(VineSightError::configuration(
                "field area",
                format!("{} m²", area_m2),
            ));
        }
        if !(discharge_l_per_h.is_finite() && discharge_l_per_h > 0.0) {
            return Err(VineSightError::configuration(
                "discharge rate",
                format!("{} L/h", discharge_l_per_h),
            ));
        }
        Ok(Self {
            area_m2,
            discharge_l_per_h,
        })
    }

    /// Litres needed to apply `depth_mm` over the whole field.
    pub fn volume_litres(&self, depth_mm: f64) -> f64 {
        depth_mm * self.area_m2
    }
}

/// Farm settings that shape duration and frequency advice but never the
/// ETo/ETc numbers themselves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FarmProfile {
    pub irrigation_method: Option<IrrigationMethod>,
    pub soil_type: Option<SoilType>,
    pub system: Option<IrrigationSystem>,
}
