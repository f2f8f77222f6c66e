use super::vineyard::{GrowthStage, IrrigationMethod};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }

    /// One tier lower, saturating at `Low`.
    pub fn downgrade(self) -> Self {
        match self {
            Confidence::High => Confidence::Medium,
            Confidence::Medium | Confidence::Low => Confidence::Low,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Confidence::Low),
            "medium" => Some(Confidence::Medium),
            "high" => Some(Confidence::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where the solar radiation term of the ETo estimate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadiationSource {
    Measured,
    Lux,
    Sunshine,
    TemperatureEstimate,
}

impl RadiationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RadiationSource::Measured => "Measured solar radiation",
            RadiationSource::Lux => "Converted from illuminance",
            RadiationSource::Sunshine => "Derived from sunshine hours",
            RadiationSource::TemperatureEstimate => "Estimated from temperature range",
        }
    }

    pub fn confidence(&self) -> Confidence {
        match self {
            RadiationSource::Measured | RadiationSource::Lux => Confidence::High,
            RadiationSource::Sunshine => Confidence::Medium,
            RadiationSource::TemperatureEstimate => Confidence::Low,
        }
    }
}

impl std::fmt::Display for RadiationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A reading that was out of range and got clamped or ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputIssue {
    TemperaturesSwapped { max: f64, min: f64 },
    HumidityOutOfRange { value: f64 },
    NegativeWindSpeed { value: f64 },
    NegativeRainfall { value: f64 },
    LatitudeOutOfRange { value: f64 },
    NegativeRadiation { value: f64 },
    SunshineExceedsDaylength { hours: f64, daylength: f64 },
}

impl InputIssue {
    /// Significant issues cost one confidence tier.
    pub fn is_significant(&self) -> bool {
        !matches!(self, InputIssue::SunshineExceedsDaylength { .. })
    }

    pub fn message(&self) -> String {
        match self {
            InputIssue::TemperaturesSwapped { max, min } => format!(
                "Maximum temperature ({:.1}°C) was below minimum ({:.1}°C); values were swapped",
                max, min
            ),
            InputIssue::HumidityOutOfRange { value } => format!(
                "Relative humidity {:.1}% is outside 0-100% and was clamped",
                value
            ),
            InputIssue::NegativeWindSpeed { value } => {
                format!("Wind speed {:.1} m/s is negative and was set to 0", value)
            }
            InputIssue::NegativeRainfall { value } => {
                format!("Rainfall {:.1} mm is negative and was set to 0", value)
            }
            InputIssue::LatitudeOutOfRange { value } => {
                format!("Latitude {:.2}° is outside ±90° and was clamped", value)
            }
            InputIssue::NegativeRadiation { value } => {
                format!("Radiation reading {:.2} is negative and was ignored", value)
            }
            InputIssue::SunshineExceedsDaylength { hours, daylength } => format!(
                "Sunshine hours ({:.1} h) exceed day length ({:.1} h) and were capped",
                hours, daylength
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrrigationRecommendation {
    pub should_irrigate: bool,
    /// Total run time in hours.
    pub duration_hours: f64,
    /// Number of runs the duration is split into.
    pub cycles: u32,
    pub frequency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_litres: Option<f64>,
    pub method: IrrigationMethod,
    pub notes: Vec<String>,
}

/// Output of the advice pipeline. Computed fresh per request and never
/// modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EtcResult {
    pub growth_stage: GrowthStage,
    /// Reference evapotranspiration, mm/day.
    pub eto: f64,
    pub kc: f64,
    /// Crop evapotranspiration, mm/day.
    pub etc: f64,
    pub effective_rainfall: f64,
    /// Net depth to apply, mm.
    pub irrigation_need: f64,
    pub irrigation_recommendation: IrrigationRecommendation,
    pub confidence: Confidence,
    pub radiation_source: RadiationSource,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_issues: Vec<InputIssue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Agreement {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Agreement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Agreement::Excellent => "Excellent",
            Agreement::Good => "Good",
            Agreement::Fair => "Fair",
            Agreement::Poor => "Poor",
        }
    }
}

impl std::fmt::Display for Agreement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub computed_eto: f64,
    pub reference_eto: f64,
    /// computed - reference, mm/day.
    pub difference: f64,
    pub percentage_error: f64,
    pub is_accurate: bool,
    pub agreement: Agreement,
}
