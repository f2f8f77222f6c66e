//! Single entry point for irrigation advice. Every caller (CLI, log store,
//! future web handlers) goes through [`advise`] so there is exactly one
//! implementation of the calculation.

use super::crop_coefficient::crop_coefficient;
use super::irrigation::{cycles, irrigation_frequency, run_duration_hours, water_balance};
use super::reference_et::{confidence_for, reference_et};
use super::rules::{AdviceContext, NotesEngine};
use super::validation::validate_against_reference;
use crate::error::Result;
use crate::models::{
    EtcResult, FarmProfile, GrowthStage, IrrigationMethod, IrrigationRecommendation,
    IrrigationSystem, Location, SoilType, ValidationResult, WeatherObservation,
};
use serde::{Deserialize, Serialize};

/// Everything needed for one day of advice. Farm settings are passed in
/// explicitly; nothing is read from global state.
#[derive(Debug, Clone, PartialEq)]
pub struct AdviceRequest {
    pub weather: WeatherObservation,
    pub growth_stage: GrowthStage,
    pub location: Option<Location>,
    pub farm: FarmProfile,
}

impl AdviceRequest {
    pub fn new(weather: WeatherObservation, growth_stage: GrowthStage) -> Self {
        Self {
            weather,
            growth_stage,
            location: None,
            farm: FarmProfile::default(),
        }
    }

    /// Build a request from user-facing names. Unknown stage, method or soil
    /// names are rejected before any calculation happens.
    pub fn from_names(
        weather: WeatherObservation,
        growth_stage: &str,
        irrigation_method: Option<&str>,
        soil_type: Option<&str>,
    ) -> Result<Self> {
        let stage = GrowthStage::parse(growth_stage)?;
        let method = irrigation_method.map(IrrigationMethod::parse).transpose()?;
        let soil = soil_type.map(SoilType::parse).transpose()?;

        let mut request = Self::new(weather, stage);
        request.farm.irrigation_method = method;
        request.farm.soil_type = soil;
        Ok(request)
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_method(mut self, method: IrrigationMethod) -> Self {
        self.farm.irrigation_method = Some(method);
        self
    }

    pub fn with_soil(mut self, soil: SoilType) -> Self {
        self.farm.soil_type = Some(soil);
        self
    }

    pub fn with_system(mut self, system: IrrigationSystem) -> Self {
        self.farm.system = Some(system);
        self
    }

    pub fn with_farm(mut self, farm: FarmProfile) -> Self {
        self.farm = farm;
        self
    }
}

/// Advice plus the optional comparison against an external reference ETo.
/// The comparison never alters the advice itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceReport {
    pub result: EtcResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationResult>,
}

/// ETo → Kc → water balance → recommendation.
pub fn advise(request: &AdviceRequest) -> Result<EtcResult> {
    let location = request.location.unwrap_or_default();
    let estimate = reference_et(&request.weather, &location)?;

    let kc = crop_coefficient(request.growth_stage);
    let (balance, rain_issue) = water_balance(estimate.eto, kc, request.weather.rainfall);

    let mut issues = estimate.issues;
    issues.extend(rain_issue);
    let confidence = confidence_for(estimate.radiation_source, &issues);

    let method = request.farm.irrigation_method.unwrap_or_default();
    let soil = request.farm.soil_type;
    let system = request.farm.system.as_ref();
    let should_irrigate = balance.should_irrigate();

    let (duration_hours, volume_litres) = if should_irrigate {
        (
            run_duration_hours(balance.irrigation_need, method, system),
            system.map(|s| s.volume_litres(balance.irrigation_need)),
        )
    } else {
        (0.0, None)
    };

    let ctx = AdviceContext {
        stage: request.growth_stage,
        eto: estimate.eto,
        etc: balance.etc,
        rainfall: balance.effective_rainfall,
        irrigation_need: balance.irrigation_need,
        should_irrigate,
        method,
        soil,
        wind_speed: request.weather.wind_speed.max(0.0),
        radiation_source: estimate.radiation_source,
    };
    let notes = NotesEngine::new().evaluate(&ctx, &issues);

    tracing::debug!(
        stage = %request.growth_stage,
        eto = estimate.eto,
        kc,
        etc = balance.etc,
        need = balance.irrigation_need,
        "Irrigation advice computed"
    );

    Ok(EtcResult {
        growth_stage: request.growth_stage,
        eto: estimate.eto,
        kc,
        etc: balance.etc,
        effective_rainfall: balance.effective_rainfall,
        irrigation_need: balance.irrigation_need,
        irrigation_recommendation: IrrigationRecommendation {
            should_irrigate,
            duration_hours,
            cycles: cycles(should_irrigate, soil),
            frequency: irrigation_frequency(request.growth_stage, soil),
            volume_litres,
            method,
            notes,
        },
        confidence,
        radiation_source: estimate.radiation_source,
        input_issues: issues,
    })
}

/// Runs [`advise`] and, when a reference ETo is available, the
/// cross-validation against it.
pub fn advise_with_reference(
    request: &AdviceRequest,
    reference_eto: Option<f64>,
) -> Result<AdviceReport> {
    let result = advise(request)?;
    let validation =
        reference_eto.and_then(|reference| validate_against_reference(result.eto, reference));
    Ok(AdviceReport { result, validation })
}

/// Function-style entry point mirroring the library contract.
pub fn compute_irrigation_advice(
    weather: &WeatherObservation,
    growth_stage: GrowthStage,
    location: Option<&Location>,
    irrigation_method: Option<IrrigationMethod>,
    soil_type: Option<SoilType>,
) -> Result<EtcResult> {
    let request = AdviceRequest {
        weather: weather.clone(),
        growth_stage,
        location: location.copied(),
        farm: FarmProfile {
            irrigation_method,
            soil_type,
            system: None,
        },
    };
    advise(&request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VineSightError;
    use crate::models::{Confidence, InputIssue};
    use chrono::NaiveDate;

    fn scenario_weather() -> WeatherObservation {
        WeatherObservation::new(
            NaiveDate::from_ymd_opt(2024, 7, 14).unwrap(),
            35.0,
            22.0,
            65.0,
            2.5,
            0.0,
        )
        .with_solar_radiation(25.5)
    }

    #[test]
    fn fruit_set_dry_day() {
        let result =
            compute_irrigation_advice(&scenario_weather(), GrowthStage::FruitSet, None, None, None)
                .unwrap();

        assert!(result.eto > 0.0);
        assert_eq!(result.kc, crop_coefficient(GrowthStage::FruitSet));
        assert_eq!(result.etc, result.eto * result.kc);
        assert_eq!(result.irrigation_need, result.etc);
        assert!(result.irrigation_recommendation.should_irrigate);
        assert!(result.irrigation_recommendation.duration_hours > 0.0);
        assert_eq!(result.confidence, Confidence::High);
        assert_eq!(result.irrigation_recommendation.method, IrrigationMethod::Drip);
    }

    #[test]
    fn heavy_rain_holds_irrigation() {
        let weather = scenario_weather().with_rainfall(50.0);
        let result =
            compute_irrigation_advice(&weather, GrowthStage::FruitSet, None, None, None).unwrap();

        assert_eq!(result.irrigation_need, 0.0);
        assert!(!result.irrigation_recommendation.should_irrigate);
        assert_eq!(result.irrigation_recommendation.duration_hours, 0.0);
        assert_eq!(result.irrigation_recommendation.cycles, 0);
        assert!(result
            .irrigation_recommendation
            .notes
            .iter()
            .any(|n| n.contains("rainfall") && n.contains("exceeded crop demand")));
    }

    #[test]
    fn unknown_stage_name_is_rejected() {
        let err = AdviceRequest::from_names(scenario_weather(), "ripening", None, None)
            .and_then(|req| advise(&req))
            .unwrap_err();
        assert!(matches!(err, VineSightError::Configuration { .. }));
    }

    #[test]
    fn unknown_method_name_is_rejected() {
        let err =
            AdviceRequest::from_names(scenario_weather(), "fruit_set", Some("pivot"), None)
                .unwrap_err();
        assert!(matches!(
            err,
            VineSightError::Configuration {
                kind: "irrigation method",
                ..
            }
        ));
    }

    #[test]
    fn names_are_resolved() {
        let req = AdviceRequest::from_names(
            scenario_weather(),
            "veraison",
            Some("sprinkler"),
            Some("clay"),
        )
        .unwrap();
        assert_eq!(req.growth_stage, GrowthStage::Veraison);
        assert_eq!(req.farm.irrigation_method, Some(IrrigationMethod::Sprinkler));
        assert_eq!(req.farm.soil_type, Some(SoilType::Clay));
    }

    #[test]
    fn outputs_are_non_negative() {
        for stage in GrowthStage::ALL {
            for rain in [0.0, 2.0, 10.0, 80.0] {
                let weather = scenario_weather().with_rainfall(rain);
                let r = compute_irrigation_advice(&weather, stage, None, None, None).unwrap();
                assert!(r.eto >= 0.0);
                assert!(r.etc >= 0.0);
                assert!(r.irrigation_need >= 0.0);
                assert!(r.effective_rainfall >= 0.0);
            }
        }
    }

    #[test]
    fn more_rain_never_increases_need() {
        let mut previous = f64::MAX;
        for tenths in 0..100 {
            let weather = scenario_weather().with_rainfall(tenths as f64 * 0.1);
            let r = compute_irrigation_advice(&weather, GrowthStage::Veraison, None, None, None)
                .unwrap();
            assert!(r.irrigation_need <= previous);
            previous = r.irrigation_need;
        }
    }

    #[test]
    fn identical_requests_are_bit_identical() {
        let request = AdviceRequest::new(scenario_weather(), GrowthStage::Flowering)
            .with_soil(SoilType::Sandy)
            .with_location(Location::new(-33.9, 18.9).with_elevation(150.0));
        let a = advise(&request).unwrap();
        let b = advise(&request).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.eto.to_bits(), b.eto.to_bits());
        assert_eq!(
            a.irrigation_recommendation.duration_hours.to_bits(),
            b.irrigation_recommendation.duration_hours.to_bits()
        );
    }

    #[test]
    fn confidence_follows_radiation_input() {
        let base = WeatherObservation::new(
            NaiveDate::from_ymd_opt(2024, 7, 14).unwrap(),
            35.0,
            22.0,
            65.0,
            2.5,
            0.0,
        );
        let confidence = |w: &WeatherObservation| {
            compute_irrigation_advice(w, GrowthStage::FruitSet, None, None, None)
                .unwrap()
                .confidence
        };

        assert_eq!(
            confidence(&base.clone().with_solar_radiation(25.5)),
            Confidence::High
        );
        assert_eq!(
            confidence(&base.clone().with_sunshine_hours(9.0)),
            Confidence::Medium
        );
        assert_eq!(confidence(&base), Confidence::Low);
    }

    #[test]
    fn measured_system_sets_duration_and_volume() {
        let system = IrrigationSystem::new(10_000.0, 20_000.0).unwrap();
        let request =
            AdviceRequest::new(scenario_weather(), GrowthStage::FruitSet).with_system(system);
        let result = advise(&request).unwrap();
        let rec = &result.irrigation_recommendation;

        let expected_hours = result.irrigation_need * 10_000.0 / 20_000.0;
        assert!((rec.duration_hours - expected_hours).abs() < 1e-12);
        assert_eq!(rec.volume_litres, Some(result.irrigation_need * 10_000.0));
    }

    #[test]
    fn soil_changes_schedule_not_water_numbers() {
        let sandy = advise(
            &AdviceRequest::new(scenario_weather(), GrowthStage::FruitSet)
                .with_soil(SoilType::Sandy),
        )
        .unwrap();
        let clay = advise(
            &AdviceRequest::new(scenario_weather(), GrowthStage::FruitSet)
                .with_soil(SoilType::Clay),
        )
        .unwrap();

        assert_eq!(sandy.etc, clay.etc);
        assert_eq!(sandy.irrigation_need, clay.irrigation_need);
        assert_eq!(sandy.irrigation_recommendation.cycles, 2);
        assert_eq!(clay.irrigation_recommendation.cycles, 1);
        assert_ne!(
            sandy.irrigation_recommendation.frequency,
            clay.irrigation_recommendation.frequency
        );
    }

    #[test]
    fn high_eto_day_is_noted() {
        let result =
            compute_irrigation_advice(&scenario_weather(), GrowthStage::FruitSet, None, None, None)
                .unwrap();
        assert!(result.eto > 6.0);
        assert!(result
            .irrigation_recommendation
            .notes
            .iter()
            .any(|n| n.contains("High evapotranspiration")));
    }

    #[test]
    fn negative_rain_is_clamped_and_downgrades() {
        let weather = scenario_weather().with_rainfall(-3.0);
        let result =
            compute_irrigation_advice(&weather, GrowthStage::FruitSet, None, None, None).unwrap();
        assert_eq!(result.effective_rainfall, 0.0);
        assert_eq!(result.confidence, Confidence::Medium);
        assert_eq!(
            result.input_issues,
            vec![InputIssue::NegativeRainfall { value: -3.0 }]
        );
    }

    #[test]
    fn reference_validation_is_separate() {
        let request = AdviceRequest::new(scenario_weather(), GrowthStage::FruitSet);
        let plain = advise(&request).unwrap();

        let report = advise_with_reference(&request, Some(plain.eto * 1.05)).unwrap();
        assert_eq!(report.result, plain);
        let validation = report.validation.unwrap();
        assert!(validation.is_accurate);
        assert!(validation.difference < 0.0);

        let skipped = advise_with_reference(&request, None).unwrap();
        assert!(skipped.validation.is_none());
        let unusable = advise_with_reference(&request, Some(0.0)).unwrap();
        assert!(unusable.validation.is_none());
    }
}
