//! Plain-text rendering for the CLI. Everything returns a `String` so the
//! layout can be tested without a terminal.

use crate::logic::crop_coefficient::kc_table;
use crate::logic::validation::ACCURACY_TOLERANCE_PERCENT;
use crate::logic::AdviceReport;
use crate::models::{IrrigationLog, ValidationResult};
use std::fmt::Write;

/// "2 h 15 min", "40 min", or "-" for zero.
pub fn format_duration(hours: f64) -> String {
    let minutes = (hours * 60.0).round() as u64;
    match (minutes / 60, minutes % 60) {
        (0, 0) => "-".to_string(),
        (0, m) => format!("{} min", m),
        (h, 0) => format!("{} h", h),
        (h, m) => format!("{} h {} min", h, m),
    }
}

pub fn render_advice(report: &AdviceReport) -> String {
    let result = &report.result;
    let rec = &result.irrigation_recommendation;
    let mut out = String::new();

    let _ = writeln!(out, "Growth stage      {} (Kc {:.2})", result.growth_stage, result.kc);
    let _ = writeln!(
        out,
        "ETo               {:.2} mm/day ({} radiation)",
        result.eto, result.radiation_source
    );
    let _ = writeln!(out, "ETc               {:.2} mm/day", result.etc);
    let _ = writeln!(out, "Rainfall          {:.1} mm", result.effective_rainfall);
    let _ = writeln!(out, "Irrigation need   {:.2} mm", result.irrigation_need);
    let _ = writeln!(out, "Confidence        {}", result.confidence);
    let _ = writeln!(out);

    if rec.should_irrigate {
        let _ = writeln!(
            out,
            "Irrigate: {} by {} ({} cycle{}), {}",
            format_duration(rec.duration_hours),
            rec.method.as_str().to_lowercase(),
            rec.cycles,
            if rec.cycles == 1 { "" } else { "s" },
            rec.frequency.to_lowercase()
        );
        if let Some(volume) = rec.volume_litres {
            let _ = writeln!(out, "Volume: {:.0} L", volume);
        }
    } else {
        let _ = writeln!(out, "No irrigation today");
    }

    if !rec.notes.is_empty() {
        let _ = writeln!(out);
        for note in &rec.notes {
            let _ = writeln!(out, "  - {}", note);
        }
    }

    if let Some(validation) = &report.validation {
        let _ = writeln!(out);
        out.push_str(&render_validation(validation));
    }

    out
}

pub fn render_validation(validation: &ValidationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Computed ETo {:.2} vs reference {:.2} mm/day: difference {:+.2} mm ({:+.1}%)",
        validation.computed_eto,
        validation.reference_eto,
        validation.difference,
        validation.percentage_error
    );
    if validation.is_accurate {
        let _ = writeln!(out, "Agreement: {}", validation.agreement);
    } else {
        let _ = writeln!(
            out,
            "Agreement: {} (outside {:.0}% tolerance)",
            validation.agreement, ACCURACY_TOLERANCE_PERCENT
        );
    }
    out
}

pub fn render_stages() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<14} {:<12} {:>5}  {}", "Key", "Stage", "Kc", "Period");
    for (stage, kc) in kc_table() {
        let _ = writeln!(
            out,
            "{:<14} {:<12} {:>5.2}  {}",
            stage.key(),
            stage.as_str(),
            kc,
            stage.period()
        );
    }
    out
}

pub fn render_history(logs: &[IrrigationLog]) -> String {
    if logs.is_empty() {
        return "No saved advice in this range\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>5}  {:<10}  {:<12} {:>5} {:>5} {:>5} {:>5}  {:<10} {}",
        "Id", "Date", "Stage", "ETo", "ETc", "Rain", "Need", "Run", "Conf."
    );
    for log in logs {
        let _ = writeln!(
            out,
            "{:>5}  {:<10}  {:<12} {:>5.2} {:>5.2} {:>5.1} {:>5.2}  {:<10} {}",
            log.id.map(|id| id.to_string()).unwrap_or_default(),
            log.log_date.format("%Y-%m-%d"),
            log.growth_stage.as_str(),
            log.eto,
            log.etc,
            log.rainfall,
            log.irrigation_need,
            format_duration(log.duration_hours),
            log.confidence
        );
    }

    let total_need: f64 = logs.iter().map(|l| l.irrigation_need).sum();
    let irrigation_days = logs.iter().filter(|l| l.should_irrigate()).count();
    let _ = writeln!(
        out,
        "\n{} day(s), {} with irrigation, total need {:.1} mm",
        logs.len(),
        irrigation_days,
        total_need
    );
    out
}
