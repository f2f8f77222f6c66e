use crate::db::Database;
use crate::error::{Result, VineSightError};
use crate::models::{Confidence, GrowthStage, IrrigationLog};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Row};
use tracing::warn;

const DATE_FORMAT: &str = "%Y-%m-%d";

// Irrigation Log Queries

impl Database {
    /// Insert or replace the entry for `(farm_name, log_date)`. Returns the row id.
    pub fn save_irrigation_log(&self, log: &IrrigationLog) -> Result<i64> {
        let notes = serde_json::to_string(&log.notes)?;

        self.with_conn(|conn| {
            let id = conn.query_row(
                r#"
                INSERT INTO irrigation_logs
                    (farm_name, log_date, growth_stage, eto, kc, etc, rainfall,
                     irrigation_need, duration_hours, confidence, reference_eto, notes, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
                ON CONFLICT(farm_name, log_date) DO UPDATE SET
                    growth_stage = excluded.growth_stage,
                    eto = excluded.eto,
                    kc = excluded.kc,
                    etc = excluded.etc,
                    rainfall = excluded.rainfall,
                    irrigation_need = excluded.irrigation_need,
                    duration_hours = excluded.duration_hours,
                    confidence = excluded.confidence,
                    reference_eto = excluded.reference_eto,
                    notes = excluded.notes,
                    created_at = excluded.created_at
                RETURNING id
                "#,
                params![
                    log.farm_name,
                    log.log_date.format(DATE_FORMAT).to_string(),
                    log.growth_stage.key(),
                    log.eto,
                    log.kc,
                    log.etc,
                    log.rainfall,
                    log.irrigation_need,
                    log.duration_hours,
                    log.confidence.as_str(),
                    log.reference_eto,
                    notes,
                    log.created_at.to_rfc3339(),
                ],
                |row| row.get(0),
            )?;
            Ok(id)
        })
    }

    pub fn get_irrigation_log(&self, farm_name: &str, date: NaiveDate) -> Result<Option<IrrigationLog>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT * FROM irrigation_logs WHERE farm_name = ?1 AND log_date = ?2",
                params![farm_name, date.format(DATE_FORMAT).to_string()],
                row_to_irrigation_log,
            )
            .optional()
            .map_err(Into::into)
        })
    }

    /// Entries for one farm, newest first. Either bound may be open.
    pub fn logs_between(
        &self,
        farm_name: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<IrrigationLog>> {
        let from = from.map(|d| d.format(DATE_FORMAT).to_string());
        let to = to.map(|d| d.format(DATE_FORMAT).to_string());

        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT * FROM irrigation_logs
                WHERE farm_name = ?1
                  AND (?2 IS NULL OR log_date >= ?2)
                  AND (?3 IS NULL OR log_date <= ?3)
                ORDER BY log_date DESC
                "#,
            )?;
            let logs = stmt
                .query_map(params![farm_name, from, to], row_to_irrigation_log)?
                .filter_map(|r| match r {
                    Ok(log) => Some(log),
                    Err(e) => {
                        warn!(error = %e, "Skipping unreadable irrigation log row");
                        None
                    }
                })
                .collect();
            Ok(logs)
        })
    }

    pub fn delete_irrigation_log(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM irrigation_logs WHERE id = ?1", [id])?;
            if deleted == 0 {
                return Err(VineSightError::NotFound(format!("irrigation log {}", id)));
            }
            Ok(())
        })
    }
}

fn row_to_irrigation_log(row: &Row) -> rusqlite::Result<IrrigationLog> {
    let date_str: String = row.get("log_date")?;
    let stage_str: String = row.get("growth_stage")?;
    let confidence_str: String = row.get("confidence")?;
    let notes_str: String = row.get("notes")?;
    let created_at_str: String = row.get("created_at")?;

    let log_date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let growth_stage = GrowthStage::from_str(&stage_str).unwrap_or_else(|| {
        warn!(
            growth_stage = %stage_str,
            "Unknown growth_stage in database, defaulting to Dormant"
        );
        GrowthStage::Dormant
    });

    let confidence = Confidence::from_str(&confidence_str).unwrap_or_else(|| {
        warn!(confidence = %confidence_str, "Unknown confidence in database, defaulting to low");
        Confidence::Low
    });

    let notes: Vec<String> = serde_json::from_str(&notes_str).unwrap_or_else(|_| {
        warn!("Unreadable notes in database, ignoring");
        Vec::new()
    });

    Ok(IrrigationLog {
        id: Some(row.get("id")?),
        farm_name: row.get("farm_name")?,
        log_date,
        growth_stage,
        eto: row.get("eto")?,
        kc: row.get("kc")?,
        etc: row.get("etc")?,
        rainfall: row.get("rainfall")?,
        irrigation_need: row.get("irrigation_need")?,
        duration_hours: row.get("duration_hours")?,
        confidence,
        reference_eto: row.get("reference_eto")?,
        notes,
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

trait OptionalExt<T> {
    fn optional(self) -> rusqlite::Result<Option<T>>;
}

impl<T> OptionalExt<T> for rusqlite::Result<T> {
    fn optional(self) -> rusqlite::Result<Option<T>> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
