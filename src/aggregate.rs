//! Builds the clinician summary CSV from a raw session export.
//!
//! This is the upstream data step, not part of scoring: it only decides which
//! sessions count and totals them per month. `roster` reads its output.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io::{Read, Write};
use std::path::Path;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Deserialize;

use crate::config::AggregationConfig;
use crate::error::LoadError;
use crate::roster::{ACTIVE_CASES_COLUMN, CLINICIAN_COLUMN};

#[derive(Debug, Deserialize)]
struct SessionRow {
    #[serde(default)]
    a_schedule: String,
    #[serde(default)]
    a_centerclientid: String,
    #[serde(default)]
    a_date: String,
    #[serde(default)]
    a_length: String,
    #[serde(default)]
    a_codedescription: String,
    #[serde(default)]
    a_scheduleattendance: String,
}

/// An attended clinical session that counts towards hours and caseload.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub clinician: String,
    pub client_id: String,
    pub date: NaiveDate,
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub clinician: String,
    pub hours: BTreeMap<(i32, u32), f64>,
    /// `None` when the clinician saw no clients inside the case window.
    pub active_cases: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClinicianSummary {
    /// `(year, month)` with 1-based months, chronological.
    pub months: Vec<(i32, u32)>,
    pub rows: Vec<SummaryRow>,
}

pub fn summarize_file(
    sessions_path: &Path,
    out_path: &Path,
    as_of: NaiveDate,
    config: &AggregationConfig,
) -> Result<usize, LoadError> {
    let sessions = read_sessions(std::fs::File::open(sessions_path)?, config)?;
    let summary = summarize(&sessions, as_of, config);
    write_summary(&summary, std::fs::File::create(out_path)?)?;
    log::info!(
        "aggregate: {} sessions → {} clinicians over {} months",
        sessions.len(),
        summary.rows.len(),
        summary.months.len()
    );
    Ok(summary.rows.len())
}

pub fn read_sessions<R: Read>(input: R, config: &AggregationConfig) -> Result<Vec<Session>, LoadError> {
    let roster: HashSet<&str> = config.current_clinicians.iter().map(String::as_str).collect();
    let clinical: HashSet<&str> = config.clinical_types.iter().map(String::as_str).collect();

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut sessions = Vec::new();
    let mut unparsed_dates = 0usize;

    for result in reader.deserialize::<SessionRow>() {
        let row = result?;
        if row.a_schedule.is_empty()
            || row.a_scheduleattendance.is_empty()
            || row.a_centerclientid.is_empty()
        {
            continue;
        }
        if !roster.is_empty() && !roster.contains(row.a_schedule.as_str()) {
            continue;
        }
        if !clinical.contains(row.a_codedescription.as_str()) {
            continue;
        }
        let Some(date) = parse_day_first(&row.a_date) else {
            unparsed_dates += 1;
            continue;
        };
        let minutes = row.a_length.parse::<f64>().ok().filter(|m| m.is_finite());

        sessions.push(Session {
            clinician: row.a_schedule,
            client_id: normalize_client_id(&row.a_centerclientid),
            date,
            hours: minutes.map_or(0.0, |m| m / 60.0),
        });
    }

    if unparsed_dates > 0 {
        log::warn!("aggregate: dropped {unparsed_dates} sessions with unreadable dates");
    }
    Ok(sessions)
}

pub fn summarize(sessions: &[Session], as_of: NaiveDate, config: &AggregationConfig) -> ClinicianSummary {
    let case_cutoff = as_of - Duration::days(config.active_case_days);
    let active_cutoff = as_of - Duration::days(config.active_clinician_days);

    let active: BTreeSet<&str> = sessions
        .iter()
        .filter(|s| s.date >= active_cutoff)
        .map(|s| s.clinician.as_str())
        .collect();

    let mut hours: BTreeMap<&str, BTreeMap<(i32, u32), f64>> = BTreeMap::new();
    let mut clients: BTreeMap<&str, HashSet<&str>> = BTreeMap::new();
    let mut months = BTreeSet::new();

    for session in sessions.iter().filter(|s| active.contains(s.clinician.as_str())) {
        let key = (session.date.year(), session.date.month());
        months.insert(key);
        *hours
            .entry(session.clinician.as_str())
            .or_default()
            .entry(key)
            .or_insert(0.0) += session.hours;

        if session.date >= case_cutoff {
            clients
                .entry(session.clinician.as_str())
                .or_default()
                .insert(session.client_id.as_str());
        }
    }

    let rows = active
        .iter()
        .map(|&clinician| SummaryRow {
            clinician: clinician.to_string(),
            hours: hours.remove(clinician).unwrap_or_default(),
            active_cases: clients.get(clinician).map(HashSet::len),
        })
        .collect();

    ClinicianSummary {
        months: months.into_iter().collect(),
        rows,
    }
}

pub fn write_summary<W: Write>(summary: &ClinicianSummary, out: W) -> Result<(), LoadError> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header = vec![CLINICIAN_COLUMN.to_string()];
    header.extend(summary.months.iter().map(|(y, m)| format!("{y}_{m}")));
    header.push(ACTIVE_CASES_COLUMN.to_string());
    writer.write_record(&header)?;

    for row in &summary.rows {
        let mut record = vec![row.clinician.clone()];
        record.extend(
            summary
                .months
                .iter()
                .map(|key| row.hours.get(key).copied().unwrap_or(0.0).to_string()),
        );
        record.push(row.active_cases.map(|n| n.to_string()).unwrap_or_default());
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Strips the `HWB0000` / `HWB` prefix some systems put on client ids.
pub fn normalize_client_id(raw: &str) -> String {
    if raw.starts_with("HWB") {
        raw.replace("HWB0000", "").replace("HWB", "")
    } else {
        raw.to_string()
    }
}

// Two-digit years first: "%Y" would read "25" as the year 25.
const DAY_FIRST_FORMATS: &[&str] = &["%d/%m/%y", "%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d"];

pub fn parse_day_first(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.split_whitespace().next()?;
    DAY_FIRST_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}
