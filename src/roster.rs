//! Reads the clinician summary CSV into roster records.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use crate::error::LoadError;
use crate::models::{Clinician, Level};
use crate::window::ReferenceMonth;

pub const CLINICIAN_COLUMN: &str = "Clinician";
pub const LEVEL_COLUMN: &str = "Level";
pub const ACTIVE_CASES_COLUMN: &str = "Active Cases (last 2 months)";

pub fn load_roster(path: &Path, reference: &ReferenceMonth) -> Result<Vec<Clinician>, LoadError> {
    let file = std::fs::File::open(path)?;
    let roster = read_roster(file, reference)?;
    log::info!("roster: loaded {} clinicians from {}", roster.len(), path.display());
    Ok(roster)
}

pub fn read_roster<R: Read>(input: R, reference: &ReferenceMonth) -> Result<Vec<Clinician>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);

    let name_idx = column(CLINICIAN_COLUMN)
        .ok_or_else(|| LoadError::MissingColumn(CLINICIAN_COLUMN.to_string()))?;
    let level_idx = column(LEVEL_COLUMN);
    let cases_idx = column(ACTIVE_CASES_COLUMN);

    if level_idx.is_none() {
        log::warn!("roster: no '{LEVEL_COLUMN}' column, every clinician defaults to junior");
    }
    if cases_idx.is_none() {
        log::warn!("roster: no '{ACTIVE_CASES_COLUMN}' column, active cases default to 0");
    }

    let mut month_columns = Vec::new();
    for (idx, header) in headers.iter().enumerate() {
        let Some((year, month_index)) = parse_month_header(header) else {
            continue;
        };
        if year != reference.year {
            continue;
        }
        if month_index > reference.month_index {
            log::debug!("roster: ignoring column {header} after the reference month");
            continue;
        }
        month_columns.push((idx, month_index));
    }

    let mut seen = HashSet::new();
    let mut roster = Vec::new();

    for result in reader.records() {
        let record = result?;
        let identity = record.get(name_idx).unwrap_or_default().to_string();
        if identity.is_empty() {
            log::warn!("roster: skipping a row without a clinician name");
            continue;
        }
        if !seen.insert(identity.clone()) {
            log::warn!("roster: duplicate clinician {identity}, keeping the first row");
            continue;
        }

        let level = match level_idx.and_then(|idx| record.get(idx)) {
            Some(raw) => raw.parse::<Level>().unwrap_or_else(|err| {
                log::warn!("roster: {identity}: {err}, defaulting to junior");
                Level::Junior
            }),
            None => Level::Junior,
        };

        let mut monthly_hours = vec![0.0; reference.month_index + 1];
        for &(idx, month_index) in &month_columns {
            monthly_hours[month_index] = parse_hours(&identity, record.get(idx).unwrap_or_default());
        }

        let active_cases = cases_idx
            .and_then(|idx| record.get(idx))
            .map(|raw| parse_case_count(&identity, raw))
            .unwrap_or(0);

        roster.push(Clinician {
            identity,
            level,
            monthly_hours,
            active_cases,
        });
    }

    Ok(roster)
}

/// `"2025_3"` → `(2025, 2)`; month numbers are 1-based in the header.
pub fn parse_month_header(header: &str) -> Option<(i32, usize)> {
    let (year, month) = header.split_once('_')?;
    let year: i32 = year.parse().ok()?;
    let month: usize = month.parse().ok()?;
    (1..=12).contains(&month).then_some((year, month - 1))
}

fn parse_hours(identity: &str, raw: &str) -> f64 {
    if raw.is_empty() {
        return 0.0;
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        _ => {
            log::warn!("roster: {identity}: unusable hours value '{raw}', using 0");
            0.0
        }
    }
}

fn parse_case_count(identity: &str, raw: &str) -> u32 {
    if raw.is_empty() {
        return 0;
    }
    // Upstream exports write counts as floats ("5.0").
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value.round() as u32,
        _ => {
            log::warn!("roster: {identity}: unusable active case count '{raw}', using 0");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUMMARY: &str = "\
Clinician,Level,2024_12,2025_1,2025_2,2025_3,2025_4,Active Cases (last 2 months)
Avery Lee,senior,9.0,10.5,12.0,14.25,3.0,12.0
Jules Moreno,Lead,0.0,20.0,,18.0,1.0,
Kiara Patel,intern,1.0,abc,4.0,5.0,0.0,4
Avery Lee,junior,1.0,1.0,1.0,1.0,1.0,1
";

    fn march() -> ReferenceMonth {
        ReferenceMonth::new(2025, 2)
    }

    #[test]
    fn reads_reference_year_months_up_to_current() {
        let roster = read_roster(SUMMARY.as_bytes(), &march()).unwrap();
        assert_eq!(roster.len(), 3);

        let avery = &roster[0];
        assert_eq!(avery.identity, "Avery Lee");
        assert_eq!(avery.level, Level::Senior);
        assert_eq!(avery.monthly_hours, vec![10.5, 12.0, 14.25]);
        assert_eq!(avery.active_cases, 12);
    }

    #[test]
    fn blanks_and_bad_cells_become_zero() {
        let roster = read_roster(SUMMARY.as_bytes(), &march()).unwrap();
        let jules = &roster[1];
        assert_eq!(jules.level, Level::Lead);
        assert_eq!(jules.monthly_hours, vec![20.0, 0.0, 18.0]);
        assert_eq!(jules.active_cases, 0);

        let kiara = &roster[2];
        assert_eq!(kiara.level, Level::Junior);
        assert_eq!(kiara.monthly_hours, vec![0.0, 4.0, 5.0]);
        assert_eq!(kiara.active_cases, 4);
    }

    #[test]
    fn series_is_sized_to_elapsed_months() {
        let roster = read_roster(SUMMARY.as_bytes(), &ReferenceMonth::new(2025, 5)).unwrap();
        assert_eq!(roster[0].monthly_hours, vec![10.5, 12.0, 14.25, 3.0, 0.0, 0.0]);
    }

    #[test]
    fn missing_clinician_column_is_an_error() {
        let result = read_roster("Name,2025_1\nA,1\n".as_bytes(), &march());
        assert!(matches!(result, Err(LoadError::MissingColumn(col)) if col == CLINICIAN_COLUMN));
    }

    #[test]
    fn month_headers_parse() {
        assert_eq!(parse_month_header("2025_1"), Some((2025, 0)));
        assert_eq!(parse_month_header("2025_12"), Some((2025, 11)));
        assert_eq!(parse_month_header("2025_13"), None);
        assert_eq!(parse_month_header("Clinician"), None);
    }
}
