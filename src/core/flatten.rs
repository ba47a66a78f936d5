use crate::models::CrimeRecord;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Flat, tabular view of a [`CrimeRecord`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatRecord {
    pub code: Option<String>,
    pub procedure: Option<String>,
    pub date: Option<String>,
    pub person_id: Option<i64>,
    pub crime_category: Option<String>,
    pub location_type: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub street_id: Option<i64>,
    pub street_name: Option<String>,
    pub context: Option<String>,
    pub persistent_id: Option<String>,
    pub crime_id: Option<i64>,
    pub location_subtype: Option<String>,
    pub month: Option<String>,
}

impl From<&CrimeRecord> for FlatRecord {
    fn from(record: &CrimeRecord) -> Self {
        let crime = record.crime.as_ref();
        let location = record.location();
        let street = record.street();

        Self {
            code: record.outcome_code().map(str::to_string),
            procedure: record.outcome_name().map(str::to_string),
            date: record.date.clone(),
            person_id: record.person_id,
            crime_category: record.crime_category().map(str::to_string),
            location_type: crime.and_then(|c| c.location_type.clone()),
            latitude: location.and_then(|l| l.latitude.clone()),
            longitude: location.and_then(|l| l.longitude.clone()),
            street_id: street.and_then(|s| s.id),
            street_name: street.and_then(|s| s.name.clone()),
            context: crime.and_then(|c| c.context.clone()),
            persistent_id: crime.and_then(|c| c.persistent_id.clone()),
            crime_id: crime.and_then(|c| c.id),
            location_subtype: record.location_subtype().map(str::to_string),
            month: crime.and_then(|c| c.month.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("n_records must be 'All' or a whole number, got '{0}'")]
    InvalidLimit(String),

    #[error("format must be 'csv' or 'json', got '{0}'")]
    InvalidFormat(String),

    #[error("requested {requested} records but only {available} are available; use 'All' or a smaller number")]
    LimitExceeded { requested: usize, available: usize },
}

/// How many records to return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLimit {
    All,
    First(usize),
}

impl FromStr for RecordLimit {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(RecordLimit::All);
        }
        s.parse::<usize>()
            .map(RecordLimit::First)
            .map_err(|_| SelectionError::InvalidLimit(s.to_string()))
    }
}

/// Output encoding for flattened records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(SelectionError::InvalidFormat(s.to_string())),
        }
    }
}

/// Flatten the first `limit` records
pub fn flatten_records(
    records: &[CrimeRecord],
    limit: RecordLimit,
) -> Result<Vec<FlatRecord>, SelectionError> {
    let take = match limit {
        RecordLimit::All => records.len(),
        RecordLimit::First(n) if n <= records.len() => n,
        RecordLimit::First(n) => {
            return Err(SelectionError::LimitExceeded {
                requested: n,
                available: records.len(),
            })
        }
    };

    Ok(records.iter().take(take).map(FlatRecord::from).collect())
}

/// Encode rows as CSV with a header line
pub fn to_csv(rows: &[FlatRecord]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(Vec::new());

    if rows.is_empty() {
        // serialize() only emits headers alongside the first row
        writer.write_record(FLAT_RECORD_COLUMNS)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

/// Column names in output order
pub const FLAT_RECORD_COLUMNS: [&str; 15] = [
    "code",
    "procedure",
    "date",
    "person_id",
    "crime_category",
    "location_type",
    "latitude",
    "longitude",
    "street_id",
    "street_name",
    "context",
    "persistent_id",
    "crime_id",
    "location_subtype",
    "month",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Crime, OutcomeCategory};

    fn record(code: &str) -> CrimeRecord {
        CrimeRecord {
            category: Some(OutcomeCategory {
                code: Some(code.to_string()),
                name: Some("Investigation complete".to_string()),
            }),
            date: Some("2018-11".to_string()),
            person_id: None,
            crime: Some(Crime {
                category: Some("theft-from-the-person".to_string()),
                id: Some(42),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_missing_nested_fields_become_none() {
        let flat = FlatRecord::from(&CrimeRecord::default());
        assert_eq!(flat, FlatRecord::default());

        let flat = FlatRecord::from(&record("no-further-action"));
        assert_eq!(flat.code.as_deref(), Some("no-further-action"));
        assert_eq!(flat.crime_id, Some(42));
        assert_eq!(flat.street_name, None);
    }

    #[test]
    fn test_limit_parsing() {
        assert_eq!("All".parse::<RecordLimit>(), Ok(RecordLimit::All));
        assert_eq!("5".parse::<RecordLimit>(), Ok(RecordLimit::First(5)));
        assert!(matches!(
            "five".parse::<RecordLimit>(),
            Err(SelectionError::InvalidLimit(_))
        ));
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_limit_exceeding_batch() {
        let records = vec![record("a"), record("b")];
        assert_eq!(flatten_records(&records, RecordLimit::First(2)).unwrap().len(), 2);
        assert_eq!(
            flatten_records(&records, RecordLimit::First(3)),
            Err(SelectionError::LimitExceeded {
                requested: 3,
                available: 2
            })
        );
    }

    #[test]
    fn test_csv_has_header_and_rows() {
        let rows = flatten_records(&[record("a"), record("b")], RecordLimit::All).unwrap();
        let csv = String::from_utf8(to_csv(&rows).unwrap()).unwrap();
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], FLAT_RECORD_COLUMNS.join(","));
        assert!(lines[1].starts_with("a,Investigation complete,2018-11,,"));
    }

    #[test]
    fn test_csv_empty_still_has_header() {
        let csv = String::from_utf8(to_csv(&[]).unwrap()).unwrap();
        assert_eq!(csv.trim_end(), FLAT_RECORD_COLUMNS.join(","));
    }
}
