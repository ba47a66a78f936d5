use crate::core::aggregate::{aggregate_by, FrequencyRow};
use crate::models::CrimeRecord;

/// The fields a batch of outcome records can be grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakdown {
    /// `category.code` of the outcome
    Outcome,
    /// `crime.location_subtype`
    Location,
    /// `crime.category`
    Category,
}

impl Breakdown {
    /// Chart subject used in trace names and titles
    pub fn subject(&self) -> &'static str {
        match self {
            Breakdown::Outcome => "Crime Consequences",
            Breakdown::Location => "Crime Sub_Location",
            Breakdown::Category => "Crime Category",
        }
    }

    /// Short name used for chart file names
    pub fn slug(&self) -> &'static str {
        match self {
            Breakdown::Outcome => "code_count",
            Breakdown::Location => "location_count",
            Breakdown::Category => "crime_count",
        }
    }

    pub fn label<'a>(&self, record: &'a CrimeRecord) -> Option<&'a str> {
        match self {
            Breakdown::Outcome => record.outcome_code(),
            Breakdown::Location => record.location_subtype(),
            Breakdown::Category => record.crime_category(),
        }
    }

    pub fn tabulate(&self, records: &[CrimeRecord]) -> Vec<FrequencyRow> {
        aggregate_by(records, |record| self.label(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Crime, OutcomeCategory};

    fn record(code: &str, category: &str, subtype: &str) -> CrimeRecord {
        CrimeRecord {
            category: Some(OutcomeCategory {
                code: Some(code.to_string()),
                name: None,
            }),
            crime: Some(Crime {
                category: Some(category.to_string()),
                location_subtype: Some(subtype.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_each_breakdown_reads_its_own_field() {
        let records = vec![
            record("under-investigation", "theft", "STATION"),
            record("under-investigation", "burglary", ""),
        ];

        let outcome = Breakdown::Outcome.tabulate(&records);
        assert_eq!(outcome.len(), 1);
        assert_eq!(outcome[0].label, "underinvestigation");

        let category = Breakdown::Category.tabulate(&records);
        assert_eq!(category.len(), 2);

        let location = Breakdown::Location.tabulate(&records);
        let labels: Vec<_> = location.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["station", ""]);
    }
}
