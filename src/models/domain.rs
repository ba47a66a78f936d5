use serde::{Deserialize, Serialize};

/// One outcome record from the police data API
///
/// Every field is optional: the upstream omits or nulls fields freely and
/// a single gap should not sink the whole batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrimeRecord {
    pub category: Option<OutcomeCategory>,
    pub date: Option<String>,
    pub person_id: Option<i64>,
    pub crime: Option<Crime>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutcomeCategory {
    pub code: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Crime {
    pub category: Option<String>,
    pub location_type: Option<String>,
    pub location: Option<CrimeLocation>,
    pub context: Option<String>,
    pub persistent_id: Option<String>,
    pub id: Option<i64>,
    pub location_subtype: Option<String>,
    pub month: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrimeLocation {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub street: Option<Street>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Street {
    pub id: Option<i64>,
    pub name: Option<String>,
}

impl CrimeRecord {
    /// Outcome code, e.g. `under-investigation`
    pub fn outcome_code(&self) -> Option<&str> {
        self.category.as_ref()?.code.as_deref()
    }

    pub fn outcome_name(&self) -> Option<&str> {
        self.category.as_ref()?.name.as_deref()
    }

    pub fn crime_category(&self) -> Option<&str> {
        self.crime.as_ref()?.category.as_deref()
    }

    pub fn location_subtype(&self) -> Option<&str> {
        self.crime.as_ref()?.location_subtype.as_deref()
    }

    pub fn location(&self) -> Option<&CrimeLocation> {
        self.crime.as_ref()?.location.as_ref()
    }

    pub fn street(&self) -> Option<&Street> {
        self.location()?.street.as_ref()
    }
}

/// Decoded records from one upstream response
#[derive(Debug, Clone, Default)]
pub struct OutcomeBatch {
    pub records: Vec<CrimeRecord>,
    /// Elements of the upstream array that could not be decoded
    pub skipped: usize,
}

/// Registered API user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}
