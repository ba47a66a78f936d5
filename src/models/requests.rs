use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to register a new user
///
/// Both fields are optional at the serde level so that a missing field is
/// reported as a validation failure rather than a JSON parse error.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 32))]
    #[serde(default)]
    pub username: Option<String>,
    #[validate(length(min = 1))]
    #[serde(default)]
    pub password: Option<String>,
}
