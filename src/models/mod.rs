// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Crime, CrimeLocation, CrimeRecord, OutcomeBatch, OutcomeCategory, Street, User};
pub use requests::SignupRequest;
pub use responses::{ChartResponse, ErrorResponse, HealthResponse, TokenResponse, UsernameResponse};
