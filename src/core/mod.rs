// Core data-shaping exports
pub mod aggregate;
pub mod breakdown;
pub mod charts;
pub mod flatten;
pub mod month;
pub mod normalize;

pub use aggregate::{aggregate_by, frequency_table, FrequencyRow};
pub use breakdown::Breakdown;
pub use charts::{breakdown_figure, combined_figure, Figure};
pub use flatten::{flatten_records, to_csv, FlatRecord, OutputFormat, RecordLimit, SelectionError};
pub use month::{MonthError, YearMonth};
pub use normalize::normalize_label;
