use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};

use crate::auth::AuthenticatedUser;
use crate::core::{flatten_records, to_csv, Breakdown, OutputFormat, RecordLimit, YearMonth};
use crate::error::ApiError;
use crate::models::OutcomeBatch;
use crate::routes::AppState;

/// Configure crime data and count routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/all_crime_data/{date}/{n_records}/{format}",
        web::get().to(all_crime_data),
    )
    .route("/code_count/{date}", web::get().to(code_count))
    .route("/location_count/{date}", web::get().to(location_count))
    .route("/crime_count/{date}", web::get().to(crime_count));
}

/// Parse the date segment and fetch that month's outcomes
pub(crate) async fn load_month(
    state: &AppState,
    date: &str,
) -> Result<(YearMonth, OutcomeBatch), ApiError> {
    let month = YearMonth::parse_compact(date)?;
    let batch = state.crime_api.fetch_outcomes(&month).await?;
    Ok((month, batch))
}

async fn breakdown_counts(
    state: &AppState,
    date: &str,
    breakdown: Breakdown,
) -> Result<HttpResponse, ApiError> {
    let (month, batch) = load_month(state, date).await?;
    let rows = breakdown.tabulate(&batch.records);

    tracing::debug!(
        "{} for {}: {} labels over {} records",
        breakdown.slug(),
        month,
        rows.len(),
        batch.records.len()
    );

    Ok(HttpResponse::Ok().json(rows))
}

/// Outcome code frequencies
///
/// GET /api/code_count/{date}
async fn code_count(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    breakdown_counts(&state, &path, Breakdown::Outcome).await
}

/// Location subtype frequencies
///
/// GET /api/location_count/{date}
async fn location_count(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    breakdown_counts(&state, &path, Breakdown::Location).await
}

/// Crime category frequencies
///
/// GET /api/crime_count/{date}
async fn crime_count(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    breakdown_counts(&state, &path, Breakdown::Category).await
}

/// Flattened outcome records
///
/// GET /api/all_crime_data/{date}/{n_records|All}/{csv|json}
///
/// CSV output is returned as an attachment rather than written server-side.
async fn all_crime_data(
    _user: AuthenticatedUser,
    state: web::Data<AppState>,
    path: web::Path<(String, String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (date, n_records, format) = path.into_inner();

    // Reject bad parameters before spending an upstream call
    let month = YearMonth::parse_compact(&date)?;
    let limit: RecordLimit = n_records.parse()?;
    let format: OutputFormat = format.parse()?;

    let batch = state.crime_api.fetch_outcomes(&month).await?;
    let rows = flatten_records(&batch.records, limit)?;

    match format {
        OutputFormat::Json => Ok(HttpResponse::Ok().json(rows)),
        OutputFormat::Csv => {
            let body = to_csv(&rows).map_err(|e| ApiError::Internal(e.to_string()))?;
            let filename = match limit {
                RecordLimit::All => format!("all_records_during_{}.csv", month),
                RecordLimit::First(n) => format!("{}_records_during_{}.csv", n, month),
            };

            Ok(HttpResponse::Ok()
                .content_type("text/csv; charset=utf-8")
                .insert_header(ContentDisposition {
                    disposition: DispositionType::Attachment,
                    parameters: vec![DispositionParam::Filename(filename)],
                })
                .body(body))
        }
    }
}
