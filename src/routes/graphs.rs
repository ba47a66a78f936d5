use actix_web::{web, HttpResponse};

use crate::auth::AuthenticatedUser;
use crate::core::{breakdown_figure, combined_figure, Breakdown};
use crate::error::ApiError;
use crate::models::ChartResponse;
use crate::routes::crimes::load_month;
use crate::routes::AppState;
use crate::services::ChartError;

/// Configure chart routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/code_count/graph/{date}", web::get().to(code_count_graph))
        .route("/location_count/graph/{date}", web::get().to(location_count_graph))
        .route("/crime_count/graph/{date}", web::get().to(crime_count_graph))
        .route("/all_graphs/{date}", web::get().to(all_graphs));
}

fn ensure_charting(state: &AppState) -> Result<(), ApiError> {
    if state.charts.is_configured() {
        Ok(())
    } else {
        Err(ChartError::NotConfigured.into())
    }
}

async fn breakdown_graph(
    state: &AppState,
    date: &str,
    breakdown: Breakdown,
) -> Result<HttpResponse, ApiError> {
    ensure_charting(state)?;

    let (month, batch) = load_month(state, date).await?;
    let rows = breakdown.tabulate(&batch.records);
    let figure = breakdown_figure(breakdown, &month, &rows);

    let filename = format!("{}_{}", breakdown.slug(), month);
    let url = state.charts.plot(&filename, &figure).await?;

    Ok(HttpResponse::Ok().json(ChartResponse { url }))
}

/// GET /api/code_count/graph/{date}
async fn code_count_graph(
    _user: AuthenticatedUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    breakdown_graph(&state, &path, Breakdown::Outcome).await
}

/// GET /api/location_count/graph/{date}
async fn location_count_graph(
    _user: AuthenticatedUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    breakdown_graph(&state, &path, Breakdown::Location).await
}

/// GET /api/crime_count/graph/{date}
async fn crime_count_graph(
    _user: AuthenticatedUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    breakdown_graph(&state, &path, Breakdown::Category).await
}

/// All three breakdowns as counts on one chart
///
/// GET /api/all_graphs/{date}
async fn all_graphs(
    _user: AuthenticatedUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    ensure_charting(&state)?;

    let (month, batch) = load_month(&state, &path).await?;
    let figure = combined_figure(
        &month,
        &Breakdown::Location.tabulate(&batch.records),
        &Breakdown::Category.tabulate(&batch.records),
        &Breakdown::Outcome.tabulate(&batch.records),
    );

    let url = state
        .charts
        .plot(&format!("all_graphs_{}", month), &figure)
        .await?;

    Ok(HttpResponse::Ok().json(ChartResponse { url }))
}
