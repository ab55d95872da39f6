//! Analytics handlers

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, SecondsFormat};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppError, AppState, MAX_BODY_SIZE};
use tally_core::{
    AnalysisContext, Insight, Period, ProductRecord, SaleRecord, StatisticsReport,
};

/// Request body shared by the analysis endpoints
#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    pub sales: Option<Vec<SaleRecord>>,
    pub products: Option<Vec<ProductRecord>>,
    /// Period tag (default `week`)
    pub period: Option<String>,
    /// First day of a custom period
    pub start: Option<NaiveDate>,
    /// Last day of a custom period
    pub end: Option<NaiveDate>,
}

/// Response for POST /api/analytics
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub success: bool,
    pub insights: Vec<Insight>,
    pub timestamp: String,
}

/// Response for POST /api/statistics
#[derive(Debug, Serialize)]
pub struct StatisticsResponse {
    pub success: bool,
    pub statistics: StatisticsReport,
    pub timestamp: String,
}

/// Validated request contents
struct Snapshot {
    sales: Vec<SaleRecord>,
    products: Vec<ProductRecord>,
    period: Period,
}

/// POST /api/analytics - Generate prioritised insights
pub async fn analytics(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let snapshot = read_snapshot(request).await?;
    let (sale_count, product_count) = (snapshot.sales.len(), snapshot.products.len());

    let worker = state.clone();
    let insights = tokio::task::spawn_blocking(move || {
        let now = worker.engine.config().localize(worker.now());
        let ctx = AnalysisContext::new(&snapshot.sales, &snapshot.products, now)
            .with_period(snapshot.period);
        worker.engine.analyze(&ctx)
    })
    .await
    .map_err(join_error)?;

    info!(
        sales = sale_count,
        products = product_count,
        insights = insights.len(),
        "Generated insights"
    );

    Ok(Json(AnalyticsResponse {
        success: true,
        insights,
        timestamp: timestamp(&state),
    }))
}

/// POST /api/statistics - Dashboard figures for a period
pub async fn statistics(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<StatisticsResponse>, AppError> {
    let snapshot = read_snapshot(request).await?;
    let period = snapshot.period;

    let worker = state.clone();
    let statistics = tokio::task::spawn_blocking(move || {
        let now = worker.engine.config().localize(worker.now());
        let ctx = AnalysisContext::new(&snapshot.sales, &snapshot.products, now)
            .with_period(snapshot.period);
        worker.engine.statistics(&ctx)
    })
    .await
    .map_err(join_error)?;

    info!(
        period = period.as_str(),
        transactions = statistics.total_transactions,
        "Computed statistics"
    );

    Ok(Json(StatisticsResponse {
        success: true,
        statistics,
        timestamp: timestamp(&state),
    }))
}

/// OPTIONS on an analysis endpoint without CORS preflight headers
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Any verb an analysis endpoint does not support
pub async fn method_not_allowed() -> AppError {
    AppError::method_not_allowed()
}

async fn read_snapshot(request: Request) -> Result<Snapshot, AppError> {
    let bytes = axum::body::to_bytes(request.into_body(), MAX_BODY_SIZE)
        .await
        .map_err(|e| AppError::bad_request(&format!("Failed to read request body: {}", e)))?;

    let body: AnalysisRequest =
        serde_json::from_slice(&bytes).map_err(|e| AppError::bad_request(&e.to_string()))?;

    let (Some(sales), Some(products)) = (body.sales, body.products) else {
        return Err(AppError::bad_request("Sales and products data required"));
    };

    let period = Period::from_parts(
        body.period.as_deref().unwrap_or("week"),
        body.start,
        body.end,
    )
    .map_err(|e| AppError::bad_request(&e.to_string()))?;

    Ok(Snapshot {
        sales,
        products,
        period,
    })
}

pub(crate) fn join_error(err: tokio::task::JoinError) -> AppError {
    match err.try_into_panic() {
        Ok(payload) => AppError::panicked(payload),
        Err(err) => err.into(),
    }
}

/// RFC 3339 in UTC with millisecond precision, e.g. `2026-10-19T07:00:00.000Z`
fn timestamp(state: &AppState) -> String {
    state.now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
