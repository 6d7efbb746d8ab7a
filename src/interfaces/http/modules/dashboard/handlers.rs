//! Dashboard API handlers
//!
//! Every report is computed on request from the customer table.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use super::dto::{SalesQuery, TimelineQuery};
use crate::application::dashboard::{
    ConversionReport, EnergyReport, GeographicReport, OverviewReport, PerformanceReport,
    SalesReport, TimelineReport,
};
use crate::application::DashboardService;
use crate::interfaces::http::common::{domain_error, ApiResponse, ApiResult};

#[derive(Clone)]
pub struct DashboardHandlerState {
    pub dashboard_service: Arc<DashboardService>,
}

#[utoipa::path(
    get,
    path = "/dashboard/overview",
    tag = "Dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Headline counters", body = ApiResponse<OverviewReport>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn overview(State(state): State<DashboardHandlerState>) -> ApiResult<OverviewReport> {
    let report = state
        .dashboard_service
        .overview()
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(report)))
}

#[utoipa::path(
    get,
    path = "/dashboard/metrics/sales",
    tag = "Dashboard",
    security(("bearer_auth" = [])),
    params(SalesQuery),
    responses(
        (status = 200, description = "Daily sales timeline and revenue figures", body = ApiResponse<SalesReport>)
    )
)]
pub async fn sales_metrics(
    State(state): State<DashboardHandlerState>,
    Query(query): Query<SalesQuery>,
) -> ApiResult<SalesReport> {
    let report = state
        .dashboard_service
        .sales(query.period.as_deref())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(report)))
}

#[utoipa::path(
    get,
    path = "/dashboard/metrics/performance",
    tag = "Dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Type/status breakdown and lead quality", body = ApiResponse<PerformanceReport>)
    )
)]
pub async fn performance_metrics(
    State(state): State<DashboardHandlerState>,
) -> ApiResult<PerformanceReport> {
    let report = state
        .dashboard_service
        .performance()
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(report)))
}

#[utoipa::path(
    get,
    path = "/dashboard/metrics/geographic",
    tag = "Dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Distribution by city and state", body = ApiResponse<GeographicReport>)
    )
)]
pub async fn geographic_metrics(
    State(state): State<DashboardHandlerState>,
) -> ApiResult<GeographicReport> {
    let report = state
        .dashboard_service
        .geographic()
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(report)))
}

#[utoipa::path(
    get,
    path = "/dashboard/metrics/timeline",
    tag = "Dashboard",
    security(("bearer_auth" = [])),
    params(TimelineQuery),
    responses(
        (status = 200, description = "New customers per day", body = ApiResponse<TimelineReport>),
        (status = 400, description = "Window longer than 3650 days")
    )
)]
pub async fn timeline_metrics(
    State(state): State<DashboardHandlerState>,
    Query(query): Query<TimelineQuery>,
) -> ApiResult<TimelineReport> {
    let report = state
        .dashboard_service
        .timeline(query.days)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(report)))
}

#[utoipa::path(
    get,
    path = "/dashboard/metrics/conversion",
    tag = "Dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Funnel and conversion rates", body = ApiResponse<ConversionReport>)
    )
)]
pub async fn conversion_metrics(
    State(state): State<DashboardHandlerState>,
) -> ApiResult<ConversionReport> {
    let report = state
        .dashboard_service
        .conversion()
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(report)))
}

#[utoipa::path(
    get,
    path = "/dashboard/metrics/energy-analysis",
    tag = "Dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Consumption by installation type and range", body = ApiResponse<EnergyReport>)
    )
)]
pub async fn energy_analysis(
    State(state): State<DashboardHandlerState>,
) -> ApiResult<EnergyReport> {
    let report = state
        .dashboard_service
        .energy()
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(report)))
}
