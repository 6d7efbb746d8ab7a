//! Customer API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use super::dto::{CreateCustomerRequest, CustomerDto, CustomerQuery, UpdateCustomerRequest};
use crate::application::customers::CustomerStatistics;
use crate::application::CustomerService;
use crate::domain::solar::SolarEstimate;
use crate::interfaces::http::common::{
    domain_error, ApiError, ApiResponse, ApiResult, MessageResponse, ValidatedJson,
};

#[derive(Clone)]
pub struct CustomerHandlerState {
    pub customer_service: Arc<CustomerService>,
}

#[utoipa::path(
    post,
    path = "/customers",
    tag = "Customers",
    security(("bearer_auth" = [])),
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = ApiResponse<CustomerDto>),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_customer(
    State(state): State<CustomerHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CustomerDto>>), ApiError<CustomerDto>> {
    let customer = state
        .customer_service
        .create(request.into())
        .await
        .map_err(domain_error)?;

    info!(customer_id = %customer.id, status = %customer.status, "Customer created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(customer.into())),
    ))
}

#[utoipa::path(
    get,
    path = "/customers",
    tag = "Customers",
    security(("bearer_auth" = [])),
    params(CustomerQuery),
    responses(
        (status = 200, description = "Matching customers, newest first", body = ApiResponse<Vec<CustomerDto>>)
    )
)]
pub async fn list_customers(
    State(state): State<CustomerHandlerState>,
    Query(query): Query<CustomerQuery>,
) -> ApiResult<Vec<CustomerDto>> {
    let customers = state
        .customer_service
        .list(query.into())
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(
        customers.into_iter().map(CustomerDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/customers/statistics",
    tag = "Customers",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Customer statistics", body = ApiResponse<CustomerStatistics>)
    )
)]
pub async fn customer_statistics(
    State(state): State<CustomerHandlerState>,
) -> ApiResult<CustomerStatistics> {
    let stats = state
        .customer_service
        .statistics()
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(stats)))
}

#[utoipa::path(
    get,
    path = "/customers/{id}",
    tag = "Customers",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer", body = ApiResponse<CustomerDto>),
        (status = 404, description = "Customer not found")
    )
)]
pub async fn get_customer(
    State(state): State<CustomerHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<CustomerDto> {
    let customer = state
        .customer_service
        .get(&id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(customer.into())))
}

#[utoipa::path(
    get,
    path = "/customers/{id}/solar-potential",
    tag = "Customers",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Solar-potential estimate", body = ApiResponse<SolarEstimate>),
        (status = 404, description = "Customer not found"),
        (status = 409, description = "Customer has no usable consumption figure")
    )
)]
pub async fn solar_potential(
    State(state): State<CustomerHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<SolarEstimate> {
    let estimate = state
        .customer_service
        .solar_potential(&id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(estimate)))
}

#[utoipa::path(
    patch,
    path = "/customers/{id}",
    tag = "Customers",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Customer ID")),
    request_body = UpdateCustomerRequest,
    responses(
        (status = 200, description = "Customer updated", body = ApiResponse<CustomerDto>),
        (status = 404, description = "Customer not found"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn update_customer(
    State(state): State<CustomerHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateCustomerRequest>,
) -> ApiResult<CustomerDto> {
    let customer = state
        .customer_service
        .update(&id, request.into())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(customer.into())))
}

#[utoipa::path(
    delete,
    path = "/customers/{id}",
    tag = "Customers",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer deleted", body = ApiResponse<MessageResponse>),
        (status = 404, description = "Customer not found")
    )
)]
pub async fn delete_customer(
    State(state): State<CustomerHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<MessageResponse> {
    state
        .customer_service
        .delete(&id)
        .await
        .map_err(domain_error)?;

    info!(customer_id = %id, "Customer deleted");
    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Customer deleted",
    ))))
}
