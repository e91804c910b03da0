use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use common::types::ApiResponse;
use service::customer::{CustomerDetail, CustomerListItem, CustomerUpdate, NewCustomer, SortOrder};

use crate::{errors::ApiError, state::ServerState};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub sort: Option<String>,
}

pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<CustomerListItem>>>, ApiError> {
    let Query(q) = query?;
    let sort = q.sort.as_deref().and_then(SortOrder::parse);
    if sort.is_none() && q.sort.is_some() {
        debug!(sort = ?q.sort, "unknown sort key ignored");
    }
    let items = state.customers.list(sort).await?;
    info!(count = items.len(), "list customers");
    Ok(Json(ApiResponse::ok(items)))
}

pub async fn get(
    State(state): State<ServerState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ApiResponse<CustomerDetail>>, ApiError> {
    let Path(id) = path?;
    let detail = state.customers.get(id).await?;
    Ok(Json(ApiResponse::ok(detail)))
}

pub async fn create(
    State(state): State<ServerState>,
    body: Result<Json<NewCustomer>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<CustomerDetail>>), ApiError> {
    let Json(input) = body?;
    let created = state.customers.add(input).await?;
    info!(id = %created.id, "created customer");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok_with_message(created, "customer created"))))
}

pub async fn update(
    State(state): State<ServerState>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<NewCustomer>, JsonRejection>,
) -> Result<Json<ApiResponse<CustomerDetail>>, ApiError> {
    let Path(id) = path?;
    let Json(input) = body?;
    let updated = state.customers.update(CustomerUpdate::with_id(id, input)).await?;
    info!(id = %updated.id, "updated customer");
    Ok(Json(ApiResponse::ok_with_message(updated, "customer updated")))
}

pub async fn delete(
    State(state): State<ServerState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let Path(id) = path?;
    state.customers.delete(id).await?;
    info!(id = %id, "deleted customer");
    Ok(Json(ApiResponse::done("customer deleted")))
}
