use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;

use common::pagination::Pagination;
use models::expense;
use service::auth::CurrentUser;
use service::datatable::DatatableResponse;
use service::expense::domain::ExpenseInput;

use crate::errors::JsonApiError;
use crate::routes::auth::ServerState;

/// Query string of the datatable endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DatatableParams {
    /// Matches public notes, client and vendor names.
    pub search: Option<String>,
    /// Include archived expenses; defaults to true.
    pub show_trashed: Option<bool>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl DatatableParams {
    pub fn pagination(&self) -> Pagination {
        let d = Pagination::default();
        Pagination { page: self.page.unwrap_or(d.page), per_page: self.per_page.unwrap_or(d.per_page) }
    }
}

#[utoipa::path(get, path = "/api/expenses", tag = "expenses", params(DatatableParams),
    responses((status = 200, description = "Rendered datatable page", body = crate::openapi::DatatableResponseDoc), (status = 401, description = "Unauthorized")))]
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(q): Query<DatatableParams>,
) -> Result<Json<DatatableResponse>, JsonApiError> {
    let table = state
        .expenses
        .get_datatable(&user, q.search.as_deref(), q.show_trashed.unwrap_or(true), q.pagination())
        .await?;
    Ok(Json(table))
}

#[utoipa::path(post, path = "/api/expenses", tag = "expenses", request_body = crate::openapi::ExpenseInputDoc,
    responses((status = 201, description = "Created"), (status = 400, description = "Bad Request"), (status = 403, description = "Forbidden"), (status = 404, description = "Linked client or vendor not found")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(mut input): Json<ExpenseInput>,
) -> Result<(StatusCode, Json<expense::Model>), JsonApiError> {
    input.public_id = None;
    let saved = state.expenses.save(&user, input, true).await?;
    info!(public_id = saved.public_id, user_id = %user.id, "created expense");
    Ok((StatusCode::CREATED, Json(saved)))
}

#[utoipa::path(put, path = "/api/expenses/{public_id}", tag = "expenses", request_body = crate::openapi::ExpenseInputDoc,
    params(("public_id" = i64, Path, description = "Expense public id")),
    responses((status = 200, description = "Updated"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(public_id): Path<i64>,
    Json(mut input): Json<ExpenseInput>,
) -> Result<Json<expense::Model>, JsonApiError> {
    input.public_id = Some(public_id);
    let saved = state.expenses.save(&user, input, true).await?;
    Ok(Json(saved))
}

#[utoipa::path(get, path = "/api/vendors/{public_id}/expenses", tag = "expenses",
    params(("public_id" = i64, Path, description = "Vendor public id"), DatatableParams),
    responses((status = 200, description = "Rendered datatable page", body = crate::openapi::DatatableResponseDoc)))]
pub async fn list_for_vendor(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(vendor_public_id): Path<i64>,
    Query(q): Query<DatatableParams>,
) -> Result<Json<DatatableResponse>, JsonApiError> {
    let table = state.expenses.get_datatable_vendor(&user, vendor_public_id, q.pagination()).await?;
    Ok(Json(table))
}
