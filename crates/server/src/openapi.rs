use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Create/update body. `client_id` and `vendor_id` are public ids; 0 unlinks.
#[derive(ToSchema)]
pub struct ExpenseInputDoc {
    pub amount: Option<f64>,
    /// `YYYY-MM-DD`
    pub expense_date: Option<String>,
    pub expense_currency_id: Option<i32>,
    pub invoice_currency_id: Option<i32>,
    pub exchange_rate: Option<f64>,
    pub public_notes: Option<String>,
    pub private_notes: Option<String>,
    pub should_be_invoiced: Option<bool>,
    pub client_id: Option<i64>,
    pub vendor_id: Option<i64>,
}

#[derive(ToSchema)]
pub struct DatatableResponseDoc {
    pub entity: String,
    pub headings: Vec<String>,
    /// HTML cells, one inner array per row.
    pub rows: Vec<Vec<String>>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::expenses::list,
        crate::routes::expenses::create,
        crate::routes::expenses::update,
        crate::routes::expenses::list_for_vendor,
    ),
    components(
        schemas(
            HealthResponse,
            ExpenseInputDoc,
            DatatableResponseDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "expenses")
    )
)]
pub struct ApiDoc;
