use actix_web::http::header;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::invoice_service::InvoiceService;
use crate::domain::invoice::{Invoice, InvoiceForm, InvoiceStatus, Redirect, INVOICES_PATH};
use crate::errors::AppError;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceResponse {
    pub id: Uuid,
    #[serde(rename = "customerId")]
    pub customer_id: String,
    /// Amount in cents
    pub amount: i32,
    pub status: InvoiceStatus,
    /// ISO date, e.g. "2024-03-05"
    pub date: String,
}

impl From<Invoice> for InvoiceResponse {
    fn from(invoice: Invoice) -> Self {
        Self {
            id: invoice.id,
            customer_id: invoice.customer_id,
            amount: invoice.amount_in_cents,
            status: invoice.status,
            date: invoice.date.format("%Y-%m-%d").to_string(),
        }
    }
}

// ── Pagination ───────────────────────────────────────────────────────────────

pub const DEFAULT_PAGE_LIMIT: i64 = 20;
pub const MAX_PAGE_LIMIT: i64 = 100;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListInvoicesParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_LIMIT
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListInvoicesResponse {
    pub items: Vec<InvoiceResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

fn see_other(redirect: Redirect) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, redirect.location()))
        .finish()
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /dashboard/invoices
///
/// Validates the form, stores the invoice in cents with today's date and
/// redirects back to the listing.
#[utoipa::path(
    post,
    path = "/dashboard/invoices",
    request_body(content = InvoiceForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Invoice created; redirect to the listing"),
        (status = 400, description = "Invalid form fields"),
        (status = 500, description = "Invoice creation failed"),
    ),
    tag = "invoices"
)]
pub async fn create_invoice(
    service: web::Data<InvoiceService>,
    form: web::Form<InvoiceForm>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();

    let redirect = web::block(move || service.create_invoice(&form))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(see_other(redirect))
}

/// PUT /dashboard/invoices/{id}
///
/// Overwrites customer, amount and status. An unknown id changes nothing and
/// still redirects.
#[utoipa::path(
    put,
    path = "/dashboard/invoices/{id}",
    params(
        ("id" = Uuid, Path, description = "Invoice UUID"),
    ),
    request_body(content = InvoiceForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Invoice updated; redirect to the listing"),
        (status = 400, description = "Invalid form fields"),
        (status = 500, description = "Invoice update failed"),
    ),
    tag = "invoices"
)]
pub async fn update_invoice(
    service: web::Data<InvoiceService>,
    path: web::Path<Uuid>,
    form: web::Form<InvoiceForm>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let form = form.into_inner();

    let redirect = web::block(move || service.update_invoice(id, &form))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(see_other(redirect))
}

/// DELETE /dashboard/invoices/{id}
///
/// Idempotent. The caller stays where it is, so there is no redirect.
#[utoipa::path(
    delete,
    path = "/dashboard/invoices/{id}",
    params(
        ("id" = Uuid, Path, description = "Invoice UUID"),
    ),
    responses(
        (status = 204, description = "Invoice deleted, or it did not exist"),
        (status = 500, description = "Invoice deletion failed"),
    ),
    tag = "invoices"
)]
pub async fn delete_invoice(
    service: web::Data<InvoiceService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    web::block(move || service.delete_invoice(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}

/// GET /dashboard/invoices/{id}
#[utoipa::path(
    get,
    path = "/dashboard/invoices/{id}",
    params(
        ("id" = Uuid, Path, description = "Invoice UUID"),
    ),
    responses(
        (status = 200, description = "Invoice found", body = InvoiceResponse),
        (status = 404, description = "Invoice not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "invoices"
)]
pub async fn get_invoice(
    service: web::Data<InvoiceService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let invoice = web::block(move || service.get_invoice(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(InvoiceResponse::from(invoice)))
}

/// GET /dashboard/invoices
///
/// The rendered page is cached per (page, limit) until the next mutation
/// revalidates it. `x-cache` tells whether it was served from cache.
#[utoipa::path(
    get,
    path = "/dashboard/invoices",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
    ),
    responses(
        (status = 200, description = "Paginated list of invoices", body = ListInvoicesResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "invoices"
)]
pub async fn list_invoices(
    service: web::Data<InvoiceService>,
    query: web::Query<ListInvoicesParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, MAX_PAGE_LIMIT);

    // Unknown query parameters must not mint new entries.
    let cache_key = format!("{}?page={}&limit={}", INVOICES_PATH, page, limit);
    if let Some(body) = service.page_cache().get(&cache_key) {
        return Ok(page_response(body, "HIT"));
    }

    let generation = service.page_cache().generation();
    let worker = service.clone();
    let result = web::block(move || worker.list_invoices(page, limit))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body = serde_json::to_string(&ListInvoicesResponse {
        items: result.items.into_iter().map(InvoiceResponse::from).collect(),
        total: result.total,
        page,
        limit,
    })
    .map_err(|e| AppError::Internal(e.to_string()))?;

    if !service
        .page_cache()
        .store_if_fresh(cache_key, body.clone(), generation)
    {
        log::debug!("Invoice listing changed while rendering; not caching page {}", page);
    }
    Ok(page_response(body, "MISS"))
}

fn page_response(body: String, cache_status: &'static str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/json")
        .insert_header(("x-cache", cache_status))
        .body(body)
}
