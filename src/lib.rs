pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::invoice_service::InvoiceService;
use domain::invoice::INVOICES_PATH;
use infrastructure::invoice_repo::DieselInvoiceRepository;
use infrastructure::page_cache::PageCache;

pub use config::Config;
pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::invoices::create_invoice,
        handlers::invoices::update_invoice,
        handlers::invoices::delete_invoice,
        handlers::invoices::get_invoice,
        handlers::invoices::list_invoices,
    ),
    components(schemas(
        domain::invoice::InvoiceForm,
        domain::invoice::InvoiceStatus,
        errors::FieldIssue,
        handlers::invoices::InvoiceResponse,
        handlers::invoices::ListInvoicesResponse,
    )),
    tags((name = "invoices", description = "Invoice form actions"))
)]
pub struct ApiDoc;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    log::info!("Applied {} pending migration(s)", applied.len());
    Ok(())
}

/// Registers the invoice routes. Expects `web::Data<InvoiceService>` in app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(INVOICES_PATH)
            .route("", web::get().to(handlers::invoices::list_invoices))
            .route("", web::post().to(handlers::invoices::create_invoice))
            .route("/{id}", web::get().to(handlers::invoices::get_invoice))
            .route("/{id}", web::put().to(handlers::invoices::update_invoice))
            .route("/{id}", web::delete().to(handlers::invoices::delete_invoice)),
    );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The pool and the page cache are created once here and shared by every
/// worker. The caller is responsible for `.await`-ing (or `tokio::spawn`-ing)
/// the returned server.
pub fn build_server(
    pool: DbPool,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let service = web::Data::new(InvoiceService::new(
        Arc::new(DieselInvoiceRepository::new(pool)),
        PageCache::new(),
    ));

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(Logger::default())
            .configure(configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
