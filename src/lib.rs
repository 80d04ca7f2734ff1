pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::order_service::OrderService;
use errors::{AppError, StartupError};
use handlers::orders::{self as order_handlers, Service};
use infrastructure::order_repo::DieselOrderRepository;

pub use config::Config;
pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(OpenApi)]
#[openapi(
    paths(
        order_handlers::list_orders,
        order_handlers::order_summary,
        order_handlers::create_order,
        order_handlers::get_order,
        order_handlers::update_order,
        order_handlers::set_highlight,
        order_handlers::delete_order,
        order_handlers::delete_order_items,
    ),
    components(schemas(
        order_handlers::CreateOrderRequest,
        order_handlers::UpdateOrderRequest,
        order_handlers::OrderItemRequest,
        order_handlers::HighlightRequest,
        order_handlers::OrderResponse,
        order_handlers::OrderItemResponse,
        order_handlers::OrderSummaryResponse,
        handlers::payload::LooseNumber,
    )),
    tags((name = "orders", description = "Bakery order management"))
)]
pub struct ApiDoc;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), StartupError> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| StartupError::Migration(e.to_string()))?;
    Ok(())
}

/// Wrap a pool in the shared application state used by the handlers.
pub fn app_state(pool: DbPool) -> web::Data<Service> {
    web::Data::new(OrderService::new(DieselOrderRepository::new(pool)))
}

/// Register the order routes and the JSON extractor error handling.
///
/// Malformed bodies become `400` responses in the same shape as the
/// handlers' own validation errors.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into());

    cfg.app_data(json_config).service(
        web::scope("/orders")
            .route("", web::get().to(order_handlers::list_orders))
            .route("", web::post().to(order_handlers::create_order))
            .route("/summary", web::get().to(order_handlers::order_summary))
            .route("/{id}", web::get().to(order_handlers::get_order))
            .route("/{id}", web::put().to(order_handlers::update_order))
            .route("/{id}", web::delete().to(order_handlers::delete_order))
            .route("/{id}/highlight", web::put().to(order_handlers::set_highlight))
            .route("/{id}/items", web::delete().to(order_handlers::delete_order_items)),
    );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let state = app_state(pool);
    let openapi = ApiDoc::openapi();

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
