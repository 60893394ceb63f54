use std::{path::Path, time::Duration};

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use futures::FutureExt;
use log::*;
use storefront_engine::{
    events::{EventHandlers, EventHooks, EventProducers},
    AddressApi,
    BuyerLocks,
    CartApi,
    CatalogApi,
    OrderFlowApi,
    SqliteDatabase,
};

use crate::{
    auth::TokenVerifier,
    config::ServerConfig,
    errors::ServerError,
    middleware::AuthenticationMiddlewareFactory,
    routes::{
        health,
        AddAddressRoute,
        AddProductRoute,
        AllOrdersRoute,
        CheckTokenRoute,
        DeleteAddressRoute,
        MyAddressesRoute,
        MyCartRoute,
        MyOrdersRoute,
        PlaceCodOrderRoute,
        ProductByIdRoute,
        ProductListRoute,
        UpdateCartRoute,
        UpdateOrderStatusRoute,
        UpdatePriceRoute,
        UpdateStockRoute,
    },
};

const EVENT_BUFFER_SIZE: usize = 25;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = connect_and_migrate(&config).await?;
    let handlers = EventHandlers::new(EVENT_BUFFER_SIZE, default_hooks());
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

/// Opens (creating it if needed) the database at `SF_DATABASE_URL` and brings its schema up to date.
pub async fn connect_and_migrate(config: &ServerConfig) -> Result<SqliteDatabase, ServerError> {
    ensure_database_dir(&config.database_url)?;
    let db = SqliteDatabase::new_with_url(&config.database_url, config.max_connections, config.db_timeout)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    info!("🚀️ Database at {} is ready", config.database_url);
    Ok(db)
}

fn ensure_database_dir(url: &str) -> Result<(), ServerError> {
    let path = url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
    if path.is_empty() || path.starts_with(":memory:") {
        return Ok(());
    }
    match Path::new(path).parent() {
        Some(dir) if !dir.as_os_str().is_empty() => Ok(std::fs::create_dir_all(dir)?),
        _ => Ok(()),
    }
}

/// Hooks that the server registers for itself. They only log for now, and are the place to hang fulfilment
/// notifications off.
pub fn default_hooks() -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks
        .on_order_placed(|ev| {
            async move {
                info!("📬️ New COD order #{} for {} from {}", ev.order.id, ev.order.amount, ev.order.buyer_id);
            }
            .boxed()
        })
        .on_order_status_changed(|ev| {
            async move {
                info!("📬️ Order #{} moved from {} to {}", ev.order.id, ev.old_status, ev.order.status);
            }
            .boxed()
        });
    hooks
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    // Shared by every worker, so that a buyer is serialised no matter which worker picks up the request.
    let locks = BuyerLocks::new(config.db_timeout);
    let catalog_api = web::Data::new(CatalogApi::new(db.clone()));
    let cart_api = web::Data::new(CartApi::new(db.clone(), locks.clone()));
    let address_api = web::Data::new(AddressApi::new(db.clone()));
    let order_api = web::Data::new(OrderFlowApi::new(db, locks, producers));
    let verifier = TokenVerifier::new(&config.auth);
    let srv = HttpServer::new(move || {
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("sf::access_log"))
            .app_data(catalog_api.clone())
            .app_data(cart_api.clone())
            .app_data(address_api.clone())
            .app_data(order_api.clone())
            .app_data(json_config())
            .app_data(path_config());
        let api_scope = web::scope("/api")
            .wrap(AuthenticationMiddlewareFactory::new(verifier.clone()))
            .service(CheckTokenRoute::new())
            .service(ProductListRoute::<SqliteDatabase>::new())
            .service(ProductByIdRoute::<SqliteDatabase>::new())
            .service(AddProductRoute::<SqliteDatabase>::new())
            .service(UpdateStockRoute::<SqliteDatabase>::new())
            .service(UpdatePriceRoute::<SqliteDatabase>::new())
            .service(MyCartRoute::<SqliteDatabase>::new())
            .service(UpdateCartRoute::<SqliteDatabase>::new())
            .service(AddAddressRoute::<SqliteDatabase>::new())
            .service(MyAddressesRoute::<SqliteDatabase>::new())
            .service(DeleteAddressRoute::<SqliteDatabase>::new())
            .service(PlaceCodOrderRoute::<SqliteDatabase>::new())
            .service(MyOrdersRoute::<SqliteDatabase>::new())
            .service(AllOrdersRoute::<SqliteDatabase>::new())
            .service(UpdateOrderStatusRoute::<SqliteDatabase>::new());
        app.service(health).service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Malformed JSON bodies are reported in the standard error envelope with a 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        debug!("💻️ Rejecting request body. {err}");
        ServerError::InvalidRequestBody(err.to_string()).into()
    })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| ServerError::InvalidRequestPath(err.to_string()).into())
}
