use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use coinsim_backend::{
    config::settings::Settings,
    db::history,
    routes::{health::health_scope, market::market_scope, orders::orders_scope},
    services::{catalog::Catalog, pin::PinStore, session::SessionStore},
};

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_logging();
    println!("Starting coinsim backend…");

    let settings = Settings::new().unwrap_or_else(|e| {
        eprintln!("Failed to load settings: {e}");
        std::process::exit(1);
    });

    let port = settings.server_port;

    // Optional historical store. A missing or broken database only means
    // every series comes from the generator.
    let history_pool: Option<SqlitePool> = match settings.database_url.as_deref() {
        Some(url) => match SqlitePoolOptions::new().max_connections(5).connect(url).await {
            Ok(pool) => match history::ensure_schema(&pool).await {
                Ok(()) => Some(pool),
                Err(e) => {
                    log::warn!("historical store schema: {e}; serving synthetic data only");
                    None
                }
            },
            Err(e) => {
                log::warn!("historical store unavailable: {e}; serving synthetic data only");
                None
            }
        },
        None => None,
    };

    let catalog = web::Data::new(Catalog::standard());
    let sessions = web::Data::new(SessionStore::new());
    let pins = web::Data::new(PinStore::new(settings.order_pin.as_str()));
    let pool_data = web::Data::new(history_pool);
    let settings_data = web::Data::new(settings);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(settings_data.clone())
            .app_data(catalog.clone())
            .app_data(sessions.clone())
            .app_data(pins.clone())
            .app_data(pool_data.clone())
            .service(health_scope())
            .service(market_scope())
            .service(orders_scope())
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
