use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_from_env;
use configs::AppConfig;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use service::auth::repo::seaorm::SeaOrmUserRepository;
use service::expense::repo::seaorm::SeaOrmExpenseRepository;
use service::expense::repository::ExpenseRepository;
use service::expense::ExpenseService;
use service::view::ViewContext;

use crate::errors::StartupError;
use crate::routes::{self, auth};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// `config.toml` (or `CONFIG_PATH`) when present, else environment variables only.
fn load_config() -> Result<AppConfig, StartupError> {
    match AppConfig::load_and_validate() {
        Ok(cfg) => Ok(cfg),
        Err(file_err) => {
            warn!(err = %file_err, "config file unusable, falling back to environment");
            AppConfig::from_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))
        }
    }
}

/// Wire repositories and the expense service into router state.
pub fn build_state(cfg: &AppConfig, db: sea_orm::DatabaseConnection) -> auth::ServerState {
    let view = ViewContext::with_defaults(&cfg.app.base_url, &cfg.app.date_format);
    let repo: Arc<dyn ExpenseRepository> = Arc::new(SeaOrmExpenseRepository { db: db.clone() });
    let expenses = ExpenseService::new(repo, view);
    auth::ServerState {
        auth: auth::ServerAuthConfig { jwt_secret: cfg.app.jwt_secret.clone() },
        users: Arc::new(SeaOrmUserRepository { db }),
        expenses: Arc::new(expenses),
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = load_config()?;

    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    info!("migrations applied");

    let app: Router = routes::build_router(build_state(&cfg, db), build_cors());

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting server crate");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
