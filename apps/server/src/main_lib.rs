use std::sync::Arc;

use crate::config::{Config, LogFormat};
use sitebook_core::cost_codes::{CostCodeService, CostCodeServiceTrait};
use sitebook_storage_sqlite::{cost_codes::CostCodeRepository, db};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub cost_code_service: Arc<dyn CostCodeServiceTrait>,
}

pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry.with(fmt::layer()).init(),
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let cost_code_repository = Arc::new(CostCodeRepository::new(pool, writer));
    let cost_code_service: Arc<dyn CostCodeServiceTrait> =
        Arc::new(CostCodeService::new(cost_code_repository));

    Ok(Arc::new(AppState { cost_code_service }))
}
