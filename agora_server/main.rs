use std::sync::Arc;

use agora_app::{
    app_bus::AppBus, config::Config, mailer::Mailer, moderation::ModerationService,
};
use agora_db::{establish_connection_pool, seed_demo_data, uow::PostgresUnitOfWorkProvider};
use agora_types::{Result, errors::ApplicationError};
use agora_web::{AppState, WebRouter};

mod logs;
mod mail_transport;

use logs::setup_logging;
use mail_transport::HttpMailTransport;

#[tokio::main]
#[cfg(not(tarpaulin_include))]
async fn main() -> Result<(), ApplicationError> {
    setup_logging();
    let state = setup_app().await?;

    WebRouter::serve(state, 8080).await
}

async fn setup_app() -> Result<AppState, ApplicationError> {
    let config = Arc::new(Config::from_env());
    let db_pool = establish_connection_pool().await?;

    sqlx::migrate!("../migrations")
        .run(&db_pool)
        .await
        .map_err(|e| ApplicationError::Unknown(e.to_string()))?;

    if std::env::var("AGORA_SEED_DEMO_DATA").is_ok() {
        match seed_demo_data(&db_pool).await {
            Ok(true) => tracing::info!("Demo data seeded."),
            Ok(false) => tracing::info!("Database not empty. Skipping demo seed."),
            Err(e) => {
                tracing::error!("Error while seeding demo data: {e}");
                std::process::exit(1);
            }
        }
    }

    let uow_provider = Arc::new(PostgresUnitOfWorkProvider::new(db_pool));
    let app_bus = Arc::new(AppBus::new(config.clone(), uow_provider.clone()));

    let transport = Arc::new(HttpMailTransport::from_env(&config.mail_from));
    let mailer = Arc::new(Mailer::new(transport, uow_provider, config.clone()));
    let moderation = Arc::new(ModerationService::new(app_bus.clone(), mailer, config));

    Ok(AppState::new(app_bus, moderation))
}
