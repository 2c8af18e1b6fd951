use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use values_match_service::config::{Config, SourceKind};
use values_match_service::handlers::register_routes;
use values_match_service::services::{CandidateSource, SheetsCandidateSource, StaticCandidateSource};
use values_match_service::AppState;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!(
        "Starting {} v{}",
        config.app.service_name,
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!(
        environment = %config.app.env,
        source = ?config.source.kind,
        geo_enabled = config.geo.enabled,
        "Configuration loaded"
    );

    let source: Arc<dyn CandidateSource> = match config.source.kind {
        SourceKind::Sheets => {
            if config.source.sheets.api_key.is_none() && config.source.sheets.access_token.is_none() {
                tracing::warn!("Neither SHEETS_API_KEY nor SHEETS_ACCESS_TOKEN is set; only public sheets can be read");
            }
            Arc::new(SheetsCandidateSource::new(config.source.sheets.clone())?)
        }
        SourceKind::File => Arc::new(
            StaticCandidateSource::from_json_file(&config.source.candidates_file).await?,
        ),
    };

    let state = web::Data::new(AppState::new(&config, source)?);

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("HTTP server listening on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(register_routes)
    })
    .bind(&bind_address)?
    .run()
    .await?;

    Ok(())
}
