//! Article Recommender Service
//!
//! Loads the precomputed artifacts, then serves last-click recommendations
//! over HTTP. Startup fails if any artifact cannot be loaded.

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use article_recs_core::{
    init_logging, load_dotenv, ArtifactConfig, ConfigLoader, RecommendationConfig, ServiceConfig,
};
use article_recs_engine::{
    configure_routes, AppState, ArtifactStore, FsArtifactSource, Recommender,
};
use std::sync::Arc;
use tracing::{info, warn};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let service_config = ServiceConfig::from_env().context("Failed to load service configuration")?;
    service_config.validate()?;
    let artifact_config =
        ArtifactConfig::from_env().context("Failed to load artifact configuration")?;
    artifact_config.validate()?;
    let recommendation_config = RecommendationConfig::from_env()
        .context("Failed to load recommendation configuration")?;
    recommendation_config.validate()?;

    init_logging(&service_config.log_config())?;

    info!(
        artifact_dir = %artifact_config.dir.display(),
        "Starting recommender service"
    );

    let source = Arc::new(FsArtifactSource::from_config(&artifact_config));
    let store = Arc::new(
        ArtifactStore::load(source)
            .await
            .context("Failed to load recommendation artifacts")?,
    );

    let refresh_task = artifact_config.refresh_interval.map(|interval| {
        info!(interval_secs = interval.as_secs(), "Periodic artifact refresh enabled");
        Arc::clone(&store).spawn_refresh(interval)
    });

    let recommender = Arc::new(Recommender::new(store, recommendation_config));
    if service_config.admin_token.is_none() {
        warn!("No admin token configured, admin routes are disabled");
    }
    let state = web::Data::new(AppState {
        recommender,
        admin_token: service_config.admin_token.clone(),
    });

    let bind_addr = service_config.bind_addr();
    info!(
        bind_addr = %bind_addr,
        workers = service_config.workers,
        "Recommender service listening"
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(configure_routes)
    })
    .workers(service_config.workers)
    .bind(&bind_addr)
    .with_context(|| format!("Failed to bind {}", bind_addr))?
    .run()
    .await?;

    if let Some(task) = refresh_task {
        task.abort();
    }

    info!("Recommender service stopped");
    Ok(())
}
