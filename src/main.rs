use std::{path::Path, sync::Arc};

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use blendr_api::{
    api::{create_router, AppState},
    config::{Config, StorageBackend},
    db::{
        create_pool, create_redis_client, Cache, InMemoryProfileRepository, PgProfileRepository,
        ProfileRepository,
    },
    services::{
        seed, CalorieNinjasProvider, CandidateRanker, CompatibilityScorer,
        GoalCompletionCalculator,
    },
};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("blendr_api=debug,tower_http=info"));

    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::from_env()?;

    let pg_repository = match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = create_pool(&config.database_url)
                .await
                .context("Failed to connect to Postgres")?;
            Some(Arc::new(PgProfileRepository::new(pool)))
        }
        StorageBackend::Memory => None,
    };
    let repository: Arc<dyn ProfileRepository> = match &pg_repository {
        Some(pg) => Arc::clone(pg) as Arc<dyn ProfileRepository>,
        None => Arc::new(InMemoryProfileRepository::new()),
    };
    tracing::info!(backend = repository.name(), "Profile repository ready");

    if let Some(path) = &config.seed_profiles_path {
        seed::seed_from_file(repository.as_ref(), Path::new(path)).await?;
    }

    let redis_client = create_redis_client(&config.redis_url)?;
    let (cache, cache_writer) = Cache::new(redis_client, config.cache_timeout());

    let provider = CalorieNinjasProvider::new(
        cache,
        config.calorie_ninjas_api_key.clone(),
        config.calorie_ninjas_api_url.clone(),
        config.nutrition_cache_ttl,
    );
    let calculator = GoalCompletionCalculator::new(Arc::new(provider), config.nutrition_timeout());
    let ranker = CandidateRanker::new(
        CompatibilityScorer::new(calculator),
        config.max_concurrent_lookups,
    );

    let app = create_router(AppState::new(repository, ranker));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cache_writer.shutdown().await;
    if let Some(pg) = pg_repository {
        pg.close().await;
    }

    tracing::info!("Server stopped");
    Ok(())
}
