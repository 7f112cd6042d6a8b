use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use poem::{Server, listener::TcpListener};
use sqlx::postgres::PgPoolOptions;
use tokio::main;
use tracing::{info, warn};

use auto_sender::{
    application::{Scheduler, services::DispatchService},
    config::Config,
    domain::repositories::{MessageRepository, SentMessageCache},
    infrastructure::{
        cache::RedisSentMessageCache,
        messaging::delivery_for,
        repositories::{InMemoryMessageRepository, PostgresMessageRepository},
    },
    presentation::http::{build_app, endpoints::root::ApiState},
    telemetry::init_tracing,
};

#[main]
async fn main() -> anyhow::Result<()> {
    let config = Config::try_parse()?;
    init_tracing();

    let repository: Arc<dyn MessageRepository> = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(url)
                .await
                .context("failed to connect to postgres")?;
            let repository = PostgresMessageRepository::new(pool);
            repository.migrate().await.context("failed to run migrations")?;
            info!("using postgres message store");
            Arc::new(repository)
        }
        None => {
            info!("DATABASE_URL not set, using seeded in-memory message store");
            Arc::new(InMemoryMessageRepository::seeded().await)
        }
    };

    let cache: Option<Arc<dyn SentMessageCache>> = match &config.redis_url {
        Some(url) => match RedisSentMessageCache::connect(url).await {
            Ok(cache) => Some(Arc::new(cache)),
            Err(err) => {
                warn!(error = %err, "redis unavailable, continuing without sent message cache");
                None
            }
        },
        None => None,
    };

    let delivery = delivery_for(config.webhook.clone())?;
    info!(delivery = delivery.kind(), "delivery configured");

    let dispatch_service = Arc::new(DispatchService::new(repository, cache, delivery));
    let scheduler = Arc::new(Scheduler::new(
        dispatch_service.clone(),
        config.scheduler.clone(),
    ));
    if config.scheduler_autostart {
        scheduler.start().await;
    }

    let server_url = format!("{}://{}:{}", config.scheme, config.host, config.port);
    info!(%server_url, "starting server");

    let state = Arc::new(ApiState {
        scheduler: scheduler.clone(),
        dispatch_service,
    });
    let app = build_app(state, &server_url);

    Server::new(TcpListener::bind(format!("{}:{}", config.host, config.port)))
        .run_with_graceful_shutdown(
            app,
            async {
                let _ = tokio::signal::ctrl_c().await;
            },
            Some(Duration::from_secs(10)),
        )
        .await?;

    scheduler.stop().await;
    info!("shutdown complete");
    Ok(())
}
