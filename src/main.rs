use std::{net::SocketAddr, sync::Arc};

use portfolio_blog::{
    config::Config,
    content_loader::PostStore,
    hot_reload::start_content_watcher,
    mailer::Mailer,
    routes,
    state::AppState,
};
use tokio::{net::TcpListener, sync::broadcast};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    info!("RUST_ENV is set to development: {}", config.is_development);

    let mailer = Mailer::from_config(config.smtp.as_ref())?;
    if !mailer.is_enabled() {
        warn!("SMTP credentials not set, contact form submissions will not be emailed");
    }

    let state = Arc::new(AppState {
        posts: PostStore::new(&config.posts_dir),
        mailer,
        is_development: config.is_development,
        contact_email: config.contact_email.clone(),
    });

    let (tx, _rx) = broadcast::channel(1);
    if config.is_development {
        info!("Hot reload enabled. Check logs for file change events.");
        start_content_watcher(
            tx.clone(),
            vec![config.posts_dir.clone(), config.static_dir.clone()],
        );
    }

    let app = routes::router(state, tx, &config.static_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(%addr, "listening");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
