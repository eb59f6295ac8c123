use anyhow::{Context, Result};
use portfolio_routing::config::Config;
use portfolio_routing::i18n::{Catalog, LocaleRegistry};
use portfolio_routing::routing::{LocaleRouter, RoutingValidator};
use portfolio_routing::server::{self, AppState};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("portfolio_routing=info".parse()?),
        )
        .init();

    info!("Starting portfolio routing service");

    // Load configuration from environment
    let config = Config::from_env()?;

    // Build and validate the routing configuration; any error refuses startup
    let registry = LocaleRegistry::reference(&config.default_locale)?;
    let (router, report) = LocaleRouter::reference_builder(registry)
        .prefix(config.locale_prefix)
        .detection(config.effective_detection())
        .build()?;

    let catalog = Catalog::reference();
    let labels =
        RoutingValidator::validate_labels(router.registry(), &catalog, router.navigation());
    for warning in report.warnings.iter().chain(&labels.warnings) {
        warn!("{}", warning);
    }

    info!(
        "Serving {} locales (default '{}'), {} routes, prefix policy {:?}, detection {:?}",
        router.registry().len(),
        router.registry().default_locale(),
        router.table().routes().len(),
        config.locale_prefix,
        router.resolver().detection_order()
    );

    let state = Arc::new(AppState {
        router,
        catalog,
        cookie_name: config.locale_cookie.clone(),
    });

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, server::app(state))
        .await
        .context("HTTP server failed")?;

    Ok(())
}
