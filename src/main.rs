use anyhow::Context as _;
use clap::Parser;
use piab::config::Args;
use piab::controller::{Clock, HttpReloadNotifier, ReloadNotifier, ResourceController, SystemClock};
use piab::model::{Alert, Receiver};
use piab::server::{
    build_router, create_metrics, serve, shutdown_channel, wait_for_signal, ReadinessState,
};
use piab::store::{connect, MongoStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    info!(version = env!("CARGO_PKG_VERSION"), "Starting piab");

    // Create shutdown channel for coordinated shutdown
    let (shutdown_controller, shutdown_signal) = shutdown_channel();

    // Not ready until the database answers and the listener is bound
    let readiness = ReadinessState::new();

    let metrics = create_metrics().context("Failed to create metrics registry")?;

    let db = match connect(&args.mongo_uri(), &args.mongo_database).await {
        Ok(db) => db,
        Err(e) => {
            error!(error = %e, uri = %args.mongo_uri(), "Failed to connect to MongoDB");
            return Err(e.into());
        }
    };

    let notifier: Arc<dyn ReloadNotifier> = Arc::new(
        HttpReloadNotifier::new(args.reload_timeout())
            .context("Failed to build reload HTTP client")?,
    );
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let alert_target = args.alert_target();
    let receiver_target = args.receiver_target();
    info!(
        output = %alert_target.output.display(),
        reload = %alert_target.reload_url,
        "Alerts generate target"
    );
    info!(
        output = %receiver_target.output.display(),
        reload = %receiver_target.reload_url,
        "Receivers generate target"
    );

    let alerts = Arc::new(ResourceController::<Alert>::new(
        Arc::new(MongoStore::<Alert>::new(&db)),
        notifier.clone(),
        clock.clone(),
        alert_target,
    ));
    let receivers = Arc::new(ResourceController::<Receiver>::new(
        Arc::new(MongoStore::<Receiver>::new(&db)),
        notifier,
        clock,
        receiver_target,
    ));

    let app = build_router(alerts, receivers, readiness.clone(), metrics);

    let listener = TcpListener::bind(args.bind_address())
        .await
        .with_context(|| format!("Failed to bind {}", args.bind_address()))?;

    let mut server = tokio::spawn(serve(listener, app, shutdown_signal));

    readiness.set_ready();
    info!("piab ready");

    tokio::select! {
        result = &mut server => {
            // Server stopped on its own, nothing left to drain
            return match result {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => {
                    error!(error = %e, "HTTP server failed");
                    Err(e.into())
                }
                Err(e) => Err(anyhow::anyhow!("HTTP server task panicked: {}", e)),
            };
        }
        signal = wait_for_signal() => {
            match signal {
                Ok(name) => info!(signal = name, "Initiating graceful shutdown"),
                Err(e) => warn!(error = %e, "Signal handler failed, shutting down"),
            }
            // Mark not ready so load balancers stop sending traffic
            readiness.set_not_ready();
        }
    }

    // Drain in-flight requests
    shutdown_controller.shutdown();
    match server.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "HTTP server error during shutdown"),
        Err(e) => warn!(error = %e, "HTTP server task failed during shutdown"),
    }

    info!("piab shut down gracefully");
    Ok(())
}
