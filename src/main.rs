use actor_framework::tracing::setup_tracing;
use anyhow::Context;
use clap::Parser;
use flash_sale::config::Cli;
use flash_sale::http::router;
use flash_sale::lifecycle::SaleSystem;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();

    let cli = Cli::parse();
    let config = cli.sale_config();
    config.validate()?;
    let seed = cli.seed_products()?;

    let system = SaleSystem::start(&config);
    let ids = system.seed(&seed).await.context("seeding the catalogue")?;
    info!(products = ids.len(), "Catalogue seeded");

    let app = router(system.app_state());
    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("binding {}", cli.bind))?;
    info!(addr = %cli.bind, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    info!("HTTP server stopped");
    let report = system.shutdown().await?;
    info!(
        products = report.products,
        sold = report.sold,
        recorded = report.recorded,
        "Final audit"
    );
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C"),
        () = terminate => info!("Received SIGTERM"),
    }
}
