use std::sync::Arc;

use bookstore::logging::init_logging;
use bookstore::{Bookstore, Config, Context, SalesReporterThread};
use clap::Parser;
use log::{error, info};

#[tokio::main]
async fn main() {
    let config = Config::parse();

    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("failed to initialize logging: {err}");
        std::process::exit(1);
    }

    if let Err(err) = run(config).await {
        error!("event=app_exit module=main status=error error={}", err);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), String> {
    let app = Bookstore::open(&config).map_err(|e| e.to_string())?;
    let root = Context::background();

    let engine = SalesReporterThread::spawn(
        Arc::clone(&app.reporter),
        config.report_interval(),
        &root,
    );

    let addr = format!("0.0.0.0:{}", config.port);
    let served = bookstore::http::serve(app, root.clone(), &addr, shutdown_signal()).await;

    root.cancel();
    let stats = engine.stop();
    info!(
        "event=app_exit module=main status=ok reports_generated={} reports_failed={} ticks={}",
        stats.reports_generated, stats.reports_failed, stats.ticks
    );

    served.map_err(|e| format!("http server on {addr}: {e}"))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=signal module=main status=error error={}", err);
        std::future::pending::<()>().await;
    }
    info!("event=signal module=main status=ok signal=ctrl_c");
}
