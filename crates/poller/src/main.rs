use std::path::Path;

use chrono::Utc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use homework_common::config::{self, AppConfig};
use homework_common::types::PollCursor;
use homework_notifier::TelegramNotifier;
use homework_poller::client::PracticumClient;
use homework_poller::poller::HomeworkPoller;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; keep the guard alive so the file sink flushes on exit
    let _guard = init_tracing(config::log_file_from_env().as_deref())?;

    tracing::info!("Homework bot starting...");

    // Load configuration
    let config = AppConfig::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "Invalid configuration, refusing to start");
    })?;

    let source = PracticumClient::from_config(&config)?;
    let notifier = TelegramNotifier::from_config(&config)?;
    let cursor = PollCursor::lookback(Utc::now(), config.lookback_days);

    let mut poller = HomeworkPoller::new(source, notifier, cursor, config.retry_interval());

    tracing::info!(
        endpoint = %config.practicum_endpoint,
        chat_id = %config.telegram_chat_id,
        "Starting homework poller"
    );

    // Run with graceful shutdown on Ctrl+C
    tokio::select! {
        _ = poller.run() => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping gracefully...");
        }
    }

    tracing::info!("Homework bot stopped.");
    Ok(())
}

fn init_tracing(log_file: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "homework_poller=info,homework_notifier=info".into());

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = match path.parent() {
                Some(dir) if !dir.as_os_str().is_empty() => dir,
                _ => Path::new("."),
            };
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow::anyhow!("LOG_FILE must name a file: {}", path.display()))?;

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    Ok(guard)
}
