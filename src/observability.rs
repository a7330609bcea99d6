use ipfinder::error::Result;
use ipfinder_common::config::{LogConfig, ObservabilityConfig};
use std::fs;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Guard for the non-blocking log writer
#[derive(Default)]
pub struct ObservabilityGuard {
    _log_guard: Option<WorkerGuard>,
}

/// Initialize logging based on configuration
///
/// Console output goes to stderr so that reporter results on stdout stay clean.
pub fn init_observability(config: &ObservabilityConfig) -> Result<ObservabilityGuard> {
    let mut guard = ObservabilityGuard::default();

    match config.log.output.as_str() {
        "file" => {
            fs::create_dir_all(&config.log.path)?;
            let (non_blocking, worker_guard) = build_file_writer(&config.log)?;
            guard._log_guard = Some(worker_guard);

            init_subscriber_with_writer(non_blocking, false, config);
        }
        _ => {
            init_subscriber_with_writer(std::io::stderr, true, config);
        }
    }

    Ok(guard)
}

/// Create an EnvFilter from config, with RUST_LOG taking precedence
fn create_env_filter(config: &ObservabilityConfig) -> EnvFilter {
    let directive = config.effective_filter_level();

    EnvFilter::try_new(&directive).unwrap_or_else(|_| {
        eprintln!(
            "Failed to parse filter directive: {}. Falling back to default: info",
            directive
        );
        EnvFilter::new("info")
    })
}

fn init_subscriber_with_writer<W>(writer: W, use_ansi: bool, config: &ObservabilityConfig)
where
    W: for<'a> fmt::MakeWriter<'a> + Send + Sync + 'static,
{
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(use_ansi)
        .with_writer(writer);

    tracing_subscriber::registry()
        .with(create_env_filter(config))
        .with(fmt_layer)
        .try_init()
        .ok();
}

fn build_file_writer(log_config: &LogConfig) -> Result<(NonBlocking, WorkerGuard)> {
    if log_config.rotate {
        let file_appender = tracing_appender::rolling::daily(&log_config.path, "ipfinder.log");
        Ok(tracing_appender::non_blocking(file_appender))
    } else {
        let log_file_path = std::path::Path::new(&log_config.path).join("ipfinder.log");
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file_path)?;
        Ok(tracing_appender::non_blocking(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_logging_creates_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ObservabilityConfig::default();
        config.log.output = "file".to_string();
        config.log.path = dir.path().join("logs").display().to_string();

        let guard = init_observability(&config).unwrap();
        tracing::info!("hello from test");
        drop(guard);

        assert!(dir.path().join("logs").join("ipfinder.log").exists());
    }

    #[test]
    fn test_invalid_filter_falls_back() {
        let config = ObservabilityConfig {
            filter_level: "[[not a filter".to_string(),
            ..Default::default()
        };
        // 只要不 panic 即可
        let _ = create_env_filter(&config);
    }
}
