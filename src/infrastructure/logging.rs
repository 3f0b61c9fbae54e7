use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

/// Build the level filter: an explicit `RUST_LOG` directive wins, otherwise
/// the configured level applies.
fn filter_from(env_directive: Option<&str>, level: &str) -> EnvFilter {
    match env_directive {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::new(level),
    }
}

pub fn init_logging(config: &LoggingConfig) {
    let env_directive = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = filter_from(env_directive.as_deref(), &config.level);

    match config.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json())
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().pretty().with_target(true))
                .init();
        }
    }

    tracing::info!("Logging initialized with level: {}", config.level);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_prefers_env_directive() {
        let filter = filter_from(Some("warn"), "info");
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn test_filter_falls_back_to_configured_level() {
        let filter = filter_from(None, "debug");
        assert_eq!(filter.to_string(), "debug");
    }
}
