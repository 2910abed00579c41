use serde::Deserialize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use super::config::LoggingConfig;
use super::error::Error;

/// Layout of log events on stderr.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

/// Installs the global `tracing` subscriber.
///
/// Events go to stderr so reports on stdout stay parseable. `RUST_LOG`, when
/// set and valid, takes precedence over `logging.filter`.
pub fn init_logging(config: &LoggingConfig) -> Result<(), Error> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(from_env) => from_env,
        Err(_) => parse_filter(&config.filter)?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let layer = fmt::layer().with_writer(std::io::stderr);

    let installed = match config.format {
        LogFormat::Human => registry.with(layer).try_init(),
        LogFormat::Json => registry.with(layer.json()).try_init(),
    };

    installed.map_err(|e| Error::LoggingError(e.to_string()))
}

fn parse_filter(directives: &str) -> Result<EnvFilter, Error> {
    EnvFilter::try_new(directives)
        .map_err(|e| Error::LoggingError(format!("Invalid log filter `{}`: {}", directives, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("warn")]
    #[case("bf_oracle_core=debug,executor=info")]
    fn accepts_level_directives(#[case] directives: &str) {
        assert!(parse_filter(directives).is_ok());
    }

    #[test]
    fn second_installation_is_a_logging_error() {
        let config = LoggingConfig {
            filter: "warn".to_string(),
            format: LogFormat::Json,
        };

        assert!(init_logging(&config).is_ok());
        assert!(matches!(init_logging(&config), Err(Error::LoggingError(_))));
    }
}
