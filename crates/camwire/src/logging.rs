use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Environment variable holding per-target filter directives, e.g.
/// `camwire_frame=debug,camwire_bridge=info`.
pub const LOG_FILTER_ENV: &str = "CAMWIRE_LOG";

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Filter from `directives` when they parse, otherwise a global `level`.
pub fn log_filter(level: LogLevel, directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(level.as_directive()))
}

/// Install the stderr subscriber. Frame output goes to stdout, logs never do.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let directives = std::env::var(LOG_FILTER_ENV).ok();
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(level, directives.as_deref()))
        .with_ansi(false)
        .with_target(directives.is_some());

    match format {
        LogFormat::Text => {
            let _ = builder.try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().try_init();
        }
    }
}

#[cfg(test)]
mod tests {
    use tracing::level_filters::LevelFilter;

    use super::*;

    #[test]
    fn level_applies_without_directives() {
        let filter = log_filter(LogLevel::Warn, None);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn directives_override_level() {
        let filter = log_filter(LogLevel::Error, Some("camwire_frame=debug"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn blank_or_invalid_directives_fall_back_to_level() {
        let blank = log_filter(LogLevel::Info, Some("  "));
        assert_eq!(blank.max_level_hint(), Some(LevelFilter::INFO));

        let invalid = log_filter(LogLevel::Info, Some("camwire_frame=loud"));
        assert_eq!(invalid.max_level_hint(), Some(LevelFilter::INFO));
    }
}
