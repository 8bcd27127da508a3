// Thu Oct 15 2026 - Alex

use log::LevelFilter;

pub struct LoggingUtils;

impl LoggingUtils {
    /// Installs the env_logger backend. `RUST_LOG` still overrides `level`.
    /// Calling this twice is harmless; the second call is ignored.
    pub fn init(level: LevelFilter) {
        let _ = env_logger::Builder::new()
            .filter_level(level)
            .format_timestamp(None)
            .parse_default_env()
            .try_init();
    }

    pub fn level_from_str(s: &str) -> LevelFilter {
        match s.to_lowercase().as_str() {
            "error" => LevelFilter::Error,
            "warn" | "warning" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            "off" => LevelFilter::Off,
            _ => LevelFilter::Info,
        }
    }

    /// `--quiet` caps output at warnings regardless of the requested level.
    pub fn effective_level(requested: &str, quiet: bool) -> LevelFilter {
        if quiet {
            LevelFilter::Warn
        } else {
            Self::level_from_str(requested)
        }
    }
}
