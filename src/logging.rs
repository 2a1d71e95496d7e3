use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Map a user-facing level name onto an `EnvFilter` directive.
/// Unknown names are passed through so full directives like
/// `league_stats=debug` keep working.
pub fn filter_directive(level: &str) -> String {
    match level.trim().to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" | "WARN" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        "TRACE" => "trace".to_string(),
        _ => level.trim().to_string(),
    }
}

/// Install the global subscriber. Logs go to stderr so JSON on stdout stays clean.
pub fn setup_logging(level: &str) {
    let filter = EnvFilter::try_new(filter_directive(level)).unwrap_or_else(|_| EnvFilter::new("warn"));

    let layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        assert_eq!(filter_directive("WARNING"), "warn");
        assert_eq!(filter_directive("debug"), "debug");
        assert_eq!(filter_directive("CRITICAL"), "error");
        assert_eq!(filter_directive("league_stats=trace"), "league_stats=trace");
    }

    #[test]
    fn test_setup_logging_twice_does_not_panic() {
        setup_logging("info");
        setup_logging("debug");
    }
}
