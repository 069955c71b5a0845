// file: src/utils/logging.rs
// description: Tracing subscriber initialization and colored status lines

use crate::error::QueryError;
use colored::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub fn init_logger(colored_output: bool, verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(verbose)
        .with_line_number(verbose)
        .compact()
        .with_ansi(colored_output);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();

    colored::control::set_override(colored_output);
}

pub fn format_success(msg: &str) -> String {
    format!("{} {}", "✓".green().bold(), msg.green())
}

pub fn format_error(msg: &str) -> String {
    format!("{} {}", "✗".red().bold(), msg.red())
}

/// Error line prefixed with the error's kind, e.g. `[network]`.
pub fn format_failure(err: &QueryError) -> String {
    format_error(&format!("[{}] {}", err.kind(), err))
}

pub fn format_warning(msg: &str) -> String {
    format!("{} {}", "⚠".yellow().bold(), msg.yellow())
}

pub fn format_info(msg: &str) -> String {
    format!("{} {}", "ℹ".blue().bold(), msg)
}

pub fn format_query(query: &str) -> String {
    format!("{} {}", "Search query:".cyan().bold(), query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_lines_keep_message() {
        colored::control::set_override(false);
        assert_eq!(format_success("opened"), "✓ opened");
        assert_eq!(format_error("failed"), "✗ failed");
        assert_eq!(format_warning("busy"), "⚠ busy");
        assert_eq!(format_info("ready"), "ℹ ready");
        assert_eq!(format_query("a OR b"), "Search query: a OR b");
    }

    #[test]
    fn test_failure_line_carries_kind() {
        colored::control::set_override(false);
        let err = QueryError::Network("request timed out".to_string());
        assert_eq!(
            format_failure(&err),
            "✗ [network] Network error: request timed out"
        );
        let err = QueryError::BrowserLaunch("xdg-open exited with 3".to_string());
        assert!(format_failure(&err).starts_with("✗ [browser] "));
    }
}
