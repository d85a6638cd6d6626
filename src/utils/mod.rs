//! Utilities: logging setup (tracing), request spinner (indicatif).
//!
//! Key items:
//!   init_logging / derive_filter
//!   Spinner / with_spinner

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

/// Logging helpers.
pub mod logging {
    use super::*;

    /// Filter directive for the given verbosity flags.
    ///
    /// quiet -> errors only; default -> warnings; -v -> debug for this
    /// crate; -vv and above -> trace for this crate.
    pub fn derive_filter(verbose: u8, quiet: bool) -> String {
        if quiet {
            return "error".to_string();
        }
        match verbose {
            0 => "warn".to_string(),
            1 => "warn,searchatlas=debug".to_string(),
            _ => "warn,searchatlas=trace".to_string(),
        }
    }

    /// Install the stderr subscriber. `RUST_LOG` wins over the flags.
    ///
    /// stdout is reserved for command output so `--format json` stays parseable.
    pub fn init_logging(verbose: u8, quiet: bool) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(derive_filter(verbose, quiet)));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

pub use logging::init_logging;

/// Spinner shown on stderr while a request is in flight.
///
/// Disabled spinners are no-ops; indicatif also hides the bar when stderr is
/// not a terminal. The bar is cleared on drop.
pub struct Spinner {
    bar: Option<ProgressBar>,
}

impl Spinner {
    pub fn start(message: impl Into<String>, enabled: bool) -> Self {
        if !enabled {
            return Self { bar: None };
        }
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(message.into());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar: Some(bar) }
    }

    pub fn finish(mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

/// Run `f` with a spinner showing `message`.
pub fn with_spinner<T>(message: impl Into<String>, enabled: bool, f: impl FnOnce() -> T) -> T {
    let spinner = Spinner::start(message, enabled);
    let out = f();
    spinner.finish();
    out
}

#[cfg(test)]
mod tests {
    use super::logging::derive_filter;
    use super::*;

    #[test]
    fn filter_levels() {
        assert_eq!(derive_filter(0, false), "warn");
        assert_eq!(derive_filter(1, false), "warn,searchatlas=debug");
        assert_eq!(derive_filter(5, false), "warn,searchatlas=trace");
        assert_eq!(derive_filter(2, true), "error", "quiet wins over verbose");
    }

    #[test]
    fn filters_are_valid_directives() {
        for v in 0..3 {
            assert!(EnvFilter::try_new(derive_filter(v, false)).is_ok());
        }
    }

    #[test]
    fn disabled_spinner_is_inert() {
        let s = Spinner::start("working", false);
        assert!(s.bar.is_none());
        assert_eq!(with_spinner("x", false, || 41 + 1), 42);
    }

    #[test]
    fn finish_clears_enabled_spinner() {
        let s = Spinner::start("working", true);
        let bar = s.bar.clone().unwrap();
        s.finish();
        assert!(bar.is_finished());
    }
}
