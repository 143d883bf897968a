//! Diagnostics for the facade itself
//!
//! daylog reports its own housekeeping (directories and files created,
//! bindings changed, profiling lines from [`TracingTap`](crate::TracingTap))
//! through `tracing`. This installs a console subscriber for it; hosts with
//! their own subscriber skip it.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global diagnostics subscriber.
///
/// `RUST_LOG` wins over `level`. Returns `false` when a global subscriber was
/// already installed.
pub fn init_diagnostics(level: &str, json: bool) -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .is_ok()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_ansi(true),
            )
            .try_init()
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_is_refused() {
        let _ = init_diagnostics("debug", false);
        assert!(!init_diagnostics("info", true));
    }
}
