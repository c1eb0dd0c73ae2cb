//! Subscriber setup for the `hoil` binary.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber. Later calls do nothing.
///
/// The filter comes from `HOIL_LOG`, then `RUST_LOG`, and defaults to
/// `warn`. With `tree` set, spans are printed as an indented tree.
pub fn init_tracing(tree: bool) {
    TRACING_INIT.call_once(|| {
        let filter = std::env::var("HOIL_LOG")
            .ok()
            .and_then(|directives| EnvFilter::try_new(directives).ok())
            .or_else(|| EnvFilter::try_from_default_env().ok())
            .unwrap_or_else(|| EnvFilter::new("warn"));

        let registry = tracing_subscriber::registry().with(filter);
        if tree {
            registry
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            registry
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    });
}
