//! Tracing subscriber setup.
//!
//! - `RUST_LOG=debug`: phase boundaries for every crate
//! - `RUST_LOG=cell_jit=trace`: per-call lowering in the compiled backend
//!
//! Without `RUST_LOG` only warnings are shown.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the stderr subscriber once per process.
///
/// Does nothing if another global subscriber is already installed.
pub fn init() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let tree = tracing_tree::HierarchicalLayer::new(2)
            .with_writer(std::io::stderr)
            .with_targets(true)
            .with_indent_lines(true);
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tree)
            .try_init();
    });
}
