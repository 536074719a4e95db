//! Utility functions for the document pipeline.
//!
//! Path normalization for CLI inputs and the tracing subscriber setup.

pub mod path;

pub use path::normalize_input_path;

/// Initializes the tracing subscriber for logging.
///
/// Sets up an environment-filtered formatting layer. Typically called once
/// at the start of an application to enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
