//! The capa compiler driver.
//!
//! Everything outside the engine lives here: loading declaration units from
//! JSON, running [`capa_model::compile`], reporting diagnostics, and
//! rendering the sealed model as Java sources.
//!
//! - [`load`]: JSON declaration units
//! - [`emit`]: Java text for every definition of a [`capa_model::Model`]
//! - [`commands`]: the `build` and `check` commands

pub mod commands;
pub mod emit;
pub mod load;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber for developer logs.
///
/// Only installs when `RUST_LOG` is set, and only once per process.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    });
}
