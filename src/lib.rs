//! sut-forge — converts raster brush-tip images into Clip Studio Paint
//! Sub Tool (`.sut`) packages.
//!
//! This is the main library crate: the `.sut` container builder
//! (`sut`), its collaborators (`normalize`, `archive`), the request
//! domain types (`domain`), and the HTTP surface (`server`).

pub mod archive;
pub mod config;
pub mod domain;
pub mod error;
pub mod normalize;
pub mod server;
pub mod sut;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize process-wide logging.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sut_forge=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("sut-forge initializing...");
}
