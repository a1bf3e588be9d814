//! Shared configuration and logging setup for the tenki client.

pub mod config;

pub use config::{ApiConfig, AuthConfig, Config, ValidationResult};

use anyhow::Result;

/// Initialize tracing for the client process.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("tenki core initialized");
    Ok(())
}
