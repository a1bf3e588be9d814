//! Weather-news client core.
//!
//! Authenticated fetch/generate against the weather API, the fetch-state
//! machine driving the weather screen, and the pure record-to-view
//! presenter.

pub mod client;
pub mod controller;
pub mod error;
pub mod types;
pub mod view;

pub use client::WeatherClient;
pub use controller::{FetchState, WeatherController};
pub use error::WeatherApiError;
pub use types::{HealthStatus, WeatherRecord, WeatherStatistics, WeatherType};
pub use view::{to_view_entry, WeatherViewEntry};
