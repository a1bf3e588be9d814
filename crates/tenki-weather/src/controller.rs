//! Fetch state machine for the weather screen.
//!
//! Owns the display state as one tagged value and serializes every
//! transition through a single lock, so readers never observe a
//! half-applied update. A fresh token is obtained before every request;
//! tokens are never cached here.

use parking_lot::Mutex;

use tenki_auth::TokenProvider;

use crate::client::WeatherClient;
use crate::error::WeatherApiError;
use crate::types::WeatherRecord;

/// Message shown when a fetch fails, whatever the underlying cause.
pub const FETCH_FAILED: &str = "天気データの取得に失敗しました";

/// Message shown when generation fails.
pub const GENERATE_FAILED: &str = "天気データの生成に失敗しました";

/// Display state of the weather screen. Exactly one variant is active.
///
/// `Success` with no records is the valid "no data yet" state and is
/// distinct from `Failure`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Success(Vec<WeatherRecord>),
    Failure(String),
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchState::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, FetchState::Failure(_))
    }

    /// Records to render, if the last fetch succeeded.
    pub fn records(&self) -> Option<&[WeatherRecord]> {
        match self {
            FetchState::Success(records) => Some(records),
            _ => None,
        }
    }

    /// User-facing message, if the last operation failed.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            FetchState::Failure(message) => Some(message),
            _ => None,
        }
    }
}

/// Long-lived, re-enterable controller over `Idle → Loading →
/// Success/Failure`.
///
/// Overlapping `refresh()`/`generate()` calls are not serialized;
/// instead each attempt is numbered and a completion is dropped if a
/// newer attempt has started since, so the newest attempt's result is
/// the one that sticks.
pub struct WeatherController<P> {
    client: WeatherClient,
    tokens: P,
    inner: Mutex<ControllerState>,
}

/// State cell guarded by one lock so the attempt check and the state
/// write are a single atomic step.
struct ControllerState {
    state: FetchState,
    attempts: u64,
}

impl<P: TokenProvider> WeatherController<P> {
    pub fn new(client: WeatherClient, tokens: P) -> Self {
        Self {
            client,
            tokens,
            inner: Mutex::new(ControllerState {
                state: FetchState::Idle,
                attempts: 0,
            }),
        }
    }

    /// Snapshot of the current display state.
    pub fn state(&self) -> FetchState {
        self.inner.lock().state.clone()
    }

    /// Re-fetch weather for all cities.
    ///
    /// Enters `Loading` (clearing any prior error), then lands in
    /// `Success` or `Failure`. Every failure cause collapses to the same
    /// localized message; the typed cause goes to the log only.
    pub async fn refresh(&self) {
        let attempt = self.begin();

        let next = match self.fetch().await {
            Ok(records) => FetchState::Success(records),
            Err(e) => {
                tracing::error!(error = %e, "weather fetch failed");
                FetchState::Failure(FETCH_FAILED.to_string())
            }
        };

        self.complete(attempt, next);
    }

    /// Trigger server-side generation of a fresh record set.
    ///
    /// On success chains into exactly one fetch (generation strictly
    /// precedes it); on failure no fetch is issued.
    pub async fn generate(&self) {
        let attempt = self.begin();

        let generated = match self.tokens.id_token().await {
            Ok(token) => self.client.generate_weather(&token).await,
            Err(e) => Err(WeatherApiError::from(e)),
        };

        let next = match generated {
            Ok(()) => match self.fetch().await {
                Ok(records) => FetchState::Success(records),
                Err(e) => {
                    tracing::error!(error = %e, "fetch after generation failed");
                    FetchState::Failure(FETCH_FAILED.to_string())
                }
            },
            Err(e) => {
                tracing::error!(error = %e, "weather generation failed");
                FetchState::Failure(GENERATE_FAILED.to_string())
            }
        };

        self.complete(attempt, next);
    }

    /// Fresh token, then the fetch itself.
    async fn fetch(&self) -> Result<Vec<WeatherRecord>, WeatherApiError> {
        let token = self.tokens.id_token().await?;
        self.client.fetch_weather(&token).await
    }

    /// Start a new attempt: bump the sequence and enter `Loading`.
    fn begin(&self) -> u64 {
        let mut inner = self.inner.lock();
        inner.attempts += 1;
        inner.state = FetchState::Loading;
        inner.attempts
    }

    /// Apply an attempt's outcome unless a newer attempt has started.
    /// Checked and written under one lock, so a stale result can never
    /// overwrite a newer attempt's `Loading`, even transiently.
    fn complete(&self, attempt: u64, next: FetchState) {
        let mut inner = self.inner.lock();
        if inner.attempts != attempt {
            tracing::debug!(attempt, "dropping stale fetch result");
            return;
        }
        inner.state = next;
    }
}
