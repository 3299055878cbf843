pub mod smoobu;

/// The channel client wired up in `main`: Smoobu with its long-lived key.
pub type DefaultChannelClient = smoobu::SmoobuClient<StaticTokenProvider>;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::models::booking::BookingOrigin;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("channel manager rejected credentials")]
    Unauthorized,
    #[error("channel manager request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected channel manager response: {0}")]
    Upstream(String),
}

/// Seam to the channel manager (Smoobu today, Beds24 behind the same
/// trait if it ever comes back). Callers treat it as a black box: push the
/// site's availability out, pull OTA reservations in.
pub trait ChannelOperations {
    async fn push_availability(
        &self,
        room_id: &str,
        from: NaiveDate,
        to: NaiveDate,
        available: bool,
    ) -> Result<(), ChannelError>;

    async fn fetch_external_bookings(
        &self,
        room_id: &str,
    ) -> Result<Vec<ChannelBooking>, ChannelError>;
}

/// Reservation shape as imported from the channel manager.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelBooking {
    pub external_id: String,
    pub room_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub origin: BookingOrigin,
    pub guest_name: String,
    #[serde(default)]
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
}

/// Token supply for channel clients. Injected rather than cached in a
/// global so that credential rotation and expiry stay testable.
pub trait TokenProvider {
    async fn bearer_token(&self) -> Result<String, ChannelError>;
}

/// Long-lived API key (Smoobu-style auth).
pub struct StaticTokenProvider {
    api_key: String,
}

impl StaticTokenProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

impl TokenProvider for StaticTokenProvider {
    async fn bearer_token(&self) -> Result<String, ChannelError> {
        Ok(self.api_key.clone())
    }
}

struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Short-lived token with expiry-aware refresh (Beds24-style auth).
/// A fresh cached token is reused; refresh happens under the lock so
/// concurrent callers do not stampede the auth endpoint.
pub struct RefreshingTokenProvider {
    http: reqwest::Client,
    refresh_url: String,
    refresh_secret: String,
    cached: tokio::sync::Mutex<Option<CachedToken>>,
}

#[derive(Deserialize)]
struct RefreshResponse {
    token: String,
    /// Seconds until expiry.
    expires_in: i64,
}

impl RefreshingTokenProvider {
    /// Refresh this long before the reported expiry to absorb clock skew.
    const EXPIRY_MARGIN_SECS: i64 = 60;

    pub fn new(refresh_url: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            refresh_url: refresh_url.into(),
            refresh_secret: refresh_secret.into(),
            cached: tokio::sync::Mutex::new(None),
        }
    }

    #[cfg(test)]
    fn with_seeded_token(self, token: &str, expires_at: DateTime<Utc>) -> Self {
        *self.cached.try_lock().unwrap() = Some(CachedToken {
            token: token.to_string(),
            expires_at,
        });
        self
    }

    async fn refresh(&self) -> Result<CachedToken, ChannelError> {
        let response = self
            .http
            .post(&self.refresh_url)
            .json(&serde_json::json!({ "refreshToken": self.refresh_secret }))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ChannelError::Unauthorized);
        }
        if !response.status().is_success() {
            return Err(ChannelError::Upstream(format!(
                "token refresh returned {}",
                response.status()
            )));
        }

        let body: RefreshResponse = response
            .json()
            .await
            .map_err(|e| ChannelError::Upstream(format!("bad refresh body: {}", e)))?;

        Ok(CachedToken {
            token: body.token,
            expires_at: Utc::now() + Duration::seconds(body.expires_in),
        })
    }
}

impl TokenProvider for RefreshingTokenProvider {
    async fn bearer_token(&self) -> Result<String, ChannelError> {
        let mut cached = self.cached.lock().await;
        let fresh_until = Utc::now() + Duration::seconds(Self::EXPIRY_MARGIN_SECS);

        if let Some(token) = cached.as_ref() {
            if token.expires_at > fresh_until {
                return Ok(token.token.clone());
            }
        }

        let refreshed = self.refresh().await?;
        let token = refreshed.token.clone();
        *cached = Some(refreshed);
        Ok(token)
    }
}
