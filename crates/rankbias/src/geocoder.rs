use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::cache::GeocodeCache;
use crate::types::Coordinates;

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Invalid geocoding URL: {0}")]
    InvalidUrl(String),
    #[error("Unexpected status {0}")]
    UnexpectedStatus(StatusCode),
    #[error("Malformed geocoding payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("No results for '{0}'")]
    NoResults(String),
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),
}

// Nominatim reports coordinates as strings; compatible services may send numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Degrees {
    Number(f64),
    Text(String),
}

impl Degrees {
    fn to_f64(&self, axis: &str) -> Result<f64, GeocodeError> {
        match self {
            Degrees::Number(value) => Ok(*value),
            Degrees::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| GeocodeError::InvalidCoordinate(format!("{axis} '{text}'"))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Place {
    lat: Degrees,
    lon: Degrees,
}

impl TryFrom<&Place> for Coordinates {
    type Error = GeocodeError;

    fn try_from(place: &Place) -> Result<Self, Self::Error> {
        Ok(Coordinates::new(
            place.lat.to_f64("lat")?,
            place.lon.to_f64("lon")?,
        ))
    }
}

/// Place-name lookup against a Nominatim-compatible `/search` endpoint.
///
/// Every successful uncached lookup is followed by `delay` on the calling
/// task, so callers that resolve sequentially never exceed one new request
/// per delay period. Failures are neither cached nor retried.
#[derive(Debug, Clone)]
pub struct Geocoder {
    client: Client,
    base_url: String,
    delay: Duration,
    cache: Arc<dyn GeocodeCache>,
}

impl Geocoder {
    pub fn new(cache: Arc<dyn GeocodeCache>) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(crate::GEOCODER_USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: crate::GEOCODER_BASE_URL.to_string(),
            delay: crate::GEOCODER_DELAY,
            cache,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub async fn resolve(&self, location: &str) -> Option<Coordinates> {
        if let Some(coords) = self.cache.get(location) {
            log::debug!("Geocode cache hit: {} -> {}", location, coords);
            return Some(coords);
        }

        match self.lookup(location).await {
            Ok(coords) => {
                self.cache.insert(location.to_string(), coords);
                log::debug!("Geocoded {} -> {}", location, coords);
                if !self.delay.is_zero() {
                    tokio::time::sleep(self.delay).await;
                }
                Some(coords)
            }
            Err(e) => {
                log::warn!("Geocoding error for {}: {}", location, e);
                None
            }
        }
    }

    /// Queries the remote service directly, bypassing the cache and the delay.
    pub async fn lookup(&self, location: &str) -> Result<Coordinates, GeocodeError> {
        let url = Url::parse_with_params(
            &format!("{}/search", self.base_url.trim_end_matches('/')),
            &[("q", location), ("format", "json"), ("limit", "1")],
        )
        .map_err(|e| GeocodeError::InvalidUrl(e.to_string()))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .inspect_err(|e| log::error!("HTTP error: {e:?}"))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(GeocodeError::UnexpectedStatus(status));
        }

        let body = response
            .text()
            .await
            .inspect_err(|e| log::error!("Decode error: {e:?}"))?;
        let places: Vec<Place> = serde_json::from_str(&body)?;

        places
            .first()
            .ok_or_else(|| GeocodeError::NoResults(location.to_string()))?
            .try_into()
    }
}
