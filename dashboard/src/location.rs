use serde::Deserialize;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Position used whenever the real one cannot be determined
pub const FALLBACK_COORDINATES: Coordinates = Coordinates::new(-0.1276, 51.5072);

/// A point on the map, longitude first
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// `[longitude, latitude]`
    pub fn to_array(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    fn validate(self) -> Result<Self, LocationError> {
        let in_range = self.longitude.is_finite()
            && self.latitude.is_finite()
            && (-180.0..=180.0).contains(&self.longitude)
            && (-90.0..=90.0).contains(&self.latitude);
        if in_range {
            Ok(self)
        } else {
            Err(LocationError::InvalidResponse(format!(
                "coordinates out of range: {}",
                self
            )))
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.longitude, self.latitude)
    }
}

/// How a position request should be answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionOptions {
    pub timeout: Duration,
    pub enable_high_accuracy: bool,
    /// Oldest cached position that may be returned. Zero means always ask again.
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(10_000),
            enable_high_accuracy: true,
            maximum_age: Duration::ZERO,
        }
    }
}

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Position unavailable: {0}")]
    Unavailable(String),

    #[error("Position request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Position request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid position response: {0}")]
    InvalidResponse(String),
}

/// Something that can answer "where am I"
pub trait PositionSource: Send + Sync {
    fn current_position(
        &self,
        options: &PositionOptions,
    ) -> impl Future<Output = Result<Coordinates, LocationError>> + Send;
}

/// Current position, or [`FALLBACK_COORDINATES`] when there is no source or it fails.
pub async fn get_location<S: PositionSource>(
    source: Option<&S>,
    options: &PositionOptions,
) -> Coordinates {
    let Some(source) = source else {
        tracing::warn!("Geolocation is not available, using fallback coordinates");
        return FALLBACK_COORDINATES;
    };

    let result = match tokio::time::timeout(options.timeout, source.current_position(options)).await
    {
        Ok(result) => result,
        Err(_) => Err(LocationError::Timeout(options.timeout)),
    };

    match result.and_then(Coordinates::validate) {
        Ok(coordinates) => {
            tracing::debug!(coordinates = %coordinates, "Position resolved");
            coordinates
        }
        Err(e) => {
            tracing::warn!("Failed to get location, using fallback coordinates: {}", e);
            FALLBACK_COORDINATES
        }
    }
}

/// Approximate position from an IP geolocation service.
///
/// The service answers `{"latitude": .., "longitude": ..}`, or
/// `{"error": true, "reason": ".."}` when it cannot.
pub struct IpPositionSource {
    client: reqwest::Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct IpLookup {
    latitude: Option<f64>,
    longitude: Option<f64>,
    #[serde(default)]
    error: bool,
    reason: Option<String>,
}

impl IpLookup {
    fn into_coordinates(self) -> Result<Coordinates, LocationError> {
        if self.error {
            return Err(LocationError::Unavailable(
                self.reason.unwrap_or_else(|| "lookup failed".to_string()),
            ));
        }
        match (self.longitude, self.latitude) {
            (Some(longitude), Some(latitude)) => Coordinates::new(longitude, latitude).validate(),
            _ => Err(LocationError::InvalidResponse(
                "missing latitude or longitude".to_string(),
            )),
        }
    }
}

impl IpPositionSource {
    pub fn new(url: impl Into<String>) -> Result<Self, LocationError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("dashboard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl PositionSource for IpPositionSource {
    async fn current_position(&self, options: &PositionOptions) -> Result<Coordinates, LocationError> {
        if options.enable_high_accuracy {
            tracing::debug!("High accuracy requested, IP lookup is approximate");
        }

        let mut request = self.client.get(&self.url).timeout(options.timeout);
        if options.maximum_age.is_zero() {
            request = request.header(reqwest::header::CACHE_CONTROL, "no-cache");
        }

        let lookup: IpLookup = request.send().await?.error_for_status()?.json().await?;
        lookup.into_coordinates()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedSource {
        result: fn() -> Result<Coordinates, LocationError>,
        calls: AtomicUsize,
    }

    impl FixedSource {
        fn new(result: fn() -> Result<Coordinates, LocationError>) -> Self {
            Self {
                result,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl PositionSource for FixedSource {
        async fn current_position(
            &self,
            _options: &PositionOptions,
        ) -> Result<Coordinates, LocationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.result)()
        }
    }

    struct HangingSource;

    impl PositionSource for HangingSource {
        async fn current_position(
            &self,
            _options: &PositionOptions,
        ) -> Result<Coordinates, LocationError> {
            std::future::pending().await
        }
    }

    #[test]
    fn default_options() {
        let options = PositionOptions::default();
        assert_eq!(options.timeout, Duration::from_millis(10_000));
        assert!(options.enable_high_accuracy);
        assert_eq!(options.maximum_age, Duration::ZERO);
    }

    #[tokio::test]
    async fn absent_capability_uses_fallback() {
        let coordinates = get_location(None::<&FixedSource>, &PositionOptions::default()).await;
        assert_eq!(coordinates, FALLBACK_COORDINATES);
        assert_eq!(coordinates.to_array(), [-0.1276, 51.5072]);
    }

    #[tokio::test]
    async fn success_keeps_longitude_first() {
        let source = FixedSource::new(|| Ok(Coordinates::new(10.0, 20.0)));
        let coordinates = get_location(Some(&source), &PositionOptions::default()).await;
        assert_eq!(coordinates.to_array(), [10.0, 20.0]);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn source_error_uses_fallback() {
        let source = FixedSource::new(|| Err(LocationError::Unavailable("denied".into())));
        let coordinates = get_location(Some(&source), &PositionOptions::default()).await;
        assert_eq!(coordinates, FALLBACK_COORDINATES);
    }

    #[tokio::test]
    async fn out_of_range_position_uses_fallback() {
        let source = FixedSource::new(|| Ok(Coordinates::new(200.0, f64::NAN)));
        let coordinates = get_location(Some(&source), &PositionOptions::default()).await;
        assert_eq!(coordinates, FALLBACK_COORDINATES);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_source_times_out() {
        let coordinates = get_location(Some(&HangingSource), &PositionOptions::default()).await;
        assert_eq!(coordinates, FALLBACK_COORDINATES);
    }

    #[test]
    fn ip_lookup_parsing() {
        let lookup: IpLookup =
            serde_json::from_str(r#"{"ip": "1.2.3.4", "latitude": 20.0, "longitude": 10.0}"#)
                .unwrap();
        assert_eq!(lookup.into_coordinates().unwrap().to_array(), [10.0, 20.0]);

        let rate_limited: IpLookup =
            serde_json::from_str(r#"{"error": true, "reason": "RateLimited"}"#).unwrap();
        assert!(matches!(
            rate_limited.into_coordinates(),
            Err(LocationError::Unavailable(reason)) if reason == "RateLimited"
        ));

        let partial: IpLookup = serde_json::from_str(r#"{"latitude": 20.0}"#).unwrap();
        assert!(matches!(
            partial.into_coordinates(),
            Err(LocationError::InvalidResponse(_))
        ));
    }

    #[test]
    fn displays_as_pair() {
        assert_eq!(Coordinates::new(10.0, 20.5).to_string(), "[10, 20.5]");
    }
}
