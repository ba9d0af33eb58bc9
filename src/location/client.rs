use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use super::policy::{AccessRestrictedPolicy, DegradePolicy};
use super::response::{Envelope, GeocodeResult};
use crate::config::{Credentials, MapConfig, MAP_API_KEY_VAR};
use crate::error::{Error, Result};
use crate::models::LocationRecord;

const GEOCODE_PATH: &str = "geocoding/v3/";
const REVERSE_GEOCODE_PATH: &str = "reverse_geocoding/v3/";
const PLACE_SEARCH_PATH: &str = "place/v2/search";

/// Coordinates sent to reverse geocoding are plain GPS (WGS84).
const WGS84_COORD_TYPE: &str = "wgs84ll";

/// Ask place search for detailed address fields.
const DETAILED_SCOPE: &str = "2";

/// Client for the mapping provider.
///
/// Holds only the immutable API key and a pooled HTTP client, so one instance can
/// serve any number of concurrent requests.
///
/// NOTE: Do NOT derive `Debug` on this struct, `api_key` would be exposed.
#[derive(Clone)]
pub struct LocationClient {
    http: Client,
    api_key: String,
    base_url: Url,
    page_size: u32,
    policy: Arc<dyn DegradePolicy>,
}

/// Outcome of the primary place-search call.
enum PlaceSearch {
    Found(Vec<LocationRecord>),
    Restricted { status: i64, message: String },
}

impl LocationClient {
    pub fn new(api_key: impl Into<String>, config: &MapConfig) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::Configuration(format!("{MAP_API_KEY_VAR} is empty")));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_key,
            base_url: parse_base_url(&config.base_url)?,
            page_size: config.page_size,
            policy: Arc::new(AccessRestrictedPolicy::from_config(&config.degrade)),
        })
    }

    /// Build the client from environment credentials, failing if the key is absent.
    pub fn from_credentials(credentials: &Credentials, config: &MapConfig) -> Result<Self> {
        let api_key = credentials
            .map_api_key
            .as_deref()
            .ok_or_else(|| Error::Configuration(format!("{MAP_API_KEY_VAR} not set")))?;
        Self::new(api_key, config)
    }

    /// Replace the policy deciding which place-search failures degrade.
    pub fn with_policy(mut self, policy: impl DegradePolicy + 'static) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    /// Forward geocoding: address to coordinates.
    pub async fn geocode(&self, address: &str) -> Result<LocationRecord> {
        debug!(address, "Geocoding address");

        let envelope = self
            .fetch(GEOCODE_PATH, &[("address", address.to_string())])
            .await
            .map_err(unreachable_as_upstream)?;

        if !envelope.is_success() {
            return Err(Error::Upstream(format!(
                "geocoding failed: {}",
                envelope.message()
            )));
        }

        let result: GeocodeResult = envelope.into_result().map_err(unreachable_as_upstream)?;
        Ok(result.into_record(address))
    }

    /// Reverse geocoding: WGS84 coordinates to address fields.
    ///
    /// The provider does not echo the coordinates back; see
    /// [`current_location_info`](Self::current_location_info).
    pub async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<LocationRecord> {
        debug!(latitude, longitude, "Reverse geocoding");

        let params = [
            ("location", format!("{latitude},{longitude}")),
            ("coordtype", WGS84_COORD_TYPE.to_string()),
        ];
        let envelope = self
            .fetch(REVERSE_GEOCODE_PATH, &params)
            .await
            .map_err(unreachable_as_upstream)?;

        if !envelope.is_success() {
            return Err(Error::Upstream(format!(
                "reverse geocoding failed: {}",
                envelope.message()
            )));
        }

        let mut record = envelope
            .into_result()
            .map_err(unreachable_as_upstream)?
            .into_record("");
        record.latitude = None;
        record.longitude = None;
        Ok(record)
    }

    /// Address details for a position, with the input coordinates attached.
    pub async fn current_location_info(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<LocationRecord> {
        let record = self.reverse_geocode(latitude, longitude).await?;
        Ok(record.with_coordinates(latitude, longitude))
    }

    /// Search places by keyword. Returns at most one page of results.
    ///
    /// `region` restricts the search area (e.g. a city), `location` is a
    /// `"lat,lng"` center point to bias results towards. When the search endpoint
    /// is unreachable, or reports a failure the degrade policy accepts, the query
    /// is geocoded instead and a single result is returned.
    pub async fn place_search(
        &self,
        query: &str,
        region: Option<&str>,
        location: Option<&str>,
    ) -> Result<Vec<LocationRecord>> {
        let region = region.filter(|r| !r.is_empty());
        let location = location.filter(|l| !l.is_empty());

        match self.search_places(query, region, location).await {
            Ok(PlaceSearch::Found(records)) => {
                debug!(query, found = records.len(), "Place search complete");
                Ok(records)
            }
            Ok(PlaceSearch::Restricted { status, message }) => {
                warn!(
                    status,
                    message = %message,
                    "Place search unavailable, falling back to geocoding"
                );
                self.place_search_fallback(query, region).await
            }
            Err(Error::Transport(reason)) => {
                warn!(
                    reason = %reason,
                    "Place search request failed, falling back to geocoding"
                );
                self.place_search_fallback(query, region).await
            }
            Err(e) => Err(e),
        }
    }

    async fn search_places(
        &self,
        query: &str,
        region: Option<&str>,
        location: Option<&str>,
    ) -> Result<PlaceSearch> {
        let mut params = vec![
            ("query", query.to_string()),
            ("scope", DETAILED_SCOPE.to_string()),
            ("page_size", self.page_size.to_string()),
            ("page_num", "0".to_string()),
        ];
        if let Some(region) = region {
            params.push(("region", region.to_string()));
        }
        if let Some(location) = location {
            params.push(("location", location.to_string()));
        }

        let envelope = self.fetch(PLACE_SEARCH_PATH, &params).await?;

        if !envelope.is_success() {
            let status = envelope.status;
            let message = envelope.message().to_string();
            if self.policy.should_degrade(status, &message) {
                return Ok(PlaceSearch::Restricted { status, message });
            }
            return Err(Error::Upstream(format!("place search failed: {message}")));
        }

        let records = envelope
            .into_places()?
            .into_iter()
            .map(|item| item.into_record())
            .collect();
        Ok(PlaceSearch::Found(records))
    }

    /// Geocode `region + query` and present it as a single search hit.
    async fn place_search_fallback(
        &self,
        query: &str,
        region: Option<&str>,
    ) -> Result<Vec<LocationRecord>> {
        let search_address = match region {
            Some(region) => format!("{region}{query}"),
            None => query.to_string(),
        };

        let record = self.geocode(&search_address).await.map_err(|e| {
            let reason = match e {
                Error::Upstream(message) => message,
                other => other.to_string(),
            };
            Error::Upstream(format!("geocoding fallback failed: {reason}"))
        })?;

        Ok(vec![record.with_name(query)])
    }

    async fn fetch(&self, path: &str, params: &[(&str, String)]) -> Result<Envelope> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| Error::Configuration(format!("invalid endpoint path {path}: {e}")))?;
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(key, value)| (*key, value.as_str())))
            .append_pair("output", "json")
            .append_pair("ak", &self.api_key);

        let response = self.http.get(url).send().await?;

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Geocoding has no fallback, so a transport fault is a final upstream failure.
fn unreachable_as_upstream(err: Error) -> Error {
    match err {
        Error::Transport(reason) => {
            Error::Upstream(format!("map provider request failed: {reason}"))
        }
        other => other,
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    // `Url::join` replaces the last path segment unless the base ends in a slash.
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized)
        .map_err(|e| Error::Configuration(format!("invalid map base URL {raw}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_join() {
        let base = parse_base_url("http://localhost:8080").unwrap();
        assert_eq!(
            base.join(GEOCODE_PATH).unwrap().as_str(),
            "http://localhost:8080/geocoding/v3/"
        );

        let base = parse_base_url("http://localhost:8080/baidu/").unwrap();
        assert_eq!(
            base.join(PLACE_SEARCH_PATH).unwrap().as_str(),
            "http://localhost:8080/baidu/place/v2/search"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            parse_base_url("not a url"),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_blank_key_rejected() {
        let result = LocationClient::new("  ", &MapConfig::default());
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let result =
            LocationClient::from_credentials(&Credentials::default(), &MapConfig::default());
        match result {
            Err(Error::Configuration(msg)) => assert!(msg.contains(MAP_API_KEY_VAR)),
            _ => panic!("expected configuration error"),
        }
    }

    #[test]
    fn test_transport_fault_becomes_upstream() {
        let err = unreachable_as_upstream(Error::Transport("connection refused".into()));
        match err {
            Error::Upstream(msg) => assert!(msg.contains("connection refused")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
