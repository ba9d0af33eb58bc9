//! Wire format of the mapping provider.
//!
//! Every endpoint answers with `{status, message, result | results}`. The payload
//! is only decoded after the status says success, since failed calls often carry
//! a payload of a different shape (e.g. `"results": []`).

use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

use crate::error::Result;
use crate::models::LocationRecord;

pub(crate) const SUCCESS: i64 = 0;

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(deserialize_with = "status_code")]
    pub status: i64,
    #[serde(default, alias = "msg")]
    message: Option<String>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    results: Option<Value>,
}

impl Envelope {
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS
    }

    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or("unknown error")
    }

    /// Decode the single-object `result` payload.
    pub fn into_result(self) -> Result<GeocodeResult> {
        let payload: Option<GeocodeResult> =
            serde_json::from_value(self.result.unwrap_or_default())?;
        Ok(payload.unwrap_or_default())
    }

    /// Decode the `results` list returned by place search.
    pub fn into_places(self) -> Result<Vec<PlaceItem>> {
        let payload: Option<Vec<PlaceItem>> =
            serde_json::from_value(self.results.unwrap_or_default())?;
        Ok(payload.unwrap_or_default())
    }
}

/// Status arrives as a number on most endpoints and as a numeric string on some.
fn status_code<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(de::Error::custom),
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Coordinates {
    lat: Option<f64>,
    lng: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AddressComponent {
    province: Option<String>,
    city: Option<String>,
    district: Option<String>,
}

/// Payload of forward and reverse geocoding.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct GeocodeResult {
    location: Option<Coordinates>,
    formatted_address: Option<String>,
    #[serde(rename = "addressComponent")]
    address_component: Option<AddressComponent>,
}

impl GeocodeResult {
    /// `fallback_address` is used when the provider omits a formatted address.
    pub fn into_record(self, fallback_address: &str) -> LocationRecord {
        let location = self.location.unwrap_or_default();
        let component = self.address_component.unwrap_or_default();
        LocationRecord {
            name: String::new(),
            address: self
                .formatted_address
                .unwrap_or_else(|| fallback_address.to_string()),
            latitude: location.lat,
            longitude: location.lng,
            province: component.province.unwrap_or_default(),
            city: component.city.unwrap_or_default(),
            district: component.district.unwrap_or_default(),
        }
    }
}

/// One place-search hit. The district lives under `area`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct PlaceItem {
    name: Option<String>,
    address: Option<String>,
    location: Option<Coordinates>,
    province: Option<String>,
    city: Option<String>,
    area: Option<String>,
}

impl PlaceItem {
    pub fn into_record(self) -> LocationRecord {
        let location = self.location.unwrap_or_default();
        LocationRecord {
            name: self.name.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            latitude: location.lat,
            longitude: location.lng,
            province: self.province.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            district: self.area.unwrap_or_default(),
        }
    }
}
