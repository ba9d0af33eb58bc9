use serde::{Deserialize, Serialize};

/// A place resolved by the mapping provider.
///
/// Coordinates are `None` when the provider omitted them (reverse geocoding never
/// returns them), so callers must tolerate missing values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub name: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub province: String,
    pub city: String,
    pub district: String,
}

impl LocationRecord {
    /// Replace the coordinates with caller-supplied values.
    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Replace the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
