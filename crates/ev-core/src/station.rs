//! Charging-station marker as shown on the map.

use crate::geo::LonLat;

/// Separators used in the backend's connector-type strings ("CCS, Type2",
/// "CHAdeMO/CCS", "Type2 & CCS").
pub const CONNECTOR_SEPARATORS: &[char] = &[',', '&', '/'];

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StationMarker {
    pub position: LonLat,
    pub info: StationInfo,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StationInfo {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    /// Rated power in kW; `None` when the backend had no usable number.
    pub power_rating_kw: Option<f64>,
    pub connector_type: Option<String>,
    pub last_updated: Option<String>,
}

impl StationMarker {
    /// Trimmed, non-empty connector labels of this station.
    pub fn connector_tokens(&self) -> Vec<&str> {
        self.info
            .connector_type
            .as_deref()
            .map(split_connector_types)
            .unwrap_or_default()
    }
}

/// Split a connector-type string on `,`, `&` and `/`, trimming each label.
pub fn split_connector_types(raw: &str) -> Vec<&str> {
    raw.split(CONNECTOR_SEPARATORS)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
