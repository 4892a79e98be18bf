//! JSON shapes as the backend sends them.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::{ApiError, ApiResult, SUCCESS_CODE};

/// `{code, message, data}` wrapper around every backend payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn into_data(self, endpoint: &str) -> ApiResult<T> {
        if self.code != SUCCESS_CODE {
            return Err(ApiError::Application {
                endpoint: endpoint.to_string(),
                code: self.code,
                message: self.message,
            });
        }
        self.data.ok_or_else(|| ApiError::MissingData {
            endpoint: endpoint.to_string(),
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CityItem {
    pub city_id: String,
    pub label: String,
    /// `[lat, lon]`
    pub center: [f64; 2],
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MarkerItem {
    pub lat: f64,
    #[serde(alias = "lng")]
    pub lon: f64,
    #[serde(rename = "popupInfo")]
    pub popup_info: PopupInfo,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PopupInfo {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Number, numeric string or null depending on the data source.
    #[serde(default)]
    pub power_rating: Option<serde_json::Value>,
    #[serde(default, rename = "type")]
    pub connector_type: Option<String>,
    #[serde(default, rename = "lastUpdated")]
    pub last_updated: Option<String>,
}

/// Marker lists keyed by the datetime string the request carried.
pub type MarkerMap = BTreeMap<String, Vec<MarkerItem>>;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GridPayload {
    pub grid_energy: Vec<GridPoint>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GridPoint {
    pub time: String,
    pub generation_mw: f64,
    pub load_mw: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionCountsPayload {
    pub charging_sessions: SessionSeries,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionSeries {
    #[serde(default)]
    pub units: BTreeMap<String, String>,
    pub data: Vec<SessionPoint>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionPoint {
    pub time: String,
    pub sessioncounts: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnergyPayload {
    pub energy_delivered: EnergySeries,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnergySeries {
    #[serde(default)]
    pub units: BTreeMap<String, String>,
    pub data: Vec<EnergyPoint>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnergyPoint {
    pub time: String,
    pub energy_kwh: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UtilisationPayload {
    pub station_utilisation: UtilisationSeries,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UtilisationSeries {
    #[serde(default)]
    pub unit: Option<String>,
    pub stations: Vec<StationSeries>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StationSeries {
    #[serde(deserialize_with = "string_or_number")]
    pub station_id: String,
    pub data: Vec<UtilisationPoint>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UtilisationPoint {
    pub timestamp: String,
    pub utilisation: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CountryRegionItem {
    pub name: String,
    pub value: f64,
}

/// One hit of a Nominatim `search` call made with `polygon_geojson=1`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NominatimPlace {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub geojson: Option<serde_json::Value>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(i) => i.to_string(),
        Raw::Float(f) => f.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_yields_data() {
        let env: Envelope<Vec<CityItem>> = serde_json::from_str(
            r#"{"code":200,"message":"ok","data":[{"city_id":"cork","label":"Cork","center":[51.9,-8.47]}]}"#,
        )
        .unwrap();
        let cities = env.into_data("/cities/all").unwrap();
        assert_eq!(cities[0].city_id, "cork");
        assert_eq!(cities[0].center, [51.9, -8.47]);
    }

    #[test]
    fn failure_code_becomes_application_error() {
        let env: Envelope<Vec<CityItem>> =
            serde_json::from_str(r#"{"code":500,"message":"db down","data":null}"#).unwrap();
        match env.into_data("/cities/all") {
            Err(ApiError::Application { code, message, .. }) => {
                assert_eq!(code, 500);
                assert_eq!(message, "db down");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn missing_data_is_reported() {
        let env: Envelope<GridPayload> = serde_json::from_str(r#"{"code":200}"#).unwrap();
        assert!(matches!(
            env.into_data("/graph/grid_energy"),
            Err(ApiError::MissingData { .. })
        ));
    }

    #[test]
    fn popup_accepts_numeric_ids_and_renamed_fields() {
        let item: MarkerItem = serde_json::from_str(
            r#"{"lat":53.3,"lng":-6.2,"popupInfo":{"id":42,"name":"Quay","type":"CCS","lastUpdated":"2025-07-01T10:00:00+00:00","power_rating":"50"}}"#,
        )
        .unwrap();
        assert_eq!(item.lon, -6.2);
        assert_eq!(item.popup_info.id, "42");
        assert_eq!(item.popup_info.connector_type.as_deref(), Some("CCS"));
        assert!(item.popup_info.status.is_none());
    }
}
