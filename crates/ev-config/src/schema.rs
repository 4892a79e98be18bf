//! Dashboard configuration schema.

use std::path::PathBuf;

use ev_core::LonLat;
use serde::{Deserialize, Serialize};

pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardConfig {
    #[serde(default = "latest_version")]
    pub version: u32,
    #[serde(default)]
    pub backend: BackendDef,
    #[serde(default)]
    pub boundary: BoundaryDef,
    #[serde(default)]
    pub time: TimeDef,
    /// Shown until `/cities/all` answers.
    #[serde(default = "fallback_locations")]
    pub locations: Vec<LocationDef>,
    #[serde(default = "fallback_location_id")]
    pub default_location: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            version: LATEST_VERSION,
            backend: BackendDef::default(),
            boundary: BoundaryDef::default(),
            time: TimeDef::default(),
            locations: fallback_locations(),
            default_location: fallback_location_id(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackendDef {
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for BackendDef {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_ms: default_timeout_ms(),
            token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundaryDef {
    pub search_url: String,
    #[serde(default = "default_country_codes")]
    pub country_codes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
}

impl Default for BoundaryDef {
    fn default() -> Self {
        Self {
            search_url: "https://nominatim.openstreetmap.org/search".to_string(),
            country_codes: default_country_codes(),
            cache_dir: None,
        }
    }
}

/// Data-availability floors, in any spelling `ev_core::time::parse_instant`
/// accepts. Missing fields keep their default floor; an explicit `null`
/// disables it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimeDef {
    pub earliest_start: Option<String>,
    pub earliest_end: Option<String>,
}

impl Default for TimeDef {
    fn default() -> Self {
        Self {
            earliest_start: Some("2025-06-19".to_string()),
            earliest_end: Some("2025-06-20".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationDef {
    pub id: String,
    pub label: String,
    pub center: LonLat,
}

fn latest_version() -> u32 {
    LATEST_VERSION
}

fn default_timeout_ms() -> u64 {
    5_000
}

fn default_country_codes() -> String {
    "ie".to_string()
}

fn fallback_location_id() -> String {
    "dublin".to_string()
}

fn fallback_locations() -> Vec<LocationDef> {
    vec![
        LocationDef {
            id: "dublin".to_string(),
            label: "dublin".to_string(),
            center: LonLat::from_lat_lon([53.35, -6.26]),
        },
        LocationDef {
            id: "cork".to_string(),
            label: "cork".to_string(),
            center: LonLat::from_lat_lon([51.898, -8.4756]),
        },
        LocationDef {
            id: "galway".to_string(),
            label: "galway".to_string(),
            center: LonLat::from_lat_lon([53.2707, -9.0568]),
        },
    ]
}
