//! Backend results in domain terms.

use ev_core::units::{Energy, Power, Ratio};
use ev_core::{CityId, Instant, LonLat};

#[derive(Clone, Debug, PartialEq)]
pub struct City {
    pub id: CityId,
    pub label: String,
    pub center: LonLat,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSample {
    pub at: Instant,
    pub generation: Power,
    pub load: Power,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionSample {
    pub at: Instant,
    pub sessions: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnergySample {
    pub at: Instant,
    pub energy: Energy,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UtilisationSample {
    pub at: Instant,
    pub ratio: Ratio,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StationUtilisation {
    pub station_id: String,
    pub samples: Vec<UtilisationSample>,
}

/// Aggregate station count for one region of the whole-country map.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionCount {
    pub name: String,
    pub stations: f64,
}

/// Boundary polygon of a city as returned by the geocoder.
#[derive(Clone, Debug, PartialEq)]
pub struct CityBoundary {
    /// GeoJSON `Polygon` or `MultiPolygon`.
    pub geometry: serde_json::Value,
}
