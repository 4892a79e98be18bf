//! The seam between the service layer and whatever serves the data.

use ev_core::{CityId, Instant, RegionQuery, StationMarker, TimeRange};

use crate::ApiResult;
use crate::model::*;

/// One method per backend endpoint. Implementations must be usable from
/// worker threads.
pub trait Backend: Send + Sync {
    /// `GET /cities/all`
    fn cities(&self) -> ApiResult<Vec<City>>;

    /// `GET /map/get_map_by_city_and_time`
    fn markers_by_city(&self, city: &CityId, at: Instant) -> ApiResult<Vec<StationMarker>>;

    /// `GET /map/cus_map`
    fn markers_in_region(&self, at: Instant, region: &RegionQuery)
    -> ApiResult<Vec<StationMarker>>;

    /// `GET /graph/grid_energy`
    fn grid_energy(&self, range: TimeRange) -> ApiResult<Vec<GridSample>>;

    /// `GET /graph/charging_sessions_counts`
    fn session_counts(&self, city: &CityId, range: TimeRange) -> ApiResult<Vec<SessionSample>>;

    /// `GET /graph/city_energy`
    fn city_energy(&self, city: &CityId, range: TimeRange) -> ApiResult<Vec<EnergySample>>;

    /// `GET /graph/station_utilisation`
    fn station_utilisation(
        &self,
        city: &CityId,
        range: TimeRange,
    ) -> ApiResult<Vec<StationUtilisation>>;

    /// `GET /map/get_whole_country_map`
    fn whole_country(&self) -> ApiResult<Vec<RegionCount>>;

    /// Geocoder polygon for a city; `Ok(None)` when nothing usable was found.
    fn city_boundary(&self, name: &str, country_codes: &str) -> ApiResult<Option<CityBoundary>>;
}
