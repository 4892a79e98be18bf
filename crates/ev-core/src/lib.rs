//! ev-core: stable foundation for the charging dashboard.
//!
//! Contains:
//! - time (time point / time range model with span clamping, wire format)
//! - geo (canonical lon/lat pairs, rectangle corners, bbox helpers)
//! - ewkb (SRID-tagged point encoding for spatial queries)
//! - station (charging-station marker domain type)
//! - units (uom SI types for power and energy)
//! - ids (city identifiers)
//! - error (shared error types)

pub mod error;
pub mod ewkb;
pub mod geo;
pub mod ids;
pub mod station;
pub mod time;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use ewkb::{RegionQuery, WGS84_SRID};
pub use geo::{BBox, Corners, LonLat, corners_of};
pub use ids::CityId;
pub use station::{StationInfo, StationMarker};
pub use time::{Instant, TimeBounds, TimeRange, TimeSelection};
