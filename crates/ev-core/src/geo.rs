//! Geographic coordinates and the small amount of planar geometry the
//! dashboard needs on the client side.
//!
//! [`LonLat`] is the only coordinate pair used inside the workspace. Backend
//! payloads (city centres, markers) carry `[lat, lon]`, GeoJSON rings carry
//! `[lon, lat]`; both are converted at the edge with the named constructors.

use crate::{CoreError, CoreResult};

/// Mean earth radius used by [`haversine_km`].
pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// From a `[lat, lon]` pair (backend and map-marker order).
    pub fn from_lat_lon(pair: [f64; 2]) -> Self {
        Self {
            lat: pair[0],
            lon: pair[1],
        }
    }

    /// From a `[lon, lat]` pair (GeoJSON order).
    pub fn from_lon_lat(pair: [f64; 2]) -> Self {
        Self {
            lon: pair[0],
            lat: pair[1],
        }
    }

    pub fn to_lat_lon(self) -> [f64; 2] {
        [self.lat, self.lon]
    }

    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    fn ensure_finite(self) -> CoreResult<Self> {
        if !self.lon.is_finite() {
            return Err(CoreError::NonFinite {
                what: "longitude",
                value: self.lon,
            });
        }
        if !self.lat.is_finite() {
            return Err(CoreError::NonFinite {
                what: "latitude",
                value: self.lat,
            });
        }
        Ok(self)
    }
}

/// The two corners a rectangle query is expressed with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Corners {
    /// `(min lon, max lat)`
    pub top_left: LonLat,
    /// `(max lon, min lat)`
    pub bottom_right: LonLat,
}

/// Axis-aligned bounding box in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BBox {
    /// Smallest box covering every point, or `None` for no points.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LonLat>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bbox = BBox {
            min_lon: first.lon,
            min_lat: first.lat,
            max_lon: first.lon,
            max_lat: first.lat,
        };
        for p in iter {
            bbox.min_lon = bbox.min_lon.min(p.lon);
            bbox.min_lat = bbox.min_lat.min(p.lat);
            bbox.max_lon = bbox.max_lon.max(p.lon);
            bbox.max_lat = bbox.max_lat.max(p.lat);
        }
        Some(bbox)
    }

    pub fn contains(&self, p: LonLat) -> bool {
        p.lon >= self.min_lon
            && p.lon <= self.max_lon
            && p.lat >= self.min_lat
            && p.lat <= self.max_lat
    }

    /// True when `self` lies entirely within `outer` (edges may touch).
    pub fn is_inside(&self, outer: &BBox) -> bool {
        self.min_lat >= outer.min_lat
            && self.max_lat <= outer.max_lat
            && self.min_lon >= outer.min_lon
            && self.max_lon <= outer.max_lon
    }

    pub fn corners(&self) -> Corners {
        Corners {
            top_left: LonLat::new(self.min_lon, self.max_lat),
            bottom_right: LonLat::new(self.max_lon, self.min_lat),
        }
    }
}

/// Corners of a user-drawn rectangle given as a (possibly closed) ring.
///
/// Only coordinate extremes are used, so vertex order, winding and the
/// closing duplicate vertex do not matter.
pub fn corners_of(ring: &[LonLat]) -> CoreResult<Corners> {
    let checked = ring
        .iter()
        .map(|p| p.ensure_finite())
        .collect::<CoreResult<Vec<_>>>()?;
    let bbox = BBox::from_points(checked).ok_or(CoreError::EmptyGeometry {
        what: "region ring has no vertices",
    })?;
    Ok(bbox.corners())
}

/// Even-odd ray cast. Points exactly on an edge may land either way.
pub fn point_in_ring(point: LonLat, ring: &[LonLat]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (a, b) = (ring[i], ring[j]);
        if (a.lat > point.lat) != (b.lat > point.lat) {
            let x = (b.lon - a.lon) * (point.lat - a.lat) / (b.lat - a.lat) + a.lon;
            if point.lon < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Great-circle distance in kilometres.
pub fn haversine_km(a: LonLat, b: LonLat) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Fallback city radius used when no boundary polygon can be fetched.
pub fn city_radius_km(city: &str) -> Option<f64> {
    match city.to_ascii_lowercase().as_str() {
        "dublin" => Some(20.0),
        "cork" => Some(15.0),
        "limerick" | "galway" => Some(12.0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Vec<LonLat> {
        vec![
            LonLat::new(-6.3, 53.4),
            LonLat::new(-6.2, 53.4),
            LonLat::new(-6.2, 53.3),
            LonLat::new(-6.3, 53.3),
            LonLat::new(-6.3, 53.4),
        ]
    }

    #[test]
    fn corners_of_rectangle() {
        let c = corners_of(&rect()).unwrap();
        assert_eq!(c.top_left, LonLat::new(-6.3, 53.4));
        assert_eq!(c.bottom_right, LonLat::new(-6.2, 53.3));
    }

    #[test]
    fn degenerate_rectangle_collapses() {
        let p = LonLat::new(-8.47, 51.9);
        let c = corners_of(&[p, p, p, p]).unwrap();
        assert_eq!(c.top_left, p);
        assert_eq!(c.bottom_right, p);
    }

    #[test]
    fn empty_ring_is_rejected() {
        assert!(matches!(
            corners_of(&[]),
            Err(CoreError::EmptyGeometry { .. })
        ));
    }

    #[test]
    fn nan_vertex_is_rejected() {
        let ring = [LonLat::new(f64::NAN, 53.0), LonLat::new(-6.0, 53.1)];
        assert!(matches!(corners_of(&ring), Err(CoreError::NonFinite { .. })));
    }

    #[test]
    fn pair_order_conversions() {
        let p = LonLat::from_lat_lon([53.35, -6.26]);
        assert_eq!(p.lon, -6.26);
        assert_eq!(p.to_lon_lat(), [-6.26, 53.35]);
        assert_eq!(LonLat::from_lon_lat(p.to_lon_lat()), p);
    }

    #[test]
    fn bbox_inside_and_contains() {
        let outer = BBox::from_points(rect()).unwrap();
        let inner =
            BBox::from_points([LonLat::new(-6.25, 53.35), LonLat::new(-6.22, 53.38)]).unwrap();
        assert!(inner.is_inside(&outer));
        assert!(!outer.is_inside(&inner));
        assert!(outer.contains(LonLat::new(-6.25, 53.35)));
        assert!(!outer.contains(LonLat::new(-6.0, 53.35)));
    }

    #[test]
    fn point_in_ring_basic() {
        assert!(point_in_ring(LonLat::new(-6.25, 53.35), &rect()));
        assert!(!point_in_ring(LonLat::new(-6.1, 53.35), &rect()));
    }

    #[test]
    fn haversine_dublin_cork() {
        let dublin = LonLat::from_lat_lon([53.35, -6.26]);
        let cork = LonLat::from_lat_lon([51.898, -8.4756]);
        let d = haversine_km(dublin, cork);
        assert!((d - 219.0).abs() < 5.0, "got {d}");
        assert_eq!(haversine_km(dublin, dublin), 0.0);
    }

    #[test]
    fn radius_table_is_case_insensitive() {
        assert_eq!(city_radius_km("Dublin"), Some(20.0));
        assert_eq!(city_radius_km("waterford"), None);
    }
}
