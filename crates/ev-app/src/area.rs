//! City extent used to decide whether a custom region stays inside the
//! selected city.

use ev_api::{ApiError, Backend};
use ev_cache::{BoundaryCache, CacheError, CachedBoundary};
use ev_core::geo::{city_radius_km, haversine_km, point_in_ring};
use ev_core::{BBox, Corners, LonLat};
use ev_store::Location;

use crate::error::{AppError, AppResult};

/// Radius used for cities that have neither a boundary nor a known radius.
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

#[derive(Clone, Debug, PartialEq)]
pub enum CityArea {
    Boundary { bbox: BBox, rings: Vec<Vec<LonLat>> },
    Radius { center: LonLat, radius_km: f64 },
}

impl CityArea {
    pub fn from_cached(entry: &CachedBoundary) -> AppResult<Self> {
        Ok(CityArea::Boundary {
            bbox: entry.bbox,
            rings: entry.rings()?,
        })
    }

    pub fn fallback(location: &Location) -> Self {
        CityArea::Radius {
            center: location.center,
            radius_km: city_radius_km(&location.label)
                .or_else(|| city_radius_km(location.id.as_str()))
                .unwrap_or(DEFAULT_RADIUS_KM),
        }
    }

    pub fn contains(&self, p: LonLat) -> bool {
        match self {
            CityArea::Boundary { bbox, rings } => {
                bbox.contains(p) && rings.iter().any(|ring| point_in_ring(p, ring))
            }
            CityArea::Radius { center, radius_km } => haversine_km(*center, p) <= *radius_km,
        }
    }

    /// Whether a drawn rectangle lies within the city.
    pub fn covers(&self, corners: &Corners) -> bool {
        match self {
            CityArea::Boundary { bbox, .. } => {
                let Some(region) = BBox::from_points([corners.top_left, corners.bottom_right])
                else {
                    return false;
                };
                region.is_inside(bbox)
            }
            CityArea::Radius { .. } => {
                let tr = LonLat::new(corners.bottom_right.lon, corners.top_left.lat);
                let bl = LonLat::new(corners.top_left.lon, corners.bottom_right.lat);
                [corners.top_left, tr, corners.bottom_right, bl]
                    .into_iter()
                    .all(|p| self.contains(p))
            }
        }
    }
}

/// Boundary polygon through the cache when one is configured, falling back to
/// a radius around the city centre when the geocoder has nothing.
pub fn resolve_city_area<B: Backend + ?Sized>(
    backend: &B,
    cache: Option<&BoundaryCache>,
    location: &Location,
    country_codes: &str,
) -> AppResult<CityArea> {
    let name = location.label.as_str();
    let fetch = || -> Result<Option<serde_json::Value>, FetchError> {
        Ok(backend
            .city_boundary(name, country_codes)?
            .map(|b| b.geometry))
    };

    let entry = match cache {
        Some(cache) => cache.get_or_fetch(name, country_codes, fetch)?,
        None => match fetch()? {
            Some(geometry) => Some(CachedBoundary::new(
                ev_cache::boundary_key(name, country_codes),
                geometry,
                chrono::Utc::now(),
            )?),
            None => None,
        },
    };

    match entry {
        Some(entry) => CityArea::from_cached(&entry),
        None => {
            tracing::info!(city = name, "no boundary found, using radius fallback");
            Ok(CityArea::fallback(location))
        }
    }
}

/// Merges the two failure sources of a cached boundary fetch.
#[derive(Debug)]
enum FetchError {
    Api(ApiError),
    Cache(CacheError),
}

impl From<ApiError> for FetchError {
    fn from(e: ApiError) -> Self {
        FetchError::Api(e)
    }
}

impl From<CacheError> for FetchError {
    fn from(e: CacheError) -> Self {
        FetchError::Cache(e)
    }
}

impl From<FetchError> for AppError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Api(e) => e.into(),
            FetchError::Cache(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> CityArea {
        let ring = vec![
            LonLat::new(-8.6, 51.8),
            LonLat::new(-8.3, 51.8),
            LonLat::new(-8.3, 52.0),
            LonLat::new(-8.6, 52.0),
            LonLat::new(-8.6, 51.8),
        ];
        CityArea::Boundary {
            bbox: BBox::from_points(ring.iter().copied()).unwrap(),
            rings: vec![ring],
        }
    }

    #[test]
    fn boundary_containment() {
        let area = square();
        assert!(area.contains(LonLat::new(-8.47, 51.9)));
        assert!(!area.contains(LonLat::new(-8.0, 51.9)));

        let inside = Corners {
            top_left: LonLat::new(-8.5, 51.95),
            bottom_right: LonLat::new(-8.4, 51.85),
        };
        let spilling = Corners {
            top_left: LonLat::new(-8.7, 51.95),
            bottom_right: LonLat::new(-8.4, 51.85),
        };
        assert!(area.covers(&inside));
        assert!(!area.covers(&spilling));
    }

    #[test]
    fn radius_fallback_uses_known_city_radius() {
        let cork = Location::new("cork", "Cork", LonLat::new(-8.47, 51.9));
        let area = CityArea::fallback(&cork);
        assert_eq!(
            area,
            CityArea::Radius {
                center: LonLat::new(-8.47, 51.9),
                radius_km: 15.0
            }
        );
        assert!(area.contains(LonLat::new(-8.5, 51.92)));
        assert!(!area.contains(LonLat::new(-6.26, 53.35)));

        let town = Location::new("ennis", "Ennis", LonLat::new(-8.98, 52.84));
        assert!(matches!(
            CityArea::fallback(&town),
            CityArea::Radius { radius_km, .. } if radius_km == DEFAULT_RADIUS_KM
        ));
    }
}
