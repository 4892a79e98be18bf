//! Custom query region drawn on the map.

use ev_core::{CoreResult, LonLat, RegionQuery};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RegionSelection {
    pub enabled: bool,
    /// Rectangle ring in `LonLat` order; only present while `enabled`.
    pub geometry: Option<Vec<LonLat>>,
}

impl RegionSelection {
    /// Turning the toggle off clears any drawn geometry.
    #[must_use]
    pub fn set_enabled(self, enabled: bool) -> Self {
        Self {
            enabled,
            geometry: if enabled { self.geometry } else { None },
        }
    }

    /// Draw-complete and edit both replace the geometry. Ignored while the
    /// toggle is off.
    #[must_use]
    pub fn set_geometry(self, ring: Vec<LonLat>) -> Self {
        if !self.enabled {
            return self;
        }
        Self {
            geometry: Some(ring),
            ..self
        }
    }

    #[must_use]
    pub fn clear_geometry(self) -> Self {
        Self {
            geometry: None,
            ..self
        }
    }

    /// Encoded corner pair for the backend, if a region is active.
    pub fn query(&self) -> Option<CoreResult<RegionQuery>> {
        match (&self.geometry, self.enabled) {
            (Some(ring), true) => Some(RegionQuery::from_ring(ring)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring() -> Vec<LonLat> {
        vec![
            LonLat::new(-6.3, 53.3),
            LonLat::new(-6.2, 53.3),
            LonLat::new(-6.2, 53.4),
            LonLat::new(-6.3, 53.4),
        ]
    }

    #[test]
    fn disabling_clears_geometry() {
        let r = RegionSelection::default()
            .set_enabled(true)
            .set_geometry(ring())
            .set_enabled(false);
        assert!(!r.enabled);
        assert!(r.geometry.is_none());
        assert!(r.query().is_none());
    }

    #[test]
    fn draw_ignored_while_disabled() {
        let r = RegionSelection::default().set_geometry(ring());
        assert!(r.geometry.is_none());
    }

    #[test]
    fn active_region_yields_query() {
        let r = RegionSelection::default().set_enabled(true).set_geometry(ring());
        let q = r.query().unwrap().unwrap();
        assert_eq!(q.location1.len(), 50);
        assert!(r.clone().clear_geometry().query().is_none());
    }
}
