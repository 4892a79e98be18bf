//! City selection.

use ev_core::{CityId, LonLat};

#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    pub id: CityId,
    pub label: String,
    pub center: LonLat,
}

impl Location {
    pub fn new(id: impl Into<CityId>, label: impl Into<String>, center: LonLat) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            center,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LocationSelection {
    pub current: CityId,
    pub locations: Vec<Location>,
}

impl LocationSelection {
    /// Built-in list used until the backend's city list arrives.
    pub fn fallback() -> Self {
        Self {
            current: CityId::from("dublin"),
            locations: vec![
                Location::new("dublin", "dublin", LonLat::from_lat_lon([53.35, -6.26])),
                Location::new("cork", "cork", LonLat::from_lat_lon([51.898, -8.4756])),
                Location::new("galway", "galway", LonLat::from_lat_lon([53.2707, -9.0568])),
            ],
        }
    }

    #[must_use]
    pub fn select(self, id: CityId) -> Self {
        Self {
            current: id,
            ..self
        }
    }

    /// Replace the list. The current city survives if it is still listed,
    /// otherwise the first entry becomes current. An empty list is ignored.
    #[must_use]
    pub fn with_locations(self, locations: Vec<Location>) -> Self {
        let Some(first) = locations.first() else {
            return self;
        };
        let current = if locations.iter().any(|l| l.id == self.current) {
            self.current
        } else {
            first.id.clone()
        };
        Self { current, locations }
    }

    pub fn current_location(&self) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == self.current)
    }
}
