//! Store state and the closed set of transitions over it.

use ev_core::{CityId, Instant, LonLat, StationMarker, TimeSelection};

use crate::filter::{self, FilterSelection, PowerBounds};
use crate::location::{Location, LocationSelection};
use crate::notification::{Notification, Notifications};
use crate::region::RegionSelection;

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardState {
    pub location: LocationSelection,
    pub time: TimeSelection,
    pub region: RegionSelection,
    pub filters: FilterSelection,
    /// Latest marker snapshot for the active location/region and time point.
    pub markers: Vec<StationMarker>,
    pub notifications: Notifications,
}

impl DashboardState {
    pub fn new(now: Instant, location: LocationSelection) -> Self {
        Self {
            location,
            time: TimeSelection::anchored_at(now),
            region: RegionSelection::default(),
            filters: FilterSelection::default(),
            markers: Vec::new(),
            notifications: Notifications::default(),
        }
    }

    /// Start-of-session state with the built-in fallback cities.
    pub fn initial(now: Instant) -> Self {
        Self::new(now, LocationSelection::fallback())
    }

    /// Empty placeholder: no locations, anchored at the Unix epoch.
    pub fn empty() -> Self {
        Self::new(Instant::UNIX_EPOCH, LocationSelection::default())
    }

    /// Markers that pass the current filters.
    pub fn visible_markers(&self) -> Vec<&StationMarker> {
        self.markers
            .iter()
            .filter(|m| filter::marker_passes(m, &self.filters))
            .collect()
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::empty()
    }
}

/// Every way the store can change.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    SelectLocation(CityId),
    LocationsLoaded(Vec<Location>),

    SetTimePoint(Instant),
    SetRangeStart(Instant),
    SetRangeEnd(Instant),
    SetRange { start: Instant, end: Instant },

    SetCustomRegionEnabled(bool),
    RegionDrawn(Vec<LonLat>),
    RegionEdited(Vec<LonLat>),
    RegionDeleted,

    SetConnectorTypes(Vec<String>),
    SetPowerRange(PowerBounds),
    SetAvailableConnectorTypes(Vec<String>),
    SetPowerLimits(PowerBounds),
    /// Replaces the marker snapshot and re-derives both filter domains.
    MarkersLoaded(Vec<StationMarker>),

    Notify(Notification),
    DismissNotification(u64),
}

/// Apply one action and return the next state.
pub fn reduce(state: DashboardState, action: Action) -> DashboardState {
    let DashboardState {
        location,
        time,
        region,
        filters,
        markers,
        notifications,
    } = state;

    match action {
        Action::SelectLocation(id) => DashboardState {
            location: location.select(id),
            time,
            region,
            filters,
            markers,
            notifications,
        },
        Action::LocationsLoaded(list) => DashboardState {
            location: location.with_locations(list),
            time,
            region,
            filters,
            markers,
            notifications,
        },

        Action::SetTimePoint(i) => DashboardState {
            time: time.set_point(i),
            location,
            region,
            filters,
            markers,
            notifications,
        },
        Action::SetRangeStart(i) => DashboardState {
            time: time.set_range_start(i),
            location,
            region,
            filters,
            markers,
            notifications,
        },
        Action::SetRangeEnd(i) => DashboardState {
            time: time.set_range_end(i),
            location,
            region,
            filters,
            markers,
            notifications,
        },
        Action::SetRange { start, end } => DashboardState {
            time: time.set_range(start, end),
            location,
            region,
            filters,
            markers,
            notifications,
        },

        Action::SetCustomRegionEnabled(enabled) => DashboardState {
            region: region.set_enabled(enabled),
            location,
            time,
            filters,
            markers,
            notifications,
        },
        Action::RegionDrawn(ring) | Action::RegionEdited(ring) => DashboardState {
            region: region.set_geometry(ring),
            location,
            time,
            filters,
            markers,
            notifications,
        },
        Action::RegionDeleted => DashboardState {
            region: region.clear_geometry(),
            location,
            time,
            filters,
            markers,
            notifications,
        },

        Action::SetConnectorTypes(list) => DashboardState {
            filters: FilterSelection {
                connectors: filters.connectors.with_selected(list),
                power: filters.power,
            },
            location,
            time,
            region,
            markers,
            notifications,
        },
        Action::SetPowerRange(range) => DashboardState {
            filters: FilterSelection {
                power: filters.power.with_range(range),
                connectors: filters.connectors,
            },
            location,
            time,
            region,
            markers,
            notifications,
        },
        Action::SetAvailableConnectorTypes(domain) => DashboardState {
            filters: FilterSelection {
                connectors: filters.connectors.with_domain(domain),
                power: filters.power,
            },
            location,
            time,
            region,
            markers,
            notifications,
        },
        Action::SetPowerLimits(limits) => DashboardState {
            filters: FilterSelection {
                power: filters.power.with_limits(limits),
                connectors: filters.connectors,
            },
            location,
            time,
            region,
            markers,
            notifications,
        },
        Action::MarkersLoaded(new_markers) => {
            let domain = filter::connector_domain(&new_markers);
            let power = match filter::power_limits(&new_markers) {
                Some(limits) => filters.power.with_limits(limits),
                None => filters.power,
            };
            DashboardState {
                filters: FilterSelection {
                    connectors: filters.connectors.with_domain(domain),
                    power,
                },
                markers: new_markers,
                location,
                time,
                region,
                notifications,
            }
        }

        Action::Notify(n) => DashboardState {
            notifications: notifications.push(n),
            location,
            time,
            region,
            filters,
            markers,
        },
        Action::DismissNotification(id) => DashboardState {
            notifications: notifications.dismiss(id),
            location,
            time,
            region,
            filters,
            markers,
        },
    }
}
