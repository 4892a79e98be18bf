//! Connector-type and power filters, reconciled against the value domains
//! reported by the latest station fetch.
//!
//! Narrowing a domain never surfaces an error: selections outside the new
//! domain are dropped (connectors) or re-clamped (power) silently.

use std::collections::BTreeSet;

use ev_core::StationMarker;

/// Closed `[min, max]` interval in kW.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerBounds {
    pub min: f64,
    pub max: f64,
}

impl PowerBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, kw: f64) -> bool {
        kw >= self.min && kw <= self.max
    }
}

impl Default for PowerBounds {
    fn default() -> Self {
        Self::new(0.0, 350.0)
    }
}

impl From<[f64; 2]> for PowerBounds {
    fn from(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConnectorFilter {
    /// Labels seen in the latest station data.
    pub domain: Vec<String>,
    /// User selection; empty means "any connector".
    pub selected: Vec<String>,
}

impl ConnectorFilter {
    /// Replace the domain and drop selections that fell out of it.
    #[must_use]
    pub fn with_domain(self, domain: Vec<String>) -> Self {
        let selected = self
            .selected
            .into_iter()
            .filter(|s| domain.contains(s))
            .collect();
        Self { domain, selected }
    }

    /// Direct user override; checked lazily by [`marker_passes`].
    #[must_use]
    pub fn with_selected(self, selected: Vec<String>) -> Self {
        Self { selected, ..self }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PowerFilter {
    pub limits: PowerBounds,
    pub range: PowerBounds,
}

impl PowerFilter {
    /// Replace the limits and clamp the range into them. A range left empty
    /// by the clamp collapses to the full new limits.
    #[must_use]
    pub fn with_limits(self, limits: PowerBounds) -> Self {
        let clamped = PowerBounds::new(
            self.range.min.max(limits.min),
            self.range.max.min(limits.max),
        );
        let range = if clamped.min > clamped.max {
            limits
        } else {
            clamped
        };
        Self { limits, range }
    }

    #[must_use]
    pub fn with_range(self, range: PowerBounds) -> Self {
        Self { range, ..self }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterSelection {
    pub connectors: ConnectorFilter,
    pub power: PowerFilter,
}

/// Whether a marker survives the current filters.
///
/// Markers without a numeric power rating never pass.
pub fn marker_passes(marker: &StationMarker, filters: &FilterSelection) -> bool {
    let Some(kw) = marker.info.power_rating_kw.filter(|v| v.is_finite()) else {
        return false;
    };
    if !filters.power.range.contains(kw) {
        return false;
    }

    let selected = &filters.connectors.selected;
    selected.is_empty()
        || marker
            .connector_tokens()
            .iter()
            .any(|token| selected.iter().any(|s| s == token))
}

/// Sorted, de-duplicated connector labels across all markers.
pub fn connector_domain(markers: &[StationMarker]) -> Vec<String> {
    markers
        .iter()
        .flat_map(|m| m.connector_tokens())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// `[min, max]` over numeric power ratings, `None` if there are none.
pub fn power_limits(markers: &[StationMarker]) -> Option<PowerBounds> {
    markers
        .iter()
        .filter_map(|m| m.info.power_rating_kw)
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<PowerBounds>, kw| match acc {
            None => Some(PowerBounds::new(kw, kw)),
            Some(b) => Some(PowerBounds::new(b.min.min(kw), b.max.max(kw))),
        })
}
