//! Dashboard session: the store, the backend and the admission rules, passed
//! explicitly to whatever drives the views.

use std::sync::Arc;

use ev_api::{ApiResult, Backend, City, RegionCount};
use ev_cache::BoundaryCache;
use ev_config::DashboardConfig;
use ev_core::{CoreError, Instant, TimeBounds};
use ev_store::{Action, DashboardState, Location, LocationSelection, Notification, reduce};

use crate::area::{CityArea, resolve_city_area};
use crate::error::{AppError, AppResult};
use crate::fetch::{Completion, FetchOutput, FetchRequest};
use crate::query::{ChartData, ChartKind, fetch_chart};

pub type Clock = fn() -> Instant;

pub fn system_clock() -> Instant {
    chrono::Utc::now()
}

pub fn location_from_city(city: City) -> Location {
    Location::new(city.id, city.label, city.center)
}

/// Fallback list and default city taken from the configuration.
pub fn locations_from_config(config: &DashboardConfig) -> LocationSelection {
    let locations: Vec<Location> = config
        .locations
        .iter()
        .map(|l| Location::new(l.id.as_str(), l.label.as_str(), l.center))
        .collect();
    if locations.is_empty() {
        return LocationSelection::fallback();
    }
    LocationSelection {
        current: config.default_city(),
        locations: Vec::new(),
    }
    .with_locations(locations)
}

pub struct DashboardSession<B: Backend> {
    backend: Arc<B>,
    state: DashboardState,
    bounds: TimeBounds,
    clock: Clock,
    country_codes: String,
}

impl<B: Backend> DashboardSession<B> {
    pub fn new(backend: B, config: &DashboardConfig) -> AppResult<Self> {
        Self::with_clock(Arc::new(backend), config, system_clock)
    }

    pub fn with_clock(backend: Arc<B>, config: &DashboardConfig, clock: Clock) -> AppResult<Self> {
        let bounds = config.time_bounds()?;
        let state = DashboardState::new(clock(), locations_from_config(config));
        tracing::info!(
            location = state.location.current.as_str(),
            "dashboard session started"
        );
        Ok(Self {
            backend,
            state,
            bounds,
            clock,
            country_codes: config.boundary.country_codes.clone(),
        })
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn backend(&self) -> Arc<B> {
        Arc::clone(&self.backend)
    }

    pub fn bounds(&self) -> TimeBounds {
        self.bounds
    }

    pub fn dispatch(&mut self, action: Action) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
    }

    /// Queue a failure notification and hand the error back.
    fn report(&mut self, err: AppError) -> AppError {
        tracing::warn!(error = %err, "request failed");
        self.dispatch(Action::Notify(Notification::request_failed(err.user_message())));
        err
    }

    fn checked<T>(&mut self, result: ApiResult<T>) -> AppResult<T> {
        result.map_err(|e| self.report(e.into()))
    }

    pub fn refresh_locations(&mut self) -> AppResult<usize> {
        let result = self.backend.cities();
        let cities = self.checked(result)?;
        let n = cities.len();
        self.absorb(FetchOutput::Locations(cities));
        Ok(n)
    }

    /// Marker request for the current state: the custom region when one is
    /// drawn, the selected city otherwise.
    pub fn marker_request(&self) -> Result<FetchRequest, CoreError> {
        let at = self.state.time.point;
        match self.state.region.query() {
            Some(query) => Ok(FetchRequest::MarkersInRegion {
                at,
                region: query?,
            }),
            None => Ok(FetchRequest::MarkersByCity {
                city: self.state.location.current.clone(),
                at,
            }),
        }
    }

    pub fn chart_request(&self, kind: ChartKind) -> FetchRequest {
        FetchRequest::Chart {
            kind,
            city: self.state.location.current.clone(),
            range: self.state.time.range,
        }
    }

    pub fn refresh_markers(&mut self) -> AppResult<usize> {
        let request = self.marker_request().map_err(|e| self.report(e.into()))?;
        let result = request.execute(self.backend.as_ref());
        let output = self.checked(result)?;
        let n = match &output {
            FetchOutput::Markers(markers) => markers.len(),
            _ => 0,
        };
        self.absorb(output);
        Ok(n)
    }

    pub fn load_chart(&mut self, kind: ChartKind) -> AppResult<ChartData> {
        let result = fetch_chart(
            self.backend.as_ref(),
            kind,
            &self.state.location.current,
            self.state.time.range,
        );
        self.checked(result)
    }

    pub fn whole_country(&mut self) -> AppResult<Vec<RegionCount>> {
        let result = self.backend.whole_country();
        self.checked(result)
    }

    pub fn city_area(&mut self, cache: Option<&BoundaryCache>) -> AppResult<CityArea> {
        let location = self
            .state
            .location
            .current_location()
            .cloned()
            .ok_or(AppError::NoLocation)?;
        resolve_city_area(self.backend.as_ref(), cache, &location, &self.country_codes)
            .map_err(|e| self.report(e))
    }

    fn admit(
        &mut self,
        check: fn(&TimeBounds, Instant, Instant) -> Result<(), CoreError>,
        candidate: Instant,
    ) -> AppResult<()> {
        let now = (self.clock)();
        check(&self.bounds, candidate, now).map_err(|e| self.report(e.into()))
    }

    pub fn pick_range_start(&mut self, instant: Instant) -> AppResult<()> {
        self.admit(TimeBounds::admit_start, instant)?;
        self.dispatch(Action::SetRangeStart(instant));
        Ok(())
    }

    pub fn pick_range_end(&mut self, instant: Instant) -> AppResult<()> {
        self.admit(TimeBounds::admit_end, instant)?;
        self.dispatch(Action::SetRangeEnd(instant));
        Ok(())
    }

    pub fn pick_point(&mut self, instant: Instant) -> AppResult<()> {
        self.admit(TimeBounds::admit_point, instant)?;
        self.dispatch(Action::SetTimePoint(instant));
        Ok(())
    }

    /// Fold a background completion into the store. Failures become
    /// notifications. Chart data is returned to the caller since the store
    /// does not hold series.
    pub fn apply(&mut self, completion: Completion) -> Option<ChartData> {
        match completion.result {
            Ok(output) => self.absorb(output),
            Err(e) => {
                let _ = self.report(e.into());
                None
            }
        }
    }

    fn absorb(&mut self, output: FetchOutput) -> Option<ChartData> {
        match output {
            FetchOutput::Locations(cities) => {
                self.dispatch(Action::LocationsLoaded(
                    cities.into_iter().map(location_from_city).collect(),
                ));
                None
            }
            FetchOutput::Markers(markers) => {
                self.dispatch(Action::MarkersLoaded(markers));
                None
            }
            FetchOutput::Chart(data) => Some(data),
        }
    }
}
