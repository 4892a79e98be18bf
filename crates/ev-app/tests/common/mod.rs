#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use ev_api::*;
use ev_core::units::{kwh, mw};
use ev_core::{CityId, Instant, LonLat, RegionQuery, StationInfo, StationMarker, TimeRange};

pub fn fixed_now() -> Instant {
    Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap()
}

pub fn station(id: &str, kw: Option<f64>, connector: &str) -> StationMarker {
    StationMarker {
        position: LonLat::new(-6.26, 53.35),
        info: StationInfo {
            id: id.to_string(),
            name: format!("Station {id}"),
            power_rating_kw: kw,
            connector_type: Some(connector.to_string()),
            ..StationInfo::default()
        },
    }
}

/// In-memory backend with per-city latency and failure switches.
#[derive(Default)]
pub struct FakeBackend {
    pub cities: Vec<City>,
    pub markers: HashMap<String, Vec<StationMarker>>,
    pub region_markers: Vec<StationMarker>,
    pub delays: HashMap<String, Duration>,
    pub failing: bool,
    pub boundary: Option<serde_json::Value>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn irish() -> Self {
        let mut markers = HashMap::new();
        markers.insert(
            "dublin".to_string(),
            vec![
                station("d1", Some(22.0), "Type2"),
                station("d2", Some(150.0), "CCS, CHAdeMO"),
            ],
        );
        markers.insert("cork".to_string(), vec![station("c1", Some(50.0), "CCS")]);
        Self {
            cities: vec![
                City {
                    id: CityId::from("dublin"),
                    label: "Dublin".to_string(),
                    center: LonLat::new(-6.26, 53.35),
                },
                City {
                    id: CityId::from("cork"),
                    label: "Cork".to_string(),
                    center: LonLat::new(-8.47, 51.9),
                },
            ],
            markers,
            region_markers: vec![station("r1", Some(75.0), "CCS, Type2")],
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> ApiResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.failing {
            return Err(ApiError::Application {
                endpoint: "fake".to_string(),
                code: 500,
                message: "backend exploded".to_string(),
            });
        }
        Ok(())
    }
}

impl Backend for FakeBackend {
    fn cities(&self) -> ApiResult<Vec<City>> {
        self.record("cities".to_string())?;
        Ok(self.cities.clone())
    }

    fn markers_by_city(&self, city: &CityId, _at: Instant) -> ApiResult<Vec<StationMarker>> {
        if let Some(delay) = self.delays.get(city.as_str()) {
            thread::sleep(*delay);
        }
        self.record(format!("markers:{}", city.as_str()))?;
        Ok(self.markers.get(city.as_str()).cloned().unwrap_or_default())
    }

    fn markers_in_region(
        &self,
        _at: Instant,
        region: &RegionQuery,
    ) -> ApiResult<Vec<StationMarker>> {
        self.record(format!("region:{}:{}", region.location1, region.location2))?;
        Ok(self.region_markers.clone())
    }

    fn grid_energy(&self, range: TimeRange) -> ApiResult<Vec<GridSample>> {
        self.record("grid".to_string())?;
        Ok(vec![
            GridSample {
                at: range.start,
                generation: mw(3.0),
                load: mw(4.0),
            },
            GridSample {
                at: range.end,
                generation: mw(3.5),
                load: mw(4.5),
            },
        ])
    }

    fn session_counts(&self, city: &CityId, range: TimeRange) -> ApiResult<Vec<SessionSample>> {
        self.record(format!("sessions:{}", city.as_str()))?;
        Ok(vec![SessionSample {
            at: range.start,
            sessions: 12.0,
        }])
    }

    fn city_energy(&self, city: &CityId, range: TimeRange) -> ApiResult<Vec<EnergySample>> {
        self.record(format!("energy:{}", city.as_str()))?;
        Ok(vec![EnergySample {
            at: range.start,
            energy: kwh(40.0),
        }])
    }

    fn station_utilisation(
        &self,
        city: &CityId,
        _range: TimeRange,
    ) -> ApiResult<Vec<StationUtilisation>> {
        self.record(format!("utilisation:{}", city.as_str()))?;
        Ok(vec![])
    }

    fn whole_country(&self) -> ApiResult<Vec<RegionCount>> {
        self.record("country".to_string())?;
        Ok(vec![RegionCount { name: "Leinster".to_string(), stations: 420.0 }])
    }

    fn city_boundary(&self, name: &str, country_codes: &str) -> ApiResult<Option<CityBoundary>> {
        self.record(format!("boundary:{name}:{country_codes}"))?;
        Ok(self.boundary.clone().map(|geometry| CityBoundary { geometry }))
    }
}
