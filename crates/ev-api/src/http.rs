//! Blocking reqwest client for the dashboard backend.

use std::time::Duration;

use ev_core::time::to_wire;
use ev_core::{CityId, Instant, RegionQuery, StationMarker, TimeRange};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, HeaderValue};
use serde::de::DeserializeOwned;

use crate::backend::Backend;
use crate::model::*;
use crate::wire::{self, Envelope};
use crate::{ApiError, ApiResult, convert};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5_000);
pub const DEFAULT_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";

#[derive(Clone, Debug)]
pub struct HttpOptions {
    pub base_url: String,
    pub timeout: Duration,
    /// Sent as `Authorization: Bearer <token>` when present.
    pub token: Option<String>,
    /// Geocoder search endpoint used for city boundaries.
    pub search_url: String,
}

impl HttpOptions {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            token: None,
            search_url: DEFAULT_SEARCH_URL.to_string(),
        }
    }
}

pub struct HttpBackend {
    client: Client,
    options: HttpOptions,
}

impl HttpBackend {
    pub fn new(options: HttpOptions) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(options.timeout)
            .user_agent(concat!("ev-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| ApiError::Transport {
                endpoint: options.base_url.clone(),
                source,
            })?;
        Ok(Self { client, options })
    }

    pub fn options(&self) -> &HttpOptions {
        &self.options
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.options.base_url.trim_end_matches('/'), path)
    }

    fn request(&self, path: &str, query: &[(&str, String)]) -> RequestBuilder {
        let mut req = self
            .client
            .get(self.url(path))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .query(query);
        if let Some(token) = &self.options.token {
            req = req.bearer_auth(token);
        }
        req
    }

    fn send_json<T: DeserializeOwned>(&self, endpoint: &str, req: RequestBuilder) -> ApiResult<T> {
        let resp = req.send().map_err(|source| ApiError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }
        let body = resp.text().map_err(|source| ApiError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    /// GET an enveloped endpoint and unwrap its payload.
    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> ApiResult<T> {
        tracing::debug!(path, ?query, "backend request");
        let env: Envelope<T> = self.send_json(path, self.request(path, query))?;
        env.into_data(path)
    }
}

fn range_query(range: TimeRange) -> [(&'static str, String); 2] {
    [
        ("start_time", to_wire(range.start)),
        ("end_time", to_wire(range.end)),
    ]
}

fn city_range_query(city: &CityId, range: TimeRange) -> Vec<(&'static str, String)> {
    let mut q = vec![("city_id", city.as_str().to_string())];
    q.extend(range_query(range));
    q
}

impl Backend for HttpBackend {
    fn cities(&self) -> ApiResult<Vec<City>> {
        let items: Vec<wire::CityItem> = self.get("/cities/all", &[])?;
        Ok(items.into_iter().map(convert::city).collect())
    }

    fn markers_by_city(&self, city: &CityId, at: Instant) -> ApiResult<Vec<StationMarker>> {
        let map: wire::MarkerMap = self.get(
            "/map/get_map_by_city_and_time",
            &[
                ("city_id", city.as_str().to_string()),
                ("datetime", to_wire(at)),
            ],
        )?;
        Ok(convert::markers(map))
    }

    fn markers_in_region(
        &self,
        at: Instant,
        region: &RegionQuery,
    ) -> ApiResult<Vec<StationMarker>> {
        let map: wire::MarkerMap = self.get(
            "/map/cus_map",
            &[
                ("datetime", to_wire(at)),
                ("location1", region.location1.clone()),
                ("location2", region.location2.clone()),
            ],
        )?;
        Ok(convert::markers(map))
    }

    fn grid_energy(&self, range: TimeRange) -> ApiResult<Vec<GridSample>> {
        let payload: wire::GridPayload = self.get("/graph/grid_energy", &range_query(range))?;
        Ok(convert::grid(payload)?)
    }

    fn session_counts(&self, city: &CityId, range: TimeRange) -> ApiResult<Vec<SessionSample>> {
        let payload: wire::SessionCountsPayload = self.get(
            "/graph/charging_sessions_counts",
            &city_range_query(city, range),
        )?;
        Ok(convert::session_counts(payload)?)
    }

    fn city_energy(&self, city: &CityId, range: TimeRange) -> ApiResult<Vec<EnergySample>> {
        let payload: wire::EnergyPayload =
            self.get("/graph/city_energy", &city_range_query(city, range))?;
        Ok(convert::energy(payload)?)
    }

    fn station_utilisation(
        &self,
        city: &CityId,
        range: TimeRange,
    ) -> ApiResult<Vec<StationUtilisation>> {
        let payload: wire::UtilisationPayload =
            self.get("/graph/station_utilisation", &city_range_query(city, range))?;
        Ok(convert::utilisation(payload)?)
    }

    fn whole_country(&self) -> ApiResult<Vec<RegionCount>> {
        let items: Vec<wire::CountryRegionItem> = self.get("/map/get_whole_country_map", &[])?;
        Ok(convert::region_counts(items))
    }

    fn city_boundary(&self, name: &str, country_codes: &str) -> ApiResult<Option<CityBoundary>> {
        let endpoint = self.options.search_url.as_str();
        tracing::debug!(endpoint, name, country_codes, "boundary search");
        let req = self
            .client
            .get(endpoint)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .query(&[
                ("format", "json"),
                ("limit", "1"),
                ("polygon_geojson", "1"),
                ("city", name),
                ("countrycodes", country_codes),
            ]);
        let places: Vec<wire::NominatimPlace> = self.send_json(endpoint, req)?;
        Ok(convert::boundary(places))
    }
}
