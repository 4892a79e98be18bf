//! Chart queries: fetch, flatten into plottable series, summarize.

use std::collections::BTreeSet;

use ev_api::{ApiResult, Backend, EnergySample, GridSample, SessionSample, StationUtilisation};
use ev_core::units::{Energy, as_kw, as_kwh, kwh};
use ev_core::{CityId, Instant, TimeRange};
use uom::si::ratio::ratio;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChartKind {
    GridEnergy,
    SessionCounts,
    CityEnergy,
    StationUtilisation,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::GridEnergy,
        ChartKind::SessionCounts,
        ChartKind::CityEnergy,
        ChartKind::StationUtilisation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ChartKind::GridEnergy => "grid-energy",
            ChartKind::SessionCounts => "session-counts",
            ChartKind::CityEnergy => "city-energy",
            ChartKind::StationUtilisation => "station-utilisation",
        }
    }

    /// Grid energy is national; every other chart is per city.
    pub fn is_city_scoped(self) -> bool {
        !matches!(self, ChartKind::GridEnergy)
    }
}

impl std::str::FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| format!("unknown chart '{s}'"))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ChartData {
    Grid(Vec<GridSample>),
    Sessions(Vec<SessionSample>),
    Energy(Vec<EnergySample>),
    Utilisation(Vec<StationUtilisation>),
}

impl ChartData {
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartData::Grid(_) => ChartKind::GridEnergy,
            ChartData::Sessions(_) => ChartKind::SessionCounts,
            ChartData::Energy(_) => ChartKind::CityEnergy,
            ChartData::Utilisation(_) => ChartKind::StationUtilisation,
        }
    }
}

pub fn fetch_chart<B: Backend + ?Sized>(
    backend: &B,
    kind: ChartKind,
    city: &CityId,
    range: TimeRange,
) -> ApiResult<ChartData> {
    Ok(match kind {
        ChartKind::GridEnergy => ChartData::Grid(backend.grid_energy(range)?),
        ChartKind::SessionCounts => ChartData::Sessions(backend.session_counts(city, range)?),
        ChartKind::CityEnergy => ChartData::Energy(backend.city_energy(city, range)?),
        ChartKind::StationUtilisation => {
            ChartData::Utilisation(backend.station_utilisation(city, range)?)
        }
    })
}

/// One named line of a chart.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub name: String,
    pub unit: &'static str,
    pub points: Vec<(Instant, f64)>,
}

/// Flatten chart data into time-ordered series.
pub fn series(data: &ChartData) -> Vec<Series> {
    let mut out = match data {
        ChartData::Grid(samples) => vec![
            Series {
                name: "generation".to_string(),
                unit: "kW",
                points: samples.iter().map(|s| (s.at, as_kw(s.generation))).collect(),
            },
            Series {
                name: "load".to_string(),
                unit: "kW",
                points: samples.iter().map(|s| (s.at, as_kw(s.load))).collect(),
            },
        ],
        ChartData::Sessions(samples) => vec![Series {
            name: "sessions".to_string(),
            unit: "sessions",
            points: samples.iter().map(|s| (s.at, s.sessions)).collect(),
        }],
        ChartData::Energy(samples) => vec![Series {
            name: "energy".to_string(),
            unit: "kWh",
            points: samples.iter().map(|s| (s.at, as_kwh(s.energy))).collect(),
        }],
        ChartData::Utilisation(stations) => stations
            .iter()
            .map(|st| Series {
                name: st.station_id.clone(),
                unit: "ratio",
                points: st
                    .samples
                    .iter()
                    .map(|s| (s.at, s.ratio.get::<ratio>()))
                    .collect(),
            })
            .collect(),
    };
    for s in &mut out {
        s.points.sort_by_key(|(t, _)| *t);
    }
    out
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartSummary {
    pub points: usize,
    pub first: Instant,
    pub last: Instant,
    pub min: f64,
    pub max: f64,
    pub total: f64,
}

/// Summary of one series; `None` for an empty one.
pub fn summarize(points: &[(Instant, f64)]) -> Option<ChartSummary> {
    let (first, _) = *points.first()?;
    let init = ChartSummary {
        points: 0,
        first,
        last: first,
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
        total: 0.0,
    };
    Some(points.iter().fold(init, |acc, &(t, v)| ChartSummary {
        points: acc.points + 1,
        first: acc.first.min(t),
        last: acc.last.max(t),
        min: acc.min.min(v),
        max: acc.max.max(v),
        total: acc.total + v,
    }))
}

/// Energy delivered across the whole range.
pub fn total_energy(samples: &[EnergySample]) -> Energy {
    samples
        .iter()
        .fold(kwh(0.0), |acc, s| acc + s.energy)
}

/// Station-by-time grid for heatmap rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct UtilisationMatrix {
    /// Union of all sample timestamps, ascending.
    pub timestamps: Vec<Instant>,
    pub station_ids: Vec<String>,
    /// `rows[i][j]` is station `i` at `timestamps[j]`, `None` where unsampled.
    pub rows: Vec<Vec<Option<f64>>>,
}

pub fn utilisation_matrix(stations: &[StationUtilisation]) -> UtilisationMatrix {
    let timestamps: Vec<Instant> = stations
        .iter()
        .flat_map(|s| s.samples.iter().map(|p| p.at))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let rows = stations
        .iter()
        .map(|st| {
            let mut row = vec![None; timestamps.len()];
            for sample in &st.samples {
                if let Ok(j) = timestamps.binary_search(&sample.at) {
                    row[j] = Some(sample.ratio.get::<ratio>());
                }
            }
            row
        })
        .collect();

    UtilisationMatrix {
        timestamps,
        station_ids: stations.iter().map(|s| s.station_id.clone()).collect(),
        rows,
    }
}
