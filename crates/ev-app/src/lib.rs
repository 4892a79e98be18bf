//! Service layer for the charging dashboard.
//!
//! Ties the store, the backend and the boundary cache together for the CLI
//! and any other frontend: a [`DashboardSession`] for synchronous flows and a
//! [`FetchCoordinator`] for background fetches that must not race.

pub mod area;
pub mod error;
pub mod fetch;
pub mod query;
pub mod session;

pub use area::{CityArea, resolve_city_area};
pub use error::{AppError, AppResult};
pub use fetch::{
    Completion, FetchCoordinator, FetchOutput, FetchRequest, QueryKind, RequestSignature, Ticket,
};
pub use query::{
    ChartData, ChartKind, ChartSummary, Series, UtilisationMatrix, fetch_chart, series, summarize,
    total_energy, utilisation_matrix,
};
pub use session::{DashboardSession, locations_from_config, system_clock};
