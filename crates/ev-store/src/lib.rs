//! ev-store: dashboard state and its transitions.
//!
//! Contains:
//! - state (the aggregate state, the action set and the reducer)
//! - filter (connector and power filters, marker predicate)
//! - location (city selection)
//! - region (custom query region)
//! - notification (user-facing error notices)
//!
//! The reducer is pure: it consumes a state and an action and returns the
//! next state. Side effects (fetches, timers) belong to the caller.

pub mod filter;
pub mod location;
pub mod notification;
pub mod region;
pub mod state;

pub use filter::{ConnectorFilter, FilterSelection, PowerBounds, PowerFilter, marker_passes};
pub use location::{Location, LocationSelection};
pub use notification::{Notification, Notifications};
pub use region::RegionSelection;
pub use state::{Action, DashboardState, reduce};
