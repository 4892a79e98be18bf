//! ev-config: dashboard configuration file format and validation.

pub mod schema;
pub mod validate;

pub use schema::*;
pub use validate::{ValidationError, validate_config};

use ev_core::{CityId, TimeBounds};

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ConfigResult<DashboardConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: DashboardConfig = serde_yaml::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn save_yaml(path: &std::path::Path, config: &DashboardConfig) -> ConfigResult<()> {
    validate_config(config)?;
    let content = serde_yaml::to_string(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

impl DashboardConfig {
    /// Admission floors for time picks.
    pub fn time_bounds(&self) -> ConfigResult<TimeBounds> {
        Ok(TimeBounds {
            earliest_start: validate::parse_floor(
                "time.earliest_start",
                self.time.earliest_start.as_deref(),
            )?,
            earliest_end: validate::parse_floor(
                "time.earliest_end",
                self.time.earliest_end.as_deref(),
            )?,
        })
    }

    pub fn default_city(&self) -> CityId {
        CityId::new(self.default_location.clone())
    }
}
