//! Configuration validation logic.

use std::collections::HashSet;

use ev_core::time::parse_instant;

use crate::schema::{DashboardConfig, LATEST_VERSION};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_config(config: &DashboardConfig) -> Result<(), ValidationError> {
    if config.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }

    validate_url("backend.base_url", &config.backend.base_url)?;
    validate_url("boundary.search_url", &config.boundary.search_url)?;

    if config.backend.timeout_ms == 0 {
        return Err(ValidationError::InvalidValue {
            field: "backend.timeout_ms".to_string(),
            value: "0".to_string(),
            reason: "must be positive".to_string(),
        });
    }

    let mut ids = HashSet::new();
    for location in &config.locations {
        if !ids.insert(location.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: location.id.clone(),
                context: "locations".to_string(),
            });
        }
        if !location.center.lon.is_finite() || !location.center.lat.is_finite() {
            return Err(ValidationError::InvalidValue {
                field: format!("location '{}' center", location.id),
                value: format!("{:?}", location.center),
                reason: "must be finite".to_string(),
            });
        }
    }

    if !config.locations.is_empty() && !ids.contains(config.default_location.as_str()) {
        return Err(ValidationError::MissingReference {
            id: config.default_location.clone(),
            context: "default_location".to_string(),
        });
    }

    let start = parse_floor("time.earliest_start", config.time.earliest_start.as_deref())?;
    let end = parse_floor("time.earliest_end", config.time.earliest_end.as_deref())?;
    if let (Some(start), Some(end)) = (start, end)
        && end < start
    {
        return Err(ValidationError::InvalidValue {
            field: "time.earliest_end".to_string(),
            value: config.time.earliest_end.clone().unwrap_or_default(),
            reason: "must not precede time.earliest_start".to_string(),
        });
    }

    Ok(())
}

fn validate_url(field: &str, url: &str) -> Result<(), ValidationError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: url.to_string(),
            reason: "expected an http:// or https:// URL".to_string(),
        })
    }
}

pub(crate) fn parse_floor(
    field: &str,
    raw: Option<&str>,
) -> Result<Option<ev_core::Instant>, ValidationError> {
    raw.map(|s| {
        parse_instant(s).map_err(|e| ValidationError::InvalidValue {
            field: field.to_string(),
            value: s.to_string(),
            reason: e.to_string(),
        })
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        validate_config(&DashboardConfig::default()).unwrap();
    }

    #[test]
    fn rejects_duplicate_location() {
        let mut config = DashboardConfig::default();
        let dup = config.locations[0].clone();
        config.locations.push(dup);
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::DuplicateId { .. })
        ));
    }

    #[test]
    fn rejects_unknown_default_location() {
        let config = DashboardConfig {
            default_location: "limerick".to_string(),
            ..DashboardConfig::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::MissingReference { .. })
        ));
    }

    #[test]
    fn rejects_bad_scheme_and_zero_timeout() {
        let mut config = DashboardConfig::default();
        config.backend.base_url = "ftp://example".to_string();
        assert!(validate_config(&config).is_err());

        let mut config = DashboardConfig::default();
        config.backend.timeout_ms = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_inverted_floors() {
        let mut config = DashboardConfig::default();
        config.time.earliest_start = Some("2025-06-21".to_string());
        config.time.earliest_end = Some("2025-06-20".to_string());
        assert!(validate_config(&config).is_err());

        config.time.earliest_end = Some("not a date".to_string());
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_future_version() {
        let config = DashboardConfig {
            version: LATEST_VERSION + 1,
            ..DashboardConfig::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }
}
