use ev_config::schema::*;
use ev_config::{ConfigError, load_yaml, save_yaml};
use ev_core::LonLat;

#[test]
fn save_then_load_custom_config() {
    let mut config = DashboardConfig::default();
    config.backend.base_url = "https://ev.example.org".to_string();
    config.backend.timeout_ms = 2_500;
    config.locations.push(LocationDef {
        id: "limerick".to_string(),
        label: "Limerick".to_string(),
        center: LonLat::from_lat_lon([52.6638, -8.6267]),
    });
    config.default_location = "limerick".to_string();

    let path = std::env::temp_dir().join("ev_config_save_then_load.yaml");
    save_yaml(&path, &config).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(loaded, config);
    assert_eq!(loaded.default_city().as_str(), "limerick");
}

#[test]
fn load_rejects_invalid_file() {
    let path = std::env::temp_dir().join("ev_config_invalid.yaml");
    std::fs::write(&path, "default_location: nowhere\n").unwrap();

    let err = load_yaml(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn load_reports_missing_file() {
    let path = std::env::temp_dir().join("ev_config_does_not_exist.yaml");
    let _ = std::fs::remove_file(&path);
    assert!(matches!(load_yaml(&path), Err(ConfigError::Io(_))));
}
