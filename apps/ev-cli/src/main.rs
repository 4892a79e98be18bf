use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use ev_api::{HttpBackend, HttpOptions};
use ev_app::{AppError, AppResult, ChartKind, DashboardSession, series, summarize};
use ev_cache::BoundaryCache;
use ev_config::DashboardConfig;
use ev_core::ewkb::{self, WGS84_SRID};
use ev_core::time::{parse_instant, to_wire};
use ev_core::{CityId, Instant, LonLat, corners_of};
use ev_store::{Action, PowerBounds};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ev-cli")]
#[command(about = "EV charging dashboard CLI - stations, charts and region queries", long_about = None)]
struct Cli {
    /// Path to the dashboard YAML config (defaults apply when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the backend base URL from the config
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List cities served by the backend
    Cities,
    /// Show charging stations of a city at a point in time
    Markers {
        /// City ID (defaults to the configured default location)
        #[arg(long)]
        city: Option<String>,
        /// Time point, e.g. 2025-07-01T10:00:00Z (defaults to now)
        #[arg(long, value_parser = parse_time)]
        at: Option<Instant>,
        /// Keep only these connector types (repeatable)
        #[arg(long = "connector")]
        connectors: Vec<String>,
        /// Minimum rated power in kW
        #[arg(long)]
        min_kw: Option<f64>,
        /// Maximum rated power in kW
        #[arg(long)]
        max_kw: Option<f64>,
    },
    /// Show charging stations inside a rectangle
    Region {
        /// Corner as "lon,lat"
        #[arg(long, value_parser = parse_lon_lat, allow_hyphen_values = true)]
        from: LonLat,
        /// Opposite corner as "lon,lat"
        #[arg(long, value_parser = parse_lon_lat, allow_hyphen_values = true)]
        to: LonLat,
        /// Time point (defaults to now)
        #[arg(long, value_parser = parse_time)]
        at: Option<Instant>,
    },
    /// Print a chart series as CSV
    Chart {
        /// grid-energy, session-counts, city-energy or station-utilisation
        kind: ChartKind,
        /// City ID (defaults to the configured default location)
        #[arg(long)]
        city: Option<String>,
        /// Range start (defaults to one day before the end)
        #[arg(long, value_parser = parse_time)]
        start: Option<Instant>,
        /// Range end (defaults to now)
        #[arg(long, value_parser = parse_time)]
        end: Option<Instant>,
    },
    /// Aggregate station counts per region of the country
    Country,
    /// Encode a WGS 84 point as hex EWKB
    EncodePoint {
        #[arg(allow_negative_numbers = true)]
        lon: f64,
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, default_value_t = WGS84_SRID)]
        srid: u32,
    },
    /// Decode a hex EWKB point
    DecodePoint { hex: String },
    /// Validate a config file
    ConfigCheck {
        /// Config file to check
        path: PathBuf,
    },
    /// Resolve the boundary (or fallback radius) of a city
    Boundary {
        /// City ID (defaults to the configured default location)
        #[arg(long)]
        city: Option<String>,
        /// Skip the on-disk boundary cache
        #[arg(long)]
        no_cache: bool,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let load = || load_config(cli.config.as_deref(), cli.base_url.as_deref());

    match cli.command {
        Commands::Cities => cmd_cities(&load()?),
        Commands::Markers {
            city,
            at,
            connectors,
            min_kw,
            max_kw,
        } => cmd_markers(&load()?, city, at, connectors, min_kw, max_kw),
        Commands::Region { from, to, at } => cmd_region(&load()?, from, to, at),
        Commands::Chart {
            kind,
            city,
            start,
            end,
        } => cmd_chart(&load()?, kind, city, start, end),
        Commands::Country => cmd_country(&load()?),
        Commands::EncodePoint { lon, lat, srid } => cmd_encode_point(lon, lat, srid),
        Commands::DecodePoint { hex } => cmd_decode_point(&hex),
        Commands::ConfigCheck { path } => cmd_config_check(&path),
        Commands::Boundary { city, no_cache } => cmd_boundary(&load()?, city, no_cache),
    }
}

fn parse_time(s: &str) -> Result<Instant, String> {
    parse_instant(s).map_err(|e| e.to_string())
}

fn parse_lon_lat(s: &str) -> Result<LonLat, String> {
    let (lon, lat) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"lon,lat\", got '{s}'"))?;
    let lon: f64 = lon.trim().parse().map_err(|e| format!("bad longitude: {e}"))?;
    let lat: f64 = lat.trim().parse().map_err(|e| format!("bad latitude: {e}"))?;
    Ok(LonLat::new(lon, lat))
}

fn load_config(path: Option<&Path>, base_url: Option<&str>) -> AppResult<DashboardConfig> {
    let mut config = match path {
        Some(path) => ev_config::load_yaml(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(url) = base_url {
        config.backend.base_url = url.to_string();
        ev_config::validate_config(&config)
            .map_err(|e| AppError::Config(e.to_string()))?;
    }
    Ok(config)
}

fn open_session(config: &DashboardConfig) -> AppResult<DashboardSession<HttpBackend>> {
    let options = HttpOptions {
        base_url: config.backend.base_url.clone(),
        timeout: Duration::from_millis(config.backend.timeout_ms),
        token: config.backend.token.clone(),
        search_url: config.boundary.search_url.clone(),
    };
    let backend = HttpBackend::new(options)?;
    DashboardSession::new(backend, config)
}

/// Load the backend's city list and switch to `city` if given.
fn select_city(session: &mut DashboardSession<HttpBackend>, city: Option<String>) -> AppResult<()> {
    if let Err(e) = session.refresh_locations() {
        tracing::warn!(error = %e, "using configured locations");
    }
    if let Some(city) = city {
        let id = CityId::new(city);
        if !session.state().location.locations.iter().any(|l| l.id == id) {
            return Err(AppError::InvalidInput(format!("unknown city '{id}'")));
        }
        session.dispatch(Action::SelectLocation(id));
    }
    Ok(())
}

fn cmd_cities(config: &DashboardConfig) -> AppResult<()> {
    let mut session = open_session(config)?;
    session.refresh_locations()?;
    for loc in &session.state().location.locations {
        println!(
            "{:<12} {:<16} lat={:.4} lon={:.4}",
            loc.id, loc.label, loc.center.lat, loc.center.lon
        );
    }
    Ok(())
}

fn cmd_markers(
    config: &DashboardConfig,
    city: Option<String>,
    at: Option<Instant>,
    connectors: Vec<String>,
    min_kw: Option<f64>,
    max_kw: Option<f64>,
) -> AppResult<()> {
    let mut session = open_session(config)?;
    select_city(&mut session, city)?;
    if let Some(at) = at {
        session.pick_point(at)?;
    }
    session.refresh_markers()?;

    if !connectors.is_empty() {
        session.dispatch(Action::SetConnectorTypes(connectors));
    }
    if min_kw.is_some() || max_kw.is_some() {
        let limits = session.state().filters.power.limits;
        session.dispatch(Action::SetPowerRange(PowerBounds::new(
            min_kw.unwrap_or(limits.min),
            max_kw.unwrap_or(limits.max),
        )));
    }

    print_markers(&session);
    Ok(())
}

fn cmd_region(
    config: &DashboardConfig,
    from: LonLat,
    to: LonLat,
    at: Option<Instant>,
) -> AppResult<()> {
    let mut session = open_session(config)?;
    if let Some(at) = at {
        session.pick_point(at)?;
    }
    let corners = corners_of(&[from, to])?;
    println!(
        "Region top-left ({:.5}, {:.5}) bottom-right ({:.5}, {:.5})",
        corners.top_left.lon,
        corners.top_left.lat,
        corners.bottom_right.lon,
        corners.bottom_right.lat
    );
    session.dispatch(Action::SetCustomRegionEnabled(true));
    session.dispatch(Action::RegionDrawn(vec![
        corners.top_left,
        LonLat::new(corners.bottom_right.lon, corners.top_left.lat),
        corners.bottom_right,
        LonLat::new(corners.top_left.lon, corners.bottom_right.lat),
    ]));
    session.refresh_markers()?;
    print_markers(&session);
    Ok(())
}

fn print_markers(session: &DashboardSession<HttpBackend>) {
    let state = session.state();
    let visible = state.visible_markers();
    println!(
        "{} of {} stations at {}",
        visible.len(),
        state.markers.len(),
        to_wire(state.time.point)
    );
    println!(
        "Connectors: {}  Power: {:.0}-{:.0} kW",
        state.filters.connectors.domain.join(", "),
        state.filters.power.limits.min,
        state.filters.power.limits.max
    );
    for m in visible {
        println!(
            "  {:<10} {:<32} {:>6} kW  {:<20} {}",
            m.info.id,
            m.info.name,
            m.info
                .power_rating_kw
                .map(|kw| format!("{kw:.0}"))
                .unwrap_or_default(),
            m.info.connector_type.as_deref().unwrap_or("-"),
            m.info.status.as_deref().unwrap_or("unknown"),
        );
    }
}

fn cmd_chart(
    config: &DashboardConfig,
    kind: ChartKind,
    city: Option<String>,
    start: Option<Instant>,
    end: Option<Instant>,
) -> AppResult<()> {
    let mut session = open_session(config)?;
    if kind.is_city_scoped() {
        select_city(&mut session, city)?;
    }
    if let Some(end) = end {
        session.pick_point(end)?;
    }
    if let Some(start) = start {
        session.pick_range_start(start)?;
    }
    let range = session.state().time.range;
    eprintln!(
        "{} {} .. {}",
        kind.name(),
        to_wire(range.start),
        to_wire(range.end)
    );

    let data = session.load_chart(kind)?;
    println!("series,time,value");
    for line in series(&data) {
        for (t, v) in &line.points {
            println!("{},{},{}", line.name, to_wire(*t), v);
        }
        if let Some(s) = summarize(&line.points) {
            eprintln!(
                "{} [{}]: {} points, min {:.3}, max {:.3}, total {:.3}",
                line.name, line.unit, s.points, s.min, s.max, s.total
            );
        }
    }
    Ok(())
}

fn cmd_country(config: &DashboardConfig) -> AppResult<()> {
    let mut session = open_session(config)?;
    for region in session.whole_country()? {
        println!("{:<24} {:>8.0}", region.name, region.stations);
    }
    Ok(())
}

fn cmd_encode_point(lon: f64, lat: f64, srid: u32) -> AppResult<()> {
    let p = LonLat::new(lon, lat);
    if !lon.is_finite() || !lat.is_finite() {
        return Err(AppError::InvalidInput(format!("non-finite point {p:?}")));
    }
    println!("{}", ewkb::encode_point_hex(p, srid));
    Ok(())
}

fn cmd_decode_point(hex: &str) -> AppResult<()> {
    let (p, srid) = ewkb::decode_point_hex(hex)?;
    println!(
        "{}",
        serde_json::json!({ "lon": p.lon, "lat": p.lat, "srid": srid })
    );
    Ok(())
}

fn cmd_config_check(path: &Path) -> AppResult<()> {
    println!("Checking config: {}", path.display());
    let config = ev_config::load_yaml(path)?;
    config.time_bounds()?;
    println!("✓ Config is valid");
    println!("  Backend: {}", config.backend.base_url);
    println!(
        "  Locations: {} (default: {})",
        config.locations.len(),
        config.default_location
    );
    Ok(())
}

fn cmd_boundary(config: &DashboardConfig, city: Option<String>, no_cache: bool) -> AppResult<()> {
    let mut session = open_session(config)?;
    select_city(&mut session, city)?;

    let cache = if no_cache {
        None
    } else {
        let dir = config
            .boundary
            .cache_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(".ev-dashboard").join("boundaries"));
        Some(BoundaryCache::new(dir)?)
    };

    match session.city_area(cache.as_ref())? {
        ev_app::CityArea::Boundary { bbox, rings } => {
            println!("Boundary: {} ring(s)", rings.len());
            println!(
                "  bbox lon {:.4}..{:.4} lat {:.4}..{:.4}",
                bbox.min_lon, bbox.max_lon, bbox.min_lat, bbox.max_lat
            );
        }
        ev_app::CityArea::Radius { center, radius_km } => {
            println!(
                "No boundary found; radius {radius_km} km around ({:.4}, {:.4})",
                center.lon, center.lat
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lon_lat_argument() {
        assert_eq!(
            parse_lon_lat("-6.26, 53.35").unwrap(),
            LonLat::new(-6.26, 53.35)
        );
        assert!(parse_lon_lat("53.35").is_err());
        assert!(parse_lon_lat("x,1").is_err());
    }

    #[test]
    fn cli_parses_region_with_negative_longitudes() {
        let cli = Cli::try_parse_from([
            "ev-cli", "region", "--from", "-6.3,53.4", "--to", "-6.2,53.3",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Region { from, .. } if from.lon == -6.3));
    }

    #[test]
    fn cli_parses_chart_kind() {
        let cli =
            Cli::try_parse_from(["ev-cli", "chart", "city-energy", "--city", "cork"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Chart { kind: ChartKind::CityEnergy, .. }
        ));
        assert!(Cli::try_parse_from(["ev-cli", "chart", "pie"]).is_err());
    }
}
