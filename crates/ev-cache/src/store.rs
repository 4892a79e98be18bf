//! Boundary cache storage.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use ev_core::{BBox, LonLat};
use serde::{Deserialize, Serialize};

use crate::geometry::{geometry_bbox, geometry_rings};
use crate::key::{boundary_key, entry_file_name};
use crate::{CacheError, CacheResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CachedBoundary {
    pub key: String,
    pub cached_at: DateTime<Utc>,
    /// GeoJSON `Polygon` or `MultiPolygon`.
    pub geometry: serde_json::Value,
    pub bbox: BBox,
}

impl CachedBoundary {
    pub fn new(
        key: String,
        geometry: serde_json::Value,
        cached_at: DateTime<Utc>,
    ) -> CacheResult<Self> {
        let bbox = geometry_bbox(&geometry)?;
        Ok(Self {
            key,
            cached_at,
            geometry,
            bbox,
        })
    }

    pub fn rings(&self) -> CacheResult<Vec<Vec<LonLat>>> {
        geometry_rings(&self.geometry)
    }
}

#[derive(Clone, Debug)]
pub struct BoundaryCache {
    root_dir: PathBuf,
}

impl BoundaryCache {
    pub fn new(root_dir: PathBuf) -> CacheResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.root_dir.join(entry_file_name(key))
    }

    /// Cached entry, or `None` when missing or unreadable.
    pub fn get(&self, name: &str, country_codes: &str) -> Option<CachedBoundary> {
        let key = boundary_key(name, country_codes);
        let path = self.entry_path(&key);
        let content = fs::read_to_string(&path).ok()?;
        match serde_json::from_str::<CachedBoundary>(&content) {
            Ok(entry) if entry.key == key => Some(entry),
            Ok(_) => {
                tracing::warn!(path = %path.display(), "cache entry key mismatch, ignoring");
                None
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "corrupt cache entry, ignoring");
                None
            }
        }
    }

    pub fn put(
        &self,
        name: &str,
        country_codes: &str,
        geometry: serde_json::Value,
    ) -> CacheResult<CachedBoundary> {
        let entry = CachedBoundary::new(boundary_key(name, country_codes), geometry, Utc::now())?;
        let json = serde_json::to_string_pretty(&entry)?;
        fs::write(self.entry_path(&entry.key), json)?;
        Ok(entry)
    }

    pub fn remove(&self, name: &str, country_codes: &str) -> CacheResult<()> {
        let path = self.entry_path(&boundary_key(name, country_codes));
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Serve from the cache, otherwise call `fetch` and store what it returns.
    ///
    /// `fetch` yielding `Ok(None)` means the geocoder had nothing; nothing is
    /// cached in that case. A failed cache write is logged and the fetched
    /// boundary is still returned.
    pub fn get_or_fetch<F, E>(
        &self,
        name: &str,
        country_codes: &str,
        fetch: F,
    ) -> Result<Option<CachedBoundary>, E>
    where
        F: FnOnce() -> Result<Option<serde_json::Value>, E>,
        E: From<CacheError>,
    {
        if let Some(hit) = self.get(name, country_codes) {
            tracing::debug!(key = %hit.key, "boundary cache hit");
            return Ok(Some(hit));
        }

        let Some(geometry) = fetch()? else {
            return Ok(None);
        };

        match self.put(name, country_codes, geometry.clone()) {
            Ok(entry) => Ok(Some(entry)),
            Err(e @ CacheError::InvalidGeometry { .. }) => Err(e.into()),
            Err(e) => {
                tracing::warn!(error = %e, "failed to write boundary cache entry");
                let key = boundary_key(name, country_codes);
                Ok(Some(CachedBoundary::new(key, geometry, Utc::now())?))
            }
        }
    }
}
