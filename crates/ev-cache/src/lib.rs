//! ev-cache: on-disk cache of city boundary polygons.

pub mod geometry;
pub mod key;
pub mod store;

pub use geometry::{geometry_bbox, geometry_rings};
pub use key::{boundary_key, entry_file_name};
pub use store::{BoundaryCache, CachedBoundary};

pub type CacheResult<T> = Result<T, CacheError>;

#[derive(thiserror::Error, Debug)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid boundary geometry: {reason}")]
    InvalidGeometry { reason: String },
}
