//! Cache keys and their file names.

use sha2::{Digest, Sha256};

/// `city-boundary:<name>:<countryCodes>`
pub fn boundary_key(name: &str, country_codes: &str) -> String {
    format!("city-boundary:{name}:{country_codes}")
}

/// Hex SHA-256 of the key, so arbitrary city names map to safe file names.
pub fn entry_file_name(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    format!("{:x}.json", digest)
}
