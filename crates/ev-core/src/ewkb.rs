//! Extended Well-Known Binary encoding of single SRID-tagged points.
//!
//! Layout of an encoded point (25 bytes):
//!
//! | bytes | content                                   |
//! |-------|-------------------------------------------|
//! | 0     | byte order marker (`1` = little-endian)   |
//! | 1..5  | geometry type `1` with the SRID flag set  |
//! | 5..9  | SRID                                      |
//! | 9..17 | longitude, IEEE-754 double                |
//! | 17..25| latitude, IEEE-754 double                 |

use crate::geo::{Corners, LonLat};
use crate::{CoreError, CoreResult};

/// WGS 84.
pub const WGS84_SRID: u32 = 4326;

/// Encoded length of one point.
pub const POINT_LEN: usize = 25;

const POINT_TYPE: u32 = 1;
const SRID_FLAG: u32 = 0x2000_0000;
const LITTLE_ENDIAN: u8 = 1;
const BIG_ENDIAN: u8 = 0;

pub fn encode_point(p: LonLat, srid: u32) -> [u8; POINT_LEN] {
    let mut out = [0u8; POINT_LEN];
    out[0] = LITTLE_ENDIAN;
    out[1..5].copy_from_slice(&(POINT_TYPE | SRID_FLAG).to_le_bytes());
    out[5..9].copy_from_slice(&srid.to_le_bytes());
    out[9..17].copy_from_slice(&p.lon.to_le_bytes());
    out[17..25].copy_from_slice(&p.lat.to_le_bytes());
    out
}

/// Lowercase hex form, as sent in query strings.
pub fn encode_point_hex(p: LonLat, srid: u32) -> String {
    hex::encode(encode_point(p, srid))
}

/// Decode a point written in either byte order. Returns the point and SRID.
pub fn decode_point(bytes: &[u8]) -> CoreResult<(LonLat, u32)> {
    if bytes.len() != POINT_LEN {
        return Err(malformed(format!(
            "expected {POINT_LEN} bytes, got {}",
            bytes.len()
        )));
    }

    let little = match bytes[0] {
        LITTLE_ENDIAN => true,
        BIG_ENDIAN => false,
        other => return Err(malformed(format!("unknown byte order marker {other}"))),
    };

    let word = |range: core::ops::Range<usize>| -> u32 {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(&bytes[range]);
        if little {
            u32::from_le_bytes(buf)
        } else {
            u32::from_be_bytes(buf)
        }
    };
    let double = |range: core::ops::Range<usize>| -> f64 {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&bytes[range]);
        if little {
            f64::from_le_bytes(buf)
        } else {
            f64::from_be_bytes(buf)
        }
    };

    let geometry_type = word(1..5);
    if geometry_type & SRID_FLAG == 0 {
        return Err(malformed("SRID flag not set".to_string()));
    }
    // Z and M flags sit above the SRID flag; a plain point has none of them.
    if geometry_type & !SRID_FLAG != POINT_TYPE {
        return Err(malformed(format!(
            "geometry type {:#x} is not a 2D point",
            geometry_type
        )));
    }

    let srid = word(5..9);
    let lon = double(9..17);
    let lat = double(17..25);
    Ok((LonLat::new(lon, lat), srid))
}

pub fn decode_point_hex(s: &str) -> CoreResult<(LonLat, u32)> {
    let bytes = hex::decode(s.trim()).map_err(|e| malformed(format!("invalid hex: {e}")))?;
    decode_point(&bytes)
}

fn malformed(what: String) -> CoreError {
    CoreError::MalformedEwkb { what }
}

/// Query parameters of a custom-region marker request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionQuery {
    /// Encoded top-left corner.
    pub location1: String,
    /// Encoded bottom-right corner.
    pub location2: String,
}

impl RegionQuery {
    pub fn from_corners(corners: &Corners, srid: u32) -> Self {
        Self {
            location1: encode_point_hex(corners.top_left, srid),
            location2: encode_point_hex(corners.bottom_right, srid),
        }
    }

    /// Corners of a drawn ring, encoded in WGS 84.
    pub fn from_ring(ring: &[LonLat]) -> CoreResult<Self> {
        let corners = crate::geo::corners_of(ring)?;
        Ok(Self::from_corners(&corners, WGS84_SRID))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_layout() {
        let hex = encode_point_hex(LonLat::new(0.0, 0.0), WGS84_SRID);
        assert_eq!(hex.len(), 50);
        assert!(hex.starts_with("0101000020e6100000"));
        assert!(hex[18..].chars().all(|c| c == '0'));
    }

    #[test]
    fn known_point_encoding() {
        // SELECT ST_AsEWKB(ST_SetSRID(ST_MakePoint(1, 2), 4326))
        let hex = encode_point_hex(LonLat::new(1.0, 2.0), WGS84_SRID);
        assert_eq!(
            hex,
            "0101000020e6100000000000000000f03f0000000000000040"
        );
    }

    #[test]
    fn decode_is_bit_exact() {
        let p = LonLat::new(-6.260_309_7, 53.349_805_3);
        let (q, srid) = decode_point_hex(&encode_point_hex(p, WGS84_SRID)).unwrap();
        assert_eq!(srid, WGS84_SRID);
        assert_eq!(q.lon.to_bits(), p.lon.to_bits());
        assert_eq!(q.lat.to_bits(), p.lat.to_bits());
    }

    #[test]
    fn decodes_big_endian() {
        let mut be = vec![0u8];
        be.extend_from_slice(&(POINT_TYPE | SRID_FLAG).to_be_bytes());
        be.extend_from_slice(&3857u32.to_be_bytes());
        be.extend_from_slice(&10.5f64.to_be_bytes());
        be.extend_from_slice(&(-3.25f64).to_be_bytes());
        let (p, srid) = decode_point(&be).unwrap();
        assert_eq!(srid, 3857);
        assert_eq!(p, LonLat::new(10.5, -3.25));
    }

    #[test]
    fn rejects_plain_wkb_and_bad_lengths() {
        let mut plain = encode_point(LonLat::new(1.0, 1.0), WGS84_SRID);
        plain[4] = 0;
        assert!(decode_point(&plain).is_err());
        assert!(decode_point(&plain[..20]).is_err());
        assert!(decode_point_hex("zz").is_err());
    }

    #[test]
    fn region_query_from_ring() {
        let ring = [
            LonLat::new(-6.2, 53.3),
            LonLat::new(-6.3, 53.3),
            LonLat::new(-6.3, 53.4),
            LonLat::new(-6.2, 53.4),
        ];
        let q = RegionQuery::from_ring(&ring).unwrap();
        let (tl, _) = decode_point_hex(&q.location1).unwrap();
        let (br, _) = decode_point_hex(&q.location2).unwrap();
        assert_eq!(tl, LonLat::new(-6.3, 53.4));
        assert_eq!(br, LonLat::new(-6.2, 53.3));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn encoded_point_is_25_bytes_and_exact(lon in -180.0_f64..180.0, lat in -90.0_f64..90.0) {
            let p = LonLat::new(lon, lat);
            let hex = encode_point_hex(p, WGS84_SRID);
            prop_assert_eq!(hex.len(), 2 * POINT_LEN);
            let (q, srid) = decode_point_hex(&hex).unwrap();
            prop_assert_eq!(srid, WGS84_SRID);
            prop_assert_eq!(q.lon.to_bits(), lon.to_bits());
            prop_assert_eq!(q.lat.to_bits(), lat.to_bits());
        }
    }
}
