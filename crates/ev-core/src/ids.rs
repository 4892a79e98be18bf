use core::fmt;

/// Backend identifier of a city, e.g. `"dublin"`.
///
/// The backend uses lowercase labels as ids; the wrapper keeps them from
/// being mixed up with display labels.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CityId(String);

impl CityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CityId({})", self.0)
    }
}

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for CityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for CityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_raw_id() {
        let id = CityId::from("cork");
        assert_eq!(id.to_string(), "cork");
        assert_eq!(format!("{id:?}"), "CityId(cork)");
    }
}
