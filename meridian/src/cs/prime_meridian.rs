use serde::{Deserialize, Serialize};

use crate::cs::Authority;

/// Meridian from which longitudes are measured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimeMeridian {
    name: String,
    longitude: f64,
    authority: Option<Authority>,
    deprecated: bool,
}

impl PrimeMeridian {
    /// Creates a prime meridian with the longitude offset from Greenwich, in the angular unit of the coordinate
    /// system it belongs to.
    pub fn new(name: impl Into<String>, longitude: f64) -> Self {
        Self {
            name: name.into(),
            longitude,
            authority: None,
            deprecated: false,
        }
    }

    /// Greenwich meridian (`EPSG:8901`).
    pub fn greenwich() -> Self {
        Self::new("Greenwich", 0.0).with_authority(Authority::epsg(8901))
    }

    /// Sets the authority of the prime meridian.
    pub fn with_authority(mut self, authority: Authority) -> Self {
        self.authority = Some(authority);
        self
    }

    /// Marks the prime meridian as deprecated.
    pub fn with_deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    /// Name of the prime meridian.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Longitude offset from Greenwich.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Authority of the prime meridian.
    pub fn authority(&self) -> Option<&Authority> {
        self.authority.as_ref()
    }

    /// Whether the prime meridian is deprecated by its authority.
    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    /// Compares all fields.
    pub fn equals_exact(&self, other: &Self) -> bool {
        self.name == other.name
            && self.longitude == other.longitude
            && self.authority == other.authority
            && self.deprecated == other.deprecated
    }
}

/// Prime meridians are equal if they have the same longitude.
impl PartialEq for PrimeMeridian {
    fn eq(&self, other: &Self) -> bool {
        self.longitude == other.longitude
    }
}
