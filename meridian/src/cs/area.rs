use serde::{Deserialize, Serialize};

use crate::cs::Authority;

/// Declared domain of validity of a coordinate system. Bounds are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    name: String,
    min_lon: f64,
    min_lat: f64,
    max_lon: f64,
    max_lat: f64,
    authority: Option<Authority>,
    deprecated: bool,
}

impl Area {
    /// Creates a new area of use.
    pub fn new(name: impl Into<String>, min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            name: name.into(),
            min_lon,
            min_lat,
            max_lon,
            max_lat,
            authority: None,
            deprecated: false,
        }
    }

    /// Sets the authority of the area.
    pub fn with_authority(mut self, authority: Authority) -> Self {
        self.authority = Some(authority);
        self
    }

    /// Marks the area as deprecated.
    pub fn with_deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    /// Name of the area.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Western bound.
    pub fn min_lon(&self) -> f64 {
        self.min_lon
    }

    /// Southern bound.
    pub fn min_lat(&self) -> f64 {
        self.min_lat
    }

    /// Eastern bound.
    pub fn max_lon(&self) -> f64 {
        self.max_lon
    }

    /// Northern bound.
    pub fn max_lat(&self) -> f64 {
        self.max_lat
    }

    /// Authority of the area.
    pub fn authority(&self) -> Option<&Authority> {
        self.authority.as_ref()
    }

    /// Whether the area is deprecated by its authority.
    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }
}
