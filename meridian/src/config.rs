//! Configuration of bounding box reprojection and polygon approximation.

use serde::{Deserialize, Serialize};

/// Sampling parameters used when a bounding box is converted into another coordinate system or approximated with a
/// polygon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReprojectionConfig {
    /// Number of segments each side of a box is divided into when it is reprojected.
    pub boundary_divisions: u32,
    /// Number of segments per side used by `BoundingBox::to_polygon`.
    pub polygon_segments: u32,
    /// Minimum polygon approximation step in a geographic coordinate system with floating precision.
    pub geographic_min_step: f64,
    /// Minimum polygon approximation step in a projected coordinate system with floating precision.
    pub projected_min_step: f64,
}

impl ReprojectionConfig {
    /// Sets the number of boundary divisions.
    pub fn with_boundary_divisions(mut self, boundary_divisions: u32) -> Self {
        self.boundary_divisions = boundary_divisions;
        self
    }

    /// Sets the number of polygon segments.
    pub fn with_polygon_segments(mut self, polygon_segments: u32) -> Self {
        self.polygon_segments = polygon_segments;
        self
    }

    /// Minimum polygon step for floating precision.
    pub fn min_step(&self, geographic: bool) -> f64 {
        if geographic {
            self.geographic_min_step
        } else {
            self.projected_min_step
        }
    }
}

impl Default for ReprojectionConfig {
    fn default() -> Self {
        Self {
            boundary_divisions: 10,
            polygon_segments: 100,
            geographic_min_step: 1e-5,
            projected_min_step: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_deserialization() {
        let config: ReprojectionConfig = serde_json::from_str(r#"{"boundary_divisions": 50}"#).unwrap();
        assert_eq!(config.boundary_divisions, 50);
        assert_eq!(config.polygon_segments, 100);
        assert_eq!(config.min_step(true), 1e-5);
        assert_eq!(config.min_step(false), 1.0);
    }
}
