use std::sync::Arc;

use crate::bounding_box::BoundingBox;
use crate::cs::{
    Area, Authority, Axis, GeographicCoordinateSystem, LinearUnit, ProjectedCoordinateSystem,
};
use crate::measure::MeasureUnit;

/// Common capability of geographic and projected coordinate systems.
pub trait CoordinateReferenceSystem {
    /// Numeric id, usually the authority code. `0` if unknown.
    fn id(&self) -> i32;
    /// Name of the coordinate system.
    fn name(&self) -> &str;
    /// Authority of the coordinate system.
    fn authority(&self) -> Option<&Authority>;
    /// Area of use.
    fn area(&self) -> Option<&Area>;
    /// Axes, either none or exactly two.
    fn axes(&self) -> &[Axis];
    /// Whether the coordinate system is deprecated by its authority.
    fn is_deprecated(&self) -> bool;
    /// Unit of the coordinates, angular or linear.
    fn unit(&self) -> &Arc<MeasureUnit>;
    /// Linear unit of the coordinates. For geographic systems it is the length of one angular unit along the
    /// equator.
    fn length_unit(&self) -> LinearUnit;
    /// Returns true for a geographic coordinate system.
    fn is_geographic(&self) -> bool;
}

/// Geographic or projected coordinate system.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordinateSystem {
    /// Longitude/latitude on a datum.
    Geographic(GeographicCoordinateSystem),
    /// Planar projected coordinates.
    Projected(ProjectedCoordinateSystem),
}

impl CoordinateSystem {
    fn inner(&self) -> &dyn CoordinateReferenceSystem {
        match self {
            CoordinateSystem::Geographic(cs) => cs,
            CoordinateSystem::Projected(cs) => cs,
        }
    }

    /// Geographic coordinate system of the coordinates: the system itself or the base system of a projected one.
    pub fn geographic(&self) -> &GeographicCoordinateSystem {
        match self {
            CoordinateSystem::Geographic(cs) => cs,
            CoordinateSystem::Projected(cs) => cs.geographic(),
        }
    }

    /// Returns the projected coordinate system, if this is one.
    pub fn as_projected(&self) -> Option<&ProjectedCoordinateSystem> {
        match self {
            CoordinateSystem::Geographic(_) => None,
            CoordinateSystem::Projected(cs) => Some(cs),
        }
    }

    /// Bounding box of the area of use in this coordinate system.
    pub fn area_bounding_box(&self) -> BoundingBox {
        match self {
            CoordinateSystem::Geographic(cs) => cs.area_bounding_box(),
            CoordinateSystem::Projected(cs) => cs.area_bounding_box(),
        }
    }

    /// Compares all fields, including name, id and authority.
    pub fn equals_exact(&self, other: &Self) -> bool {
        match (self, other) {
            (CoordinateSystem::Geographic(a), CoordinateSystem::Geographic(b)) => a.equals_exact(b),
            (CoordinateSystem::Projected(a), CoordinateSystem::Projected(b)) => a.equals_exact(b),
            _ => false,
        }
    }
}

impl CoordinateReferenceSystem for CoordinateSystem {
    fn id(&self) -> i32 {
        self.inner().id()
    }

    fn name(&self) -> &str {
        self.inner().name()
    }

    fn authority(&self) -> Option<&Authority> {
        self.inner().authority()
    }

    fn area(&self) -> Option<&Area> {
        self.inner().area()
    }

    fn axes(&self) -> &[Axis] {
        self.inner().axes()
    }

    fn is_deprecated(&self) -> bool {
        self.inner().is_deprecated()
    }

    fn unit(&self) -> &Arc<MeasureUnit> {
        self.inner().unit()
    }

    fn length_unit(&self) -> LinearUnit {
        self.inner().length_unit()
    }

    fn is_geographic(&self) -> bool {
        self.inner().is_geographic()
    }
}

impl From<GeographicCoordinateSystem> for CoordinateSystem {
    fn from(value: GeographicCoordinateSystem) -> Self {
        Self::Geographic(value)
    }
}

impl From<ProjectedCoordinateSystem> for CoordinateSystem {
    fn from(value: ProjectedCoordinateSystem) -> Self {
        Self::Projected(value)
    }
}
