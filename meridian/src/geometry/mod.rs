//! Geometries and the factories creating them.

use std::sync::Arc;

use crate::bounding_box::BoundingBox;

mod factory;
mod registry;
mod sequence;
mod types;

pub use factory::GeometryFactory;
pub use registry::GeometryFactoryRegistry;
pub use sequence::CoordinateSequence;
pub use types::{LineString, Point, Polygon};

/// Common interface of geometries.
pub trait Geometry {
    /// Factory that created the geometry.
    fn geometry_factory(&self) -> &Arc<GeometryFactory>;

    /// All coordinate sequences of the geometry.
    fn coordinate_sequences(&self) -> Vec<&CoordinateSequence>;

    /// Returns true if the geometry has no points.
    fn is_empty(&self) -> bool {
        self.coordinate_sequences().iter().all(|s| s.is_empty())
    }

    /// Bounding box of all points of the geometry, in the geometry's factory.
    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::of(self)
    }
}
