use geodesy::prelude::*;
use parking_lot::Mutex;

use crate::operation::CoordinatesProjection;
use crate::Point2d;

/// Projection backed by a `geodesy` operator definition, e.g. `utm zone=32`.
pub struct GeodesyProjection {
    definition: String,
    context: Mutex<Minimal>,
    op: OpHandle,
}

impl GeodesyProjection {
    /// Creates the projection. Returns `None` if the definition is not valid.
    pub fn new(definition: &str) -> Option<Self> {
        let mut context = Minimal::new();
        let op = match context.op(definition) {
            Ok(op) => op,
            Err(err) => {
                log::warn!("Invalid geodesy definition '{definition}': {err}");
                return None;
            }
        };

        Some(Self {
            definition: definition.to_string(),
            context: Mutex::new(context),
            op,
        })
    }

    /// Operator definition of the projection.
    pub fn definition(&self) -> &str {
        &self.definition
    }
}

impl std::fmt::Debug for GeodesyProjection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeodesyProjection")
            .field("definition", &self.definition)
            .finish()
    }
}

impl CoordinatesProjection for GeodesyProjection {
    fn project(&self, lon_lat: &Point2d) -> Option<Point2d> {
        let mut data = [Coor2D::geo(lon_lat.y.to_degrees(), lon_lat.x.to_degrees())];
        self.context.lock().apply(self.op, Fwd, &mut data).ok()?;

        if !data[0].0[0].is_finite() || !data[0].0[1].is_finite() {
            return None;
        }

        Some(Point2d::new(data[0].0[0], data[0].0[1]))
    }

    fn unproject(&self, projected: &Point2d) -> Option<Point2d> {
        let mut data = [Coor2D([projected.x, projected.y])];
        self.context.lock().apply(self.op, Inv, &mut data).ok()?;

        if !data[0].0[0].is_finite() || !data[0].0[1].is_finite() {
            return None;
        }

        Some(Point2d::new(data[0].0[0], data[0].0[1]))
    }
}
