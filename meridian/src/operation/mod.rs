//! Point-wise coordinate operations between coordinate systems.
//!
//! An operation between two coordinate systems is built by a [`CoordinateOperationProvider`] as a chain of simple
//! steps: source unit to SI, inverse projection, forward projection and SI to target unit. Projection math is
//! supplied by [`CoordinatesProjection`] implementations registered in a [`ProjectionRegistry`].

mod equirectangular;
#[cfg(feature = "geodesy")]
mod geodesy;
mod projection;
mod registry;
mod web_mercator;

use std::fmt::Debug;
use std::sync::Arc;

pub use equirectangular::Equirectangular;
#[cfg(feature = "geodesy")]
pub use geodesy::GeodesyProjection;
pub use projection::{CoordinatesProjection, ForwardProjection, InverseProjection};
pub use registry::{CoordinateOperationProvider, ProjectionFactory, ProjectionRegistry};
pub use web_mercator::WebMercator;

use crate::error::MeridianError;
use crate::measure::MeasureUnit;
use crate::Point2d;

/// Transformation of coordinates from one coordinate system into another.
pub trait CoordinateOperation: Debug + Send + Sync {
    /// Transforms all points in `from` (with `axis_count` ordinates each) into `to` (with `to_axis_count`
    /// ordinates each).
    ///
    /// Ordinates after X and Y are copied if both buffers have them, missing ones are set to `NaN`. Returns an error
    /// if the buffers do not match or if any of the points cannot be transformed. In the latter case the content of
    /// `to` is unspecified.
    fn perform(
        &self,
        axis_count: usize,
        from: &[f64],
        to_axis_count: usize,
        to: &mut [f64],
    ) -> Result<(), MeridianError>;

    /// Transforms a single XY point.
    fn transform(&self, point: &Point2d) -> Result<Point2d, MeridianError> {
        let mut result = [0.0; 2];
        self.perform(2, &[point.x, point.y], 2, &mut result)?;
        Ok(Point2d::new(result[0], result[1]))
    }
}

/// Applies a function to XY of every point, copying the other ordinates.
pub(crate) fn perform_xy(
    axis_count: usize,
    from: &[f64],
    to_axis_count: usize,
    to: &mut [f64],
    f: impl Fn(f64, f64) -> Option<(f64, f64)>,
) -> Result<(), MeridianError> {
    if axis_count < 2 || to_axis_count < 2 {
        return Err(MeridianError::Operation(format!(
            "at least 2 axes required, got {axis_count} and {to_axis_count}"
        )));
    }

    let count = from.len() / axis_count;
    if to.len() < count * to_axis_count {
        return Err(MeridianError::Operation(format!(
            "target buffer too short: {} < {}",
            to.len(),
            count * to_axis_count
        )));
    }

    for (source, target) in from
        .chunks_exact(axis_count)
        .zip(to.chunks_exact_mut(to_axis_count))
    {
        let (x, y) = f(source[0], source[1]).ok_or_else(|| {
            MeridianError::Operation(format!("cannot transform point ({}, {})", source[0], source[1]))
        })?;

        target[0] = x;
        target[1] = y;
        for (axis, value) in target.iter_mut().enumerate().skip(2) {
            *value = source.get(axis).copied().unwrap_or(f64::NAN);
        }
    }

    Ok(())
}

/// Conversion of XY from one unit into another.
#[derive(Debug, Clone)]
pub struct UnitConversion {
    source: Arc<MeasureUnit>,
    target: Arc<MeasureUnit>,
}

impl UnitConversion {
    /// Creates a conversion. Returns `None` if the units measure different quantities.
    pub fn new(source: Arc<MeasureUnit>, target: Arc<MeasureUnit>) -> Option<Self> {
        (source.kind() == target.kind()).then_some(Self { source, target })
    }
}

impl CoordinateOperation for UnitConversion {
    fn perform(
        &self,
        axis_count: usize,
        from: &[f64],
        to_axis_count: usize,
        to: &mut [f64],
    ) -> Result<(), MeridianError> {
        perform_xy(axis_count, from, to_axis_count, to, |x, y| {
            Some((
                self.target.from_si(self.source.to_si(x)),
                self.target.from_si(self.source.to_si(y)),
            ))
        })
    }
}

/// Sequence of operations applied one after another.
#[derive(Debug)]
pub struct ChainedOperation {
    operations: Vec<Box<dyn CoordinateOperation>>,
}

impl ChainedOperation {
    /// Creates a chain of operations.
    pub fn new(operations: Vec<Box<dyn CoordinateOperation>>) -> Self {
        Self { operations }
    }

    /// Steps of the chain.
    pub fn operations(&self) -> &[Box<dyn CoordinateOperation>] {
        &self.operations
    }
}

impl CoordinateOperation for ChainedOperation {
    fn perform(
        &self,
        axis_count: usize,
        from: &[f64],
        to_axis_count: usize,
        to: &mut [f64],
    ) -> Result<(), MeridianError> {
        let Some((first, rest)) = self.operations.split_first() else {
            return perform_xy(axis_count, from, to_axis_count, to, |x, y| Some((x, y)));
        };

        first.perform(axis_count, from, to_axis_count, to)?;
        if rest.is_empty() {
            return Ok(());
        }

        let len = (from.len() / axis_count) * to_axis_count;
        let to = &mut to[..len];
        let mut buffer = to.to_vec();
        for operation in rest {
            operation.perform(to_axis_count, &buffer, to_axis_count, to)?;
            buffer.copy_from_slice(to);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::{degree, metre, radian};
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    #[test]
    fn unit_conversion_copies_extra_ordinates() {
        let conversion = UnitConversion::new(degree(), radian()).unwrap();
        let from = [180.0, 90.0, 5.0, -180.0, -90.0, 6.0];
        let mut to = [0.0; 6];
        conversion.perform(3, &from, 3, &mut to).unwrap();
        assert_abs_diff_eq!(to[0], std::f64::consts::PI, epsilon = 1e-12);
        assert_abs_diff_eq!(to[1], std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
        assert_eq!(to[2], 5.0);
        assert_eq!(to[5], 6.0);

        let mut to = [0.0; 6];
        conversion.perform(2, &from[..4], 3, &mut to).unwrap();
        assert!(to[2].is_nan());
    }

    #[test]
    fn incompatible_units() {
        assert!(UnitConversion::new(degree(), metre()).is_none());
    }

    #[test]
    fn short_buffer_is_error() {
        let conversion = UnitConversion::new(degree(), radian()).unwrap();
        let mut to = [0.0; 2];
        assert_matches!(
            conversion.perform(2, &[1.0, 2.0, 3.0, 4.0], 2, &mut to),
            Err(MeridianError::Operation(_))
        );
    }

    #[test]
    fn chain() {
        let chain = ChainedOperation::new(vec![
            Box::new(UnitConversion::new(degree(), radian()).unwrap()),
            Box::new(UnitConversion::new(radian(), degree()).unwrap()),
        ]);
        let result = chain.transform(&Point2d::new(12.5, -45.0)).unwrap();
        assert_abs_diff_eq!(result.x, 12.5, epsilon = 1e-12);
        assert_abs_diff_eq!(result.y, -45.0, epsilon = 1e-12);
    }
}
