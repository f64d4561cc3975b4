use crate::Point2d;

/// Flat list of coordinates with a fixed number of ordinates per point.
///
/// Sequences are created by a [`GeometryFactory`](crate::geometry::GeometryFactory), which rounds the values with
/// its precision model.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateSequence {
    axis_count: usize,
    coordinates: Vec<f64>,
}

impl CoordinateSequence {
    pub(crate) fn new(axis_count: usize, coordinates: Vec<f64>) -> Self {
        debug_assert!(axis_count > 0);
        debug_assert_eq!(coordinates.len() % axis_count, 0);
        Self {
            axis_count,
            coordinates,
        }
    }

    pub(crate) fn empty(axis_count: usize) -> Self {
        Self::new(axis_count, Vec::new())
    }

    /// Number of ordinates per point.
    pub fn axis_count(&self) -> usize {
        self.axis_count
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.coordinates.len() / self.axis_count
    }

    /// Returns true if there are no points.
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// Ordinate of a point. Returns `NaN` if either index is out of range.
    pub fn value(&self, index: usize, axis_index: usize) -> f64 {
        if axis_index >= self.axis_count {
            return f64::NAN;
        }

        self.coordinates
            .get(index * self.axis_count + axis_index)
            .copied()
            .unwrap_or(f64::NAN)
    }

    /// X ordinate of a point.
    pub fn x(&self, index: usize) -> f64 {
        self.value(index, 0)
    }

    /// Y ordinate of a point.
    pub fn y(&self, index: usize) -> f64 {
        self.value(index, 1)
    }

    /// Ordinates of a point.
    pub fn point(&self, index: usize) -> Option<&[f64]> {
        self.coordinates
            .get(index * self.axis_count..(index + 1) * self.axis_count)
    }

    /// Ordinates of all points.
    pub fn points(&self) -> impl Iterator<Item = &[f64]> {
        self.coordinates.chunks_exact(self.axis_count)
    }

    /// XY of all points.
    pub fn points_2d(&self) -> impl Iterator<Item = Point2d> + '_ {
        self.points().map(|p| Point2d::new(p[0], p[1]))
    }

    /// All ordinates as a flat slice.
    pub fn coordinates(&self) -> &[f64] {
        &self.coordinates
    }

    /// Returns true if the first and the last points are equal.
    pub fn is_closed(&self) -> bool {
        let len = self.len();
        len > 0 && self.point(0) == self.point(len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access() {
        let sequence = CoordinateSequence::new(3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(sequence.len(), 2);
        assert_eq!(sequence.x(1), 4.0);
        assert_eq!(sequence.value(0, 2), 3.0);
        assert!(sequence.value(0, 3).is_nan());
        assert!(sequence.value(2, 0).is_nan());
        assert_eq!(sequence.point(1), Some(&[4.0, 5.0, 6.0][..]));
        assert_eq!(sequence.point(2), None);
        assert!(!sequence.is_closed());
        assert_eq!(sequence.points_2d().last(), Some(Point2d::new(4.0, 5.0)));
    }
}
