//! Coordinate system aware axis-aligned bounding boxes.

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

use crate::error::MeridianError;
use crate::geometry::{Geometry, GeometryFactory, Polygon};
use crate::Point2d;

pub(crate) mod text;

/// Axis-aligned box tagged with the geometry factory (coordinate system and precision) of its coordinates.
///
/// Bounds are stored as all minimums followed by all maximums. An empty box has no bounds. Boxes are immutable:
/// every operation returns a new box, and every operation taking another box first converts it into the
/// coordinate system of `self`.
#[derive(Debug, Clone)]
pub struct BoundingBox {
    factory: Arc<GeometryFactory>,
    axis_count: usize,
    bounds: Vec<f64>,
}

impl BoundingBox {
    /// Creates a 2d box from two corners in any order. If only one of the corners is finite, the box contains that
    /// single point. If neither is, the box is empty.
    pub fn new(factory: Arc<GeometryFactory>, x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let first = x1.is_finite() && y1.is_finite();
        let second = x2.is_finite() && y2.is_finite();
        let (x1, y1, x2, y2) = match (first, second) {
            (true, true) => (x1, y1, x2, y2),
            (true, false) => (x1, y1, x1, y1),
            (false, true) => (x2, y2, x2, y2),
            (false, false) => return Self::empty(factory),
        };

        Self::from_bounds(factory, 2, vec![x1, y1, x2, y2])
    }

    /// Creates an empty box.
    pub fn empty(factory: Arc<GeometryFactory>) -> Self {
        let axis_count = factory.axis_count();
        Self {
            factory,
            axis_count,
            bounds: Vec::new(),
        }
    }

    /// Creates the box covering all points of flat coordinates with `axis_count` ordinates per point. Points with
    /// non-finite X or Y are skipped.
    pub fn from_coordinates(factory: Arc<GeometryFactory>, axis_count: usize, coordinates: &[f64]) -> Self {
        let axis_count = axis_count.max(2);
        let mut bounds = Vec::new();
        for point in coordinates.chunks_exact(axis_count) {
            include(&mut bounds, axis_count, point);
        }

        Self::from_bounds(factory, axis_count, bounds)
    }

    /// Box of all points of the geometry, in the geometry's factory.
    pub fn of<G: Geometry + ?Sized>(geometry: &G) -> Self {
        let factory = geometry.geometry_factory().clone();
        let axis_count = factory.axis_count();
        let mut bounds = Vec::new();
        for sequence in geometry.coordinate_sequences() {
            for point in sequence.points() {
                include(&mut bounds, axis_count, point);
            }
        }

        Self::from_bounds(factory, axis_count, bounds)
    }

    // Takes bounds as all minimums followed by all maximums. Swaps inverted axes and rounds with the factory
    // precision. The box is empty if X or Y is not finite.
    fn from_bounds(factory: Arc<GeometryFactory>, axis_count: usize, mut bounds: Vec<f64>) -> Self {
        if bounds.len() != axis_count * 2 {
            return Self::empty(factory);
        }

        for axis in 0..axis_count {
            let (min, max) = (bounds[axis], bounds[axis_count + axis]);
            if min > max {
                bounds[axis] = max;
                bounds[axis_count + axis] = min;
            }

            bounds[axis] = factory.make_precise(axis, bounds[axis]);
            bounds[axis_count + axis] = factory.make_precise(axis, bounds[axis_count + axis]);
        }

        if bounds[..2]
            .iter()
            .chain(&bounds[axis_count..axis_count + 2])
            .any(|v| !v.is_finite())
        {
            return Self::empty(factory);
        }

        Self {
            factory,
            axis_count,
            bounds,
        }
    }

    /// Geometry factory of the box.
    pub fn geometry_factory(&self) -> &Arc<GeometryFactory> {
        &self.factory
    }

    /// Coordinate system id of the box.
    pub fn srid(&self) -> i32 {
        self.factory.srid()
    }

    /// Number of axes.
    pub fn axis_count(&self) -> usize {
        self.axis_count
    }

    /// Returns true if the box contains no points.
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Minimum along the axis. `NaN` for an empty box or an unknown axis.
    pub fn min(&self, axis_index: usize) -> f64 {
        if axis_index >= self.axis_count {
            return f64::NAN;
        }
        self.bounds.get(axis_index).copied().unwrap_or(f64::NAN)
    }

    /// Maximum along the axis. `NaN` for an empty box or an unknown axis.
    pub fn max(&self, axis_index: usize) -> f64 {
        if axis_index >= self.axis_count {
            return f64::NAN;
        }
        self.bounds
            .get(self.axis_count + axis_index)
            .copied()
            .unwrap_or(f64::NAN)
    }

    /// Minimum X.
    pub fn min_x(&self) -> f64 {
        self.min(0)
    }

    /// Minimum Y.
    pub fn min_y(&self) -> f64 {
        self.min(1)
    }

    /// Maximum X.
    pub fn max_x(&self) -> f64 {
        self.max(0)
    }

    /// Maximum Y.
    pub fn max_y(&self) -> f64 {
        self.max(1)
    }

    /// Extent along X, `0` for an empty box.
    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_x() - self.min_x()
        }
    }

    /// Extent along Y, `0` for an empty box.
    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_y() - self.min_y()
        }
    }

    /// Area of the XY rectangle.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Width divided by height. `NaN` if the height is zero.
    pub fn aspect_ratio(&self) -> f64 {
        let height = self.height();
        if height > 0.0 {
            self.width() / height
        } else {
            f64::NAN
        }
    }

    /// Centre of the XY rectangle.
    pub fn centre(&self) -> Option<Point2d> {
        if self.is_empty() {
            return None;
        }

        Some(Point2d::new(
            (self.min_x() + self.max_x()) / 2.0,
            (self.min_y() + self.max_y()) / 2.0,
        ))
    }

    /// Corner by index, clockwise starting at the bottom right: `(max_x, min_y)`, `(min_x, min_y)`,
    /// `(min_x, max_y)`, `(max_x, max_y)`.
    pub fn corner(&self, index: usize) -> Option<Point2d> {
        if self.is_empty() {
            return None;
        }

        let (x, y) = match index {
            0 => (self.max_x(), self.min_y()),
            1 => (self.min_x(), self.min_y()),
            2 => (self.min_x(), self.max_y()),
            3 => (self.max_x(), self.max_y()),
            _ => return None,
        };
        Some(Point2d::new(x, y))
    }

    /// All four corners in the order of [`BoundingBox::corner`].
    pub fn corners(&self) -> Vec<Point2d> {
        (0..4).filter_map(|i| self.corner(i)).collect()
    }

    /// Grows the box by `dx` on both X sides and `dy` on both Y sides. Negative values shrink it, a box shrunk past
    /// its centre is empty.
    pub fn expand(&self, dx: f64, dy: f64) -> Self {
        if self.is_empty() || (dx == 0.0 && dy == 0.0) {
            return self.clone();
        }

        let (min_x, max_x) = (self.min_x() - dx, self.max_x() + dx);
        let (min_y, max_y) = (self.min_y() - dy, self.max_y() + dy);
        if min_x > max_x || min_y > max_y {
            return Self::empty(self.factory.clone());
        }

        self.with_xy(min_x, min_y, max_x, max_y)
    }

    /// Grows the box by a fraction of its width and height, split evenly between the sides.
    pub fn expand_percent(&self, factor_x: f64, factor_y: f64) -> Self {
        if self.is_empty() {
            return self.clone();
        }

        self.expand(self.width() * factor_x / 2.0, self.height() * factor_y / 2.0)
    }

    /// Moves the box by the offsets.
    pub fn move_by(&self, dx: f64, dy: f64) -> Self {
        if self.is_empty() || (dx == 0.0 && dy == 0.0) {
            return self.clone();
        }

        self.with_xy(
            self.min_x() + dx,
            self.min_y() + dy,
            self.max_x() + dx,
            self.max_y() + dy,
        )
    }

    /// Smallest box covering both boxes. Empty boxes are ignored.
    pub fn expand_to_include(&self, other: &BoundingBox) -> Self {
        if other.is_empty() {
            return self.clone();
        }

        let other = other.convert(&self.factory);
        if self.is_empty() {
            return other;
        }

        let mut bounds = self.bounds.clone();
        for axis in 0..self.axis_count.min(other.axis_count) {
            bounds[axis] = bounds[axis].min(other.min(axis));
            let max_index = self.axis_count + axis;
            bounds[max_index] = bounds[max_index].max(other.max(axis));
        }

        Self::from_bounds(self.factory.clone(), self.axis_count, bounds)
    }

    /// Smallest box covering this box and the point given by its ordinates. A point with non-finite X or Y is
    /// ignored.
    pub fn expand_to_include_coordinates(&self, ordinates: &[f64]) -> Self {
        let mut bounds = self.bounds.clone();
        include(&mut bounds, self.axis_count, ordinates);
        Self::from_bounds(self.factory.clone(), self.axis_count, bounds)
    }

    /// Smallest box covering this box and the geometry.
    pub fn expand_to_include_geometry<G: Geometry + ?Sized>(&self, geometry: &G) -> Self {
        if geometry.is_empty() {
            return self.clone();
        }

        self.expand_to_include(&geometry.bounding_box())
    }

    /// Common part of both boxes. Empty if they do not intersect.
    pub fn intersection(&self, other: &BoundingBox) -> Self {
        let other = other.convert(&self.factory);
        if self.is_empty() || other.is_empty() || !self.intersects_converted(&other) {
            return Self::empty(self.factory.clone());
        }

        let mut bounds = self.bounds.clone();
        for axis in self.common_axes(&other) {
            bounds[axis] = bounds[axis].max(other.min(axis));
            let max_index = self.axis_count + axis;
            bounds[max_index] = bounds[max_index].min(other.max(axis));
        }

        Self::from_bounds(self.factory.clone(), self.axis_count, bounds)
    }

    /// Returns true if the boxes share at least one point. Boundaries are inclusive.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        let other = other.convert(&self.factory);
        self.intersects_converted(&other)
    }

    fn intersects_converted(&self, other: &BoundingBox) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }

        self.common_axes(other)
            .all(|axis| other.min(axis) <= self.max(axis) && other.max(axis) >= self.min(axis))
    }

    /// Returns true if the point (in the coordinate system of the box) lies inside or on the boundary.
    pub fn intersects_point(&self, point: &Point2d) -> bool {
        !self.is_empty()
            && point.x >= self.min_x()
            && point.x <= self.max_x()
            && point.y >= self.min_y()
            && point.y <= self.max_y()
    }

    /// Returns true if every point of `other` lies inside or on the boundary of this box.
    pub fn covers(&self, other: &BoundingBox) -> bool {
        let other = other.convert(&self.factory);
        if self.is_empty() || other.is_empty() {
            return false;
        }

        let covers = self
            .common_axes(&other)
            .all(|axis| other.min(axis) >= self.min(axis) && other.max(axis) <= self.max(axis));
        covers
    }

    /// Same as [`BoundingBox::intersects_point`].
    pub fn covers_point(&self, point: &Point2d) -> bool {
        self.intersects_point(point)
    }

    /// Euclidean distance between the closest XY points of the boxes, `0` if they intersect. `NaN` if either box
    /// is empty.
    pub fn distance(&self, other: &BoundingBox) -> f64 {
        let other = other.convert(&self.factory);
        if self.is_empty() || other.is_empty() {
            return f64::NAN;
        }

        let dx = gap(self.min_x(), self.max_x(), other.min_x(), other.max_x());
        let dy = gap(self.min_y(), self.max_y(), other.min_y(), other.max_y());
        dx.hypot(dy)
    }

    /// Euclidean distance from the point to the box, `0` if the box covers it.
    pub fn distance_point(&self, point: &Point2d) -> f64 {
        if self.is_empty() {
            return f64::NAN;
        }

        let dx = gap(self.min_x(), self.max_x(), point.x, point.x);
        let dy = gap(self.min_y(), self.max_y(), point.y, point.y);
        dx.hypot(dy)
    }

    /// Returns true if the distance between the boxes does not exceed `distance`.
    pub fn is_within_distance(&self, other: &BoundingBox, distance: f64) -> bool {
        self.distance(other) <= distance
    }

    /// Intersection with the area of use of the coordinate system. A box without coordinate system is returned
    /// unchanged.
    pub fn clip_to_coordinate_system(&self) -> Self {
        match self.factory.coordinate_system() {
            Some(cs) => self.intersection(&cs.area_bounding_box()),
            None => self.clone(),
        }
    }

    /// Converts the box into the coordinate system of `factory`.
    ///
    /// The boundary of the box is sampled (all four corners plus points along every side) and every sample is
    /// transformed and rounded with the target precision. The result covers all transformed samples. Bounds of
    /// axes other than X and Y are kept.
    ///
    /// If no coordinate operation between the systems is known, the box is returned unchanged. Samples that cannot
    /// be transformed are skipped.
    pub fn convert(&self, factory: &Arc<GeometryFactory>) -> BoundingBox {
        if self.is_empty() {
            return Self::empty(factory.clone());
        }

        if Arc::ptr_eq(&self.factory, factory) {
            return self.clone();
        }

        if self.factory.coordinate_system().is_none() || self.factory.has_same_coordinate_system(factory) {
            return Self::from_bounds(factory.clone(), self.axis_count, self.bounds.clone());
        }

        let Some(operation) = self.factory.coordinate_operation(factory) else {
            return self.clone();
        };

        let (min_x, min_y, max_x, max_y) = (self.min_x(), self.min_y(), self.max_x(), self.max_y());
        let divisions = f64::from(factory.config().boundary_divisions.max(1));
        let min_step = factory.precision().resolution_xy().unwrap_or(0.0);
        let x_step = (self.width() / divisions).max(min_step);
        let y_step = (self.height() / divisions).max(min_step);

        let mut bounds = self.bounds.clone();
        for axis in [0, 1] {
            bounds[axis] = f64::NAN;
            bounds[self.axis_count + axis] = f64::NAN;
        }

        let mut failed = 0;
        let mut sample = |x: f64, y: f64| {
            let mut to = [0.0; 2];
            match operation.perform(2, &[x, y], 2, &mut to) {
                Ok(()) if to[0].is_finite() && to[1].is_finite() => {
                    let point = [factory.make_precise(0, to[0]), factory.make_precise(1, to[1])];
                    include(&mut bounds, self.axis_count, &point);
                }
                _ => {
                    log::debug!("Skipping boundary point ({x}, {y}) that cannot be converted");
                    failed += 1;
                }
            }
        };

        sample(max_x, min_y);
        sample(min_x, min_y);
        sample(min_x, max_y);
        sample(max_x, max_y);

        for j in 1..interior_count(self.width(), x_step) {
            let x = min_x + j as f64 * x_step;
            sample(x, min_y);
            sample(x, max_y);
        }
        for j in 1..interior_count(self.height(), y_step) {
            let y = min_y + j as f64 * y_step;
            sample(min_x, y);
            sample(max_x, y);
        }

        if bounds[0].is_nan() {
            log::warn!("None of {failed} boundary points of {self} could be converted");
            return Self::empty(factory.clone());
        }

        Self::from_bounds(factory.clone(), self.axis_count, bounds)
    }

    /// Approximates the box with a polygon using the configured number of segments per side.
    pub fn to_polygon(&self) -> Polygon {
        let segments = self.factory.config().polygon_segments;
        self.to_polygon_with(segments, segments)
    }

    /// Approximates the box with a polygon with `num_x` segments along X sides and `num_y` along Y sides.
    pub fn to_polygon_with(&self, num_x: u32, num_y: u32) -> Polygon {
        self.to_polygon_in(&self.factory, num_x, num_y)
    }

    /// Approximates the box with a polygon in another factory.
    ///
    /// The ring starts at `(max_x, min_y)` and goes clockwise through the other corners. The segment length is at
    /// least one precision unit of this box (or the configured minimum step for floating precision). If `factory`
    /// differs, every ring point is converted into it. Without a coordinate operation the polygon stays in the
    /// factory of the box.
    pub fn to_polygon_in(&self, factory: &Arc<GeometryFactory>, num_x: u32, num_y: u32) -> Polygon {
        if self.is_empty() {
            return factory.empty_polygon();
        }

        let (min_x, min_y, max_x, max_y) = (self.min_x(), self.min_y(), self.max_x(), self.max_y());
        if [min_x, min_y, max_x, max_y].iter().any(|v| !v.is_finite()) || min_x > max_x || min_y > max_y {
            log::error!("Unable to approximate {self} with a polygon");
            return factory.empty_polygon();
        }

        let min_step = self
            .factory
            .precision()
            .resolution_xy()
            .unwrap_or_else(|| self.factory.config().min_step(!self.factory.is_projected()));
        let (num_x, x_step) = segments(self.width(), num_x, min_step);
        let (num_y, y_step) = segments(self.height(), num_y, min_step);

        let mut coordinates = Vec::with_capacity((1 + 2 * (num_x + num_y)) * 2);
        coordinates.extend([max_x, min_y]);
        for j in 1..num_x {
            coordinates.extend([max_x - j as f64 * x_step, min_y]);
        }
        coordinates.extend([min_x, min_y]);
        for j in 1..num_y {
            coordinates.extend([min_x, min_y + j as f64 * y_step]);
        }
        coordinates.extend([min_x, max_y]);
        for j in 1..num_x {
            coordinates.extend([min_x + j as f64 * x_step, max_y]);
        }
        coordinates.extend([max_x, max_y]);
        for j in 1..num_y {
            coordinates.extend([max_x, max_y - j as f64 * y_step]);
        }
        coordinates.extend([max_x, min_y]);

        let ring = self.factory.coordinate_sequence(2, coordinates);
        if Arc::ptr_eq(factory, &self.factory) {
            return Polygon::new(factory.clone(), vec![ring]);
        }

        match factory.convert_sequence(&self.factory, &ring) {
            Ok(Some(converted)) => Polygon::new(factory.clone(), vec![converted]),
            Ok(None) => Polygon::new(self.factory.clone(), vec![ring]),
            Err(err) => {
                log::error!("Unable to convert polygon of {self}: {err}");
                factory.empty_polygon()
            }
        }
    }

    fn with_xy(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        let mut bounds = self.bounds.clone();
        bounds[0] = min_x;
        bounds[1] = min_y;
        bounds[self.axis_count] = max_x;
        bounds[self.axis_count + 1] = max_y;
        Self::from_bounds(self.factory.clone(), self.axis_count, bounds)
    }

    // Axes present in both boxes with finite bounds.
    fn common_axes<'a>(&'a self, other: &'a BoundingBox) -> impl Iterator<Item = usize> + 'a {
        (0..self.axis_count.min(other.axis_count)).filter(move |&axis| {
            [self.min(axis), self.max(axis), other.min(axis), other.max(axis)]
                .iter()
                .all(|v| v.is_finite())
        })
    }
}

// Grows bounds (all minimums, then all maximums) to include the point. Empty bounds are initialized. Missing and
// NaN ordinates leave their axis unchanged.
fn include(bounds: &mut Vec<f64>, axis_count: usize, point: &[f64]) {
    let x = point.first().copied().unwrap_or(f64::NAN);
    let y = point.get(1).copied().unwrap_or(f64::NAN);
    if !x.is_finite() || !y.is_finite() {
        return;
    }

    if bounds.is_empty() {
        bounds.resize(axis_count * 2, f64::NAN);
    }

    for (axis, value) in point.iter().take(axis_count).enumerate() {
        bounds[axis] = bounds[axis].min(*value);
        bounds[axis_count + axis] = bounds[axis_count + axis].max(*value);
    }
}

fn gap(min1: f64, max1: f64, min2: f64, max2: f64) -> f64 {
    if max2 < min1 {
        min1 - max2
    } else if min2 > max1 {
        min2 - max1
    } else {
        0.0
    }
}

// Number of steps covering the extent, so that points `min + j * step` for `j` in `1..count` lie strictly inside.
fn interior_count(extent: f64, step: f64) -> usize {
    if step > 0.0 && extent > 0.0 {
        (extent / step).ceil() as usize
    } else {
        0
    }
}

fn segments(extent: f64, requested: u32, min_step: f64) -> (usize, f64) {
    if requested <= 1 {
        return (1, extent);
    }

    let step = (extent / f64::from(requested)).max(min_step);
    if step <= 0.0 {
        return (1, extent);
    }

    let count = (extent / step).ceil() as usize;
    (count.max(1), step)
}

impl PartialEq for BoundingBox {
    fn eq(&self, other: &Self) -> bool {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => true,
            (false, false) => {
                self.srid() == other.srid()
                    && self.axis_count == other.axis_count
                    && self.bounds == other.bounds
            }
            _ => false,
        }
    }
}

impl Display for BoundingBox {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let srid = self.srid();
        if srid > 0 {
            write!(f, "SRID={srid};")?;
        }

        if self.is_empty() {
            return write!(f, "BBOX EMPTY");
        }

        write!(f, "BBOX")?;
        match self.axis_count {
            2 => {}
            3 => write!(f, " Z")?,
            4 => write!(f, " ZM")?,
            n => write!(f, " {n}")?,
        }

        write!(f, "(")?;
        for axis in 0..self.axis_count {
            if axis > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", self.min(axis))?;
        }
        write!(f, " ")?;
        for axis in 0..self.axis_count {
            if axis > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", self.max(axis))?;
        }
        write!(f, ")")
    }
}

impl FromStr for BoundingBox {
    type Err = MeridianError;

    /// Parses BBOX text into a box with floating precision. The srid is kept, but not resolved into a coordinate
    /// system; use [`GeometryFactoryRegistry::parse_bounding_box`](crate::geometry::GeometryFactoryRegistry::parse_bounding_box)
    /// for that.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = text::parse(s)?;
        let factory = Arc::new(GeometryFactory::floating(None, parsed.axis_count).with_srid(parsed.srid));
        Ok(parsed.into_bounding_box(factory))
    }
}
