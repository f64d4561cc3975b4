use std::sync::Arc;

use crate::error::MeridianError;
use crate::geometry::{CoordinateSequence, Geometry, GeometryFactory};

/// Single point.
#[derive(Debug, Clone)]
pub struct Point {
    factory: Arc<GeometryFactory>,
    sequence: CoordinateSequence,
}

impl Point {
    pub(crate) fn new(factory: Arc<GeometryFactory>, sequence: CoordinateSequence) -> Self {
        Self { factory, sequence }
    }

    /// Ordinates of the point, `None` for an empty point.
    pub fn coordinates(&self) -> Option<&[f64]> {
        self.sequence.point(0)
    }

    /// X ordinate, `NaN` for an empty point.
    pub fn x(&self) -> f64 {
        self.sequence.x(0)
    }

    /// Y ordinate, `NaN` for an empty point.
    pub fn y(&self) -> f64 {
        self.sequence.y(0)
    }

    /// Converts the point into another factory. The point is returned unchanged if no coordinate operation is
    /// known.
    pub fn convert(&self, factory: &Arc<GeometryFactory>) -> Result<Point, MeridianError> {
        Ok(match factory.convert_sequence(&self.factory, &self.sequence)? {
            Some(sequence) => Point::new(factory.clone(), sequence),
            None => self.clone(),
        })
    }
}

impl Geometry for Point {
    fn geometry_factory(&self) -> &Arc<GeometryFactory> {
        &self.factory
    }

    fn coordinate_sequences(&self) -> Vec<&CoordinateSequence> {
        vec![&self.sequence]
    }
}

/// Sequence of connected points.
#[derive(Debug, Clone)]
pub struct LineString {
    factory: Arc<GeometryFactory>,
    sequence: CoordinateSequence,
}

impl LineString {
    pub(crate) fn new(factory: Arc<GeometryFactory>, sequence: CoordinateSequence) -> Self {
        Self { factory, sequence }
    }

    /// Points of the line.
    pub fn sequence(&self) -> &CoordinateSequence {
        &self.sequence
    }

    /// Converts the line into another factory. The line is returned unchanged if no coordinate operation is
    /// known.
    pub fn convert(&self, factory: &Arc<GeometryFactory>) -> Result<LineString, MeridianError> {
        Ok(match factory.convert_sequence(&self.factory, &self.sequence)? {
            Some(sequence) => LineString::new(factory.clone(), sequence),
            None => self.clone(),
        })
    }
}

impl Geometry for LineString {
    fn geometry_factory(&self) -> &Arc<GeometryFactory> {
        &self.factory
    }

    fn coordinate_sequences(&self) -> Vec<&CoordinateSequence> {
        vec![&self.sequence]
    }
}

/// Polygon with an outer ring and optional holes. An empty polygon has no rings.
#[derive(Debug, Clone)]
pub struct Polygon {
    factory: Arc<GeometryFactory>,
    rings: Vec<CoordinateSequence>,
}

impl Polygon {
    pub(crate) fn new(factory: Arc<GeometryFactory>, rings: Vec<CoordinateSequence>) -> Self {
        Self { factory, rings }
    }

    /// All rings, the first one is the shell.
    pub fn rings(&self) -> &[CoordinateSequence] {
        &self.rings
    }

    /// Outer ring.
    pub fn shell(&self) -> Option<&CoordinateSequence> {
        self.rings.first()
    }

    /// Inner rings.
    pub fn holes(&self) -> &[CoordinateSequence] {
        self.rings.get(1..).unwrap_or(&[])
    }

    /// Converts the polygon point by point into another factory. The polygon is returned unchanged if no
    /// coordinate operation is known.
    pub fn convert(&self, factory: &Arc<GeometryFactory>) -> Result<Polygon, MeridianError> {
        let mut rings = Vec::with_capacity(self.rings.len());
        for ring in &self.rings {
            match factory.convert_sequence(&self.factory, ring)? {
                Some(ring) => rings.push(ring),
                None => return Ok(self.clone()),
            }
        }
        Ok(Polygon::new(factory.clone(), rings))
    }
}

impl Geometry for Polygon {
    fn geometry_factory(&self) -> &Arc<GeometryFactory> {
        &self.factory
    }

    fn coordinate_sequences(&self) -> Vec<&CoordinateSequence> {
        self.rings.iter().collect()
    }
}
