use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::bounding_box::BoundingBox;
use crate::config::ReprojectionConfig;
use crate::cs::{CoordinateReferenceSystem, CoordinateSystem};
use crate::error::MeridianError;
use crate::geometry::{CoordinateSequence, LineString, Point, Polygon};
use crate::operation::{CoordinateOperation, CoordinateOperationProvider, ProjectionRegistry};
use crate::precision::PrecisionModel;

const MIN_AXIS_COUNT: usize = 2;
const MAX_AXIS_COUNT: usize = 4;

/// Creates geometries in a coordinate system with a precision model.
///
/// Every coordinate produced by the factory is rounded with its precision model exactly once.
#[derive(Clone)]
pub struct GeometryFactory {
    coordinate_system: Option<Arc<CoordinateSystem>>,
    srid: i32,
    axis_count: usize,
    precision: PrecisionModel,
    operations: Arc<dyn CoordinateOperationProvider>,
    config: ReprojectionConfig,
}

impl GeometryFactory {
    /// Creates a factory. Axis count is clamped to `2..=4`. Coordinate operations are provided by
    /// [`ProjectionRegistry::global`].
    pub fn new(
        coordinate_system: Option<Arc<CoordinateSystem>>,
        axis_count: usize,
        precision: PrecisionModel,
    ) -> Self {
        let srid = coordinate_system
            .as_ref()
            .map(|cs| cs.id().max(0))
            .unwrap_or(0);

        Self {
            coordinate_system,
            srid,
            axis_count: axis_count.clamp(MIN_AXIS_COUNT, MAX_AXIS_COUNT),
            precision,
            operations: ProjectionRegistry::global(),
            config: ReprojectionConfig::default(),
        }
    }

    /// Factory with floating precision.
    pub fn floating(coordinate_system: Option<Arc<CoordinateSystem>>, axis_count: usize) -> Self {
        Self::new(coordinate_system, axis_count, PrecisionModel::floating())
    }

    /// Factory with fixed XY precision.
    pub fn fixed(
        coordinate_system: Option<Arc<CoordinateSystem>>,
        axis_count: usize,
        scale_xy: f64,
    ) -> Self {
        Self::new(coordinate_system, axis_count, PrecisionModel::fixed(scale_xy))
    }

    /// Sets the coordinate system id. Used for ids that are not known to any lookup.
    pub fn with_srid(mut self, srid: i32) -> Self {
        self.srid = srid;
        self
    }

    /// Sets the provider of coordinate operations.
    pub fn with_operations(mut self, operations: Arc<dyn CoordinateOperationProvider>) -> Self {
        self.operations = operations;
        self
    }

    /// Sets the reprojection configuration.
    pub fn with_config(mut self, config: ReprojectionConfig) -> Self {
        self.config = config;
        self
    }

    /// Coordinate system of the geometries.
    pub fn coordinate_system(&self) -> Option<&Arc<CoordinateSystem>> {
        self.coordinate_system.as_ref()
    }

    /// Coordinate system id, `0` if unknown.
    pub fn srid(&self) -> i32 {
        self.srid
    }

    /// Number of ordinates per point.
    pub fn axis_count(&self) -> usize {
        self.axis_count
    }

    /// Precision model.
    pub fn precision(&self) -> &PrecisionModel {
        &self.precision
    }

    /// Reprojection configuration.
    pub fn config(&self) -> &ReprojectionConfig {
        &self.config
    }

    /// Provider of coordinate operations.
    pub fn operations(&self) -> &Arc<dyn CoordinateOperationProvider> {
        &self.operations
    }

    /// Returns true if the coordinate system is geographic.
    pub fn is_geographic(&self) -> bool {
        self.coordinate_system
            .as_ref()
            .is_some_and(|cs| cs.is_geographic())
    }

    /// Returns true if the coordinate system is projected.
    pub fn is_projected(&self) -> bool {
        self.coordinate_system
            .as_ref()
            .is_some_and(|cs| !cs.is_geographic())
    }

    /// Returns true if both factories describe the same coordinate system. Factories without coordinate system are
    /// compared by srid.
    pub fn has_same_coordinate_system(&self, other: &GeometryFactory) -> bool {
        match (&self.coordinate_system, &other.coordinate_system) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b) || a == b,
            (None, None) => self.srid == other.srid,
            _ => false,
        }
    }

    /// Operation converting coordinates of this factory into the coordinate system of `target`. Returns `None` if
    /// either factory has no coordinate system or no operation is known.
    pub fn coordinate_operation(&self, target: &GeometryFactory) -> Option<Box<dyn CoordinateOperation>> {
        let source_cs = self.coordinate_system.as_ref()?;
        let target_cs = target.coordinate_system.as_ref()?;
        let operation = self.operations.coordinate_operation(source_cs, target_cs);
        if operation.is_none() {
            log::debug!(
                "No coordinate operation from {} to {}",
                source_cs.name(),
                target_cs.name()
            );
        }

        operation
    }

    /// Rounds an ordinate with the precision model.
    pub fn make_precise(&self, axis_index: usize, value: f64) -> f64 {
        self.precision.make_precise(axis_index, value)
    }

    /// Creates a coordinate sequence from flat coordinates with `axis_count` ordinates per point. Trailing
    /// ordinates that do not form a whole point are dropped.
    pub fn coordinate_sequence(&self, axis_count: usize, mut coordinates: Vec<f64>) -> CoordinateSequence {
        let axis_count = axis_count.max(1);
        coordinates.truncate(coordinates.len() / axis_count * axis_count);
        self.precision
            .make_precise_coordinates(axis_count, &mut coordinates);
        CoordinateSequence::new(axis_count, coordinates)
    }

    /// Creates a point from its ordinates. Missing ordinates are set to `NaN`, extra ones are dropped.
    pub fn point(self: &Arc<Self>, ordinates: &[f64]) -> Point {
        let coordinates = (0..self.axis_count)
            .map(|axis| ordinates.get(axis).copied().unwrap_or(f64::NAN))
            .collect();
        Point::new(self.clone(), self.coordinate_sequence(self.axis_count, coordinates))
    }

    /// Creates an empty point.
    pub fn empty_point(self: &Arc<Self>) -> Point {
        Point::new(self.clone(), CoordinateSequence::empty(self.axis_count))
    }

    /// Creates a line string from flat coordinates with the factory's axis count.
    pub fn line_string(self: &Arc<Self>, coordinates: Vec<f64>) -> LineString {
        LineString::new(self.clone(), self.coordinate_sequence(self.axis_count, coordinates))
    }

    /// Creates a polygon from rings of flat coordinates with the factory's axis count. The first ring is the
    /// shell.
    pub fn polygon(self: &Arc<Self>, rings: Vec<Vec<f64>>) -> Polygon {
        let rings = rings
            .into_iter()
            .map(|ring| self.coordinate_sequence(self.axis_count, ring))
            .filter(|ring| !ring.is_empty())
            .collect();
        Polygon::new(self.clone(), rings)
    }

    /// Creates a polygon without rings.
    pub fn empty_polygon(self: &Arc<Self>) -> Polygon {
        Polygon::new(self.clone(), Vec::new())
    }

    /// Creates an empty bounding box.
    pub fn empty_bounding_box(self: &Arc<Self>) -> BoundingBox {
        BoundingBox::empty(self.clone())
    }

    /// Creates a 2d bounding box.
    pub fn bounding_box(self: &Arc<Self>, x1: f64, y1: f64, x2: f64, y2: f64) -> BoundingBox {
        BoundingBox::new(self.clone(), x1, y1, x2, y2)
    }

    /// Converts a coordinate sequence created by the `source` factory into this factory. The result is rounded
    /// with this factory's precision model.
    ///
    /// Coordinates are copied as they are if `source` has no coordinate system or shares it with this factory.
    /// Returns `None` if no coordinate operation between the two coordinate systems is known.
    pub fn convert_sequence(
        &self,
        source: &GeometryFactory,
        sequence: &CoordinateSequence,
    ) -> Result<Option<CoordinateSequence>, MeridianError> {
        let axis_count = sequence.axis_count();
        if source.coordinate_system.is_none() || self.has_same_coordinate_system(source) || axis_count < 2 {
            return Ok(Some(self.coordinate_sequence(axis_count, sequence.coordinates().to_vec())));
        }

        let Some(operation) = source.coordinate_operation(self) else {
            return Ok(None);
        };

        let mut target = vec![0.0; sequence.coordinates().len()];
        operation.perform(axis_count, sequence.coordinates(), axis_count, &mut target)?;
        Ok(Some(self.coordinate_sequence(axis_count, target)))
    }
}

impl Debug for GeometryFactory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeometryFactory")
            .field(
                "coordinate_system",
                &self.coordinate_system.as_ref().map(|cs| cs.name().to_string()),
            )
            .field("srid", &self.srid)
            .field("axis_count", &self.axis_count)
            .field("precision", &self.precision)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cs::{GeographicCoordinateSystem, LinearUnit, ProjectedCoordinateSystem, Projection, ProjectionParameters};
    use crate::geometry::Geometry;
    use assert_matches::assert_matches;

    fn wgs84() -> Arc<CoordinateSystem> {
        Arc::new(GeographicCoordinateSystem::wgs84().into())
    }

    #[test]
    fn srid_and_axis_count() {
        let factory = GeometryFactory::floating(Some(wgs84()), 7);
        assert_eq!(factory.srid(), 4326);
        assert_eq!(factory.axis_count(), 4);
        assert!(factory.is_geographic());

        let factory = GeometryFactory::floating(None, 1).with_srid(2193);
        assert_eq!(factory.srid(), 2193);
        assert_eq!(factory.axis_count(), 2);
        assert!(!factory.is_geographic() && !factory.is_projected());
    }

    #[test]
    fn geometries_are_precise() {
        let factory = Arc::new(GeometryFactory::fixed(Some(wgs84()), 2, 10.0));
        let point = factory.point(&[1.26, 2.24]);
        assert_eq!(point.coordinates(), Some(&[1.3, 2.2][..]));

        let line = factory.line_string(vec![0.04, 0.06, 1.0, 1.0, 5.0]);
        assert_eq!(line.sequence().coordinates(), &[0.0, 0.1, 1.0, 1.0]);
        assert_eq!(line.geometry_factory().srid(), 4326);
    }

    #[test]
    fn same_coordinate_system() {
        let a = GeometryFactory::floating(Some(wgs84()), 2);
        let b = GeometryFactory::fixed(Some(wgs84()), 3, 1000.0);
        assert!(a.has_same_coordinate_system(&b));
        assert!(a.coordinate_operation(&b).is_none());

        let none = GeometryFactory::floating(None, 2);
        assert!(!a.has_same_coordinate_system(&none));
        assert!(none.has_same_coordinate_system(&GeometryFactory::floating(None, 3)));
    }

    #[test]
    fn convert_sequence_without_operation() {
        let krovak = ProjectedCoordinateSystem::new(
            0,
            "krovak",
            GeographicCoordinateSystem::wgs84(),
            Projection::new("Krovak"),
            ProjectionParameters::new(),
            LinearUnit::metre(),
            vec![],
        );
        let source = GeometryFactory::floating(Some(wgs84()), 2);
        let target = GeometryFactory::floating(Some(Arc::new(krovak.into())), 2);
        let sequence = source.coordinate_sequence(2, vec![10.0, 20.0]);
        assert_matches!(target.convert_sequence(&source, &sequence), Ok(None));

        let untagged = GeometryFactory::fixed(None, 2, 1.0);
        let copied = target.convert_sequence(&untagged, &untagged.coordinate_sequence(2, vec![1.4, 2.6]));
        assert_matches!(copied, Ok(Some(s)) if s.coordinates() == [1.0, 3.0]);
    }
}
