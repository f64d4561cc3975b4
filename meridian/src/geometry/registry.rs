use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::bounding_box::BoundingBox;
use crate::config::ReprojectionConfig;
use crate::cs::{CoordinateReferenceSystem, CoordinateSystem, CoordinateSystemLookup};
use crate::error::MeridianError;
use crate::geometry::GeometryFactory;
use crate::operation::{CoordinateOperationProvider, ProjectionRegistry};
use crate::precision::PrecisionModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct FactoryKey {
    srid: i32,
    axis_count: usize,
    scale_xy: u64,
    scale_z: u64,
}

impl FactoryKey {
    fn new(srid: i32, axis_count: usize, precision: &PrecisionModel) -> Self {
        Self {
            srid,
            axis_count,
            scale_xy: scale_bits(precision.scale_xy()),
            scale_z: scale_bits(precision.scale_z()),
        }
    }
}

// All non-positive and NaN scales mean floating precision.
fn scale_bits(scale: f64) -> u64 {
    if scale > 0.0 && scale.is_finite() {
        scale.to_bits()
    } else {
        0
    }
}

/// Cache of geometry factories keyed by srid, axis count and precision.
///
/// The same key always resolves to the same `Arc<GeometryFactory>` instance. Coordinate systems are looked up by
/// srid through the [`CoordinateSystemLookup`] given to the registry.
pub struct GeometryFactoryRegistry {
    lookup: Arc<dyn CoordinateSystemLookup>,
    operations: Arc<dyn CoordinateOperationProvider>,
    config: ReprojectionConfig,
    factories: Mutex<HashMap<FactoryKey, Arc<GeometryFactory>>>,
}

impl GeometryFactoryRegistry {
    /// Creates an empty registry.
    pub fn new(lookup: Arc<dyn CoordinateSystemLookup>) -> Self {
        Self {
            lookup,
            operations: ProjectionRegistry::global(),
            config: ReprojectionConfig::default(),
            factories: Mutex::new(HashMap::new()),
        }
    }

    /// Sets the coordinate operation provider given to every created factory.
    pub fn with_operations(mut self, operations: Arc<dyn CoordinateOperationProvider>) -> Self {
        self.operations = operations;
        self
    }

    /// Sets the reprojection configuration given to every created factory.
    pub fn with_config(mut self, config: ReprojectionConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the factory for the parameters, creating it on first use. A srid unknown to the lookup produces a
    /// factory without coordinate system that still reports the srid.
    pub fn get(&self, srid: i32, axis_count: usize, precision: PrecisionModel) -> Arc<GeometryFactory> {
        let srid = srid.max(0);
        let axis_count = axis_count.clamp(2, 4);
        let key = FactoryKey::new(srid, axis_count, &precision);

        let mut factories = self.factories.lock();
        if let Some(factory) = factories.get(&key) {
            return factory.clone();
        }

        let coordinate_system = if srid > 0 {
            let cs = self.lookup.by_srid(srid);
            if cs.is_none() {
                log::debug!("Coordinate system {srid} is not known, creating factory without it");
            }
            cs
        } else {
            None
        };

        let factory = Arc::new(
            GeometryFactory::new(coordinate_system, axis_count, precision)
                .with_srid(srid)
                .with_operations(self.operations.clone())
                .with_config(self.config),
        );
        factories.insert(key, factory.clone());

        factory
    }

    /// Factory with floating precision.
    pub fn floating(&self, srid: i32, axis_count: usize) -> Arc<GeometryFactory> {
        self.get(srid, axis_count, PrecisionModel::floating())
    }

    /// Factory with fixed XY precision.
    pub fn fixed(&self, srid: i32, axis_count: usize, scale_xy: f64) -> Arc<GeometryFactory> {
        self.get(srid, axis_count, PrecisionModel::fixed(scale_xy))
    }

    /// Factory for a coordinate system that may not be known to the lookup. Coordinate systems with an id are
    /// cached under that id, others get a new factory on every call. A cached factory created without coordinate
    /// system for the same id is replaced.
    pub fn for_coordinate_system(
        &self,
        coordinate_system: Arc<CoordinateSystem>,
        axis_count: usize,
        precision: PrecisionModel,
    ) -> Arc<GeometryFactory> {
        let srid = coordinate_system.id();
        let axis_count = axis_count.clamp(2, 4);
        let factory = || {
            Arc::new(
                GeometryFactory::new(Some(coordinate_system.clone()), axis_count, precision)
                    .with_operations(self.operations.clone())
                    .with_config(self.config),
            )
        };

        if srid <= 0 {
            return factory();
        }

        let key = FactoryKey::new(srid, axis_count, &precision);
        let mut factories = self.factories.lock();
        if let Some(cached) = factories
            .get(&key)
            .filter(|cached| cached.coordinate_system().is_some())
        {
            return cached.clone();
        }

        let factory = factory();
        factories.insert(key, factory.clone());
        factory
    }

    /// Parses BBOX text, resolving its srid through the lookup. Text without srid produces a box in a factory
    /// without coordinate system.
    pub fn parse_bounding_box(&self, text: &str) -> Result<BoundingBox, MeridianError> {
        let parsed = crate::bounding_box::text::parse(text)?;
        let factory = self.floating(parsed.srid, parsed.axis_count);
        Ok(parsed.into_bounding_box(factory))
    }

    /// Number of cached factories.
    pub fn len(&self) -> usize {
        self.factories.lock().len()
    }

    /// Returns true if no factory has been created yet.
    pub fn is_empty(&self) -> bool {
        self.factories.lock().is_empty()
    }
}

impl std::fmt::Debug for GeometryFactoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeometryFactoryRegistry")
            .field("factories", &self.len())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cs::{CoordinateSystemRegistry, GeographicCoordinateSystem};
    use std::thread;

    fn registry() -> GeometryFactoryRegistry {
        let systems = CoordinateSystemRegistry::new();
        systems.register(GeographicCoordinateSystem::wgs84().into());
        GeometryFactoryRegistry::new(Arc::new(systems))
    }

    #[test]
    fn same_key_same_instance() {
        let registry = registry();
        let a = registry.floating(4326, 2);
        let b = registry.get(4326, 2, PrecisionModel::new(0.0, -1.0));
        assert!(Arc::ptr_eq(&a, &b));
        assert!(a.is_geographic());

        let fixed = registry.fixed(4326, 2, 1000.0);
        assert!(!Arc::ptr_eq(&a, &fixed));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn unknown_srid() {
        let registry = registry();
        let factory = registry.floating(2193, 3);
        assert_eq!(factory.srid(), 2193);
        assert!(factory.coordinate_system().is_none());
        assert_eq!(factory.axis_count(), 3);
    }

    #[test]
    fn coordinate_system_replaces_unresolved_factory() {
        let registry = GeometryFactoryRegistry::new(Arc::new(CoordinateSystemRegistry::new()));
        let unresolved = registry.floating(4326, 2);
        assert!(unresolved.coordinate_system().is_none());

        let wgs84: Arc<CoordinateSystem> = Arc::new(GeographicCoordinateSystem::wgs84().into());
        let resolved = registry.for_coordinate_system(wgs84.clone(), 2, PrecisionModel::floating());
        assert!(resolved.is_geographic());
        assert_eq!(resolved.srid(), 4326);

        let again = registry.for_coordinate_system(wgs84, 2, PrecisionModel::floating());
        assert!(Arc::ptr_eq(&resolved, &again));
        assert!(Arc::ptr_eq(&resolved, &registry.floating(4326, 2)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn concurrent_lookups_share_instance() {
        let registry = Arc::new(registry());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                thread::spawn(move || registry.fixed(4326, 3, 100.0))
            })
            .collect();
        let factories: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(factories.iter().all(|f| Arc::ptr_eq(f, &factories[0])));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn config_is_passed_to_factories() {
        let registry = registry().with_config(ReprojectionConfig::default().with_boundary_divisions(4));
        assert_eq!(registry.floating(4326, 2).config().boundary_divisions, 4);
    }

    #[test]
    fn parse_with_srid() {
        let registry = registry();
        let bbox = registry
            .parse_bounding_box("SRID=4326;BBOX(-10,-10 10,10)")
            .unwrap();
        assert!(bbox.geometry_factory().is_geographic());
        assert!(Arc::ptr_eq(bbox.geometry_factory(), &registry.floating(4326, 2)));
    }
}
