use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::cs::{CoordinateReferenceSystem, CoordinateSystem};
use crate::error::MeridianError;
use crate::wkt::parse_coordinate_system;

/// Source of coordinate systems by numeric id (an authority database).
pub trait CoordinateSystemLookup: Send + Sync {
    /// Returns the coordinate system with the given id.
    fn by_srid(&self, srid: i32) -> Option<Arc<CoordinateSystem>>;
}

/// In-memory coordinate system lookup.
#[derive(Debug, Default)]
pub struct CoordinateSystemRegistry {
    systems: RwLock<HashMap<i32, Arc<CoordinateSystem>>>,
}

impl CoordinateSystemRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a coordinate system under its id and returns the shared instance. Coordinate systems with id `0`
    /// or below cannot be looked up and are not stored.
    pub fn register(&self, coordinate_system: CoordinateSystem) -> Arc<CoordinateSystem> {
        let id = coordinate_system.id();
        let coordinate_system = Arc::new(coordinate_system);
        if id > 0 {
            self.systems.write().insert(id, coordinate_system.clone());
        } else {
            log::debug!(
                "Coordinate system {} has no id and is not registered",
                coordinate_system.name()
            );
        }

        coordinate_system
    }

    /// Parses a WKT definition and registers the result.
    pub fn register_wkt(&self, wkt: &str) -> Result<Arc<CoordinateSystem>, MeridianError> {
        let coordinate_system = parse_coordinate_system(wkt)?;
        Ok(self.register(coordinate_system))
    }

    /// Returns the coordinate system with the given id or an error if it is not registered.
    pub fn get(&self, srid: i32) -> Result<Arc<CoordinateSystem>, MeridianError> {
        self.by_srid(srid)
            .ok_or(MeridianError::UnknownCoordinateSystem(srid))
    }
}

impl CoordinateSystemLookup for CoordinateSystemRegistry {
    fn by_srid(&self, srid: i32) -> Option<Arc<CoordinateSystem>> {
        self.systems.read().get(&srid).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cs::GeographicCoordinateSystem;
    use assert_matches::assert_matches;

    #[test]
    fn register_and_lookup() {
        let registry = CoordinateSystemRegistry::new();
        let registered = registry.register(GeographicCoordinateSystem::wgs84().into());
        let found = registry.by_srid(4326).unwrap();
        assert!(Arc::ptr_eq(&registered, &found));
        assert_matches!(registry.get(3857), Err(MeridianError::UnknownCoordinateSystem(3857)));
    }
}
