use std::collections::HashMap;
use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::RwLock;

use crate::cs::projection::{names, normalized_projection_name};
use crate::cs::{CoordinateReferenceSystem, CoordinateSystem, ProjectedCoordinateSystem};
use crate::measure::{metre, radian, MeasureUnit};
use crate::operation::{
    ChainedOperation, CoordinateOperation, CoordinatesProjection, Equirectangular, ForwardProjection,
    InverseProjection, UnitConversion, WebMercator,
};

/// Creates the projection math for a projected coordinate system.
pub type ProjectionFactory =
    Arc<dyn Fn(&ProjectedCoordinateSystem) -> Option<Box<dyn CoordinatesProjection>> + Send + Sync>;

/// Source of coordinate operations between pairs of coordinate systems.
pub trait CoordinateOperationProvider: Send + Sync {
    /// Returns the operation transforming coordinates from `source` into `target`, or `None` if the coordinate
    /// systems are equal or no operation between them is known.
    fn coordinate_operation(
        &self,
        source: &CoordinateSystem,
        target: &CoordinateSystem,
    ) -> Option<Box<dyn CoordinateOperation>>;
}

lazy_static! {
    static ref GLOBAL: Arc<ProjectionRegistry> = Arc::new(ProjectionRegistry::with_builtin());
}

/// Registry of projection implementations keyed by normalized projection name.
pub struct ProjectionRegistry {
    factories: RwLock<HashMap<String, ProjectionFactory>>,
}

impl ProjectionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            factories: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a registry with the built-in projections: Popular Visualisation Pseudo Mercator and
    /// Equirectangular.
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        registry.register(names::POPULAR_VISUALISATION_PSEUDO_MERCATOR, |cs| {
            Some(Box::new(WebMercator::from_coordinate_system(cs)) as Box<dyn CoordinatesProjection>)
        });
        registry.register(names::EQUIRECTANGULAR, |cs| {
            Equirectangular::from_coordinate_system(cs)
                .map(|p| Box::new(p) as Box<dyn CoordinatesProjection>)
        });

        registry
    }

    /// Process-wide registry used by default by geometry factories.
    pub fn global() -> Arc<ProjectionRegistry> {
        GLOBAL.clone()
    }

    /// Registers a projection factory for the projection name (any spelling known to the alias table). A factory
    /// registered earlier for the same projection is replaced.
    pub fn register<F>(&self, projection_name: &str, factory: F)
    where
        F: Fn(&ProjectedCoordinateSystem) -> Option<Box<dyn CoordinatesProjection>> + Send + Sync + 'static,
    {
        let key = normalized_projection_name(projection_name);
        log::debug!("Registering projection {key}");
        self.factories.write().insert(key, Arc::new(factory));
    }

    /// Registers a projection implemented by the `geodesy` crate. The `definition` function builds the operator
    /// definition from the coordinate system parameters.
    #[cfg(feature = "geodesy")]
    pub fn register_geodesy<F>(&self, projection_name: &str, definition: F)
    where
        F: Fn(&ProjectedCoordinateSystem) -> String + Send + Sync + 'static,
    {
        self.register(projection_name, move |cs| {
            crate::operation::GeodesyProjection::new(&definition(cs))
                .map(|p| Box::new(p) as Box<dyn CoordinatesProjection>)
        });
    }

    /// Returns true if a projection with the given name is registered.
    pub fn contains(&self, projection_name: &str) -> bool {
        self.factories
            .read()
            .contains_key(&normalized_projection_name(projection_name))
    }

    /// Creates the projection math for the coordinate system.
    pub fn projection(&self, cs: &ProjectedCoordinateSystem) -> Option<Box<dyn CoordinatesProjection>> {
        let factory = self
            .factories
            .read()
            .get(cs.projection().normalized_name())
            .cloned();

        match factory {
            Some(factory) => factory(cs),
            None => {
                log::debug!(
                    "No implementation for projection {} of {}",
                    cs.projection().name(),
                    cs.name()
                );
                None
            }
        }
    }

    fn unit_conversion(
        source: &Arc<MeasureUnit>,
        target: Arc<MeasureUnit>,
    ) -> Option<Box<dyn CoordinateOperation>> {
        if **source == *target {
            None
        } else {
            UnitConversion::new(source.clone(), target)
                .map(|op| Box::new(op) as Box<dyn CoordinateOperation>)
        }
    }
}

impl Default for ProjectionRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl std::fmt::Debug for ProjectionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.factories.read().keys().cloned().collect();
        names.sort();
        f.debug_struct("ProjectionRegistry")
            .field("projections", &names)
            .finish()
    }
}

impl CoordinateOperationProvider for ProjectionRegistry {
    fn coordinate_operation(
        &self,
        source: &CoordinateSystem,
        target: &CoordinateSystem,
    ) -> Option<Box<dyn CoordinateOperation>> {
        if source == target {
            return None;
        }

        let mut operations: Vec<Box<dyn CoordinateOperation>> = vec![];
        match source {
            CoordinateSystem::Projected(projected) => {
                let projection = self.projection(projected)?;
                operations.extend(Self::unit_conversion(projected.unit(), metre()));
                operations.push(Box::new(InverseProjection::new(projection)));
            }
            CoordinateSystem::Geographic(geographic) => {
                if let CoordinateSystem::Geographic(target) = target {
                    // Datum shift is not applied.
                    return Self::unit_conversion(geographic.unit(), target.unit().clone());
                }

                operations.extend(Self::unit_conversion(geographic.unit(), radian()));
            }
        }

        match target {
            CoordinateSystem::Projected(projected) => {
                let projection = self.projection(projected)?;
                operations.push(Box::new(ForwardProjection::new(projection)));
                operations.extend(Self::unit_conversion(&metre(), projected.unit().clone()));
            }
            CoordinateSystem::Geographic(geographic) => {
                operations.extend(Self::unit_conversion(&radian(), geographic.unit().clone()));
            }
        }

        match operations.len() {
            0 => None,
            1 => operations.pop(),
            _ => Some(Box::new(ChainedOperation::new(operations))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cs::parameter_names::*;
    use crate::cs::{GeographicCoordinateSystem, LinearUnit, Projection, ProjectionParameters};
    use crate::Point2d;
    use approx::assert_abs_diff_eq;

    fn pseudo_mercator(unit: LinearUnit) -> CoordinateSystem {
        ProjectedCoordinateSystem::new(
            3857,
            "WGS 84 / Pseudo-Mercator",
            GeographicCoordinateSystem::wgs84(),
            Projection::new("Popular Visualisation Pseudo Mercator"),
            ProjectionParameters::new()
                .with(CENTRAL_MERIDIAN, 0.0)
                .with(FALSE_EASTING, 0.0)
                .with(FALSE_NORTHING, 0.0),
            unit,
            vec![],
        )
        .into()
    }

    #[test]
    fn geographic_to_projected() {
        let registry = ProjectionRegistry::with_builtin();
        let wgs84: CoordinateSystem = GeographicCoordinateSystem::wgs84().into();
        let operation = registry
            .coordinate_operation(&wgs84, &pseudo_mercator(LinearUnit::metre()))
            .unwrap();

        let projected = operation.transform(&Point2d::new(180.0, 0.0)).unwrap();
        assert_abs_diff_eq!(projected.x, 20_037_508.342_789_244, epsilon = 1e-6);
        assert_abs_diff_eq!(projected.y, 0.0, epsilon = 1e-6);

        let back = registry
            .coordinate_operation(&pseudo_mercator(LinearUnit::metre()), &wgs84)
            .unwrap()
            .transform(&Point2d::new(1_000_000.0, 2_000_000.0))
            .unwrap();
        assert_abs_diff_eq!(back.x, 8.983_152_841_195_214, epsilon = 1e-9);
        assert_abs_diff_eq!(back.y, 17.678_914_238_335_743, epsilon = 1e-9);
    }

    #[test]
    fn projected_unit_conversion() {
        let registry = ProjectionRegistry::with_builtin();
        let metres = pseudo_mercator(LinearUnit::metre());
        let feet = pseudo_mercator(LinearUnit::from_si_factor("foot", 0.3048));

        let operation = registry.coordinate_operation(&metres, &feet).unwrap();
        let result = operation.transform(&Point2d::new(3048.0, -304.8)).unwrap();
        assert_abs_diff_eq!(result.x, 10_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(result.y, -1_000.0, epsilon = 1e-6);
    }

    #[test]
    fn equal_systems_have_no_operation() {
        let registry = ProjectionRegistry::with_builtin();
        let wgs84: CoordinateSystem = GeographicCoordinateSystem::wgs84().into();
        assert!(registry.coordinate_operation(&wgs84, &wgs84.clone()).is_none());
    }

    #[test]
    fn unknown_projection_has_no_operation() {
        let registry = ProjectionRegistry::with_builtin();
        let wgs84: CoordinateSystem = GeographicCoordinateSystem::wgs84().into();
        let unknown: CoordinateSystem = ProjectedCoordinateSystem::new(
            0,
            "unknown",
            GeographicCoordinateSystem::wgs84(),
            Projection::new("Krovak"),
            ProjectionParameters::new(),
            LinearUnit::metre(),
            vec![],
        )
        .into();
        assert!(registry.coordinate_operation(&wgs84, &unknown).is_none());
        assert!(!registry.contains("Krovak"));
    }

    #[test]
    fn custom_projection() {
        #[derive(Debug)]
        struct Shift;
        impl CoordinatesProjection for Shift {
            fn project(&self, lon_lat: &Point2d) -> Option<Point2d> {
                Some(Point2d::new(lon_lat.x + 1.0, lon_lat.y + 1.0))
            }
            fn unproject(&self, projected: &Point2d) -> Option<Point2d> {
                Some(Point2d::new(projected.x - 1.0, projected.y - 1.0))
            }
        }

        let registry = ProjectionRegistry::new();
        registry.register("Krovak", |_| Some(Box::new(Shift) as Box<dyn CoordinatesProjection>));
        assert!(registry.contains("KROVAK"));

        let radians: CoordinateSystem = GeographicCoordinateSystem::new(
            0,
            "radians",
            crate::cs::Datum::wgs84(),
            crate::cs::PrimeMeridian::greenwich(),
            crate::cs::AngularUnit::radian(),
            vec![],
        )
        .into();
        let krovak: CoordinateSystem = ProjectedCoordinateSystem::new(
            0,
            "krovak",
            GeographicCoordinateSystem::wgs84(),
            Projection::new("Krovak"),
            ProjectionParameters::new(),
            LinearUnit::metre(),
            vec![],
        )
        .into();

        let result = registry
            .coordinate_operation(&radians, &krovak)
            .unwrap()
            .transform(&Point2d::new(0.5, 0.25))
            .unwrap();
        assert_eq!(result, Point2d::new(1.5, 1.25));
    }
}
