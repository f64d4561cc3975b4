use std::sync::Arc;

use crate::bounding_box::BoundingBox;
use crate::cs::axis::normalize_axes;
use crate::cs::{
    Area, Authority, Axis, CoordinateReferenceSystem, CoordinateSystem, GeographicCoordinateSystem,
    LinearUnit, Projection, ProjectionParameters,
};
use crate::geometry::GeometryFactory;
use crate::measure::MeasureUnit;

/// Coordinate system with planar coordinates obtained by projecting a geographic coordinate system.
#[derive(Debug, Clone)]
pub struct ProjectedCoordinateSystem {
    id: i32,
    name: String,
    geographic: GeographicCoordinateSystem,
    projection: Projection,
    parameters: ProjectionParameters,
    linear_unit: LinearUnit,
    axes: Vec<Axis>,
    area: Option<Area>,
    authority: Option<Authority>,
    deprecated: bool,
}

impl ProjectedCoordinateSystem {
    /// Creates a new projected coordinate system. Axis lists with other than 0 or 2 axes are normalized.
    pub fn new(
        id: i32,
        name: impl Into<String>,
        geographic: GeographicCoordinateSystem,
        projection: Projection,
        parameters: ProjectionParameters,
        linear_unit: LinearUnit,
        axes: Vec<Axis>,
    ) -> Self {
        let name = name.into();
        Self {
            axes: normalize_axes(axes, &name),
            id,
            name,
            geographic,
            projection,
            parameters,
            linear_unit,
            area: None,
            authority: None,
            deprecated: false,
        }
    }

    /// Sets the authority of the coordinate system.
    pub fn with_authority(mut self, authority: Authority) -> Self {
        self.authority = Some(authority);
        self
    }

    /// Sets the area of use.
    pub fn with_area(mut self, area: Area) -> Self {
        self.area = Some(area);
        self
    }

    /// Marks the coordinate system as deprecated.
    pub fn with_deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    /// Base geographic coordinate system.
    pub fn geographic(&self) -> &GeographicCoordinateSystem {
        &self.geographic
    }

    /// Projection method.
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Projection parameters. Angular parameters are in the unit of the base geographic coordinate system.
    pub fn parameters(&self) -> &ProjectionParameters {
        &self.parameters
    }

    /// Value of a projection parameter by any of its spellings.
    pub fn parameter(&self, name: &str) -> Option<f64> {
        self.parameters.get(name)
    }

    /// Unit of the coordinates.
    pub fn linear_unit(&self) -> &LinearUnit {
        &self.linear_unit
    }

    /// Bounding box of the area of use in this coordinate system.
    ///
    /// The area (or the whole world, if no area is set) is built in the base geographic coordinate system and then
    /// converted into this one.
    pub fn area_bounding_box(&self) -> BoundingBox {
        let geographic_factory = Arc::new(GeometryFactory::floating(
            Some(Arc::new(CoordinateSystem::Geographic(self.geographic.clone()))),
            2,
        ));
        let geographic_box = self
            .geographic
            .degrees_box(geographic_factory, self.area.as_ref());

        let factory = Arc::new(GeometryFactory::floating(
            Some(Arc::new(CoordinateSystem::Projected(self.clone()))),
            2,
        ));
        geographic_box.convert(&factory)
    }

    /// Compares all fields, including name, id and authority.
    pub fn equals_exact(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.geographic.equals_exact(&other.geographic)
            && self.projection.equals_exact(&other.projection)
            && self.parameters.iter().eq(other.parameters.iter())
            && self.linear_unit.equals_exact(&other.linear_unit)
            && self.axes == other.axes
            && self.area == other.area
            && self.authority == other.authority
            && self.deprecated == other.deprecated
    }
}

impl CoordinateReferenceSystem for ProjectedCoordinateSystem {
    fn id(&self) -> i32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn authority(&self) -> Option<&Authority> {
        self.authority.as_ref()
    }

    fn area(&self) -> Option<&Area> {
        self.area.as_ref()
    }

    fn axes(&self) -> &[Axis] {
        &self.axes
    }

    fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    fn unit(&self) -> &Arc<MeasureUnit> {
        self.linear_unit.measure()
    }

    fn length_unit(&self) -> LinearUnit {
        self.linear_unit.clone()
    }

    fn is_geographic(&self) -> bool {
        false
    }
}

/// Relaxed equality: base coordinate system, projection, parameters, unit and axes. Name, id, area and authority
/// are ignored.
impl PartialEq for ProjectedCoordinateSystem {
    fn eq(&self, other: &Self) -> bool {
        self.geographic == other.geographic
            && self.projection == other.projection
            && self.parameters == other.parameters
            && self.linear_unit.measure() == other.linear_unit.measure()
            && self.axes == other.axes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cs::parameter_names::*;
    use crate::cs::projection::names;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_4;

    fn utm(parameter: &str) -> ProjectedCoordinateSystem {
        ProjectedCoordinateSystem::new(
            32631,
            "WGS 84 / UTM zone 31N",
            GeographicCoordinateSystem::wgs84(),
            Projection::new("Transverse_Mercator"),
            ProjectionParameters::new()
                .with(parameter, 0.0)
                .with(CENTRAL_MERIDIAN, 3.0)
                .with(SCALE_FACTOR, 0.9996)
                .with(FALSE_EASTING, 500_000.0)
                .with(FALSE_NORTHING, 0.0),
            LinearUnit::metre(),
            vec![],
        )
    }

    #[test]
    fn parameter_spellings_are_equal() {
        let a = utm("latitude_of_origin");
        let b = utm("latitude_of_natural_origin");
        let c = utm("Latitude_Of_False_Origin");
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.parameter("latitude_of_center"), Some(0.0));
        assert_eq!(a.projection().normalized_name(), names::TRANSVERSE_MERCATOR);
    }

    #[test]
    fn relaxed_equality_ignores_identity() {
        let a = utm(LATITUDE_OF_ORIGIN).with_authority(Authority::epsg(32631));
        let b = utm(LATITUDE_OF_ORIGIN);
        assert_eq!(a, b);
        assert!(!a.equals_exact(&b));

        let other_meridian = ProjectedCoordinateSystem::new(
            0,
            "other",
            GeographicCoordinateSystem::wgs84(),
            Projection::new("Transverse_Mercator"),
            a.parameters().clone().with(CENTRAL_MERIDIAN, 9.0),
            LinearUnit::metre(),
            vec![],
        );
        assert_ne!(a, other_meridian);
    }

    fn pseudo_mercator() -> ProjectedCoordinateSystem {
        ProjectedCoordinateSystem::new(
            3857,
            "WGS 84 / Pseudo-Mercator",
            GeographicCoordinateSystem::wgs84(),
            Projection::new("Popular_Visualisation_Pseudo_Mercator"),
            ProjectionParameters::new()
                .with(CENTRAL_MERIDIAN, 0.0)
                .with(FALSE_EASTING, 0.0)
                .with(FALSE_NORTHING, 0.0),
            LinearUnit::metre(),
            vec![],
        )
    }

    fn mercator_y(latitude: f64) -> f64 {
        6_378_137.0 * (FRAC_PI_4 + latitude.to_radians() / 2.0).tan().ln()
    }

    #[test]
    fn world_area_in_pseudo_mercator() {
        let bbox = pseudo_mercator().area_bounding_box();
        assert_eq!(bbox.srid(), 3857);
        assert_abs_diff_eq!(bbox.min_x(), -20_037_508.342_789_244, epsilon = 1e-6);
        assert_abs_diff_eq!(bbox.max_x(), 20_037_508.342_789_244, epsilon = 1e-6);
        // The poles cannot be projected, the last boundary samples before them are at 72 degrees.
        assert_abs_diff_eq!(bbox.max_y(), mercator_y(72.0), epsilon = 1e-6);
        assert_abs_diff_eq!(bbox.min_y(), -mercator_y(72.0), epsilon = 1e-6);
    }

    #[test]
    fn area_of_use_in_pseudo_mercator() {
        let cs = pseudo_mercator().with_area(Area::new("tropics", -10.0, -10.0, 10.0, 10.0));
        let bbox = cs.area_bounding_box();
        assert_abs_diff_eq!(bbox.min_x(), -1_113_194.907_932_735_7, epsilon = 1e-6);
        assert_abs_diff_eq!(bbox.max_x(), 1_113_194.907_932_735_7, epsilon = 1e-6);
        assert_abs_diff_eq!(bbox.max_y(), mercator_y(10.0), epsilon = 1e-6);
        assert_abs_diff_eq!(bbox.min_y(), -mercator_y(10.0), epsilon = 1e-6);
    }
}
