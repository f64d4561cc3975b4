use std::sync::Arc;

use crate::bounding_box::BoundingBox;
use crate::cs::axis::normalize_axes;
use crate::cs::{
    AngularUnit, Area, Authority, Axis, CoordinateReferenceSystem, CoordinateSystem, Datum, LinearUnit,
    PrimeMeridian,
};
use crate::geometry::GeometryFactory;
use crate::measure::MeasureUnit;

/// Coordinate system with longitude/latitude coordinates on a datum.
#[derive(Debug, Clone)]
pub struct GeographicCoordinateSystem {
    id: i32,
    name: String,
    datum: Datum,
    prime_meridian: PrimeMeridian,
    angular_unit: AngularUnit,
    axes: Vec<Axis>,
    area: Option<Area>,
    authority: Option<Authority>,
    deprecated: bool,
}

impl GeographicCoordinateSystem {
    /// Creates a new geographic coordinate system. Axis lists with other than 0 or 2 axes are normalized.
    pub fn new(
        id: i32,
        name: impl Into<String>,
        datum: Datum,
        prime_meridian: PrimeMeridian,
        angular_unit: AngularUnit,
        axes: Vec<Axis>,
    ) -> Self {
        let name = name.into();
        Self {
            axes: normalize_axes(axes, &name),
            id,
            name,
            datum,
            prime_meridian,
            angular_unit,
            area: None,
            authority: None,
            deprecated: false,
        }
    }

    /// WGS 84 (`EPSG:4326`).
    pub fn wgs84() -> Self {
        Self::new(
            4326,
            "WGS 84",
            Datum::wgs84(),
            PrimeMeridian::greenwich(),
            AngularUnit::degree(),
            vec![Axis::new("Lat", "NORTH"), Axis::new("Lon", "EAST")],
        )
        .with_authority(Authority::epsg(4326))
        .with_area(Area::new("World", -180.0, -90.0, 180.0, 90.0))
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

    /// Datum of the coordinate system.
    pub fn datum(&self) -> &Datum {
        &self.datum
    }

    /// Prime meridian of the coordinate system.
    pub fn prime_meridian(&self) -> &PrimeMeridian {
        &self.prime_meridian
    }

    /// Unit of the coordinates.
    pub fn angular_unit(&self) -> &AngularUnit {
        &self.angular_unit
    }

    /// Bounding box of the area of use in this coordinate system. If no area is set, the whole world is returned.
    pub fn area_bounding_box(&self) -> BoundingBox {
        let factory = Arc::new(GeometryFactory::floating(
            Some(Arc::new(CoordinateSystem::Geographic(self.clone()))),
            2,
        ));
        self.degrees_box(factory, self.area.as_ref())
    }

    /// Box of the given area (or the whole world) converted from degrees into the angular unit.
    pub(crate) fn degrees_box(&self, factory: Arc<GeometryFactory>, area: Option<&Area>) -> BoundingBox {
        let (min_lon, min_lat, max_lon, max_lat) = match area {
            Some(area) => (area.min_lon(), area.min_lat(), area.max_lon(), area.max_lat()),
            None => (-180.0, -90.0, 180.0, 90.0),
        };

        let degree = crate::measure::degree();
        let unit = self.angular_unit.measure();
        let convert = |value: f64| degree.convert(value, unit).unwrap_or(value);

        BoundingBox::new(
            factory,
            convert(min_lon),
            convert(min_lat),
            convert(max_lon),
            convert(max_lat),
        )
    }

    /// Compares all fields, including name, id and authority.
    pub fn equals_exact(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.datum.equals_exact(&other.datum)
            && self.prime_meridian.equals_exact(&other.prime_meridian)
            && self.angular_unit.equals_exact(&other.angular_unit)
            && self.axes == other.axes
            && self.area == other.area
            && self.authority == other.authority
            && self.deprecated == other.deprecated
    }
}

impl CoordinateReferenceSystem for GeographicCoordinateSystem {
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
        self.angular_unit.measure()
    }

    /// Metres per one angular unit along the equator.
    fn length_unit(&self) -> LinearUnit {
        let factor = self.datum.spheroid().semi_major_axis() * self.angular_unit.si_factor();
        LinearUnit::from_si_factor(format!("metre*{factor}"), factor)
    }

    fn is_geographic(&self) -> bool {
        true
    }
}

/// Relaxed equality: datum, prime meridian, unit and axes. Name, id, area and authority are ignored.
impl PartialEq for GeographicCoordinateSystem {
    fn eq(&self, other: &Self) -> bool {
        self.datum == other.datum
            && self.prime_meridian == other.prime_meridian
            && self.angular_unit.measure() == other.angular_unit.measure()
            && self.axes == other.axes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn length_unit_is_metres_per_unit_angle() {
        let wgs84 = GeographicCoordinateSystem::wgs84();
        assert_relative_eq!(
            wgs84.length_unit().si_factor(),
            6_378_137.0 * std::f64::consts::PI / 180.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn relaxed_equality() {
        let wgs84 = GeographicCoordinateSystem::wgs84();
        let renamed = GeographicCoordinateSystem::new(
            0,
            "GCS_WGS_1984",
            Datum::new("wgs_1984", crate::cs::Spheroid::wgs84()),
            PrimeMeridian::new("Greenwich", 0.0),
            AngularUnit::from_si_factor("Degree", 0.017453292519943295),
            vec![Axis::new("Lat", "NORTH"), Axis::new("Lon", "EAST")],
        );
        assert_eq!(wgs84, renamed);
        assert!(!wgs84.equals_exact(&renamed));
    }

    #[test]
    fn area_box_uses_angular_unit() {
        let grads = GeographicCoordinateSystem::new(
            0,
            "grads",
            Datum::wgs84(),
            PrimeMeridian::greenwich(),
            AngularUnit::from_si_factor("grad", std::f64::consts::PI / 200.0),
            vec![],
        );
        let bbox = grads.area_bounding_box();
        assert_relative_eq!(bbox.min_x(), -200.0, max_relative = 1e-12);
        assert_relative_eq!(bbox.max_y(), 100.0, max_relative = 1e-12);
    }
}
