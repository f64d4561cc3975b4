use crate::cs::parameter_names::{
    CENTRAL_MERIDIAN, FALSE_EASTING, FALSE_NORTHING, LATITUDE_OF_ORIGIN, STANDARD_PARALLEL_1,
};
use crate::cs::ProjectedCoordinateSystem;
use crate::operation::CoordinatesProjection;
use crate::Point2d;

/// Equidistant cylindrical projection (spherical form).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Equirectangular {
    radius: f64,
    central_meridian: f64,
    latitude_of_origin: f64,
    cos_standard_parallel: f64,
    false_easting: f64,
    false_northing: f64,
}

impl Equirectangular {
    /// Plate Carrée on a sphere with the given radius.
    pub fn new(radius: f64) -> Self {
        Self {
            radius,
            central_meridian: 0.0,
            latitude_of_origin: 0.0,
            cos_standard_parallel: 1.0,
            false_easting: 0.0,
            false_northing: 0.0,
        }
    }

    /// Creates the projection from the parameters of a coordinate system. Returns `None` if the standard parallel
    /// is a pole.
    pub fn from_coordinate_system(cs: &ProjectedCoordinateSystem) -> Option<Self> {
        let unit = cs.geographic().angular_unit();
        let parameters = cs.parameters();
        let cos_standard_parallel = unit
            .to_radians(parameters.get_or(STANDARD_PARALLEL_1, 0.0))
            .cos();
        if cos_standard_parallel.abs() < f64::EPSILON {
            return None;
        }

        Some(Self {
            radius: cs.geographic().datum().spheroid().semi_major_axis(),
            central_meridian: unit.to_radians(parameters.get_or(CENTRAL_MERIDIAN, 0.0)),
            latitude_of_origin: unit.to_radians(parameters.get_or(LATITUDE_OF_ORIGIN, 0.0)),
            cos_standard_parallel,
            false_easting: cs.linear_unit().to_metres(parameters.get_or(FALSE_EASTING, 0.0)),
            false_northing: cs.linear_unit().to_metres(parameters.get_or(FALSE_NORTHING, 0.0)),
        })
    }
}

impl CoordinatesProjection for Equirectangular {
    fn project(&self, lon_lat: &Point2d) -> Option<Point2d> {
        let x = self.false_easting
            + self.radius * (lon_lat.x - self.central_meridian) * self.cos_standard_parallel;
        let y = self.false_northing + self.radius * (lon_lat.y - self.latitude_of_origin);

        (x.is_finite() && y.is_finite()).then(|| Point2d::new(x, y))
    }

    fn unproject(&self, projected: &Point2d) -> Option<Point2d> {
        let lon = (projected.x - self.false_easting) / (self.radius * self.cos_standard_parallel)
            + self.central_meridian;
        let lat = (projected.y - self.false_northing) / self.radius + self.latitude_of_origin;

        (lon.is_finite() && lat.is_finite()).then(|| Point2d::new(lon, lat))
    }
}
