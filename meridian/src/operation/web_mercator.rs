use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::cs::parameter_names::{CENTRAL_MERIDIAN, FALSE_EASTING, FALSE_NORTHING};
use crate::cs::ProjectedCoordinateSystem;
use crate::operation::CoordinatesProjection;
use crate::Point2d;

/// Popular Visualisation Pseudo Mercator: spherical Mercator formulas applied to ellipsoidal coordinates, using the
/// semi-major axis of the datum as the sphere radius.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WebMercator {
    semimajor: f64,
    central_meridian: f64,
    false_easting: f64,
    false_northing: f64,
}

impl WebMercator {
    /// Creates the projection for the sphere with the given radius and no false origin.
    pub fn new(semimajor: f64) -> Self {
        Self {
            semimajor,
            central_meridian: 0.0,
            false_easting: 0.0,
            false_northing: 0.0,
        }
    }

    /// Creates the projection from the parameters of a coordinate system.
    pub fn from_coordinate_system(cs: &ProjectedCoordinateSystem) -> Self {
        let unit = cs.geographic().angular_unit();
        Self {
            semimajor: cs.geographic().datum().spheroid().semi_major_axis(),
            central_meridian: unit.to_radians(cs.parameters().get_or(CENTRAL_MERIDIAN, 0.0)),
            false_easting: cs.linear_unit().to_metres(cs.parameters().get_or(FALSE_EASTING, 0.0)),
            false_northing: cs.linear_unit().to_metres(cs.parameters().get_or(FALSE_NORTHING, 0.0)),
        }
    }
}

impl Default for WebMercator {
    fn default() -> Self {
        Self::new(6_378_137.0)
    }
}

impl CoordinatesProjection for WebMercator {
    fn project(&self, lon_lat: &Point2d) -> Option<Point2d> {
        if lon_lat.y.abs() >= FRAC_PI_2 {
            return None;
        }

        let x = self.false_easting + self.semimajor * (lon_lat.x - self.central_meridian);
        let y = self.false_northing + self.semimajor * (FRAC_PI_4 + lon_lat.y / 2.0).tan().ln();

        if x.is_finite() && y.is_finite() {
            Some(Point2d::new(x, y))
        } else {
            None
        }
    }

    fn unproject(&self, projected: &Point2d) -> Option<Point2d> {
        let lat = FRAC_PI_2
            - 2.0 * (-(projected.y - self.false_northing) / self.semimajor).exp().atan();
        let lon = (projected.x - self.false_easting) / self.semimajor + self.central_meridian;

        if lon.is_finite() && lat.is_finite() {
            Some(Point2d::new(lon, lat))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn project_known_point() {
        let projection = WebMercator::default();
        let projected = projection
            .project(&Point2d::new(37.617_f64.to_radians(), 55.755_f64.to_radians()))
            .unwrap();
        assert_abs_diff_eq!(projected.x, 4_187_505.285, epsilon = 1e-3);
        assert_abs_diff_eq!(projected.y, 7_509_796.885, epsilon = 1e-3);
    }

    #[test]
    fn unproject_is_inverse() {
        let projection = WebMercator::default();
        for (lon, lat) in [(0.0, 0.0), (-1.2, 0.5), (3.0, -1.3), (0.7, 1.4)] {
            let projected = projection.project(&Point2d::new(lon, lat)).unwrap();
            let back = projection.unproject(&projected).unwrap();
            assert_abs_diff_eq!(back.x, lon, epsilon = 1e-12);
            assert_abs_diff_eq!(back.y, lat, epsilon = 1e-12);
        }
    }

    #[test]
    fn pole_cannot_be_projected() {
        let projection = WebMercator::default();
        assert!(projection
            .project(&Point2d::new(0.0, std::f64::consts::FRAC_PI_2))
            .is_none());
    }
}
