//! Reference ellipsoid of revolution.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::cs::Authority;

const VINCENTY_ITERATIONS: usize = 100;
const VINCENTY_TOLERANCE: f64 = 1e-12;

/// Reference spheroid.
///
/// A spheroid is defined by its semi-major axis and one of semi-minor axis or inverse flattening, the other one
/// being derived at construction. Inverse flattening of `0` or infinity describes a sphere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spheroid {
    name: String,
    semi_major_axis: f64,
    semi_minor_axis: f64,
    inverse_flattening: f64,
    flattening: f64,
    eccentricity_squared: f64,
    eccentricity: f64,
    authority: Option<Authority>,
    deprecated: bool,
}

impl Spheroid {
    /// Creates a spheroid from all three axis parameters. Either `semi_minor_axis` or `inverse_flattening` may be
    /// `NaN`, in which case it is derived from the other two values.
    pub fn new(
        name: impl Into<String>,
        semi_major_axis: f64,
        semi_minor_axis: f64,
        inverse_flattening: f64,
    ) -> Self {
        let a = semi_major_axis;
        let inverse_flattening = if inverse_flattening.is_nan() {
            a / (a - semi_minor_axis)
        } else {
            inverse_flattening
        };

        let flattening = if inverse_flattening == 0.0 || inverse_flattening.is_infinite() {
            0.0
        } else {
            1.0 / inverse_flattening
        };

        let semi_minor_axis = if semi_minor_axis.is_nan() {
            a - a * flattening
        } else {
            semi_minor_axis
        };

        let eccentricity_squared = 2.0 * flattening - flattening * flattening;

        Self {
            name: name.into(),
            semi_major_axis: a,
            semi_minor_axis,
            inverse_flattening,
            flattening,
            eccentricity_squared,
            eccentricity: eccentricity_squared.sqrt(),
            authority: None,
            deprecated: false,
        }
    }

    /// Creates a spheroid from semi-major axis and inverse flattening.
    pub fn from_inverse_flattening(name: impl Into<String>, semi_major_axis: f64, inverse_flattening: f64) -> Self {
        Self::new(name, semi_major_axis, f64::NAN, inverse_flattening)
    }

    /// Creates a spheroid from both semi-axes.
    pub fn from_semi_axes(name: impl Into<String>, semi_major_axis: f64, semi_minor_axis: f64) -> Self {
        Self::new(name, semi_major_axis, semi_minor_axis, f64::NAN)
    }

    /// WGS 84 spheroid (`EPSG:7030`).
    pub fn wgs84() -> Self {
        Self::from_inverse_flattening("WGS 84", 6_378_137.0, 298.257_223_563)
            .with_authority(Authority::epsg(7030))
    }

    /// Sets the authority of the spheroid.
    pub fn with_authority(mut self, authority: Authority) -> Self {
        self.authority = Some(authority);
        self
    }

    /// Marks the spheroid as deprecated.
    pub fn with_deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    /// Name of the spheroid.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Semi-major axis in metres.
    pub fn semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    /// Semi-minor axis in metres.
    pub fn semi_minor_axis(&self) -> f64 {
        self.semi_minor_axis
    }

    /// Inverse flattening.
    pub fn inverse_flattening(&self) -> f64 {
        self.inverse_flattening
    }

    /// Flattening, `0` for a sphere.
    pub fn flattening(&self) -> f64 {
        self.flattening
    }

    /// First eccentricity.
    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    /// Square of the first eccentricity.
    pub fn eccentricity_squared(&self) -> f64 {
        self.eccentricity_squared
    }

    /// Authority of the spheroid.
    pub fn authority(&self) -> Option<&Authority> {
        self.authority.as_ref()
    }

    /// Whether the spheroid is deprecated by its authority.
    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    /// Returns true if the spheroid is a sphere.
    pub fn is_sphere(&self) -> bool {
        self.flattening == 0.0
    }

    /// Geocentric radius at the given latitude (radians).
    pub fn radius_at_latitude(&self, lat: f64) -> f64 {
        let (sin, cos) = lat.sin_cos();
        let a = self.semi_major_axis;
        let b = self.semi_minor_axis;
        let a_cos = a * cos;
        let b_sin = b * sin;
        let a2_cos = a * a_cos;
        let b2_sin = b * b_sin;

        ((a2_cos * a2_cos + b2_sin * b2_sin) / (a_cos * a_cos + b_sin * b_sin)).sqrt()
    }

    /// Radius of curvature in the meridian at the given latitude (radians).
    pub fn meridian_radius(&self, lat: f64) -> f64 {
        let sin = lat.sin();
        let w = 1.0 - self.eccentricity_squared * sin * sin;
        self.semi_major_axis * (1.0 - self.eccentricity_squared) / w.powf(1.5)
    }

    /// Radius of curvature in the prime vertical at the given latitude (radians).
    pub fn prime_vertical_radius(&self, lat: f64) -> f64 {
        let sin = lat.sin();
        self.semi_major_axis / (1.0 - self.eccentricity_squared * sin * sin).sqrt()
    }

    /// Geodesic distance in metres between two points given as longitude/latitude in radians, using Vincenty's
    /// inverse formula.
    ///
    /// Returns `None` if the iteration does not converge (nearly antipodal points).
    pub fn distance_metres(&self, lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> Option<f64> {
        let Some(solution) = self.vincenty(lon1, lat1, lon2, lat2)? else {
            return Some(0.0);
        };

        let a = self.semi_major_axis;
        let b = self.semi_minor_axis;
        let VincentySolution {
            sin_sigma,
            cos_sigma,
            sigma,
            cos_sq_alpha,
            cos_2sigma_m,
            ..
        } = solution;

        let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
        let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
        let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
        let delta_sigma = big_b
            * sin_sigma
            * (cos_2sigma_m
                + big_b / 4.0
                    * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                        - big_b / 6.0
                            * cos_2sigma_m
                            * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                            * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));

        Some(b * big_a * (sigma - delta_sigma))
    }

    /// Initial azimuth in radians `[0, 2π)` of the geodesic from the first point to the second one. Coincident
    /// points have azimuth `0`.
    pub fn azimuth(&self, lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> Option<f64> {
        let Some(solution) = self.vincenty(lon1, lat1, lon2, lat2)? else {
            return Some(0.0);
        };

        let mut azimuth = (solution.cos_u2 * solution.sin_lambda).atan2(
            solution.cos_u1 * solution.sin_u2 - solution.sin_u1 * solution.cos_u2 * solution.cos_lambda,
        );
        if azimuth < 0.0 {
            azimuth += TAU;
        }

        Some(azimuth)
    }

    /// Iterates Vincenty's lambda. Outer `None` means no convergence, inner `None` means coincident points.
    fn vincenty(&self, lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> Option<Option<VincentySolution>> {
        let f = self.flattening;
        let delta_lambda = lon2 - lon1;

        let tan_u1 = (1.0 - f) * lat1.tan();
        let cos_u1 = 1.0 / (1.0 + tan_u1 * tan_u1).sqrt();
        let sin_u1 = tan_u1 * cos_u1;
        let tan_u2 = (1.0 - f) * lat2.tan();
        let cos_u2 = 1.0 / (1.0 + tan_u2 * tan_u2).sqrt();
        let sin_u2 = tan_u2 * cos_u2;

        let mut lambda = delta_lambda;
        for _ in 0..VINCENTY_ITERATIONS {
            let (sin_lambda, cos_lambda) = lambda.sin_cos();
            let t = cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda;
            let sin_sigma = ((cos_u2 * sin_lambda).powi(2) + t * t).sqrt();
            if sin_sigma == 0.0 {
                return Some(None);
            }

            let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
            let sigma = sin_sigma.atan2(cos_sigma);
            let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
            let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
            let mut cos_2sigma_m = cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha;
            if !cos_2sigma_m.is_finite() {
                // equatorial line
                cos_2sigma_m = 0.0;
            }

            let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
            let previous = lambda;
            lambda = delta_lambda
                + (1.0 - c)
                    * f
                    * sin_alpha
                    * (sigma
                        + c * sin_sigma
                            * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

            if (lambda - previous).abs() <= VINCENTY_TOLERANCE {
                return Some(Some(VincentySolution {
                    sin_sigma,
                    cos_sigma,
                    sigma,
                    cos_sq_alpha,
                    cos_2sigma_m,
                    sin_lambda,
                    cos_lambda,
                    sin_u1,
                    cos_u1,
                    sin_u2,
                    cos_u2,
                }));
            }
        }

        None
    }

    /// Compares all raw fields and the authority.
    pub fn equals_exact(&self, other: &Self) -> bool {
        self.name == other.name
            && self.semi_major_axis == other.semi_major_axis
            && self.semi_minor_axis == other.semi_minor_axis
            && self.inverse_flattening == other.inverse_flattening
            && self.authority == other.authority
            && self.deprecated == other.deprecated
    }

    fn normalized_inverse_flattening(&self) -> f64 {
        if self.is_sphere() {
            f64::INFINITY
        } else {
            (self.inverse_flattening * 1e6).round() / 1e6
        }
    }
}

/// Relaxed equality: semi-major axis compared exactly and inverse flattening rounded to 6 decimal digits.
impl PartialEq for Spheroid {
    fn eq(&self, other: &Self) -> bool {
        self.semi_major_axis == other.semi_major_axis
            && self.normalized_inverse_flattening() == other.normalized_inverse_flattening()
    }
}

struct VincentySolution {
    sin_sigma: f64,
    cos_sigma: f64,
    sigma: f64,
    cos_sq_alpha: f64,
    cos_2sigma_m: f64,
    sin_lambda: f64,
    cos_lambda: f64,
    sin_u1: f64,
    cos_u1: f64,
    sin_u2: f64,
    cos_u2: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn wgs84_semi_minor_is_derived() {
        let spheroid = Spheroid::wgs84();
        assert_abs_diff_eq!(spheroid.semi_minor_axis(), 6_356_752.314_245_179, epsilon = 1e-6);
        assert_abs_diff_eq!(spheroid.eccentricity_squared(), 0.006_694_379_990_14, epsilon = 1e-12);
    }

    #[test]
    fn inverse_flattening_round_trip() {
        let spheroid = Spheroid::wgs84();
        let rebuilt = Spheroid::from_semi_axes("WGS 84", 6_378_137.0, spheroid.semi_minor_axis());
        assert_abs_diff_eq!(rebuilt.inverse_flattening(), 298.257_223_563, epsilon = 1e-6);
        assert_eq!(spheroid, rebuilt);
        assert!(!spheroid.equals_exact(&rebuilt));
    }

    #[test]
    fn sphere() {
        let zero = Spheroid::from_inverse_flattening("sphere", 6_371_000.0, 0.0);
        assert!(zero.is_sphere());
        assert_eq!(zero.semi_minor_axis(), 6_371_000.0);
        assert_eq!(zero.eccentricity(), 0.0);

        let from_axes = Spheroid::from_semi_axes("sphere", 6_371_000.0, 6_371_000.0);
        assert!(from_axes.is_sphere());
        assert_eq!(zero, from_axes);
    }

    #[test]
    fn relaxed_equality_ignores_name_and_authority() {
        let a = Spheroid::wgs84();
        let b = Spheroid::from_inverse_flattening("WGS_1984", 6_378_137.0, 298.257_223_563_000_1);
        assert_eq!(a, b);

        let grs80 = Spheroid::from_inverse_flattening("GRS 1980", 6_378_137.0, 298.257_222_101);
        assert_ne!(a, grs80);
    }

    #[test]
    fn vincenty_distance() {
        let spheroid = Spheroid::wgs84();
        // Flinders Peak to Buninyong
        let distance = spheroid
            .distance_metres(
                144.424_867_888_9_f64.to_radians(),
                (-37.951_033_416_7_f64).to_radians(),
                143.926_495_527_8_f64.to_radians(),
                (-37.652_821_138_9_f64).to_radians(),
            )
            .unwrap();
        assert_abs_diff_eq!(distance, 54_972.271, epsilon = 1e-2);

        assert_eq!(spheroid.distance_metres(0.1, 0.2, 0.1, 0.2), Some(0.0));
    }

    #[test]
    fn equatorial_distance() {
        let spheroid = Spheroid::wgs84();
        let distance = spheroid
            .distance_metres(0.0, 0.0, 1f64.to_radians(), 0.0)
            .unwrap();
        assert_relative_eq!(distance, 6_378_137.0 * 1f64.to_radians(), max_relative = 1e-9);
        let azimuth = spheroid.azimuth(0.0, 0.0, 1f64.to_radians(), 0.0).unwrap();
        assert_abs_diff_eq!(azimuth, std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn radii() {
        let spheroid = Spheroid::wgs84();
        assert_abs_diff_eq!(spheroid.radius_at_latitude(0.0), 6_378_137.0, epsilon = 1e-6);
        assert_abs_diff_eq!(
            spheroid.radius_at_latitude(std::f64::consts::FRAC_PI_2),
            spheroid.semi_minor_axis(),
            epsilon = 1e-6
        );
        assert_abs_diff_eq!(spheroid.prime_vertical_radius(0.0), 6_378_137.0, epsilon = 1e-6);
        assert!(spheroid.meridian_radius(0.0) < spheroid.meridian_radius(1.0));
    }
}
