//! Coordinate rounding policy.

use serde::{Deserialize, Serialize};

/// Rounding policy applied to coordinates.
///
/// X and Y share one scale, Z has its own. A scale of `s > 0` rounds values to the nearest multiple of `1/s`
/// (half-way values are rounded up). A scale `<= 0` means floating precision: values are not changed. Other
/// ordinates (e.g. measures) are never rounded.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PrecisionModel {
    scale_xy: f64,
    scale_z: f64,
}

impl PrecisionModel {
    /// Floating precision model.
    pub const FLOATING: Self = Self {
        scale_xy: 0.0,
        scale_z: 0.0,
    };

    /// Creates a precision model with given scales.
    pub fn new(scale_xy: f64, scale_z: f64) -> Self {
        Self { scale_xy, scale_z }
    }

    /// Floating precision model.
    pub fn floating() -> Self {
        Self::FLOATING
    }

    /// Fixed precision for X and Y, floating for Z.
    pub fn fixed(scale_xy: f64) -> Self {
        Self::new(scale_xy, 0.0)
    }

    /// Scale of X and Y ordinates.
    pub fn scale_xy(&self) -> f64 {
        self.scale_xy
    }

    /// Scale of Z ordinates.
    pub fn scale_z(&self) -> f64 {
        self.scale_z
    }

    /// Returns true if X and Y are rounded.
    pub fn is_fixed_xy(&self) -> bool {
        self.scale_xy > 0.0
    }

    /// Returns true if no ordinate is rounded.
    pub fn is_floating(&self) -> bool {
        self.scale_xy <= 0.0 && self.scale_z <= 0.0
    }

    /// Grid size of X and Y, `None` for floating precision.
    pub fn resolution_xy(&self) -> Option<f64> {
        self.is_fixed_xy().then(|| 1.0 / self.scale_xy)
    }

    /// Scale used for the ordinate with the given axis index.
    pub fn scale(&self, axis_index: usize) -> f64 {
        match axis_index {
            0 | 1 => self.scale_xy,
            2 => self.scale_z,
            _ => 0.0,
        }
    }

    /// Rounds an ordinate of the given axis.
    pub fn make_precise(&self, axis_index: usize, value: f64) -> f64 {
        make_precise(self.scale(axis_index), value)
    }

    /// Rounds a flat list of coordinates with `axis_count` ordinates each in place.
    pub fn make_precise_coordinates(&self, axis_count: usize, coordinates: &mut [f64]) {
        if self.is_floating() || axis_count == 0 {
            return;
        }

        for (index, value) in coordinates.iter_mut().enumerate() {
            *value = self.make_precise(index % axis_count, *value);
        }
    }
}

/// Rounds the value to the nearest multiple of `1/scale`. Scale `<= 0` and non-finite values are returned unchanged.
pub fn make_precise(scale: f64, value: f64) -> f64 {
    if scale > 0.0 && value.is_finite() {
        (value * scale + 0.5).floor() / scale
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding() {
        assert_eq!(make_precise(1.0, 1.4), 1.0);
        assert_eq!(make_precise(1.0, 1.5), 2.0);
        assert_eq!(make_precise(1.0, -1.5), -1.0);
        assert_eq!(make_precise(1000.0, 12.345_67), 12.346);
        assert_eq!(make_precise(0.1, 1234.0), 1230.0);
        assert_eq!(make_precise(0.0, 1.234_567), 1.234_567);
        assert_eq!(make_precise(-5.0, 1.234_567), 1.234_567);
        assert!(make_precise(10.0, f64::NAN).is_nan());
        assert_eq!(make_precise(10.0, f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn idempotent() {
        for scale in [0.0, 0.1, 1.0, 3.0, 1000.0, 1e7] {
            for value in [-179.999_999_9, -1.5, 0.0, 0.333_333, 2.5, 12_345.678_9, 5_000_000.123] {
                let once = make_precise(scale, value);
                assert_eq!(make_precise(scale, once), once, "scale {scale}, value {value}");
            }
        }
    }

    #[test]
    fn per_axis_scales() {
        let model = PrecisionModel::new(10.0, 1.0);
        let mut coordinates = [1.26, 2.24, 3.6, 4.44, 1.26, 2.24, 3.6, 4.44];
        model.make_precise_coordinates(4, &mut coordinates);
        assert_eq!(coordinates, [1.3, 2.2, 4.0, 4.44, 1.3, 2.2, 4.0, 4.44]);

        assert_eq!(PrecisionModel::fixed(1000.0).resolution_xy(), Some(0.001));
        assert_eq!(PrecisionModel::floating().resolution_xy(), None);
    }

    #[test]
    fn deserialize() {
        let model: PrecisionModel = serde_json::from_str(r#"{"scale_xy":1000.0,"scale_z":1.0}"#).unwrap();
        assert_eq!(model, PrecisionModel::new(1000.0, 1.0));
    }
}
