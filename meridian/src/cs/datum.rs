use serde::{Deserialize, Serialize};

use crate::cs::{Authority, Spheroid};

/// Seven-parameter (Helmert) transformation to WGS 84: three translations in metres, three rotations in arc
/// seconds and a scale difference in parts per million.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToWgs84 {
    values: [f64; 7],
}

impl ToWgs84 {
    /// Creates the transformation from all seven parameters.
    pub fn new(values: [f64; 7]) -> Self {
        Self { values }
    }

    /// Creates the transformation from a list of 3 or 7 values. Missing rotations and scale are zero.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        match values.len() {
            3 | 7 => {
                let mut all = [0.0; 7];
                all[..values.len()].copy_from_slice(values);
                Some(Self::new(all))
            }
            _ => None,
        }
    }

    /// All seven parameters `[dx, dy, dz, rx, ry, rz, ppm]`.
    pub fn values(&self) -> &[f64; 7] {
        &self.values
    }

    /// Translation part.
    pub fn translation(&self) -> [f64; 3] {
        [self.values[0], self.values[1], self.values[2]]
    }

    /// Rotation part.
    pub fn rotation(&self) -> [f64; 3] {
        [self.values[3], self.values[4], self.values[5]]
    }

    /// Scale difference in ppm.
    pub fn scale_ppm(&self) -> f64 {
        self.values[6]
    }

    /// Returns true if only the translation part is set.
    pub fn is_translation_only(&self) -> bool {
        self.values[3..].iter().all(|v| *v == 0.0)
    }
}

/// Geodetic datum: a spheroid anchored to the Earth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Datum {
    name: String,
    spheroid: Spheroid,
    to_wgs84: Option<ToWgs84>,
    authority: Option<Authority>,
    deprecated: bool,
}

impl Datum {
    /// Creates a new datum.
    pub fn new(name: impl Into<String>, spheroid: Spheroid) -> Self {
        Self {
            name: name.into(),
            spheroid,
            to_wgs84: None,
            authority: None,
            deprecated: false,
        }
    }

    /// World Geodetic System 1984 (`EPSG:6326`).
    pub fn wgs84() -> Self {
        Self::new("WGS_1984", Spheroid::wgs84()).with_authority(Authority::epsg(6326))
    }

    /// Sets transformation parameters to WGS 84.
    pub fn with_to_wgs84(mut self, to_wgs84: ToWgs84) -> Self {
        self.to_wgs84 = Some(to_wgs84);
        self
    }

    /// Sets the authority of the datum.
    pub fn with_authority(mut self, authority: Authority) -> Self {
        self.authority = Some(authority);
        self
    }

    /// Marks the datum as deprecated.
    pub fn with_deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    /// Name of the datum.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Spheroid of the datum.
    pub fn spheroid(&self) -> &Spheroid {
        &self.spheroid
    }

    /// Transformation to WGS 84, if known.
    pub fn to_wgs84(&self) -> Option<&ToWgs84> {
        self.to_wgs84.as_ref()
    }

    /// Authority of the datum.
    pub fn authority(&self) -> Option<&Authority> {
        self.authority.as_ref()
    }

    /// Whether the datum is deprecated by its authority.
    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    /// Compares all fields, spheroids included.
    pub fn equals_exact(&self, other: &Self) -> bool {
        self.name == other.name
            && self.spheroid.equals_exact(&other.spheroid)
            && self.to_wgs84 == other.to_wgs84
            && self.authority == other.authority
            && self.deprecated == other.deprecated
    }
}

/// Names are compared ignoring case, spheroids with relaxed equality.
impl PartialEq for Datum {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name) && self.spheroid == other.spheroid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_wgs84_from_values() {
        let short = ToWgs84::from_values(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(short.values(), &[1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(short.is_translation_only());

        let full = ToWgs84::from_values(&[1.0, 2.0, 3.0, 0.1, 0.2, 0.3, 4.0]).unwrap();
        assert_eq!(full.rotation(), [0.1, 0.2, 0.3]);
        assert_eq!(full.scale_ppm(), 4.0);

        assert!(ToWgs84::from_values(&[1.0, 2.0]).is_none());
    }

    #[test]
    fn name_case_is_ignored() {
        let a = Datum::wgs84();
        let b = Datum::new("wgs_1984", Spheroid::wgs84());
        assert_eq!(a, b);
        assert!(!a.equals_exact(&b));

        let other = Datum::new("WGS_1984", Spheroid::from_inverse_flattening("x", 6_378_137.0, 300.0));
        assert_ne!(a, other);
    }
}
