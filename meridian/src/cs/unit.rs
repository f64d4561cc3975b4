//! Angular and linear units of coordinate systems.

use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::cs::Authority;
use crate::measure::{self, MeasureUnit, QuantityKind, FACTOR_TOLERANCE};

/// Kind of a [`UnitOfMeasure`].
pub trait UnitKind: Debug + Clone + Send + Sync + 'static {
    /// Quantity measured by units of this kind.
    const QUANTITY: QuantityKind;
}

/// Marker for angular units.
#[derive(Debug, Clone, Copy)]
pub struct Angular;

/// Marker for linear units.
#[derive(Debug, Clone, Copy)]
pub struct Linear;

impl UnitKind for Angular {
    const QUANTITY: QuantityKind = QuantityKind::Angle;
}

impl UnitKind for Linear {
    const QUANTITY: QuantityKind = QuantityKind::Length;
}

/// Angular unit of a geographic coordinate system.
pub type AngularUnit = UnitOfMeasure<Angular>;
/// Linear unit of a projected coordinate system.
pub type LinearUnit = UnitOfMeasure<Linear>;

/// Unit as declared in a coordinate system definition.
///
/// The unit is defined relative to an optional base unit (SI base unit if not set). The absolute unit is resolved
/// at construction into the canonical [`MeasureUnit`].
#[derive(Debug, Clone)]
pub struct UnitOfMeasure<K: UnitKind> {
    name: String,
    base_unit: Option<Arc<UnitOfMeasure<K>>>,
    conversion_factor: f64,
    authority: Option<Authority>,
    deprecated: bool,
    measure: Arc<MeasureUnit>,
    kind: PhantomData<K>,
}

impl<K: UnitKind> UnitOfMeasure<K> {
    /// Creates a unit defined as `conversion_factor` base units.
    pub fn new(
        name: impl Into<String>,
        base_unit: Option<Arc<UnitOfMeasure<K>>>,
        conversion_factor: f64,
    ) -> Self {
        let measure = measure::resolve(
            K::QUANTITY,
            base_unit.as_ref().map(|base| &base.measure),
            conversion_factor,
        );

        Self {
            name: name.into(),
            base_unit,
            conversion_factor,
            authority: None,
            deprecated: false,
            measure,
            kind: PhantomData,
        }
    }

    /// Creates a unit directly from its factor to the SI base unit.
    pub fn from_si_factor(name: impl Into<String>, factor: f64) -> Self {
        Self::new(name, None, factor)
    }

    /// Sets the authority of the unit.
    pub fn with_authority(mut self, authority: Authority) -> Self {
        self.authority = Some(authority);
        self
    }

    /// Marks the unit as deprecated.
    pub fn with_deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    /// Name of the unit as declared.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit this one is defined relative to.
    pub fn base_unit(&self) -> Option<&Arc<UnitOfMeasure<K>>> {
        self.base_unit.as_ref()
    }

    /// Factor relative to the base unit.
    pub fn conversion_factor(&self) -> f64 {
        self.conversion_factor
    }

    /// Factor relative to the SI base unit.
    pub fn si_factor(&self) -> f64 {
        self.measure.factor()
    }

    /// Factor relative to the SI base unit as declared, through the chain of base units. Unlike
    /// [`UnitOfMeasure::si_factor`] it is not replaced by the factor of the canonical measure.
    pub fn declared_si_factor(&self) -> f64 {
        let base = self
            .base_unit
            .as_ref()
            .map_or(1.0, |base| base.declared_si_factor());
        base * self.conversion_factor
    }

    /// Canonical measure this unit resolves to.
    pub fn measure(&self) -> &Arc<MeasureUnit> {
        &self.measure
    }

    /// Authority of the unit.
    pub fn authority(&self) -> Option<&Authority> {
        self.authority.as_ref()
    }

    /// Whether the unit is deprecated by its authority.
    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    /// Converts a value in this unit into the SI base unit.
    pub fn to_si(&self, value: f64) -> f64 {
        self.measure.to_si(value)
    }

    /// Converts a value in the SI base unit into this unit.
    pub fn from_si(&self, value: f64) -> f64 {
        self.measure.from_si(value)
    }

    /// Compares all fields.
    pub fn equals_exact(&self, other: &Self) -> bool {
        self.name == other.name
            && self.conversion_factor == other.conversion_factor
            && self.authority == other.authority
            && self.deprecated == other.deprecated
            && match (&self.base_unit, &other.base_unit) {
                (Some(a), Some(b)) => a.equals_exact(b),
                (None, None) => true,
                _ => false,
            }
    }
}

impl AngularUnit {
    /// Radian (`EPSG:9101`).
    pub fn radian() -> Self {
        Self::from_si_factor("radian", 1.0).with_authority(Authority::epsg(9101))
    }

    /// Degree (`EPSG:9122`).
    pub fn degree() -> Self {
        Self::from_si_factor("degree", 0.0174532925199433).with_authority(Authority::epsg(9122))
    }

    /// Converts an angle in this unit into radians.
    pub fn to_radians(&self, value: f64) -> f64 {
        self.to_si(value)
    }

    /// Converts an angle in radians into this unit.
    pub fn from_radians(&self, value: f64) -> f64 {
        self.from_si(value)
    }
}

impl LinearUnit {
    /// Metre (`EPSG:9001`).
    pub fn metre() -> Self {
        Self::from_si_factor("metre", 1.0).with_authority(Authority::epsg(9001))
    }

    /// Converts a length in this unit into metres.
    pub fn to_metres(&self, value: f64) -> f64 {
        self.to_si(value)
    }

    /// Converts a length in metres into this unit.
    pub fn from_metres(&self, value: f64) -> f64 {
        self.from_si(value)
    }
}

/// Units are equal if they have the same name and the same absolute conversion factor.
impl<K: UnitKind> PartialEq for UnitOfMeasure<K> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && (self.si_factor() - other.si_factor()).abs() <= FACTOR_TOLERANCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn degree_resolves_to_canonical_measure() {
        let degree = AngularUnit::degree();
        assert!(Arc::ptr_eq(degree.measure(), &measure::degree()));
        assert_relative_eq!(degree.to_radians(180.0), std::f64::consts::PI, max_relative = 1e-14);
    }

    #[test]
    fn chained_units() {
        let foot = Arc::new(LinearUnit::from_si_factor("foot", 0.3048));
        let yard = LinearUnit::new("yard", Some(foot.clone()), 3.0);
        assert_relative_eq!(yard.si_factor(), 0.9144);
        assert_eq!(yard.measure().name(), "yard");
        assert_relative_eq!(yard.to_metres(10.0), 9.144);
        assert_relative_eq!(yard.declared_si_factor(), 0.9144);
    }

    #[test]
    fn declared_factor_is_not_canonicalized() {
        let degree = AngularUnit::degree();
        assert_eq!(degree.declared_si_factor(), 0.0174532925199433);
        assert_eq!(degree.si_factor(), std::f64::consts::PI / 180.0);
    }

    #[test]
    fn equality_ignores_authority() {
        let a = LinearUnit::metre();
        let b = LinearUnit::from_si_factor("metre", 1.0);
        assert_eq!(a, b);
        assert!(!a.equals_exact(&b));
        assert_ne!(a, LinearUnit::from_si_factor("Meter", 1.0));
    }
}
