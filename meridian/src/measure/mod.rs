//! Units of measure for angles and lengths.
//!
//! A [`MeasureUnit`] is identified by its kind and its conversion factor to the SI base unit of that kind
//! (radian or metre). Units are always obtained through [`resolve`] (or the helper functions like [`degree`]),
//! which returns the canonical shared instance for every unit known to the built-in catalogs. This makes it
//! possible to compare common units by reference (`Arc::ptr_eq`).

mod catalog;

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use catalog::{non_si_units, si_units};

/// Tolerance used when comparing conversion factors.
pub const FACTOR_TOLERANCE: f64 = 1e-10;

/// Physical quantity a unit measures.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuantityKind {
    /// Plane angle, SI base unit is radian.
    Angle,
    /// Length, SI base unit is metre.
    Length,
}

impl QuantityKind {
    /// Canonical SI base unit of the quantity.
    pub fn si_unit(&self) -> Arc<MeasureUnit> {
        catalog::si_base(*self)
    }
}

/// Unit of measure with its absolute conversion factor to the SI base unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasureUnit {
    name: String,
    kind: QuantityKind,
    factor: f64,
}

impl MeasureUnit {
    pub(crate) fn new(name: impl Into<String>, kind: QuantityKind, factor: f64) -> Self {
        Self {
            name: name.into(),
            kind,
            factor,
        }
    }

    /// Name of the unit.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Quantity measured by the unit.
    pub fn kind(&self) -> QuantityKind {
        self.kind
    }

    /// Multiplier that converts a value in this unit into the SI base unit.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Returns true if this is the SI base unit (radian or metre).
    pub fn is_si_base(&self) -> bool {
        self.factor == 1.0
    }

    /// Converts a value in this unit into the SI base unit.
    pub fn to_si(&self, value: f64) -> f64 {
        if self.factor == 1.0 {
            value
        } else {
            value * self.factor
        }
    }

    /// Converts a value in the SI base unit into this unit.
    pub fn from_si(&self, value: f64) -> f64 {
        if self.factor == 1.0 {
            value
        } else {
            value / self.factor
        }
    }

    /// Converts a value in this unit into the `target` unit. Units of different kinds are not convertible,
    /// in this case `None` is returned.
    pub fn convert(&self, value: f64, target: &MeasureUnit) -> Option<f64> {
        if self.kind != target.kind {
            None
        } else {
            Some(target.from_si(self.to_si(value)))
        }
    }
}

impl PartialEq for MeasureUnit {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && (self.factor - other.factor).abs() <= FACTOR_TOLERANCE
    }
}

impl Display for MeasureUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Resolves a unit defined as `base × conversion_factor`.
///
/// A factor of exactly `1` returns `base` itself (or the SI base unit of the `kind` if no base is given). Otherwise
/// the absolute factor is computed and looked up in the SI catalog, then in the non-SI catalog. If a catalog unit
/// matches, the canonical shared instance is returned. Unknown factors produce a new unit. Zero or negative factors
/// are not validated.
pub fn resolve(
    kind: QuantityKind,
    base: Option<&Arc<MeasureUnit>>,
    conversion_factor: f64,
) -> Arc<MeasureUnit> {
    let base = match base {
        Some(base) => base.clone(),
        None => kind.si_unit(),
    };

    if conversion_factor == 1.0 {
        return base;
    }

    let factor = base.factor * conversion_factor;
    match catalog::find(kind, factor) {
        Some(unit) => unit,
        None => Arc::new(MeasureUnit::new(
            format!("{}*{conversion_factor}", base.name),
            kind,
            factor,
        )),
    }
}

/// Canonical radian.
pub fn radian() -> Arc<MeasureUnit> {
    QuantityKind::Angle.si_unit()
}

/// Canonical metre.
pub fn metre() -> Arc<MeasureUnit> {
    QuantityKind::Length.si_unit()
}

/// Canonical degree of arc.
pub fn degree() -> Arc<MeasureUnit> {
    resolve(
        QuantityKind::Angle,
        None,
        std::f64::consts::PI / 180.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn degree_is_canonical() {
        let from_wkt = resolve(QuantityKind::Angle, None, 0.0174532925199433);
        assert!(Arc::ptr_eq(&from_wkt, &degree()));
        assert_eq!(from_wkt.name(), "degree");

        let again = resolve(QuantityKind::Angle, Some(&radian()), 0.0174532925199433);
        assert!(Arc::ptr_eq(&from_wkt, &again));
    }

    #[test]
    fn factor_within_tolerance_is_canonical() {
        let near = resolve(QuantityKind::Angle, None, std::f64::consts::PI / 180.0 + 0.45e-10);
        assert_eq!(*near, *degree());
        assert!(Arc::ptr_eq(&near, &degree()));
    }

    #[test]
    fn resolve_is_idempotent() {
        let foot = resolve(QuantityKind::Length, None, 0.3048);
        let same = resolve(QuantityKind::Length, Some(&foot), 1.0);
        assert!(Arc::ptr_eq(&foot, &same));

        let odd = resolve(QuantityKind::Length, None, 0.123456);
        let same = resolve(QuantityKind::Length, Some(&odd), 1.0);
        assert!(Arc::ptr_eq(&odd, &same));
    }

    #[test]
    fn factor_one_returns_si_base() {
        assert!(Arc::ptr_eq(
            &resolve(QuantityKind::Length, None, 1.0),
            &metre()
        ));
        assert!(Arc::ptr_eq(
            &resolve(QuantityKind::Angle, None, 1.0),
            &radian()
        ));
    }

    #[test]
    fn composed_factor_uses_base() {
        let kilometre = resolve(QuantityKind::Length, None, 1000.0);
        let metre_again = resolve(QuantityKind::Length, Some(&kilometre), 0.001);
        assert!(Arc::ptr_eq(&metre_again, &metre()));

        let unknown = resolve(QuantityKind::Length, Some(&kilometre), 3.0);
        assert_relative_eq!(unknown.factor(), 3000.0);
        assert_eq!(unknown.name(), "kilometre*3");
    }

    #[test]
    fn degenerate_factors_are_accepted() {
        let zero = resolve(QuantityKind::Length, None, 0.0);
        assert_eq!(zero.factor(), 0.0);
        let negative = resolve(QuantityKind::Angle, None, -2.0);
        assert_eq!(negative.factor(), -2.0);
    }

    #[test]
    fn convert_between_units() {
        let foot = resolve(QuantityKind::Length, None, 0.3048);
        assert_relative_eq!(foot.convert(1000.0, &metre()).unwrap(), 304.8);
        assert_relative_eq!(degree().convert(180.0, &radian()).unwrap(), std::f64::consts::PI);
        assert_eq!(degree().convert(1.0, &metre()), None);
    }
}
