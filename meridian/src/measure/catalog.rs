use std::collections::HashMap;
use std::f64::consts::PI;
use std::sync::Arc;

use lazy_static::lazy_static;

use super::{MeasureUnit, QuantityKind, FACTOR_TOLERANCE};

/// Factors are compared at this resolution when looking up canonical units.
const KEY_SCALE: f64 = 1e10;

type UnitKey = (QuantityKind, i64);

struct Catalog {
    si: Vec<Arc<MeasureUnit>>,
    non_si: Vec<Arc<MeasureUnit>>,
    by_key: HashMap<UnitKey, Arc<MeasureUnit>>,
}

impl Catalog {
    fn new() -> Self {
        let si: Vec<_> = [
            ("radian", QuantityKind::Angle, 1.0),
            ("microradian", QuantityKind::Angle, 1e-6),
            ("metre", QuantityKind::Length, 1.0),
            ("kilometre", QuantityKind::Length, 1000.0),
            ("centimetre", QuantityKind::Length, 0.01),
            ("millimetre", QuantityKind::Length, 0.001),
        ]
        .into_iter()
        .map(|(name, kind, factor)| Arc::new(MeasureUnit::new(name, kind, factor)))
        .collect();

        let non_si: Vec<_> = [
            ("degree", QuantityKind::Angle, PI / 180.0),
            ("arc-minute", QuantityKind::Angle, PI / 10_800.0),
            ("arc-second", QuantityKind::Angle, PI / 648_000.0),
            ("grad", QuantityKind::Angle, PI / 200.0),
            ("gon", QuantityKind::Angle, PI / 200.0),
            ("foot", QuantityKind::Length, 0.3048),
            ("US survey foot", QuantityKind::Length, 1200.0 / 3937.0),
            ("yard", QuantityKind::Length, 0.9144),
            ("fathom", QuantityKind::Length, 1.8288),
            ("chain", QuantityKind::Length, 20.1168),
            ("link", QuantityKind::Length, 0.201168),
            ("mile", QuantityKind::Length, 1609.344),
            ("nautical mile", QuantityKind::Length, 1852.0),
            ("inch", QuantityKind::Length, 0.0254),
            ("Clarke's foot", QuantityKind::Length, 0.3047972654),
            ("Indian foot", QuantityKind::Length, 0.3047995102481),
        ]
        .into_iter()
        .map(|(name, kind, factor)| Arc::new(MeasureUnit::new(name, kind, factor)))
        .collect();

        let mut by_key = HashMap::new();
        for unit in si.iter().chain(non_si.iter()) {
            by_key
                .entry(key(unit.kind, unit.factor))
                .or_insert_with(|| unit.clone());
        }

        Self { si, non_si, by_key }
    }
}

lazy_static! {
    static ref CATALOG: Catalog = Catalog::new();
}

fn key(kind: QuantityKind, factor: f64) -> UnitKey {
    (kind, (factor * KEY_SCALE).round() as i64)
}

pub(super) fn find(kind: QuantityKind, factor: f64) -> Option<Arc<MeasureUnit>> {
    if !factor.is_finite() {
        return None;
    }

    // A factor within tolerance of a catalog unit may round into a neighbouring bucket.
    let (kind, center) = key(kind, factor);
    [center, center.saturating_sub(1), center.saturating_add(1)]
        .into_iter()
        .filter_map(|k| CATALOG.by_key.get(&(kind, k)))
        .find(|unit| (unit.factor - factor).abs() <= FACTOR_TOLERANCE)
        .cloned()
}

pub(super) fn si_base(kind: QuantityKind) -> Arc<MeasureUnit> {
    match find(kind, 1.0) {
        Some(unit) => unit,
        None => Arc::new(MeasureUnit::new(
            match kind {
                QuantityKind::Angle => "radian",
                QuantityKind::Length => "metre",
            },
            kind,
            1.0,
        )),
    }
}

/// Units of the SI catalog. These take precedence over the non-SI units during canonicalization.
pub fn si_units() -> &'static [Arc<MeasureUnit>] {
    &CATALOG.si
}

/// Units of the non-SI catalog.
pub fn non_si_units() -> &'static [Arc<MeasureUnit>] {
    &CATALOG.non_si
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_entry_wins_for_equal_factors() {
        let unit = find(QuantityKind::Angle, PI / 200.0).unwrap();
        assert_eq!(unit.name(), "grad");
    }

    #[test]
    fn kinds_do_not_mix() {
        assert_eq!(find(QuantityKind::Angle, 1.0).unwrap().name(), "radian");
        assert_eq!(find(QuantityKind::Length, 1.0).unwrap().name(), "metre");
        assert!(find(QuantityKind::Angle, 0.3048).is_none());
    }

    #[test]
    fn factors_near_bucket_edges_are_found() {
        let degree = find(QuantityKind::Angle, PI / 180.0).unwrap();
        let above = find(QuantityKind::Angle, PI / 180.0 + 0.45e-10).unwrap();
        let below = find(QuantityKind::Angle, PI / 180.0 - 0.6e-10).unwrap();
        assert!(Arc::ptr_eq(&degree, &above));
        assert!(Arc::ptr_eq(&degree, &below));
        assert!(find(QuantityKind::Angle, PI / 180.0 + 3e-10).is_none());
        assert!(find(QuantityKind::Length, f64::MAX).is_none());
        assert!(find(QuantityKind::Length, -f64::MAX).is_none());
    }

    #[test]
    fn every_catalog_unit_is_found() {
        for unit in si_units().iter().chain(non_si_units()) {
            let found = find(unit.kind(), unit.factor()).unwrap();
            assert_eq!(found.factor(), unit.factor());
        }
    }
}
