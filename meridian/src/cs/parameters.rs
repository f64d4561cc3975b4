use std::collections::HashMap;

use crate::cs::ParameterName;

/// Projection parameters keyed by canonical parameter name.
///
/// Parameters keep their insertion order (used when writing the definition back) and are also indexed for lookup
/// by any known spelling of the name.
#[derive(Debug, Clone, Default)]
pub struct ProjectionParameters {
    ordered: Vec<(ParameterName, f64)>,
    lookup: HashMap<ParameterName, f64>,
}

impl ProjectionParameters {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter. Setting a parameter already present under any spelling replaces its value in place.
    pub fn insert(&mut self, name: &str, value: f64) {
        let name = ParameterName::get(name);
        match self.ordered.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => *existing = value,
            None => self.ordered.push((name.clone(), value)),
        }

        self.lookup.insert(name, value);
    }

    /// Builder-style version of [`ProjectionParameters::insert`].
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    /// Value of a parameter by any of its spellings.
    pub fn get(&self, name: &str) -> Option<f64> {
        let key = ParameterName::canonical_key(name);
        self.lookup.get(key.as_str()).copied()
    }

    /// Value of a parameter or the given default.
    pub fn get_or(&self, name: &str, default: f64) -> f64 {
        self.get(name).unwrap_or(default)
    }

    /// Parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ParameterName, f64)> {
        self.ordered.iter().map(|(name, value)| (name, *value))
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Returns true if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

/// Parameter sets are equal if they have the same canonical names with the same values, regardless of order.
impl PartialEq for ProjectionParameters {
    fn eq(&self, other: &Self) -> bool {
        self.lookup == other.lookup
    }
}

impl<'a> FromIterator<(&'a str, f64)> for ProjectionParameters {
    fn from_iter<T: IntoIterator<Item = (&'a str, f64)>>(iter: T) -> Self {
        let mut parameters = Self::new();
        for (name, value) in iter {
            parameters.insert(name, value);
        }

        parameters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cs::parameter_names::*;

    #[test]
    fn lookup_by_alias() {
        let parameters = ProjectionParameters::new()
            .with("Latitude_Of_Natural_Origin", 49.0)
            .with("central_meridian", -2.0);

        assert_eq!(parameters.get(LATITUDE_OF_ORIGIN), Some(49.0));
        assert_eq!(parameters.get("latitude_of_false_origin"), Some(49.0));
        assert_eq!(parameters.get("Longitude_Of_Center"), Some(-2.0));
        assert_eq!(parameters.get(FALSE_EASTING), None);
        assert_eq!(parameters.get_or(FALSE_EASTING, 0.0), 0.0);
    }

    #[test]
    fn insertion_order_is_kept() {
        let parameters: ProjectionParameters =
            [("false_northing", 1.0), ("false_easting", 2.0), ("Northing_At_False_Origin", 3.0)]
                .into_iter()
                .collect();

        let names: Vec<_> = parameters.iter().map(|(name, value)| (name.as_str(), value)).collect();
        assert_eq!(names, vec![(FALSE_NORTHING, 3.0), (FALSE_EASTING, 2.0)]);
    }

    #[test]
    fn equality_ignores_order_and_spelling() {
        let a = ProjectionParameters::new()
            .with("latitude_of_origin", 0.0)
            .with("scale_factor", 0.9996);
        let b = ProjectionParameters::new()
            .with("Scale_Factor_At_Natural_Origin", 0.9996)
            .with("latitude_of_natural_origin", 0.0);
        assert_eq!(a, b);
        assert_ne!(a, b.clone().with("false_easting", 500_000.0));
    }
}
