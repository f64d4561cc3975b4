//! Map projection names and the alias table normalizing their spellings.

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::cs::{normalize_name, Authority};

/// Canonical names of the projections known to the alias table.
pub mod names {
    /// Transverse Mercator.
    pub const TRANSVERSE_MERCATOR: &str = "transverse_mercator";
    /// Mercator (variant A).
    pub const MERCATOR_1SP: &str = "mercator_1sp";
    /// Mercator (variant B).
    pub const MERCATOR_2SP: &str = "mercator_2sp";
    /// Spherical Mercator on ellipsoidal coordinates, `EPSG:3857`.
    pub const POPULAR_VISUALISATION_PSEUDO_MERCATOR: &str = "popular_visualisation_pseudo_mercator";
    /// Lambert Conic Conformal with one standard parallel.
    pub const LAMBERT_CONIC_CONFORMAL_1SP: &str = "lambert_conic_conformal_1sp";
    /// Lambert Conic Conformal with two standard parallels.
    pub const LAMBERT_CONIC_CONFORMAL_2SP: &str = "lambert_conic_conformal_2sp";
    /// Albers Equal Area.
    pub const ALBERS_EQUAL_AREA: &str = "albers_equal_area";
    /// Lambert Azimuthal Equal Area.
    pub const LAMBERT_AZIMUTHAL_EQUAL_AREA: &str = "lambert_azimuthal_equal_area";
    /// Equirectangular (Plate Carrée).
    pub const EQUIRECTANGULAR: &str = "equirectangular";
    /// Hotine Oblique Mercator.
    pub const OBLIQUE_MERCATOR: &str = "hotine_oblique_mercator";
    /// Polar Stereographic.
    pub const POLAR_STEREOGRAPHIC: &str = "polar_stereographic";
    /// Oblique Stereographic.
    pub const OBLIQUE_STEREOGRAPHIC: &str = "oblique_stereographic";
    /// Cassini-Soldner.
    pub const CASSINI_SOLDNER: &str = "cassini_soldner";
}

lazy_static! {
    static ref PROJECTION_ALIASES: HashMap<&'static str, &'static str> = {
        use names::*;

        let mut aliases = HashMap::new();
        let mut add = |canonical: &'static str, spellings: &[&'static str]| {
            aliases.insert(canonical, canonical);
            for spelling in spellings {
                aliases.insert(*spelling, canonical);
            }
        };

        add(TRANSVERSE_MERCATOR, &["gauss_kruger", "gauss_kruger_projection", "transverse_mercator_south_orientated"]);
        add(MERCATOR_1SP, &["mercator", "mercator_variant_a"]);
        add(MERCATOR_2SP, &["mercator_variant_b"]);
        add(
            POPULAR_VISUALISATION_PSEUDO_MERCATOR,
            &[
                "popular_visualization_pseudo_mercator",
                "pseudo_mercator",
                "web_mercator",
                "mercator_auxiliary_sphere",
            ],
        );
        add(LAMBERT_CONIC_CONFORMAL_1SP, &["lambert_conformal_conic_1sp"]);
        add(
            LAMBERT_CONIC_CONFORMAL_2SP,
            &["lambert_conformal_conic_2sp", "lambert_conformal_conic"],
        );
        add(ALBERS_EQUAL_AREA, &["albers", "albers_conic_equal_area"]);
        add(LAMBERT_AZIMUTHAL_EQUAL_AREA, &["lambert_azimuthal_equal_area_spherical"]);
        add(EQUIRECTANGULAR, &["equidistant_cylindrical", "plate_carree"]);
        add(OBLIQUE_MERCATOR, &["oblique_mercator", "hotine_oblique_mercator_azimuth_natural_origin"]);
        add(POLAR_STEREOGRAPHIC, &["stereographic_north_pole", "stereographic_south_pole"]);
        add(OBLIQUE_STEREOGRAPHIC, &["double_stereographic"]);
        add(CASSINI_SOLDNER, &["cassini"]);

        aliases
    };
}

/// Map projection method referenced by a projected coordinate system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projection {
    name: String,
    normalized_name: String,
    authority: Option<Authority>,
}

impl Projection {
    /// Creates a projection, resolving its normalized name through the alias table.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            normalized_name: normalized_projection_name(&name),
            name,
            authority: None,
        }
    }

    /// Sets the authority of the projection.
    pub fn with_authority(mut self, authority: Authority) -> Self {
        self.authority = Some(authority);
        self
    }

    /// Name as given in the definition.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical name of the projection method.
    pub fn normalized_name(&self) -> &str {
        &self.normalized_name
    }

    /// Authority of the projection.
    pub fn authority(&self) -> Option<&Authority> {
        self.authority.as_ref()
    }

    /// Compares all fields.
    pub fn equals_exact(&self, other: &Self) -> bool {
        self.name == other.name && self.authority == other.authority
    }
}

/// Projections are equal if they have the same authority or the same normalized name.
impl PartialEq for Projection {
    fn eq(&self, other: &Self) -> bool {
        match (&self.authority, &other.authority) {
            (Some(a), Some(b)) if a == b => true,
            _ => self.normalized_name == other.normalized_name,
        }
    }
}

/// Canonical token for a projection name. Names outside of the alias table are returned normalized.
pub fn normalized_projection_name(name: &str) -> String {
    let normalized = normalize_name(name);
    match PROJECTION_ALIASES.get(normalized.as_str()) {
        Some(canonical) => canonical.to_string(),
        None => normalized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spellings_share_normalized_name() {
        assert_eq!(
            Projection::new("Mercator_Auxiliary_Sphere").normalized_name(),
            names::POPULAR_VISUALISATION_PSEUDO_MERCATOR
        );
        assert_eq!(
            Projection::new("Popular Visualisation Pseudo Mercator"),
            Projection::new("Web_Mercator")
        );
        assert_eq!(
            Projection::new("Lambert_Conformal_Conic").normalized_name(),
            names::LAMBERT_CONIC_CONFORMAL_2SP
        );
        assert_ne!(Projection::new("Mercator_1SP"), Projection::new("Mercator_2SP"));
    }

    #[test]
    fn unknown_names_are_normalized() {
        assert_eq!(Projection::new("  My  Fancy-Projection ").normalized_name(), "my_fancy_projection");
    }

    #[test]
    fn authority_equality() {
        let a = Projection::new("a").with_authority(Authority::epsg(9807));
        let b = Projection::new("b").with_authority(Authority::epsg(9807));
        assert_eq!(a, b);
        assert!(!a.equals_exact(&b));
    }
}
