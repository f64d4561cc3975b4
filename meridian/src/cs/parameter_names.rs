//! Canonical projection parameter names.
//!
//! WKT definitions from different sources use different spellings for the same parameter
//! (`latitude_of_origin`, `latitude_of_natural_origin`, ...). [`ParameterName::get`] maps all known spellings to one
//! canonical key. Names outside of the known set are normalized and registered as their own canonical key, so every
//! name can be used for lookups.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::RwLock;

use crate::cs::normalize_name;

/// Longitude of the projection origin.
pub const CENTRAL_MERIDIAN: &str = "central_meridian";
/// Latitude of the projection origin.
pub const LATITUDE_OF_ORIGIN: &str = "latitude_of_origin";
/// First standard parallel.
pub const STANDARD_PARALLEL_1: &str = "standard_parallel_1";
/// Second standard parallel.
pub const STANDARD_PARALLEL_2: &str = "standard_parallel_2";
/// Scale factor at the origin.
pub const SCALE_FACTOR: &str = "scale_factor";
/// False easting.
pub const FALSE_EASTING: &str = "false_easting";
/// False northing.
pub const FALSE_NORTHING: &str = "false_northing";
/// Azimuth of the initial line.
pub const AZIMUTH: &str = "azimuth";
/// Angle from the rectified to the skew grid.
pub const RECTIFIED_GRID_ANGLE: &str = "rectified_grid_angle";
/// Longitude of the point defining the initial line.
pub const LONGITUDE_OF_POINT_1: &str = "longitude_of_point_1";
/// Latitude of the point defining the initial line.
pub const LATITUDE_OF_POINT_1: &str = "latitude_of_point_1";

lazy_static! {
    static ref KNOWN: HashMap<&'static str, ParameterName> = {
        let known: [(&'static str, &[&'static str]); 11] = [
            (
                CENTRAL_MERIDIAN,
                &[
                    "longitude_of_center",
                    "longitude_of_centre",
                    "longitude_of_natural_origin",
                    "longitude_of_origin",
                    "longitude_of_false_origin",
                    "longitude_of_projection_centre",
                ],
            ),
            (
                LATITUDE_OF_ORIGIN,
                &[
                    "latitude_of_natural_origin",
                    "latitude_of_false_origin",
                    "latitude_of_center",
                    "latitude_of_centre",
                    "latitude_of_projection_centre",
                ],
            ),
            (
                STANDARD_PARALLEL_1,
                &["latitude_of_1st_standard_parallel", "standard_parallel1"],
            ),
            (
                STANDARD_PARALLEL_2,
                &["latitude_of_2nd_standard_parallel", "standard_parallel2"],
            ),
            (
                SCALE_FACTOR,
                &[
                    "scale_factor_at_natural_origin",
                    "scale_factor_on_initial_line",
                    "scale_factor_at_projection_centre",
                ],
            ),
            (
                FALSE_EASTING,
                &["easting_at_false_origin", "easting_at_projection_centre"],
            ),
            (
                FALSE_NORTHING,
                &["northing_at_false_origin", "northing_at_projection_centre"],
            ),
            (AZIMUTH, &["azimuth_of_initial_line"]),
            (
                RECTIFIED_GRID_ANGLE,
                &["angle_from_rectified_to_skew_grid"],
            ),
            (LONGITUDE_OF_POINT_1, &["longitude_of_1st_point"]),
            (LATITUDE_OF_POINT_1, &["latitude_of_1st_point"]),
        ];

        let mut map = HashMap::new();
        for (canonical, aliases) in known {
            let name = ParameterName(Arc::from(canonical));
            map.insert(canonical, name.clone());
            for alias in aliases {
                map.insert(*alias, name.clone());
            }
        }

        map
    };
    static ref LEARNED: RwLock<HashMap<String, ParameterName>> = RwLock::new(HashMap::new());
}

/// Canonical (normalized, lower-case) projection parameter name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParameterName(Arc<str>);

impl ParameterName {
    /// Returns the canonical name for the given spelling, registering it if it is not known yet.
    pub fn get(name: &str) -> Self {
        let key = normalize_name(name);
        if let Some(known) = KNOWN.get(key.as_str()) {
            return known.clone();
        }

        if let Some(learned) = LEARNED.read().get(&key) {
            return learned.clone();
        }

        let mut learned = LEARNED.write();
        learned
            .entry(key)
            .or_insert_with_key(|key| {
                log::debug!("Registering projection parameter name '{key}'");
                ParameterName(Arc::from(key.as_str()))
            })
            .clone()
    }

    /// Canonical key for the given spelling without registering it.
    pub fn canonical_key(name: &str) -> String {
        let key = normalize_name(name);
        match KNOWN.get(key.as_str()) {
            Some(known) => known.0.to_string(),
            None => key,
        }
    }

    /// Canonical name as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the name is one of the built-in canonical names.
    pub fn is_known(&self) -> bool {
        KNOWN.contains_key(self.as_str())
    }
}

impl Display for ParameterName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ParameterName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ParameterName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
