use serde::{Deserialize, Serialize};

/// Named coordinate axis with a direction label (`north`, `east`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Axis {
    name: String,
    direction: String,
}

impl Axis {
    /// Creates a new axis.
    pub fn new(name: impl Into<String>, direction: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: direction.into(),
        }
    }

    /// Name of the axis.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direction label as given in the definition.
    pub fn direction(&self) -> &str {
        &self.direction
    }
}

impl PartialEq for Axis {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
            && self.direction.eq_ignore_ascii_case(&other.direction)
    }
}

/// A coordinate system carries either no axes or exactly two of them.
pub(crate) fn normalize_axes(mut axes: Vec<Axis>, owner: &str) -> Vec<Axis> {
    match axes.len() {
        0 | 2 => axes,
        1 => {
            log::warn!("Coordinate system {owner} declares a single axis, ignoring it");
            Vec::new()
        }
        count => {
            log::warn!("Coordinate system {owner} declares {count} axes, only the first two are used");
            axes.truncate(2);
            axes
        }
    }
}
