use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Identity of an entity in an external registry, e.g. `EPSG:4326`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Authority {
    name: String,
    code: String,
}

impl Authority {
    /// Creates a new authority reference.
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }

    /// Shortcut for an `EPSG` authority with a numeric code.
    pub fn epsg(code: i32) -> Self {
        Self::new("EPSG", code.to_string())
    }

    /// Namespace of the authority (`EPSG`, `ESRI`, ...).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Code of the entity in the namespace.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Code parsed as an integer, if it is one.
    pub fn id(&self) -> Option<i32> {
        self.code.trim().parse().ok()
    }
}

impl Display for Authority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.name, self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_id() {
        let authority = Authority::new("EPSG", "4326");
        assert_eq!(authority.to_string(), "EPSG:4326");
        assert_eq!(authority.id(), Some(4326));
        assert_eq!(Authority::new("ESRI", "abc").id(), None);
        assert_eq!(Authority::epsg(3857), Authority::new("EPSG", "3857"));
    }
}
