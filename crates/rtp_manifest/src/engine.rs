use serde::{Deserialize, Serialize};
use std::fmt;

/// Engine generation a game (and an RTP) belongs to.
///
/// Serialized as the release year, which is also how RTP installers name
/// their registry keys (`RPG2000`, `RPG2003`).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineFamily {
    #[serde(rename = "2000")]
    Rpg2000,
    #[serde(rename = "2003")]
    Rpg2003,
}

impl EngineFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineFamily::Rpg2000 => "2000",
            EngineFamily::Rpg2003 => "2003",
        }
    }
}

impl fmt::Display for EngineFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concrete engine revision of the running game.
///
/// The `E` revisions are the "major update" builds (RPG2000 Value! / 1.50+,
/// RPG2003 1.10+).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EngineVersion {
    Rpg2k,
    Rpg2kE,
    Rpg2k3,
    #[default]
    Rpg2k3E,
}

impl EngineVersion {
    pub fn family(&self) -> EngineFamily {
        match self {
            EngineVersion::Rpg2k | EngineVersion::Rpg2kE => EngineFamily::Rpg2000,
            EngineVersion::Rpg2k3 | EngineVersion::Rpg2k3E => EngineFamily::Rpg2003,
        }
    }

    pub fn is_rpg2k(&self) -> bool {
        self.family() == EngineFamily::Rpg2000
    }

    /// True for every 2003 revision, including the major update.
    pub fn is_rpg2k3(&self) -> bool {
        self.family() == EngineFamily::Rpg2003
    }

    pub fn is_rpg2k3e(&self) -> bool {
        *self == EngineVersion::Rpg2k3E
    }

    pub fn is_major_updated(&self) -> bool {
        matches!(self, EngineVersion::Rpg2kE | EngineVersion::Rpg2k3E)
    }

    /// Pick the revision for `family` given the result of the engine-revision heuristic.
    pub fn from_family(family: EngineFamily, major_updated: bool) -> Self {
        match (family, major_updated) {
            (EngineFamily::Rpg2000, false) => EngineVersion::Rpg2k,
            (EngineFamily::Rpg2000, true) => EngineVersion::Rpg2kE,
            (EngineFamily::Rpg2003, false) => EngineVersion::Rpg2k3,
            (EngineFamily::Rpg2003, true) => EngineVersion::Rpg2k3E,
        }
    }

    /// Version string used in RTP directory and registry names (`"2000"`/`"2003"`).
    pub fn as_str(&self) -> &'static str {
        self.family().as_str()
    }
}

impl fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_predicates() {
        assert!(EngineVersion::Rpg2k.is_rpg2k());
        assert!(EngineVersion::Rpg2kE.is_rpg2k());
        assert!(!EngineVersion::Rpg2kE.is_rpg2k3());
        assert!(EngineVersion::Rpg2k3.is_rpg2k3());
        assert!(EngineVersion::Rpg2k3E.is_rpg2k3());
        assert!(EngineVersion::Rpg2k3E.is_rpg2k3e());
        assert!(!EngineVersion::Rpg2k3.is_rpg2k3e());
    }

    #[test]
    fn test_from_family() {
        assert_eq!(
            EngineVersion::from_family(EngineFamily::Rpg2000, true),
            EngineVersion::Rpg2kE
        );
        assert_eq!(
            EngineVersion::from_family(EngineFamily::Rpg2003, false),
            EngineVersion::Rpg2k3
        );
    }

    #[test]
    fn test_family_serialization() {
        let json = serde_json::to_string(&EngineFamily::Rpg2003).unwrap();
        assert_eq!(json, r#""2003""#);
        assert_eq!(EngineVersion::Rpg2kE.to_string(), "2000");
    }
}
