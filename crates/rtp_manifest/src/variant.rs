use crate::engine::EngineFamily;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A specific release of a runtime package.
///
/// Releases of the same engine generation ship mostly the same assets under
/// localized file names, so a game's release can only be told apart by which
/// names it asks for.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum RtpVariant {
    Rpg2000OfficialJapanese,
    Rpg2000OfficialEnglish,
    Rpg2000DonMiguelEnglish,
    Rpg2000DonMiguelAddon,
    Rpg2000Korean,
    Rpg2000OfficialTraditionalChinese,
    Rpg2003OfficialJapanese,
    Rpg2003OfficialEnglish,
    Rpg2003RpgUniverseSpanishPortuguese,
    Rpg2003OfficialRussian,
    Rpg2003RpgAdvocateEnglish,
    Rpg2003Korean,
    Rpg2003OfficialTraditionalChinese,
}

impl RtpVariant {
    pub const ALL: [RtpVariant; 13] = [
        RtpVariant::Rpg2000OfficialJapanese,
        RtpVariant::Rpg2000OfficialEnglish,
        RtpVariant::Rpg2000DonMiguelEnglish,
        RtpVariant::Rpg2000DonMiguelAddon,
        RtpVariant::Rpg2000Korean,
        RtpVariant::Rpg2000OfficialTraditionalChinese,
        RtpVariant::Rpg2003OfficialJapanese,
        RtpVariant::Rpg2003OfficialEnglish,
        RtpVariant::Rpg2003RpgUniverseSpanishPortuguese,
        RtpVariant::Rpg2003OfficialRussian,
        RtpVariant::Rpg2003RpgAdvocateEnglish,
        RtpVariant::Rpg2003Korean,
        RtpVariant::Rpg2003OfficialTraditionalChinese,
    ];

    pub fn family(&self) -> EngineFamily {
        match self {
            RtpVariant::Rpg2000OfficialJapanese
            | RtpVariant::Rpg2000OfficialEnglish
            | RtpVariant::Rpg2000DonMiguelEnglish
            | RtpVariant::Rpg2000DonMiguelAddon
            | RtpVariant::Rpg2000Korean
            | RtpVariant::Rpg2000OfficialTraditionalChinese => EngineFamily::Rpg2000,
            _ => EngineFamily::Rpg2003,
        }
    }

    /// The Don Miguel add-on only extends another package; it is never the
    /// package a game was built against.
    pub fn is_addon(&self) -> bool {
        *self == RtpVariant::Rpg2000DonMiguelAddon
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            RtpVariant::Rpg2000OfficialJapanese => "Official Japanese",
            RtpVariant::Rpg2000OfficialEnglish => "Official English",
            RtpVariant::Rpg2000DonMiguelEnglish => "Don Miguel English Translation",
            RtpVariant::Rpg2000DonMiguelAddon => "Don Miguel Extras Addon",
            RtpVariant::Rpg2000Korean => "Korean Translation",
            RtpVariant::Rpg2000OfficialTraditionalChinese => "Official Traditional Chinese",
            RtpVariant::Rpg2003OfficialJapanese => "Official Japanese",
            RtpVariant::Rpg2003OfficialEnglish => "Official English",
            RtpVariant::Rpg2003RpgUniverseSpanishPortuguese => {
                "RPG Universe Spanish/Portuguese Translation"
            }
            RtpVariant::Rpg2003OfficialRussian => "Official Russian",
            RtpVariant::Rpg2003RpgAdvocateEnglish => "RPG Advocate English Translation",
            RtpVariant::Rpg2003Korean => "Korean Translation",
            RtpVariant::Rpg2003OfficialTraditionalChinese => "Official Traditional Chinese",
        }
    }
}

impl fmt::Display for RtpVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name(), self.family())
    }
}
