use rtp_manifest::EngineVersion;

/// Settings of one [`AssetFinder`](crate::AssetFinder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinderConfig {
    /// Engine the game was made with. Selects the RTP family and discovery paths.
    pub engine: EngineVersion,
    /// Decoded form of the directory separator byte used in game data.
    pub escape_symbol: String,
    /// Name of the translation overlay directory below the project root.
    pub translation_dir: String,
    /// Legacy code page of the game data, when known.
    pub codepage: Option<u32>,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            engine: EngineVersion::default(),
            escape_symbol: "\\".to_string(),
            translation_dir: "Language".to_string(),
            codepage: None,
        }
    }
}

impl FinderConfig {
    pub fn new(engine: EngineVersion) -> Self {
        Self {
            engine,
            ..Self::default()
        }
    }

    /// Set the code page and the escape symbol matching it.
    pub fn with_codepage(mut self, codepage: u32) -> Self {
        self.codepage = Some(codepage);
        self.escape_symbol = escape_symbol_for_codepage(codepage).to_string();
        self
    }

    /// Shift-JIS game data.
    pub fn is_cp932(&self) -> bool {
        self.codepage == Some(932)
    }
}

/// The character the `\` byte decodes to in `codepage`.
pub fn escape_symbol_for_codepage(codepage: u32) -> &'static str {
    match codepage {
        932 => "¥",
        949 => "₩",
        _ => "\\",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = FinderConfig::default();
        assert_eq!(config.engine, EngineVersion::Rpg2k3E);
        assert_eq!(config.escape_symbol, "\\");
        assert_eq!(config.translation_dir, "Language");
        assert!(!config.is_cp932());
    }

    #[test]
    fn test_codepage_selects_escape_symbol() {
        let config = FinderConfig::new(EngineVersion::Rpg2k).with_codepage(932);
        assert_eq!(config.escape_symbol, "¥");
        assert!(config.is_cp932());

        assert_eq!(escape_symbol_for_codepage(949), "₩");
        assert_eq!(escape_symbol_for_codepage(1252), "\\");
    }
}
