//! RTP manifest tables.
//!
//! A manifest lists, for one engine generation, every asset shipped by the known
//! RTP releases. Each entry is one logical asset: a category directory plus one
//! file name (without extension) per release. An empty name means the release
//! does not ship that asset.
//!
//! # JSON format
//!
//! ```json
//! {
//!   "manifests": [
//!     {
//!       "engine": "2000",
//!       "variants": ["rpg2000-official-japanese", "rpg2000-official-english"],
//!       "entries": [
//!         { "dir": "music", "names": ["machi1", "town1"] },
//!         { "dir": "chipset", "names": ["basis", ""] }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! The same layout is accepted as TOML (`[[manifests]]` / `[[manifests.entries]]`).

use crate::engine::EngineFamily;
use crate::error::{Error, Result};
use crate::variant::RtpVariant;
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One asset row of a manifest.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct ManifestEntry {
    /// Category directory, e.g. `music` or `charset`.
    pub dir: String,
    /// One name per variant column; empty when the variant lacks the asset.
    pub names: Vec<String>,
}

impl ManifestEntry {
    fn name_at(&self, column: usize) -> Option<&str> {
        self.names
            .get(column)
            .map(String::as_str)
            .filter(|name| !name.is_empty())
    }
}

/// The asset table of one engine generation.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct RtpManifest {
    pub engine: EngineFamily,
    /// Column order of [`ManifestEntry::names`].
    pub variants: Vec<RtpVariant>,
    #[serde(default)]
    pub entries: Vec<ManifestEntry>,
}

impl RtpManifest {
    fn column_of(&self, variant: RtpVariant) -> Option<usize> {
        self.variants.iter().position(|v| *v == variant)
    }

    /// Every `(dir, name)` pair shipped by `variant`.
    pub fn assets_of(&self, variant: RtpVariant) -> Vec<(&str, &str)> {
        let Some(column) = self.column_of(variant) else {
            return Vec::new();
        };
        self.entries
            .iter()
            .filter_map(|entry| entry.name_at(column).map(|name| (entry.dir.as_str(), name)))
            .collect()
    }

    fn validate(&self) -> Result<()> {
        for entry in &self.entries {
            if entry.names.len() != self.variants.len() {
                return Err(Error::ColumnMismatch {
                    dir: entry.dir.clone(),
                    expected: self.variants.len(),
                    found: entry.names.len(),
                });
            }
        }
        Ok(())
    }
}

/// Outcome of translating an asset name from one RTP release to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RtpTranslation {
    /// The source release does not ship an asset with this name.
    NotInSource,
    /// The asset belongs to the source release but the target release has no equivalent.
    NoEquivalent,
    /// Name of the equivalent asset in the target release.
    Name(String),
}

impl RtpTranslation {
    /// Whether the asset was recognised as part of the source release.
    pub fn is_rtp_asset(&self) -> bool {
        !matches!(self, RtpTranslation::NotInSource)
    }
}

#[derive(Deserialize)]
struct ManifestFile {
    manifests: Vec<RtpManifest>,
}

/// All known manifests, indexed for case-insensitive `(dir, name)` lookup.
#[derive(Debug, Default, Clone)]
pub struct ManifestSet {
    manifests: Vec<RtpManifest>,
    /// `dir/name` (lowercased) -> `(manifest index, entry index)` of every row
    /// where some column carries that name.
    index: HashMap<String, Vec<(usize, usize)>>,
}

impl ManifestSet {
    /// Validate and index a list of manifests.
    pub fn new(manifests: Vec<RtpManifest>) -> Result<Self> {
        let mut index: HashMap<String, Vec<(usize, usize)>> = HashMap::new();
        for (m, manifest) in manifests.iter().enumerate() {
            manifest.validate()?;
            for (e, entry) in manifest.entries.iter().enumerate() {
                for column in 0..manifest.variants.len() {
                    let Some(name) = entry.name_at(column) else {
                        continue;
                    };
                    let refs = index.entry(lookup_key(&entry.dir, name)).or_default();
                    if !refs.contains(&(m, e)) {
                        refs.push((m, e));
                    }
                }
            }
        }
        Ok(Self { manifests, index })
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        let file: ManifestFile = serde_json::from_str(contents)?;
        Self::new(file.manifests)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: ManifestFile = toml::from_str(contents)?;
        Self::new(file.manifests)
    }

    /// Load a manifest file, choosing the parser by extension (`.json` or `.toml`).
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_std_path())?;
        match path.extension().map(str::to_ascii_lowercase).as_deref() {
            Some("json") => Self::from_json_str(&contents),
            Some("toml") => Self::from_toml_str(&contents),
            _ => Err(Error::UnknownFormat(path.to_path_buf())),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }

    pub fn manifests(&self) -> &[RtpManifest] {
        &self.manifests
    }

    /// Manifests describing releases of `family`.
    pub fn manifests_for(&self, family: EngineFamily) -> impl Iterator<Item = &RtpManifest> {
        self.manifests.iter().filter(move |m| m.engine == family)
    }

    /// Every release of `family` that ships `dir/name`, in column order.
    pub fn lookup_any(&self, dir: &str, name: &str, family: EngineFamily) -> Vec<RtpVariant> {
        let mut variants = Vec::new();
        for (manifest, entry) in self.rows(dir, name) {
            if manifest.engine != family {
                continue;
            }
            for (column, variant) in manifest.variants.iter().enumerate() {
                let matches = entry
                    .name_at(column)
                    .is_some_and(|candidate| same_name(candidate, name));
                if matches && !variants.contains(variant) {
                    variants.push(*variant);
                }
            }
        }
        variants
    }

    /// Translate `dir/name` as shipped by `from` into the name used by `to`.
    pub fn lookup_rtp_to_rtp(
        &self,
        dir: &str,
        name: &str,
        from: RtpVariant,
        to: RtpVariant,
    ) -> RtpTranslation {
        let mut translation = RtpTranslation::NotInSource;
        for (manifest, entry) in self.rows(dir, name) {
            let Some(from_column) = manifest.column_of(from) else {
                continue;
            };
            let in_source = entry
                .name_at(from_column)
                .is_some_and(|candidate| same_name(candidate, name));
            if !in_source {
                continue;
            }
            match manifest
                .column_of(to)
                .and_then(|to_column| entry.name_at(to_column))
            {
                Some(target) => return RtpTranslation::Name(target.to_string()),
                None => translation = RtpTranslation::NoEquivalent,
            }
        }
        translation
    }

    fn rows<'a>(
        &'a self,
        dir: &str,
        name: &str,
    ) -> impl Iterator<Item = (&'a RtpManifest, &'a ManifestEntry)> + 'a {
        self.index
            .get(&lookup_key(dir, name))
            .into_iter()
            .flatten()
            .map(|&(m, e)| (&self.manifests[m], &self.manifests[m].entries[e]))
    }
}

fn lookup_key(dir: &str, name: &str) -> String {
    format!("{}/{}", dir.to_lowercase(), name.to_lowercase())
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
