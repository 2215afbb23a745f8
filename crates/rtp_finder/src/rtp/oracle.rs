//! The seam between the resolver and the RTP asset tables.

use crate::directory_index::DirectoryIndex;
use crate::lookup::{extensions_for_dir, find_in_tree};
use rtp_manifest::{EngineFamily, ManifestSet, RtpTranslation, RtpVariant};

/// Score of one directory against one known RTP release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtpHit {
    pub variant: RtpVariant,
    /// Human-readable name of the release.
    pub name: String,
    /// Number of the release's assets found in the directory.
    pub hits: usize,
    /// Number of assets the release ships.
    pub max: usize,
}

impl RtpHit {
    pub fn ratio(&self) -> f32 {
        if self.max == 0 {
            return 0.0;
        }
        self.hits as f32 / self.max as f32
    }
}

/// Answers which RTP releases contain an asset and how it is named in each.
pub trait RtpOracle: Send + Sync {
    /// Every release of `family` that ships `dir/name`.
    fn lookup_any_to_rtp(&self, dir: &str, name: &str, family: EngineFamily) -> Vec<RtpVariant>;

    /// Name of `dir/name` of release `from` in release `to`.
    fn lookup_rtp_to_rtp(
        &self,
        dir: &str,
        name: &str,
        from: RtpVariant,
        to: RtpVariant,
    ) -> RtpTranslation;

    /// Score `tree` against every known release of `family`. Releases without a
    /// single matching asset are omitted.
    fn detect(&self, tree: &DirectoryIndex, family: EngineFamily) -> Vec<RtpHit>;
}

impl RtpOracle for ManifestSet {
    fn lookup_any_to_rtp(&self, dir: &str, name: &str, family: EngineFamily) -> Vec<RtpVariant> {
        self.lookup_any(dir, name, family)
    }

    fn lookup_rtp_to_rtp(
        &self,
        dir: &str,
        name: &str,
        from: RtpVariant,
        to: RtpVariant,
    ) -> RtpTranslation {
        ManifestSet::lookup_rtp_to_rtp(self, dir, name, from, to)
    }

    fn detect(&self, tree: &DirectoryIndex, family: EngineFamily) -> Vec<RtpHit> {
        let mut hits = Vec::new();
        for manifest in self.manifests_for(family) {
            for &variant in &manifest.variants {
                let assets = manifest.assets_of(variant);
                let found = assets
                    .iter()
                    .filter(|(dir, name)| {
                        find_in_tree(tree, dir, name, extensions_for_dir(dir), "").is_some()
                    })
                    .count();
                if found == 0 {
                    continue;
                }
                hits.push(RtpHit {
                    variant,
                    name: variant.display_name().to_string(),
                    hits: found,
                    max: assets.len(),
                });
            }
        }
        hits
    }
}
