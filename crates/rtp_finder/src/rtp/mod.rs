//! RTP detection and fallback lookup.
//!
//! A game never says which RTP release it was made with. [`RtpState`] infers
//! it from the assets the game requests: every asset that belongs to some RTP
//! release narrows the set of releases the game can be using. Once narrowed,
//! requests for RTP assets are translated into the naming of whatever release
//! is actually installed, so a game made with the Japanese RTP still finds its
//! `machi1` music in an English install where the file is called `town1`.
//!
//! Installed RTP directories are scored against the known releases when they
//! are added. Only the best scoring releases per directory are kept.
//!
//! The resolver also tracks package consistency: a game that claims to ship
//! without the RTP but uses it, or a game that needs an RTP asset that is
//! nowhere to be found, produces a [`PackageWarning`]. At most one such warning
//! is produced per session.

mod oracle;
mod warning;

pub use oracle::{RtpHit, RtpOracle};
pub use warning::PackageWarning;

use crate::directory_index::{DirectoryIndex, ScanMode};
use crate::lookup::{find_in_tree, is_audio_dir};
use camino::{Utf8Path, Utf8PathBuf};
use rtp_manifest::{EngineFamily, EngineVersion, RtpTranslation, RtpVariant};
use std::sync::Arc;

/// Supplies candidate RTP directories for an engine version.
pub trait RtpPathSource {
    fn candidate_paths(&self, engine: EngineVersion) -> Vec<Utf8PathBuf>;
}

impl RtpPathSource for [Utf8PathBuf] {
    fn candidate_paths(&self, _engine: EngineVersion) -> Vec<Utf8PathBuf> {
        self.to_vec()
    }
}

impl RtpPathSource for Vec<Utf8PathBuf> {
    fn candidate_paths(&self, engine: EngineVersion) -> Vec<Utf8PathBuf> {
        self.as_slice().candidate_paths(engine)
    }
}

/// An RTP release detected in an installed directory.
#[derive(Debug, Clone)]
pub struct RtpHitInfo {
    pub variant: RtpVariant,
    pub name: String,
    pub tree: Arc<DirectoryIndex>,
    pub hits: usize,
    pub max: usize,
}

impl RtpHitInfo {
    pub fn ratio(&self) -> f32 {
        if self.max == 0 {
            return 0.0;
        }
        self.hits as f32 / self.max as f32
    }
}

/// Outcome of an RTP lookup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RtpLookup {
    pub path: Option<Utf8PathBuf>,
    /// Whether the requested asset belongs to the game's RTP.
    pub is_rtp_asset: bool,
}

/// RTP search paths, detected releases and the inferred release of the game.
#[derive(Debug, Clone)]
pub struct RtpState {
    disabled: bool,
    game_claims_no_rtp_needed: bool,
    warning_already_shown: bool,
    search_paths: Vec<Arc<DirectoryIndex>>,
    detected_rtp: Vec<RtpHitInfo>,
    game_rtp_candidates: Vec<RtpVariant>,
}

impl Default for RtpState {
    fn default() -> Self {
        Self {
            disabled: true,
            game_claims_no_rtp_needed: false,
            warning_already_shown: false,
            search_paths: Vec::new(),
            detected_rtp: Vec::new(),
            game_rtp_candidates: Vec::new(),
        }
    }
}

impl RtpState {
    /// Create an empty state.
    ///
    /// With `disabled` set, RTP lookups are skipped entirely. A game that claims
    /// not to need the RTP only produces warnings when it uses it anyway.
    pub fn new(disabled: bool, game_claims_no_rtp_needed: bool) -> Self {
        Self {
            disabled,
            game_claims_no_rtp_needed,
            ..Self::default()
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn game_claims_no_rtp_needed(&self) -> bool {
        self.game_claims_no_rtp_needed
    }

    pub fn warning_already_shown(&self) -> bool {
        self.warning_already_shown
    }

    /// Every valid RTP directory, in the order it was added.
    pub fn search_paths(&self) -> &[Arc<DirectoryIndex>] {
        &self.search_paths
    }

    pub fn detected_rtp(&self) -> &[RtpHitInfo] {
        &self.detected_rtp
    }

    /// RTP releases the game may be using. Empty until an RTP asset was requested.
    pub fn game_rtp_candidates(&self) -> &[RtpVariant] {
        &self.game_rtp_candidates
    }

    /// The release of the game, once only one candidate is left.
    pub fn resolved_variant(&self) -> Option<RtpVariant> {
        match self.game_rtp_candidates.as_slice() {
            [variant] => Some(*variant),
            _ => None,
        }
    }

    /// Index `path` and add it as an RTP search path.
    ///
    /// Invalid paths are logged and skipped.
    pub fn add_rtp_path(&mut self, path: &Utf8Path, oracle: &dyn RtpOracle, family: EngineFamily) {
        match DirectoryIndex::build(path, ScanMode::Recursive) {
            Ok(tree) => self.add_rtp_tree(Arc::new(tree), oracle, family),
            Err(e) => tracing::debug!("RTP path {} is invalid, not adding ({})", path, e),
        }
    }

    /// Add an already indexed RTP directory and score it against the known releases.
    pub fn add_rtp_tree(
        &mut self,
        tree: Arc<DirectoryIndex>,
        oracle: &dyn RtpOracle,
        family: EngineFamily,
    ) {
        tracing::debug!("Adding {} to RTP path", tree.base_path());
        self.search_paths.push(Arc::clone(&tree));

        let hits = oracle.detect(&tree, family);
        if hits.is_empty() {
            tracing::debug!("The folder does not contain a known RTP!");
            return;
        }

        // Keep every release scoring at least as well as the best one seen so far
        let mut best = 0.0_f32;
        for hit in hits {
            let ratio = hit.ratio();
            if ratio < best {
                continue;
            }
            best = ratio;
            tracing::debug!("RTP is \"{}\" ({}/{})", hit.name, hit.hits, hit.max);
            self.detected_rtp.push(RtpHitInfo {
                variant: hit.variant,
                name: hit.name,
                tree: Arc::clone(&tree),
                hits: hit.hits,
                max: hit.max,
            });
        }
    }

    /// Look up `dir/name` in the installed RTPs.
    ///
    /// `dir` and `name` are expected to be normalized already. The request first
    /// narrows the candidate releases of the game, then the asset is searched
    /// under its translated name in every detected release, and finally under
    /// its own name in every search path.
    pub fn lookup(
        &mut self,
        oracle: &dyn RtpOracle,
        family: EngineFamily,
        dir: &str,
        name: &str,
        extensions: &[&str],
        escape_symbol: &str,
    ) -> RtpLookup {
        if self.game_rtp_candidates.len() != 1 {
            self.narrow(oracle.lookup_any_to_rtp(dir, name, family));
        }

        let mut is_rtp_asset = self
            .game_rtp_candidates
            .iter()
            .any(|&v| oracle.lookup_rtp_to_rtp(dir, name, v, v).is_rtp_asset());

        for hit in &self.detected_rtp {
            for &game_rtp in &self.game_rtp_candidates {
                match oracle.lookup_rtp_to_rtp(dir, name, game_rtp, hit.variant) {
                    RtpTranslation::Name(translated) => {
                        is_rtp_asset = true;
                        if let Some(path) =
                            find_in_tree(&hit.tree, dir, &translated, extensions, escape_symbol)
                        {
                            return RtpLookup {
                                path: Some(path),
                                is_rtp_asset,
                            };
                        }
                    }
                    RtpTranslation::NoEquivalent => is_rtp_asset = true,
                    RtpTranslation::NotInSource => {}
                }
            }
        }

        RtpLookup {
            path: self.normal_search(dir, name, extensions, escape_symbol),
            is_rtp_asset,
        }
    }

    /// Search every RTP directory for `dir/name` without any name translation.
    pub fn normal_search(
        &self,
        dir: &str,
        name: &str,
        extensions: &[&str],
        escape_symbol: &str,
    ) -> Option<Utf8PathBuf> {
        self.search_paths
            .iter()
            .find_map(|tree| find_in_tree(tree, dir, name, extensions, escape_symbol))
    }

    /// Decide whether a finished lookup contradicts how the game is packaged.
    ///
    /// Returns the warning to show, at most once per session. Audio assets never
    /// warn since games often leave them out on purpose.
    pub fn check_consistency(
        &mut self,
        dir: &str,
        name: &str,
        lookup: &RtpLookup,
        engine: EngineFamily,
    ) -> Option<PackageWarning> {
        if !lookup.is_rtp_asset || self.warning_already_shown || is_audio_dir(dir) {
            return None;
        }

        let warning = match (&lookup.path, self.game_claims_no_rtp_needed) {
            (Some(_), true) => PackageWarning::UndeclaredRtpUsage {
                dir: dir.to_string(),
                name: name.to_string(),
            },
            (None, false) => PackageWarning::MissingRtpAsset {
                dir: dir.to_string(),
                name: name.to_string(),
                engine,
                rtp_installed: !self.search_paths.is_empty(),
            },
            _ => return None,
        };

        self.warning_already_shown = true;
        Some(warning)
    }

    /// Intersect the game's candidate releases with the releases shipping the
    /// current request.
    fn narrow(&mut self, mut candidates: Vec<RtpVariant>) {
        candidates.retain(|v| !v.is_addon());
        if candidates.is_empty() {
            return;
        }

        if self.game_rtp_candidates.is_empty() {
            let mut unique = Vec::with_capacity(candidates.len());
            for variant in candidates {
                if !unique.contains(&variant) {
                    unique.push(variant);
                }
            }
            self.game_rtp_candidates = unique;
        } else {
            let narrowed: Vec<RtpVariant> = self
                .game_rtp_candidates
                .iter()
                .copied()
                .filter(|v| candidates.contains(v))
                .collect();
            if narrowed.is_empty() {
                tracing::debug!(
                    "Asset matches none of the candidate RTPs, keeping {} candidates",
                    self.game_rtp_candidates.len()
                );
                return;
            }
            self.game_rtp_candidates = narrowed;
        }

        if let Some(variant) = self.resolved_variant() {
            tracing::debug!("Game uses RTP \"{}\"", variant);
        }
    }
}
