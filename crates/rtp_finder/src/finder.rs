//! The resolver context.
//!
//! An [`AssetFinder`] owns everything a running game needs to turn a logical
//! asset name into a file: the active project index, the optional translation
//! overlay, the RTP state and the oracle answering RTP questions. Lookups go
//! through the layers in order:
//!
//! 1. the active translation below [`FinderConfig::translation_dir`] (images only),
//! 2. the project itself,
//! 3. the installed RTPs (see [`RtpState::lookup`]).
//!
//! # Example
//!
//! ```ignore
//! use rtp_finder::{AssetCategory, AssetFinder, DirectoryIndex, FinderConfig, ScanMode};
//! use std::sync::Arc;
//!
//! let mut finder = AssetFinder::new(FinderConfig::default(), manifests)
//!     .with_warning_handler(|warning| eprintln!("{warning}"));
//! finder.init_search_paths(false, false, &rtp_paths);
//! finder.set_active_project(Arc::new(DirectoryIndex::build(game_dir, ScanMode::Recursive)?));
//!
//! let town = finder.find(AssetCategory::Music, "Town");
//! ```

use crate::config::FinderConfig;
use crate::directory_index::DirectoryIndex;
use crate::error::Result;
use crate::lookup::{find_default, find_in_tree, AssetCategory, NO_EXTENSIONS};
use crate::path::{make_path, normalize, path_inside};
use crate::rtp::{PackageWarning, RtpOracle, RtpPathSource, RtpState};
use camino::{Utf8Path, Utf8PathBuf};
use rtp_manifest::ManifestSet;
use std::sync::Arc;

/// Callback receiving user-facing package warnings.
pub type WarningHandler = Arc<dyn Fn(&PackageWarning) + Send + Sync>;

pub struct AssetFinder {
    config: FinderConfig,
    oracle: Box<dyn RtpOracle>,
    project: Option<Arc<DirectoryIndex>>,
    translation_id: Option<String>,
    rtp: RtpState,
    warning_handler: Option<WarningHandler>,
}

impl AssetFinder {
    /// Create a finder without a project and with RTP lookups disabled.
    pub fn new(config: FinderConfig, oracle: impl RtpOracle + 'static) -> Self {
        Self {
            config,
            oracle: Box::new(oracle),
            project: None,
            translation_id: None,
            rtp: RtpState::default(),
            warning_handler: None,
        }
    }

    /// Create a finder answering RTP questions from a JSON or TOML manifest file.
    pub fn from_manifest_file(config: FinderConfig, path: &Utf8Path) -> Result<Self> {
        Ok(Self::new(config, ManifestSet::load(path)?))
    }

    /// Register a callback for package warnings.
    ///
    /// Warnings are logged either way; the callback is meant for showing them to the player.
    pub fn with_warning_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&PackageWarning) + Send + Sync + 'static,
    {
        self.warning_handler = Some(Arc::new(handler));
        self
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    pub fn rtp_state(&self) -> &RtpState {
        &self.rtp
    }

    /// Reset the RTP state and add every candidate RTP directory of `source`.
    ///
    /// With `disable_rtp` set no directory is added and RTP lookups are skipped.
    /// `game_claims_no_rtp_needed` comes from the game's own configuration.
    pub fn init_search_paths(
        &mut self,
        disable_rtp: bool,
        game_claims_no_rtp_needed: bool,
        source: &dyn RtpPathSource,
    ) {
        self.rtp = RtpState::new(disable_rtp, game_claims_no_rtp_needed);
        if disable_rtp {
            tracing::debug!("RTP support is disabled");
            return;
        }

        for path in source.candidate_paths(self.config.engine) {
            self.add_rtp_path(&path);
        }

        if self.rtp.search_paths().is_empty() {
            tracing::warn!(
                "RTP not found. This may create missing file errors. Install RTP files or check they are installed fine."
            );
        }
    }

    /// Add one RTP directory. Invalid directories are skipped.
    pub fn add_rtp_path(&mut self, path: &Utf8Path) {
        self.rtp.add_rtp_path(path, self.oracle.as_ref(), self.config.engine.family());
    }

    pub fn set_active_project(&mut self, project: Arc<DirectoryIndex>) {
        tracing::debug!("Active project: {}", project.base_path());
        self.project = Some(project);
    }

    pub fn active_project(&self) -> Option<&Arc<DirectoryIndex>> {
        self.project.as_ref()
    }

    /// Select the translation overlay consulted before the project. `None` or an
    /// empty id disables it.
    pub fn set_translation_id(&mut self, id: Option<String>) {
        self.translation_id = id.filter(|id| !id.is_empty());
    }

    pub fn translation_id(&self) -> Option<&str> {
        self.translation_id.as_deref()
    }

    /// Resolve `dir/name` with the given extensions through all layers.
    ///
    /// With `translate` set the active translation is consulted first.
    pub fn resolve(
        &mut self,
        dir: &str,
        name: &str,
        extensions: &[&str],
        translate: bool,
    ) -> Option<Utf8PathBuf> {
        let escape_symbol = self.config.escape_symbol.as_str();

        if let Some(project) = self.project.as_deref() {
            if translate {
                if let Some(found) = self.find_translated(project, dir, name, extensions) {
                    return Some(found);
                }
            }
            if let Some(found) = find_in_tree(project, dir, name, extensions, escape_symbol) {
                return Some(found);
            }
        }

        let found = if self.rtp.is_disabled() {
            None
        } else {
            let family = self.config.engine.family();
            let lookup = self.rtp.lookup(
                self.oracle.as_ref(),
                family,
                &normalize(dir),
                &normalize(name),
                extensions,
                escape_symbol,
            );
            if let Some(warning) = self.rtp.check_consistency(dir, name, &lookup, family) {
                self.emit_warning(&warning);
            }
            lookup.path
        };

        if found.is_none() {
            tracing::debug!("Cannot find: {}/{}", dir, name);
        }
        found
    }

    fn find_translated(
        &self,
        project: &DirectoryIndex,
        dir: &str,
        name: &str,
        extensions: &[&str],
    ) -> Option<Utf8PathBuf> {
        let id = self.translation_id.as_deref()?;
        let name_in_translation = make_path(&make_path(id, dir), name);
        find_in_tree(
            project,
            &self.config.translation_dir,
            &name_in_translation,
            extensions,
            &self.config.escape_symbol,
        )
    }

    /// Resolve an asset using the default extensions of its category.
    pub fn find(&mut self, category: AssetCategory<'_>, name: &str) -> Option<Utf8PathBuf> {
        self.resolve(
            category.dir(),
            name,
            category.extensions(),
            category.translatable(),
        )
    }

    pub fn find_image(&mut self, dir: &str, name: &str) -> Option<Utf8PathBuf> {
        self.find(AssetCategory::Image(dir), name)
    }

    pub fn find_music(&mut self, name: &str) -> Option<Utf8PathBuf> {
        self.find(AssetCategory::Music, name)
    }

    pub fn find_sound(&mut self, name: &str) -> Option<Utf8PathBuf> {
        self.find(AssetCategory::Sound, name)
    }

    pub fn find_font(&mut self, name: &str) -> Option<Utf8PathBuf> {
        self.find(AssetCategory::Font, name)
    }

    /// Resolve a file by its exact name below `dir`.
    pub fn find_default(&mut self, dir: &str, name: &str) -> Option<Utf8PathBuf> {
        self.resolve(dir, name, NO_EXTENSIONS, false)
    }

    /// Find a file by exact name in the active project only.
    pub fn find_default_name(&self, name: &str) -> Option<Utf8PathBuf> {
        let project = self.project.as_deref()?;
        find_default(project, name, &self.config.escape_symbol)
    }

    /// `path` relative to the active project, or unchanged when outside of it.
    pub fn path_inside_game(&self, path: &str) -> String {
        match self.project.as_deref() {
            Some(project) => path_inside(project.base_path().as_str(), path),
            None => path.to_string(),
        }
    }

    /// Clear the RTP state and release the active project.
    pub fn teardown(&mut self) {
        self.rtp = RtpState::default();
        self.project = None;
        self.translation_id = None;
    }

    fn emit_warning(&self, warning: &PackageWarning) {
        tracing::warn!("{}", warning);
        if let Some(handler) = &self.warning_handler {
            handler(warning);
        }
    }
}

impl std::fmt::Debug for AssetFinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetFinder")
            .field("config", &self.config)
            .field("project", &self.project.as_ref().map(|p| p.base_path()))
            .field("translation_id", &self.translation_id)
            .field("rtp", &self.rtp)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory_index::ScanMode;
    use std::fs;
    use tempfile::TempDir;

    fn project(files: &[&str]) -> (TempDir, Arc<DirectoryIndex>) {
        let dir = TempDir::new().unwrap();
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, b"").unwrap();
        }
        let index =
            DirectoryIndex::build(Utf8Path::from_path(dir.path()).unwrap(), ScanMode::Recursive)
                .unwrap();
        (dir, Arc::new(index))
    }

    #[test]
    fn test_translation_overlay_comes_first() {
        let (_dir, index) = project(&[
            "Picture/Title.png",
            "Language/German/Picture/Title.png",
        ]);
        let mut finder = AssetFinder::new(FinderConfig::default(), ManifestSet::default());
        finder.set_active_project(index);

        let plain = finder.find_image("Picture", "title").unwrap();
        assert!(!plain.as_str().contains("Language"));

        finder.set_translation_id(Some("German".to_string()));
        let translated = finder.find_image("Picture", "title").unwrap();
        assert!(translated.as_str().contains("Language"));

        // Only images are translated
        assert!(finder.find_music("title").is_none());
    }

    #[test]
    fn test_no_project_no_rtp() {
        let mut finder = AssetFinder::new(FinderConfig::default(), ManifestSet::default());
        assert!(finder.find_music("town").is_none());
        assert!(finder.find_default_name("RPG_RT.ldb").is_none());
        assert_eq!(finder.path_inside_game("/a/b"), "/a/b");
    }

    #[test]
    fn test_find_default_and_path_inside_game() {
        let (dir, index) = project(&["RPG_RT.ini", "Font/Gothic.ttf"]);
        let mut finder = AssetFinder::new(FinderConfig::default(), ManifestSet::default());
        finder.set_active_project(index);

        let ini = finder.find_default_name("rpg_rt.INI").unwrap();
        assert_eq!(finder.path_inside_game(ini.as_str()), "RPG_RT.ini");
        assert!(finder.find_default("Font", "gothic.ttf").is_some());
        assert!(finder.find_font("Gothic").is_some());
        assert!(finder
            .path_inside_game(dir.path().join("x").to_str().unwrap())
            .ends_with('x'));
    }

    #[test]
    fn test_missing_manifest_file() {
        let dir = TempDir::new().unwrap();
        let path = Utf8Path::from_path(dir.path()).unwrap().join("rtp.json");
        let result = AssetFinder::from_manifest_file(FinderConfig::default(), &path);
        assert!(matches!(result, Err(crate::Error::Manifest(_))));
    }

    #[test]
    fn test_teardown_releases_project() {
        let (_dir, index) = project(&["RPG_RT.ini"]);
        let mut finder = AssetFinder::new(FinderConfig::default(), ManifestSet::default());
        finder.set_active_project(index);
        finder.init_search_paths(false, false, &Vec::<Utf8PathBuf>::new());
        assert!(!finder.rtp_state().is_disabled());

        finder.teardown();
        assert!(finder.active_project().is_none());
        assert!(finder.rtp_state().is_disabled());
    }
}
