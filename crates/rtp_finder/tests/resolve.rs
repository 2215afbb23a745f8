use camino::{Utf8Path, Utf8PathBuf};
use rtp_finder::{
    AssetCategory, AssetFinder, DirectoryIndex, EngineFamily, EngineVersion, FinderConfig,
    PackageWarning, RtpHit, RtpOracle, RtpTranslation, RtpVariant, ScanMode,
};
use std::collections::HashMap;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

const V1: RtpVariant = RtpVariant::Rpg2003OfficialJapanese;
const V2: RtpVariant = RtpVariant::Rpg2003OfficialEnglish;
const V3: RtpVariant = RtpVariant::Rpg2003OfficialRussian;
const ADDON: RtpVariant = RtpVariant::Rpg2000DonMiguelAddon;

/// In-memory oracle answering from fixed tables.
#[derive(Default)]
struct ScriptedOracle {
    /// `dir/name` -> variants shipping it
    owners: HashMap<String, Vec<RtpVariant>>,
    /// Releases reported for every scanned directory
    detected: Vec<RtpHit>,
    /// Releases reported for one specific directory, overriding `detected`
    detected_in: HashMap<Utf8PathBuf, Vec<RtpHit>>,
    /// (`dir/name`, from, to) -> translated name
    translations: HashMap<(String, RtpVariant, RtpVariant), String>,
}

fn full_hit(variant: RtpVariant) -> RtpHit {
    RtpHit {
        variant,
        name: variant.display_name().to_string(),
        hits: 10,
        max: 10,
    }
}

impl ScriptedOracle {
    fn own(mut self, dir: &str, name: &str, variants: &[RtpVariant]) -> Self {
        self.owners
            .insert(format!("{}/{}", dir, name), variants.to_vec());
        self
    }

    fn detect_as(mut self, variant: RtpVariant) -> Self {
        self.detected.push(full_hit(variant));
        self
    }

    fn detect_in(mut self, root: &Utf8Path, variant: RtpVariant) -> Self {
        self.detected_in
            .entry(root.to_path_buf())
            .or_default()
            .push(full_hit(variant));
        self
    }

    fn translate(
        mut self,
        dir: &str,
        name: &str,
        from: RtpVariant,
        to: RtpVariant,
        translated: &str,
    ) -> Self {
        self.translations.insert((format!("{}/{}", dir, name), from, to), translated.to_string());
        self
    }
}

impl RtpOracle for ScriptedOracle {
    fn lookup_any_to_rtp(&self, dir: &str, name: &str, _family: EngineFamily) -> Vec<RtpVariant> {
        self.owners
            .get(&format!("{}/{}", dir, name))
            .cloned()
            .unwrap_or_default()
    }

    fn lookup_rtp_to_rtp(
        &self,
        dir: &str,
        name: &str,
        from: RtpVariant,
        to: RtpVariant,
    ) -> RtpTranslation {
        let key = format!("{}/{}", dir, name);
        if let Some(translated) = self.translations.get(&(key.clone(), from, to)) {
            return RtpTranslation::Name(translated.clone());
        }
        match self.owners.get(&key) {
            Some(owners) if owners.contains(&from) && owners.contains(&to) => {
                RtpTranslation::Name(name.to_string())
            }
            Some(owners) if owners.contains(&from) => RtpTranslation::NoEquivalent,
            _ => RtpTranslation::NotInSource,
        }
    }

    fn detect(&self, tree: &DirectoryIndex, _family: EngineFamily) -> Vec<RtpHit> {
        self.detected_in
            .get(tree.base_path())
            .cloned()
            .unwrap_or_else(|| self.detected.clone())
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn tree(files: &[&str]) -> (TempDir, Arc<DirectoryIndex>) {
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

fn utf8(dir: &TempDir) -> Utf8PathBuf {
    Utf8Path::from_path(dir.path()).unwrap().to_path_buf()
}

fn config() -> FinderConfig {
    FinderConfig::new(EngineVersion::Rpg2k3E)
}

fn narrowing_oracle() -> ScriptedOracle {
    ScriptedOracle::default()
        .own("charset", "a", &[V1, V2])
        .own("charset", "b", &[V2, V3])
}

#[test]
fn test_narrowing_is_order_independent() {
    init_tracing();
    let (_game, project) = tree(&["RPG_RT.ldb"]);

    let mut forward = AssetFinder::new(config(), narrowing_oracle());
    forward.set_active_project(Arc::clone(&project));
    forward.init_search_paths(false, false, &Vec::<Utf8PathBuf>::new());
    forward.find_image("CharSet", "A");
    assert_eq!(forward.rtp_state().game_rtp_candidates(), &[V1, V2]);
    forward.find_image("CharSet", "B");
    assert_eq!(forward.rtp_state().game_rtp_candidates(), &[V2]);

    let mut backward = AssetFinder::new(config(), narrowing_oracle());
    backward.set_active_project(project);
    backward.init_search_paths(false, false, &Vec::<Utf8PathBuf>::new());
    backward.find_image("CharSet", "B");
    backward.find_image("CharSet", "A");
    assert_eq!(backward.rtp_state().game_rtp_candidates(), &[V2]);
    assert_eq!(backward.rtp_state().resolved_variant(), Some(V2));
}

#[test]
fn test_addon_is_never_a_candidate() {
    let oracle = ScriptedOracle::default()
        .own("charset", "a", &[V1, ADDON, V2])
        .own("charset", "b", &[ADDON, V2]);
    let mut finder = AssetFinder::new(config(), oracle);
    finder.init_search_paths(false, false, &Vec::<Utf8PathBuf>::new());

    for name in ["a", "b", "a"] {
        finder.find_image("CharSet", name);
        assert!(!finder.rtp_state().game_rtp_candidates().contains(&ADDON));
    }
    assert_eq!(finder.rtp_state().game_rtp_candidates(), &[V2]);
}

#[test]
fn test_missing_rtp_warning_fires_once() {
    init_tracing();
    let oracle = ScriptedOracle::default()
        .own("charset", "hero", &[V1])
        .own("charset", "villain", &[V1])
        .own("system", "system", &[V1]);
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    let mut finder = AssetFinder::new(config(), oracle).with_warning_handler(move |warning| {
        assert!(matches!(warning, PackageWarning::MissingRtpAsset { .. }));
        counter.fetch_add(1, Ordering::SeqCst);
    });
    finder.init_search_paths(false, false, &Vec::<Utf8PathBuf>::new());

    assert!(finder.find_image("CharSet", "hero").is_none());
    assert!(finder.find_image("CharSet", "villain").is_none());
    assert!(finder.find_image("System", "system").is_none());
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert!(finder.rtp_state().warning_already_shown());
}

#[test]
fn test_undeclared_rtp_usage_warning() {
    let (rtp, _) = tree(&["CharSet/hero.png"]);
    let oracle = ScriptedOracle::default()
        .own("charset", "hero", &[V2])
        .detect_as(V2);
    let warnings = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&warnings);
    let mut finder = AssetFinder::new(config(), oracle)
        .with_warning_handler(move |warning| sink.lock().unwrap().push(warning.clone()));
    finder.init_search_paths(false, true, &vec![utf8(&rtp)]);

    assert!(finder.find_image("CharSet", "hero").is_some());
    assert_eq!(
        warnings.lock().unwrap().as_slice(),
        &[PackageWarning::UndeclaredRtpUsage {
            dir: "CharSet".to_string(),
            name: "hero".to_string(),
        }]
    );
}

#[test]
fn test_project_asset_found_case_insensitively() {
    let (_game, project) = tree(&["Music/Town.ogg"]);
    let mut finder = AssetFinder::new(config(), ScriptedOracle::default());
    finder.set_active_project(project);

    let found = finder.resolve("Music", "town", &[".opus", ".ogg"], false).unwrap();
    assert!(found.as_str().ends_with("Town.ogg"));
    assert!(found.as_std_path().is_file());
}

#[test]
fn test_rtp_fallback() {
    init_tracing();
    let (_game, project) = tree(&["RPG_RT.ldb", "RPG_RT.lmt"]);
    let (rtp, _) = tree(&["Music/Town.mid"]);
    let oracle = ScriptedOracle::default()
        .own("music", "town", &[V2])
        .detect_as(V2);
    let mut finder = AssetFinder::new(config(), oracle);
    finder.set_active_project(project);
    finder.init_search_paths(false, false, &vec![utf8(&rtp)]);

    assert_eq!(finder.rtp_state().search_paths().len(), 1);
    assert_eq!(finder.rtp_state().detected_rtp().len(), 1);

    let found = finder.find(AssetCategory::Music, "Town").unwrap();
    assert!(found.as_std_path().starts_with(rtp.path()));
    assert!(found.as_str().ends_with("Town.mid"));
}

#[test]
fn test_disabled_rtp_is_not_searched() {
    let (rtp, _) = tree(&["Music/Town.mid"]);
    let oracle = ScriptedOracle::default()
        .own("music", "town", &[V2])
        .detect_as(V2);
    let mut finder = AssetFinder::new(config(), oracle);
    finder.init_search_paths(true, false, &vec![utf8(&rtp)]);

    assert!(finder.rtp_state().search_paths().is_empty());
    assert!(finder.find_music("Town").is_none());
}

#[test]
fn test_traversal_never_leaves_project() {
    init_tracing();
    let outside = TempDir::new().unwrap();
    fs::write(outside.path().join("secret.png"), b"").unwrap();
    let game_root = outside.path().join("game");
    fs::create_dir_all(game_root.join("Picture")).unwrap();
    fs::write(game_root.join("Picture/title.png"), b"").unwrap();
    let project = DirectoryIndex::build_native(&game_root, ScanMode::Recursive).unwrap();

    let mut finder = AssetFinder::new(config(), ScriptedOracle::default());
    finder.set_active_project(Arc::new(project));

    for name in ["../../secret", "..\\..\\secret", "../../../../secret"] {
        if let Some(found) = finder.find_image("Picture", name) {
            assert!(found.as_std_path().starts_with(&game_root));
        }
    }
    assert!(finder.find_image("Picture", "../Picture/title").is_some());
}

fn starts_in(found: &Utf8Path, dir: &TempDir) -> bool {
    found.as_std_path().starts_with(dir.path())
}

#[test]
fn test_first_search_path_wins() {
    init_tracing();
    let (first, _) = tree(&["Music/Town.mid"]);
    let (second, _) = tree(&["Music/Town.ogg"]);

    let mut finder = AssetFinder::new(config(), ScriptedOracle::default());
    finder.init_search_paths(false, false, &vec![utf8(&first), utf8(&second)]);
    let found = finder.find_music("town").unwrap();
    assert!(starts_in(&found, &first));
    assert!(found.as_str().ends_with("Town.mid"));

    let mut reversed = AssetFinder::new(config(), ScriptedOracle::default());
    reversed.init_search_paths(false, false, &vec![utf8(&second), utf8(&first)]);
    let found = reversed.find_music("town").unwrap();
    assert!(starts_in(&found, &second));
    assert!(found.as_str().ends_with("Town.ogg"));
}

#[test]
fn test_first_detected_install_wins_once_resolved() {
    let (first, _) = tree(&["Music/Town.mid"]);
    let (second, _) = tree(&["Music/Town.ogg"]);
    let oracle = || {
        ScriptedOracle::default()
            .own("music", "town", &[V2])
            .detect_as(V2)
    };

    let mut finder = AssetFinder::new(config(), oracle());
    finder.init_search_paths(false, false, &vec![utf8(&first), utf8(&second)]);
    assert_eq!(finder.rtp_state().detected_rtp().len(), 2);

    let found = finder.find_music("town").unwrap();
    assert_eq!(finder.rtp_state().resolved_variant(), Some(V2));
    assert!(starts_in(&found, &first));
    let found = finder.find_music("town").unwrap();
    assert!(starts_in(&found, &first));

    let mut reversed = AssetFinder::new(config(), oracle());
    reversed.init_search_paths(false, false, &vec![utf8(&second), utf8(&first)]);
    let found = reversed.find_music("town").unwrap();
    assert!(starts_in(&found, &second));
}

#[test]
fn test_installs_are_searched_before_candidate_variants() {
    init_tracing();
    let (russian, _) = tree(&["CharSet/hero_v2.png"]);
    let (japanese, _) = tree(&["CharSet/hero_v1.png"]);
    let oracle = ScriptedOracle::default()
        .own("charset", "hero", &[V1, V2])
        .detect_in(&utf8(&russian), V3)
        .detect_in(&utf8(&japanese), V1)
        .translate("charset", "hero", V1, V3, "hero_missing")
        .translate("charset", "hero", V2, V3, "hero_v2")
        .translate("charset", "hero", V1, V1, "hero_v1");

    let mut finder = AssetFinder::new(config(), oracle);
    finder.init_search_paths(false, false, &vec![utf8(&russian), utf8(&japanese)]);
    let detected: Vec<_> = finder
        .rtp_state()
        .detected_rtp()
        .iter()
        .map(|hit| hit.variant)
        .collect();
    assert_eq!(detected, vec![V3, V1]);

    // The first install is tried with every candidate before the second one
    let found = finder.find_image("CharSet", "hero").unwrap();
    assert_eq!(finder.rtp_state().game_rtp_candidates(), &[V1, V2]);
    assert!(starts_in(&found, &russian));
    assert!(found.as_str().ends_with("hero_v2.png"));
}
