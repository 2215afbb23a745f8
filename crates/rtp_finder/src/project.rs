//! Game project detection and engine-revision heuristics.

use crate::directory_index::{DirectoryIndex, ScanMode};
use crate::lookup::find_default;
use crate::path::normalize;
use camino::Utf8Path;
use rtp_manifest::EngineFamily;

pub const DATABASE_NAME: &str = "RPG_RT.ldb";
pub const TREEMAP_NAME: &str = "RPG_RT.lmt";
pub const DATABASE_NAME_EASYRPG: &str = "EASY_RT.edb";
pub const TREEMAP_NAME_EASYRPG: &str = "EASY_RT.emt";
pub const EXE_NAME: &str = "RPG_RT.exe";
pub const HARMONY_DLL: &str = "Harmony.dll";

/// Size of the Harmony.dll shipped with the official engine builds.
pub const OFFICIAL_HARMONY_DLL_SIZE: u64 = 473_600;
/// RPG_RT.exe of RPG2000 grew past this size with the major update.
pub const RPG2K_UPDATED_EXE_SIZE: u64 = 795 * 1024;
/// RPG_RT.exe of RPG2003 grew past this size with the major update.
pub const RPG2K3_UPDATED_EXE_SIZE: u64 = 1150 * 1024;

/// Highest save slot of the original engine.
pub const SAVE_SLOTS: u32 = 15;

/// Recognizes projects whose database and map tree were renamed by the author.
pub trait RenamedProjectCheck {
    fn is_renamed_project(&self, index: &DirectoryIndex) -> bool;
}

/// Accepts only the standard file names.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRenamedProjects;

impl RenamedProjectCheck for NoRenamedProjects {
    fn is_renamed_project(&self, _index: &DirectoryIndex) -> bool {
        false
    }
}

fn has_file(index: &DirectoryIndex, name: &str) -> bool {
    index.find_file(&normalize(name)).is_some()
}

/// Both `RPG_RT.ldb` and `RPG_RT.lmt` are present.
pub fn is_rpg2k_project(index: &DirectoryIndex) -> bool {
    has_file(index, DATABASE_NAME) && has_file(index, TREEMAP_NAME)
}

/// Both `EASY_RT.edb` and `EASY_RT.emt` are present.
pub fn is_easyrpg_project(index: &DirectoryIndex) -> bool {
    has_file(index, DATABASE_NAME_EASYRPG) && has_file(index, TREEMAP_NAME_EASYRPG)
}

pub fn is_valid_project(index: &DirectoryIndex, renames: &dyn RenamedProjectCheck) -> bool {
    is_rpg2k_project(index) || is_easyrpg_project(index) || renames.is_renamed_project(index)
}

/// Index the top-level files of `path` and check whether it holds a game.
///
/// Paths that cannot be indexed are not projects.
pub fn is_valid_project_path(path: &Utf8Path, renames: &dyn RenamedProjectCheck) -> bool {
    match DirectoryIndex::build(path, ScanMode::Files) {
        Ok(index) => is_valid_project(&index, renames),
        Err(e) => {
            tracing::debug!("{} is not a project: {}", path, e);
            false
        }
    }
}

/// Number of occupied save slots (`Save01.lsd` to `Save15.lsd`) in a save directory.
pub fn count_savegames(save_index: &DirectoryIndex) -> usize {
    (1..=SAVE_SLOTS)
        .filter(|slot| has_file(save_index, &format!("Save{:02}.lsd", slot)))
        .count()
}

pub fn has_savegame(save_index: &DirectoryIndex) -> bool {
    count_savegames(save_index) > 0
}

/// Guess whether the game runs on a major-update engine build.
///
/// Only the major update plays MP3, unless a custom Harmony.dll adds support.
/// Without MP3 evidence the size of RPG_RT.exe decides. When that is missing
/// as well, Japanese and 2003 games are assumed to be updated.
pub fn is_major_updated_tree(index: &DirectoryIndex, family: EngineFamily, cp932: bool) -> bool {
    let mut probe_mp3 = true;
    if let Some(harmony) = find_default(index, HARMONY_DLL, "") {
        if let Ok(metadata) = std::fs::metadata(harmony.as_std_path()) {
            if metadata.len() != OFFICIAL_HARMONY_DLL_SIZE {
                tracing::debug!("Non-official Harmony.dll found, skipping MP3 test");
                probe_mp3 = false;
            }
        }
    }

    if probe_mp3 {
        if let Some(files) = index.recursive_files() {
            let mp3 = files
                .iter()
                .find(|(key, _)| key.starts_with("music/") && key.ends_with(".mp3"));
            if let Some((_, name)) = mp3 {
                tracing::debug!("MP3 file ({}) found", name);
                return true;
            }
        }
    }

    if let Some(exe) = find_default(index, EXE_NAME, "") {
        if let Ok(metadata) = std::fs::metadata(exe.as_std_path()) {
            let threshold = match family {
                EngineFamily::Rpg2000 => RPG2K_UPDATED_EXE_SIZE,
                EngineFamily::Rpg2003 => RPG2K3_UPDATED_EXE_SIZE,
            };
            let size = metadata.len();
            tracing::debug!("{} size: {} bytes", EXE_NAME, size);
            return size > threshold;
        }
    }

    let assume_updated = cp932 || family == EngineFamily::Rpg2003;
    tracing::debug!(
        "Could not get the size of {}, assuming {} engine",
        EXE_NAME,
        if assume_updated { "major updated" } else { "original" }
    );
    assume_updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn index_of(dir: &TempDir, mode: ScanMode) -> DirectoryIndex {
        DirectoryIndex::build(Utf8Path::from_path(dir.path()).unwrap(), mode).unwrap()
    }

    fn write(dir: &TempDir, name: &str, len: usize) {
        let path = dir.path().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, vec![0u8; len]).unwrap();
    }

    struct CustomNames;

    impl RenamedProjectCheck for CustomNames {
        fn is_renamed_project(&self, index: &DirectoryIndex) -> bool {
            index.find_file("game.ldb").is_some()
        }
    }

    #[test]
    fn test_project_detection() {
        let dir = TempDir::new().unwrap();
        write(&dir, "rpg_rt.LDB", 0);
        assert!(!is_valid_project(&index_of(&dir, ScanMode::Files), &NoRenamedProjects));

        write(&dir, "RPG_RT.lmt", 0);
        let index = index_of(&dir, ScanMode::Files);
        assert!(is_rpg2k_project(&index));
        assert!(!is_easyrpg_project(&index));
        assert!(is_valid_project(&index, &NoRenamedProjects));
    }

    #[test]
    fn test_easyrpg_and_renamed_projects() {
        let dir = TempDir::new().unwrap();
        write(&dir, "EASY_RT.edb", 0);
        write(&dir, "EASY_RT.emt", 0);
        assert!(is_easyrpg_project(&index_of(&dir, ScanMode::Files)));

        let renamed = TempDir::new().unwrap();
        write(&renamed, "Game.ldb", 0);
        let index = index_of(&renamed, ScanMode::Files);
        assert!(!is_valid_project(&index, &NoRenamedProjects));
        assert!(is_valid_project(&index, &CustomNames));
    }

    #[test]
    fn test_project_path() {
        let dir = TempDir::new().unwrap();
        write(&dir, "RPG_RT.ldb", 0);
        write(&dir, "RPG_RT.lmt", 0);
        let path = Utf8Path::from_path(dir.path()).unwrap();
        assert!(is_valid_project_path(path, &NoRenamedProjects));
        assert!(!is_valid_project_path(&path.join("missing"), &NoRenamedProjects));
    }

    #[test]
    fn test_count_savegames() {
        let dir = TempDir::new().unwrap();
        assert!(!has_savegame(&index_of(&dir, ScanMode::Files)));

        write(&dir, "Save01.lsd", 0);
        write(&dir, "save15.LSD", 0);
        write(&dir, "Save16.lsd", 0);
        write(&dir, "Save02.bak", 0);
        let index = index_of(&dir, ScanMode::Files);
        assert_eq!(count_savegames(&index), 2);
        assert!(has_savegame(&index));
    }

    #[test]
    fn test_mp3_means_major_update() {
        let dir = TempDir::new().unwrap();
        write(&dir, "Music/Battle.MP3", 0);
        write(&dir, "RPG_RT.exe", 10);
        let index = index_of(&dir, ScanMode::Recursive);
        assert!(is_major_updated_tree(&index, EngineFamily::Rpg2000, false));
    }

    #[test]
    fn test_custom_harmony_skips_mp3_probe() {
        let dir = TempDir::new().unwrap();
        write(&dir, "Music/Battle.mp3", 0);
        write(&dir, "Harmony.dll", 1234);
        write(&dir, "RPG_RT.exe", 10);
        let index = index_of(&dir, ScanMode::Recursive);
        assert!(!is_major_updated_tree(&index, EngineFamily::Rpg2000, false));
    }

    #[test]
    fn test_exe_size_threshold() {
        let dir = TempDir::new().unwrap();
        write(&dir, "RPG_RT.exe", (RPG2K_UPDATED_EXE_SIZE + 1) as usize);
        let index = index_of(&dir, ScanMode::Recursive);
        assert!(is_major_updated_tree(&index, EngineFamily::Rpg2000, false));
        assert!(!is_major_updated_tree(&index, EngineFamily::Rpg2003, false));
    }

    #[test]
    fn test_fallback_without_exe() {
        let dir = TempDir::new().unwrap();
        let index = index_of(&dir, ScanMode::Recursive);
        assert!(!is_major_updated_tree(&index, EngineFamily::Rpg2000, false));
        assert!(is_major_updated_tree(&index, EngineFamily::Rpg2000, true));
        assert!(is_major_updated_tree(&index, EngineFamily::Rpg2003, false));
    }
}
