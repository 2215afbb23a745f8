//! Normalized directory snapshots.
//!
//! A [`DirectoryIndex`] is built once by scanning a directory and is immutable
//! afterwards. Game projects and RTP installs are indexed this way so that asset
//! lookups never touch the filesystem: every entry is keyed by its
//! [normalized](crate::path::normalize) name while the value keeps the on-disk
//! spelling needed to rebuild the physical path.
//!
//! Games authored on Windows refer to `Music/Town` as `music\town`, `MUSIC\TOWN`
//! or even with full-width letters, so the key has to fold all of them onto one
//! entry. On case-sensitive filesystems two entries can fold onto the same key;
//! this is reported as a warning and the entry scanned last wins.
//!
//! In [`ScanMode::Recursive`] every subdirectory is walked as well and its files
//! are stored in a separate map keyed by the normalized relative path
//! (`music/town.ogg` -> `Music/Town.ogg`).

use crate::error::{Error, Result};
use crate::path::normalize;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashMap;
use walkdir::WalkDir;

/// Which entries a scan collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    /// Regular files of the top level only.
    Files,
    /// Subdirectories of the top level only.
    Directories,
    /// Files and subdirectories of the top level.
    All,
    /// Like [`All`](ScanMode::All), plus every file below each subdirectory.
    #[default]
    Recursive,
}

/// Immutable, case-insensitive snapshot of one directory.
#[derive(Debug, Clone)]
pub struct DirectoryIndex {
    /// Path used for physical I/O, in its original spelling.
    base_path: Utf8PathBuf,
    /// Normalized file name -> on-disk file name.
    files: HashMap<String, String>,
    /// Normalized directory name -> on-disk directory name.
    directories: HashMap<String, String>,
    /// Normalized relative path -> on-disk relative path, for files below the
    /// top level. Only present for [`ScanMode::Recursive`] builds.
    recursive_files: Option<HashMap<String, String>>,
}

/// Top-level entries in the order they were scanned.
struct Listing {
    files: HashMap<String, String>,
    directories: HashMap<String, String>,
    scanned_directories: Vec<String>,
}

impl DirectoryIndex {
    /// Scan `path` and build an index.
    ///
    /// Fails with [`Error::NotFound`] or [`Error::NotADirectory`] when `path` is
    /// not an existing directory (symlinks are followed).
    pub fn build(path: impl AsRef<Utf8Path>, mode: ScanMode) -> Result<Self> {
        let path = path.as_ref();
        let std_path = path.as_std_path();
        if !std_path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        if !std_path.is_dir() {
            return Err(Error::NotADirectory(path.to_path_buf()));
        }

        let listing = scan_top_level(path, mode)?;

        let recursive_files = (mode == ScanMode::Recursive).then(|| {
            listing
                .scanned_directories
                .iter()
                .fold(HashMap::new(), |mut merged, dir| {
                    for (key, relative) in scan_subdirectory(path, dir) {
                        insert_nested(&mut merged, key, relative);
                    }
                    merged
                })
        });

        tracing::debug!(
            "Indexed {}: {} files, {} directories, {} nested files",
            path,
            listing.files.len(),
            listing.directories.len(),
            recursive_files.as_ref().map_or(0, HashMap::len)
        );

        Ok(Self {
            base_path: path.to_path_buf(),
            files: listing.files,
            directories: listing.directories,
            recursive_files,
        })
    }

    /// Like [`build`](Self::build), for paths handed out by the platform.
    pub fn build_native(path: &std::path::Path, mode: ScanMode) -> Result<Self> {
        let utf8 =
            Utf8Path::from_path(path).ok_or_else(|| Error::NonUtf8Path(path.to_path_buf()))?;
        Self::build(utf8, mode)
    }

    pub fn base_path(&self) -> &Utf8Path {
        &self.base_path
    }

    pub fn files(&self) -> &HashMap<String, String> {
        &self.files
    }

    pub fn directories(&self) -> &HashMap<String, String> {
        &self.directories
    }

    pub fn recursive_files(&self) -> Option<&HashMap<String, String>> {
        self.recursive_files.as_ref()
    }

    /// On-disk name of the top-level file with normalized name `key`.
    pub fn find_file(&self, key: &str) -> Option<&str> {
        self.files.get(key).map(String::as_str)
    }

    /// On-disk name of the top-level directory with normalized name `key`.
    pub fn find_directory(&self, key: &str) -> Option<&str> {
        self.directories.get(key).map(String::as_str)
    }

    /// On-disk relative path of the nested file with normalized relative path `key`.
    pub fn find_nested(&self, key: &str) -> Option<&str> {
        self.recursive_files
            .as_ref()
            .and_then(|files| files.get(key))
            .map(String::as_str)
    }

    /// Rebuild the physical path of an entry from its on-disk relative path.
    pub fn physical_path(&self, relative: &str) -> Utf8PathBuf {
        let mut path = self.base_path.clone();
        for segment in relative.split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path
    }
}

fn scan_top_level(path: &Utf8Path, mode: ScanMode) -> Result<Listing> {
    let mut listing = Listing {
        files: HashMap::new(),
        directories: HashMap::new(),
        scanned_directories: Vec::new(),
    };

    for entry in std::fs::read_dir(path.as_std_path())? {
        let entry = entry?;
        let entry_path = entry.path();
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            tracing::warn!("Skipping non-UTF-8 path: {}", entry_path.display());
            continue;
        };
        if name == "." || name == ".." {
            continue;
        }

        let is_directory = entry_path.is_dir();
        let wanted = match mode {
            ScanMode::Files => !is_directory,
            ScanMode::Directories => is_directory,
            ScanMode::All | ScanMode::Recursive => true,
        };
        if !wanted {
            continue;
        }

        let key = normalize(&name);
        if is_directory {
            if let Some(previous) = listing.directories.get(&key) {
                tracing::warn!(
                    "This game provides the folder \"{}\" twice (also as \"{}\").",
                    name,
                    previous
                );
                tracing::warn!(
                    "This can lead to file not found errors. Merge the directories manually in a file browser."
                );
            }
            listing.directories.insert(key, name.clone());
            listing.scanned_directories.push(name);
        } else if let Some(previous) = listing.files.insert(key, name.clone()) {
            tracing::warn!(
                "The file \"{}\" exists twice in {} (also as \"{}\").",
                name,
                path,
                previous
            );
        }
    }

    Ok(listing)
}

/// Collect every file below `base/dir`, keyed by normalized path relative to `base`.
fn scan_subdirectory(base: &Utf8Path, dir: &str) -> HashMap<String, String> {
    WalkDir::new(base.join(dir).as_std_path())
        .min_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("Skipping unreadable entry below {}/{}: {}", base, dir, e);
                None
            }
        })
        .filter(|entry| !entry.file_type().is_dir())
        .filter_map(|entry| {
            let relative = entry.path().strip_prefix(base.as_std_path()).ok()?;
            let segments = relative
                .components()
                .map(|c| c.as_os_str().to_str())
                .collect::<Option<Vec<_>>>();
            match segments {
                Some(segments) => Some(segments.join("/")),
                None => {
                    tracing::warn!("Skipping non-UTF-8 path: {}", entry.path().display());
                    None
                }
            }
        })
        .fold(HashMap::new(), |mut files, relative| {
            insert_nested(&mut files, normalize(&relative), relative);
            files
        })
}

/// Insert a nested file, the later entry wins on a key collision.
fn insert_nested(files: &mut HashMap<String, String>, key: String, relative: String) {
    let previous = files
        .insert(key, relative.clone())
        .filter(|previous| *previous != relative);
    if let Some(previous) = previous {
        tracing::warn!(
            "The file \"{}\" exists twice (also as \"{}\").",
            relative,
            previous
        );
    }
}
