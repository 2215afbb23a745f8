//! Asset lookup inside a single [`DirectoryIndex`].
//!
//! A lookup takes a category directory (`Music`, `CharSet`, ...), a logical
//! name as stored in game data and an ordered list of extensions. The name is
//! normalized, its escape symbols are turned into `/` and `..` segments are
//! resolved against the category directory, so a name like `..\Sound\door`
//! requested under `Music` is looked up as `Sound/door`.

use crate::directory_index::DirectoryIndex;
use crate::path::{canonicalize, make_path, normalize, split_first, substitute_escape, tokenize};
use camino::Utf8PathBuf;

pub const IMAGE_TYPES: &[&str] = &[".bmp", ".png", ".xyz"];
pub const MUSIC_TYPES: &[&str] = &[
    ".opus", ".oga", ".ogg", ".wav", ".mid", ".midi", ".mp3", ".wma",
];
pub const SOUND_TYPES: &[&str] = &[".opus", ".oga", ".ogg", ".wav", ".mp3", ".wma"];
pub const FONT_TYPES: &[&str] = &[".ttf", ".ttc", ".otf", ".fon"];
/// Exact file name, no extension appended.
pub const NO_EXTENSIONS: &[&str] = &[""];

/// Kind of asset requested by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetCategory<'a> {
    /// An image below the given directory (`Picture`, `CharSet`, ...).
    Image(&'a str),
    Music,
    Sound,
    Font,
    /// A file with its exact name below the given directory.
    Default(&'a str),
}

impl<'a> AssetCategory<'a> {
    pub fn dir(&self) -> &'a str {
        match self {
            AssetCategory::Image(dir) | AssetCategory::Default(dir) => dir,
            AssetCategory::Music => "Music",
            AssetCategory::Sound => "Sound",
            AssetCategory::Font => "Font",
        }
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            AssetCategory::Image(_) => IMAGE_TYPES,
            AssetCategory::Music => MUSIC_TYPES,
            AssetCategory::Sound => SOUND_TYPES,
            AssetCategory::Font => FONT_TYPES,
            AssetCategory::Default(_) => NO_EXTENSIONS,
        }
    }

    /// Only images have translated replacements.
    pub fn translatable(&self) -> bool {
        matches!(self, AssetCategory::Image(_))
    }
}

/// Extension list matching the assets usually stored in `dir`.
pub fn extensions_for_dir(dir: &str) -> &'static [&'static str] {
    match normalize(dir).as_str() {
        "music" => MUSIC_TYPES,
        "sound" => SOUND_TYPES,
        "font" => FONT_TYPES,
        _ => IMAGE_TYPES,
    }
}

/// Audio assets are often left out of games on purpose.
pub fn is_audio_dir(dir: &str) -> bool {
    matches!(normalize(dir).as_str(), "music" | "sound")
}

/// Find `dir/name` plus the first matching extension in `tree`.
///
/// The escape symbol of the active codepage separates path segments. A `\` is
/// always treated as a separator as well, even when the escape symbol is `¥`
/// or `₩`, so `Title\Logo` and `Title¥Logo` name the same file.
pub fn find_in_tree(
    tree: &DirectoryIndex,
    dir: &str,
    name: &str,
    extensions: &[&str],
    escape_symbol: &str,
) -> Option<Utf8PathBuf> {
    let mut corrected_dir = normalize(&substitute_escape(dir, escape_symbol));
    let mut corrected_name = normalize(&substitute_escape(name, escape_symbol));

    let combined = make_path(&corrected_dir, &corrected_name);
    let canonical = canonicalize(&combined, 1, escape_symbol);
    if combined != canonical {
        // A few games step out of the category directory on purpose (`..\Sound\x`).
        match split_first(&canonical) {
            Some((d, n)) => {
                corrected_dir = d.to_string();
                corrected_name = n.to_string();
            }
            None => return find_root_file(tree, &canonical, extensions),
        }
    }

    if corrected_dir.is_empty() {
        return find_root_file(tree, &corrected_name, extensions);
    }

    tree.find_directory(&corrected_dir)?;

    let path = make_path(&corrected_dir, &corrected_name);
    extensions.iter().find_map(|ext| {
        let key = format!("{}{}", path, ext);
        tree.find_nested(&key).map(|rel| tree.physical_path(rel))
    })
}

/// Find a file by exact name. A name with directory components is searched in
/// that directory instead of the root.
pub fn find_default(tree: &DirectoryIndex, name: &str, escape_symbol: &str) -> Option<Utf8PathBuf> {
    let components = tokenize(name, escape_symbol);
    if let [dir, rest @ ..] = components.as_slice() {
        if !rest.is_empty() {
            return find_in_tree(tree, dir, &rest.join("/"), NO_EXTENSIONS, escape_symbol);
        }
    }
    find_root_file(tree, &normalize(name), NO_EXTENSIONS)
}

fn find_root_file(tree: &DirectoryIndex, key: &str, extensions: &[&str]) -> Option<Utf8PathBuf> {
    extensions.iter().find_map(|ext| {
        tree.find_file(&format!("{}{}", key, ext))
            .map(|name| tree.physical_path(name))
    })
}
