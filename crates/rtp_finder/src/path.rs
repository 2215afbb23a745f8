//! Logical path handling: tokenizing, canonicalization and key normalization.
//!
//! Game data stores asset paths in the game's legacy encoding, where the byte
//! used as a directory separator decodes to a locale-specific symbol (`¥` for
//! Shift-JIS, `₩` for Korean code pages, `\` elsewhere). All functions here work
//! on decoded `char`s so that a multi-byte escape symbol is matched as a whole.

use unicode_normalization::UnicodeNormalization;

/// Canonical separator of logical paths and index keys.
pub const SEPARATOR: char = '/';

/// Normalize a file or path name into an index key.
///
/// NFKC folds full-width and compatibility forms onto their plain equivalents,
/// lowercasing makes the key case-insensitive.
pub fn normalize(name: &str) -> String {
    name.nfkc().collect::<String>().to_lowercase()
}

/// Split `path` on `/` and on the leading code point of `escape_symbol`.
///
/// An empty escape symbol only splits on `/`. Empty segments are kept.
pub fn tokenize(path: &str, escape_symbol: &str) -> Vec<String> {
    let escape = escape_symbol.chars().next();
    path.split(|c: char| c == SEPARATOR || Some(c) == escape)
        .map(str::to_string)
        .collect()
}

/// Replace every occurrence of `escape_symbol` in `name` with `/`.
pub fn substitute_escape(name: &str, escape_symbol: &str) -> String {
    if escape_symbol.is_empty() {
        return name.to_string();
    }
    name.replace(escape_symbol, "/")
}

/// Join a directory and a name with `/`. An empty directory yields `name` alone.
pub fn make_path(dir: &str, name: &str) -> String {
    let joined = if dir.is_empty() {
        name.to_string()
    } else {
        format!("{}{}{}", dir, SEPARATOR, name)
    };
    joined.replace('\\', "/")
}

/// Result of [`canonicalize_checked`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalPath {
    pub path: String,
    /// Number of `..` segments that tried to leave the root and were dropped.
    pub clamped_ascents: usize,
}

/// Resolve `.` and `..` segments of `path` without ever ascending above its root.
///
/// `initial_depth` is the number of `..` segments that may be absorbed once the
/// path itself has nothing left to pop, e.g. `1` when `path` was built as
/// `dir/name` and `name` may step out of `dir` into a sibling.
pub fn canonicalize_checked(
    path: &str,
    initial_depth: usize,
    escape_symbol: &str,
) -> CanonicalPath {
    let mut depth = initial_depth;
    let mut clamped_ascents = 0;
    let mut segments: Vec<String> = Vec::new();

    for segment in tokenize(path, escape_symbol) {
        match segment.as_str() {
            "" | "." => {}
            ".." => {
                if segments.pop().is_some() {
                    continue;
                }
                if depth > 0 {
                    depth -= 1;
                } else {
                    clamped_ascents += 1;
                    tracing::debug!("Path traversal out of game directory: {}", path);
                }
            }
            _ => segments.push(segment),
        }
    }

    CanonicalPath {
        path: segments.join("/"),
        clamped_ascents,
    }
}

/// Shorthand for [`canonicalize_checked`] when the clamp count is not needed.
pub fn canonicalize(path: &str, initial_depth: usize, escape_symbol: &str) -> String {
    canonicalize_checked(path, initial_depth, escape_symbol).path
}

/// Strip `path_to` from the front of `path_in`, plus one leading separator.
///
/// Returns `path_in` unchanged when it does not start with `path_to`.
pub fn path_inside(path_to: &str, path_in: &str) -> String {
    let Some(rest) = path_in.strip_prefix(path_to) else {
        return path_in.to_string();
    };
    rest.strip_prefix(['/', '\\']).unwrap_or(rest).to_string()
}

/// Split a canonical path at its first separator.
pub(crate) fn split_first(path: &str) -> Option<(&str, &str)> {
    path.split_once(SEPARATOR)
}
