//! Discovery of installed RTP directories.
//!
//! Sources are consulted in this order:
//! 1. the Windows registry (see [`registry`]),
//! 2. `/data/rtp/<version>` on platforms without a registry,
//! 3. the `RPG2K_RTP_PATH` / `RPG2K3_RTP_PATH` and `RPG_RTP_PATH` environment variables,
//! 4. `rtp/<version>` below the XDG data directories (Unix only).
//!
//! Every candidate is returned even if it does not exist; the resolver skips
//! directories it cannot index.

pub mod registry;

use camino::Utf8PathBuf;
use rtp_finder::{EngineVersion, RtpPathSource};
use std::ffi::OsString;
use std::path::PathBuf;

/// Data directories searched when `XDG_DATA_DIRS` is unset.
pub const DEFAULT_XDG_DATA_DIRS: &str = "/usr/local/share/:/usr/share/";

/// The RTP directories of the current platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformRtpPaths;

impl RtpPathSource for PlatformRtpPaths {
    fn candidate_paths(&self, engine: EngineVersion) -> Vec<Utf8PathBuf> {
        discover_rtp_paths(engine)
    }
}

/// Collect every candidate RTP directory for `engine`.
pub fn discover_rtp_paths(engine: EngineVersion) -> Vec<Utf8PathBuf> {
    let mut paths = registry::registry_paths(&registry::registry_keys(engine));

    if cfg!(not(target_os = "windows")) {
        paths.push(Utf8PathBuf::from(format!("/data/rtp/{}", engine.as_str())));
    }

    paths.extend(env_paths(engine, |name| std::env::var_os(name)));

    if cfg!(unix) {
        let data_home = directories_next::BaseDirs::new().map(|dirs| dirs.data_dir().to_path_buf());
        let data_dirs = std::env::var_os("XDG_DATA_DIRS");
        paths.extend(xdg_paths(engine, data_home, data_dirs));
    }

    tracing::debug!("Found {} RTP path candidates", paths.len());
    paths
}

/// Directories listed in the RTP environment variables.
///
/// The engine specific variable comes first, `RPG_RTP_PATH` second. Both are
/// split with the platform's path list separator.
pub fn env_paths<F>(engine: EngineVersion, var: F) -> Vec<Utf8PathBuf>
where
    F: Fn(&str) -> Option<OsString>,
{
    let engine_var = if engine.is_rpg2k() {
        "RPG2K_RTP_PATH"
    } else {
        "RPG2K3_RTP_PATH"
    };

    [engine_var, "RPG_RTP_PATH"]
        .into_iter()
        .filter_map(|name| var(name))
        .flat_map(|value| std::env::split_paths(&value).collect::<Vec<_>>())
        .filter(|path| !path.as_os_str().is_empty())
        .filter_map(utf8_path)
        .collect()
}

/// Existing `rtp/<version>` directories below the user and system data directories.
pub fn xdg_paths(
    engine: EngineVersion,
    data_home: Option<PathBuf>,
    data_dirs: Option<OsString>,
) -> Vec<Utf8PathBuf> {
    let data_dirs = data_dirs.unwrap_or_else(|| OsString::from(DEFAULT_XDG_DATA_DIRS));

    data_home
        .into_iter()
        .chain(std::env::split_paths(&data_dirs))
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join("rtp").join(engine.as_str()))
        .filter(|dir| dir.is_dir())
        .filter_map(utf8_path)
        .collect()
}

fn utf8_path(path: PathBuf) -> Option<Utf8PathBuf> {
    match Utf8PathBuf::from_path_buf(path) {
        Ok(path) => Some(path),
        Err(path) => {
            tracing::warn!("Ignoring non-UTF-8 RTP path: {}", path.display());
            None
        }
    }
}
