//! Asset resolution for RPG Maker 2000/2003 games.
//!
//! Games refer to their assets by logical names (`Music/Town`, `CharSet\chara1`)
//! written on case-insensitive Windows filesystems, in legacy encodings and
//! frequently without the files being shipped at all because they are part of
//! a separately installed runtime package (RTP). This crate turns such names
//! into physical paths:
//!
//! - [`DirectoryIndex`] snapshots a directory once, keyed by normalized names.
//! - [`path`] tokenizes and canonicalizes logical paths without letting them
//!   escape the game directory.
//! - [`RtpState`] infers which RTP release the game was made with and finds
//!   assets in whatever release is installed.
//! - [`AssetFinder`] ties project, translation overlay and RTP together.
//!
//! RTP knowledge comes from an [`RtpOracle`], implemented for
//! [`rtp_manifest::ManifestSet`].

pub mod config;
pub mod directory_index;
pub mod error;
pub mod finder;
pub mod lookup;
pub mod path;
pub mod project;
pub mod rtp;

pub use config::{escape_symbol_for_codepage, FinderConfig};
pub use directory_index::{DirectoryIndex, ScanMode};
pub use error::{Error, Result};
pub use finder::{AssetFinder, WarningHandler};
pub use lookup::{find_default, find_in_tree, AssetCategory};
pub use project::{
    count_savegames, has_savegame, is_easyrpg_project, is_major_updated_tree, is_rpg2k_project,
    is_valid_project, is_valid_project_path, NoRenamedProjects, RenamedProjectCheck,
};
pub use rtp::{
    PackageWarning, RtpHit, RtpHitInfo, RtpLookup, RtpOracle, RtpPathSource, RtpState,
};

pub use rtp_manifest::{EngineFamily, EngineVersion, RtpTranslation, RtpVariant};
