//! RTP manifest tables for RPG Maker 2000/2003 games.
//!
//! Runtime packages (RTPs) are shared asset bundles installed separately from
//! the games that use them. Several localized releases exist per engine
//! generation and none of them is declared by the game itself. The tables in
//! this crate describe which asset names each release ships, so that a resolver
//! can infer the release from the assets a game requests and translate names
//! between releases.

mod engine;
mod error;
mod manifest;
mod variant;

pub use engine::{EngineFamily, EngineVersion};
pub use error::{Error, Result};
pub use manifest::{ManifestEntry, ManifestSet, RtpManifest, RtpTranslation};
pub use variant::RtpVariant;
