use rtp_manifest::EngineFamily;
use std::fmt;

/// A user-facing warning about how the game is packaged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageWarning {
    /// The game declares that it ships without the RTP but an asset was served
    /// from an RTP install.
    UndeclaredRtpUsage { dir: String, name: String },
    /// An asset known to belong to the game's RTP could not be found anywhere.
    MissingRtpAsset {
        dir: String,
        name: String,
        engine: EngineFamily,
        /// Whether any RTP directory was available at all.
        rtp_installed: bool,
    },
}

impl fmt::Display for PackageWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageWarning::UndeclaredRtpUsage { .. } => write!(
                f,
                "This game claims it does not need the RTP, but actually uses files from it!"
            ),
            PackageWarning::MissingRtpAsset {
                dir,
                name,
                engine,
                rtp_installed: false,
            } => write!(
                f,
                "Cannot find: {}/{}. Install RTP {} to resolve this warning.",
                dir, name, engine
            ),
            PackageWarning::MissingRtpAsset {
                dir, name, engine, ..
            } => write!(
                f,
                "Cannot find: {}/{}. RTP {} was probably not installed correctly.",
                dir, name, engine
            ),
        }
    }
}
