use camino::Utf8PathBuf;
use rtp_discovery::PlatformRtpPaths;
use rtp_finder::{EngineVersion, RtpPathSource};

pub mod config;

#[macro_export]
macro_rules! println_pad {
    ($($arg:tt)*) => {{
        let __s = format!($($arg)*);
        for __line in __s.lines() {
            println!("    {}", __line);
        }
    }};
}

/// Configured RTP directories followed by the platform locations.
pub struct ConfiguredRtpPaths {
    pub configured: Vec<Utf8PathBuf>,
}

impl RtpPathSource for ConfiguredRtpPaths {
    fn candidate_paths(&self, engine: EngineVersion) -> Vec<Utf8PathBuf> {
        let mut paths = self.configured.clone();
        for path in PlatformRtpPaths.candidate_paths(engine) {
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_paths_come_first() {
        let source = ConfiguredRtpPaths {
            configured: vec![Utf8PathBuf::from("/configured/rtp")],
        };
        let paths = source.candidate_paths(EngineVersion::Rpg2k);
        assert_eq!(paths[0], "/configured/rtp");
        assert_eq!(
            paths.iter().filter(|p| p.as_str() == "/configured/rtp").count(),
            1
        );
    }
}
