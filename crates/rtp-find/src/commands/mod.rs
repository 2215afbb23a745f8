mod check;
mod config;
mod resolve;
mod rtp;

pub use check::{check_project, CheckProjectArgs};
pub use config::{add_rtp_path, reset_config, set_manifest_path, show_config};
pub use resolve::{resolve_assets, ResolveAssetsArgs};
pub use rtp::list_rtp;

use crate::errors::CliError;
use crate::utils::config::load_config;
use crate::utils::ConfiguredRtpPaths;
use crate::RtpOptions;
use camino::Utf8PathBuf;
use colored::Colorize;
use miette::Result;
use rtp_finder::{AssetFinder, FinderConfig};
use rtp_manifest::ManifestSet;

/// Create a finder with its RTP search paths initialized from `options` and config.toml.
fn build_finder(options: &RtpOptions) -> Result<AssetFinder> {
    let app_config = load_config();

    let mut finder_config = FinderConfig::new(options.engine.into());
    if let Some(codepage) = options.codepage {
        finder_config = finder_config.with_codepage(codepage);
    }

    let manifest_path = options
        .manifest
        .clone()
        .or(app_config.manifest_path.clone())
        .map(Utf8PathBuf::from);
    let finder = match manifest_path {
        Some(path) => AssetFinder::from_manifest_file(finder_config, &path)
            .map_err(|source| CliError::manifest_load_failed(path, source))?,
        None => {
            tracing::info!("No RTP manifest configured, RTP releases will not be detected");
            AssetFinder::new(finder_config, ManifestSet::default())
        }
    };

    let mut finder = finder.with_warning_handler(|warning| {
        eprintln!("  {} {}", "⚠".bright_yellow(), warning.to_string().bright_yellow());
    });

    let source = ConfiguredRtpPaths {
        configured: app_config.rtp_paths.iter().map(Utf8PathBuf::from).collect(),
    };
    finder.init_search_paths(
        options.no_rtp || app_config.disable_rtp,
        options.full_package || app_config.full_package,
        &source,
    );

    Ok(finder)
}
