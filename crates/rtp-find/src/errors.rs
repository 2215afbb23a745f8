use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("Game directory not found: {path}")]
    #[diagnostic(
        code(project::not_found),
        help("Pass the directory containing RPG_RT.ldb and RPG_RT.lmt")
    )]
    ProjectNotFound { path: Utf8PathBuf },

    #[error("Not an RPG Maker game: {path}")]
    #[diagnostic(
        code(project::invalid),
        help("A game directory contains RPG_RT.ldb and RPG_RT.lmt (or EASY_RT.edb and EASY_RT.emt)")
    )]
    InvalidProject { path: Utf8PathBuf },

    #[error("Failed to index {path}")]
    #[diagnostic(
        code(index::build_failed),
        help("Make sure the directory exists and is readable")
    )]
    IndexFailed {
        path: Utf8PathBuf,
        #[source]
        source: rtp_finder::Error,
    },

    #[error("Failed to load RTP manifest {path}")]
    #[diagnostic(
        code(manifest::load_failed),
        help("RTP manifests are .json or .toml files with a top-level `manifests` list")
    )]
    ManifestLoadFailed {
        path: Utf8PathBuf,
        #[source]
        source: rtp_finder::Error,
    },

    #[error("Failed to save config")]
    #[diagnostic(
        code(config::save_failed),
        help("Check file permissions of the directory containing the executable")
    )]
    ConfigSaveFailed {
        #[source]
        source: std::io::Error,
    },
}

impl CliError {
    pub fn index_failed(path: Utf8PathBuf, source: rtp_finder::Error) -> Self {
        match source {
            rtp_finder::Error::NotFound(path) => Self::ProjectNotFound { path },
            source => Self::IndexFailed { path, source },
        }
    }

    pub fn manifest_load_failed(path: Utf8PathBuf, source: rtp_finder::Error) -> Self {
        Self::ManifestLoadFailed { path, source }
    }

    pub fn invalid_project(path: Utf8PathBuf) -> Self {
        Self::InvalidProject { path }
    }

    pub fn config_save_failed(source: std::io::Error) -> Self {
        Self::ConfigSaveFailed { source }
    }
}
