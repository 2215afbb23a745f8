use super::build_finder;
use crate::errors::CliError;
use crate::{println_pad, CategoryArg, RtpOptions};
use camino::Utf8PathBuf;
use colored::Colorize;
use miette::Result;
use rtp_finder::{is_valid_project, AssetCategory, DirectoryIndex, NoRenamedProjects, ScanMode};
use std::sync::Arc;

pub struct ResolveAssetsArgs {
    pub project: String,
    pub category: CategoryArg,
    pub dir: String,
    pub translation: Option<String>,
    pub rtp: RtpOptions,
    pub names: Vec<String>,
}

pub fn resolve_assets(args: ResolveAssetsArgs) -> Result<()> {
    let project_path = Utf8PathBuf::from(&args.project);
    let index = DirectoryIndex::build(&project_path, ScanMode::Recursive)
        .map_err(|source| CliError::index_failed(project_path.clone(), source))?;
    if !is_valid_project(&index, &NoRenamedProjects) {
        tracing::warn!("{} does not look like a game directory", project_path);
    }

    let mut finder = build_finder(&args.rtp)?;
    finder.set_active_project(Arc::new(index));
    finder.set_translation_id(args.translation);

    let category = match args.category {
        CategoryArg::Image => AssetCategory::Image(&args.dir),
        CategoryArg::Music => AssetCategory::Music,
        CategoryArg::Sound => AssetCategory::Sound,
        CategoryArg::Font => AssetCategory::Font,
        CategoryArg::Default => AssetCategory::Default(&args.dir),
    };

    println_pad!(
        "{} {}",
        "🔎 Resolving in:".bright_blue().bold(),
        project_path.as_str().bright_cyan()
    );
    for name in &args.names {
        let label = format!("{}/{}", category.dir(), name);
        match finder.find(category, name) {
            Some(path) => println_pad!(
                "   {} {} {}",
                "✓".bright_green(),
                label.bright_white().bold(),
                finder.path_inside_game(path.as_str()).dimmed()
            ),
            None => println_pad!(
                "   {} {} {}",
                "✗".bright_red(),
                label.bright_white().bold(),
                "(not found)".bright_red()
            ),
        }
    }

    let state = finder.rtp_state();
    if let Some(variant) = state.resolved_variant() {
        println_pad!(
            "\n{} {}",
            "📦 Game RTP:".bright_magenta().bold(),
            variant.display_name().bright_white()
        );
    } else if !state.game_rtp_candidates().is_empty() {
        let candidates = state
            .game_rtp_candidates()
            .iter()
            .map(|v| v.display_name())
            .collect::<Vec<_>>()
            .join(", ");
        println_pad!(
            "\n{} {}",
            "📦 Game RTP candidates:".bright_magenta().bold(),
            candidates.bright_white()
        );
    }

    Ok(())
}
