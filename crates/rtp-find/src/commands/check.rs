use crate::errors::CliError;
use crate::println_pad;
use camino::Utf8PathBuf;
use colored::Colorize;
use miette::Result;
use rtp_finder::{
    count_savegames, is_easyrpg_project, is_major_updated_tree, is_rpg2k_project,
    is_valid_project, DirectoryIndex, EngineFamily, EngineVersion, NoRenamedProjects, ScanMode,
};

pub struct CheckProjectArgs {
    pub project: String,
    pub family: EngineFamily,
    pub codepage: Option<u32>,
    pub save_dir: Option<String>,
}

pub fn check_project(args: CheckProjectArgs) -> Result<()> {
    let project_path = Utf8PathBuf::from(&args.project);
    let index = DirectoryIndex::build(&project_path, ScanMode::Recursive)
        .map_err(|source| CliError::index_failed(project_path.clone(), source))?;

    if !is_valid_project(&index, &NoRenamedProjects) {
        return Err(CliError::invalid_project(project_path).into());
    }

    let kind = if is_rpg2k_project(&index) {
        "RPG Maker 2000/2003"
    } else if is_easyrpg_project(&index) {
        "EasyRPG"
    } else {
        "Renamed RPG Maker project"
    };

    let cp932 = args.codepage == Some(932);
    let major_updated = is_major_updated_tree(&index, args.family, cp932);
    let engine = EngineVersion::from_family(args.family, major_updated);

    let save_path = args
        .save_dir
        .map(Utf8PathBuf::from)
        .unwrap_or_else(|| project_path.clone());
    let savegames = match DirectoryIndex::build(&save_path, ScanMode::Files) {
        Ok(save_index) => count_savegames(&save_index),
        Err(e) => {
            tracing::debug!("Cannot read save directory {}: {}", save_path, e);
            0
        }
    };

    println_pad!(
        "{} {}",
        "🎮 Game:".bright_blue().bold(),
        project_path.as_str().bright_cyan().bold()
    );
    println_pad!("{} {}", "🗂️ Format:".bright_green(), kind.bright_white());
    println_pad!(
        "{} {} {}",
        "⚙️ Engine:".bright_yellow(),
        engine.as_str().bright_white().bold(),
        if engine.is_major_updated() {
            "(major update)".dimmed()
        } else {
            "(original release)".dimmed()
        }
    );
    println_pad!(
        "{} {}",
        "💾 Savegames:".bright_magenta(),
        savegames.to_string().bright_white()
    );

    Ok(())
}
