use crate::errors::CliError;
use crate::utils::config::{self, AppConfig};
use camino::Utf8PathBuf;
use colored::Colorize;
use miette::Result;

fn update_config(update: impl FnOnce(&mut AppConfig)) -> Result<()> {
    let mut cfg = config::load_config();
    update(&mut cfg);
    config::save_config(&cfg).map_err(|e| CliError::config_save_failed(e).into())
}

/// Print a config path entry with status indicator
fn print_path_config(name: &str, path: Option<&str>) {
    match path {
        Some(p) => {
            let status = if Utf8PathBuf::from(p).exists() {
                "✓".bright_green()
            } else {
                "✗".bright_red()
            };
            println!("  {} {} {}", format!("{}:", name).bright_white(), p, status);
        }
        None => {
            println!(
                "  {} {}",
                format!("{}:", name).bright_white(),
                "(not set)".bright_yellow()
            );
        }
    }
}

pub fn show_config() -> Result<()> {
    let cfg = config::load_config();
    let config_path = config::default_config_path()
        .map(|p| p.to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    println!();
    println!("  {} {}", "config_file:".bright_white(), config_path);

    print_path_config("manifest_path", cfg.manifest_path.as_deref());
    if cfg.rtp_paths.is_empty() {
        print_path_config("rtp_paths", None);
    }
    for path in &cfg.rtp_paths {
        print_path_config("rtp_paths", Some(path));
    }

    println!("  {} {}", "disable_rtp:".bright_white(), cfg.disable_rtp);
    println!("  {} {}", "full_package:".bright_white(), cfg.full_package);
    println!();
    Ok(())
}

pub fn add_rtp_path(path: String) -> Result<()> {
    if !Utf8PathBuf::from(&path).is_dir() {
        eprintln!(
            "  {} {}",
            "•".bright_yellow(),
            "The directory does not exist yet, it is skipped until it does".bright_yellow()
        );
    }

    let added = path.clone();
    update_config(move |cfg| {
        if !cfg.rtp_paths.contains(&added) {
            cfg.rtp_paths.push(added);
        }
    })?;

    println!("{}", "✓ RTP path added".bright_green().bold());
    println!();
    println!("  {} {}", "Path:".bright_white().bold(), path.bright_green());
    Ok(())
}

pub fn set_manifest_path(path: String) -> Result<()> {
    let stored = path.clone();
    update_config(move |cfg| cfg.manifest_path = Some(stored))?;

    println!("{}", "✓ RTP manifest set".bright_green().bold());
    println!();
    println!("  {} {}", "Path:".bright_white().bold(), path.bright_green());
    Ok(())
}

pub fn reset_config() -> Result<()> {
    let config_path = config::default_config_path()
        .map(|p| p.to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    config::save_config(&AppConfig::default()).map_err(CliError::config_save_failed)?;

    println!(
        "{}",
        "✓ Configuration reset to defaults".bright_green().bold()
    );
    println!();
    println!("  {} {}", "Config file:".bright_white().bold(), config_path);
    println!();
    Ok(())
}
