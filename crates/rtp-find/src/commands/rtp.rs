use super::build_finder;
use crate::{println_pad, RtpOptions};
use colored::Colorize;
use miette::Result;

pub fn list_rtp(options: RtpOptions) -> Result<()> {
    let finder = build_finder(&options)?;
    let state = finder.rtp_state();
    let engine = finder.config().engine;

    if state.is_disabled() {
        println_pad!("{}", "RTP support is disabled".bright_yellow());
        return Ok(());
    }

    println_pad!(
        "{} {}",
        "📂 RTP directories for".bright_blue().bold(),
        engine.as_str().bright_cyan().bold()
    );
    if state.search_paths().is_empty() {
        println_pad!("   {} {}", "✗".bright_red(), "(none found)".bright_yellow());
    }
    for tree in state.search_paths() {
        println_pad!("   {} {}", "•".bright_cyan(), tree.base_path());
    }

    println_pad!("\n{}", "📦 Detected releases:".bright_magenta().bold());
    if state.detected_rtp().is_empty() {
        println_pad!("   {}", "(none)".dimmed());
    }
    for hit in state.detected_rtp() {
        println_pad!(
            "   {} {} {} {}",
            "•".bright_cyan(),
            hit.name.bright_white().bold(),
            format!("({}/{})", hit.hits, hit.max).dimmed(),
            hit.tree.base_path().as_str().dimmed()
        );
    }

    Ok(())
}
