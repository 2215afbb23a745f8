use clap::builder::{styling::AnsiColor, Styles};
use clap::ColorChoice;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand, ValueEnum};
use commands::{
    add_rtp_path, check_project, list_rtp, reset_config, resolve_assets, set_manifest_path,
    show_config, CheckProjectArgs, ResolveAssetsArgs,
};
use miette::Result;
use rtp_finder::{EngineFamily, EngineVersion};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod errors;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Print debug diagnostics of the resolver
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve logical asset names the way the engine does
    Resolve {
        /// The game directory
        #[arg(short, long)]
        project: String,

        /// The asset category
        #[arg(short, long, value_enum, default_value = "image")]
        category: CategoryArg,

        /// Directory searched by image and default lookups
        #[arg(short, long, default_value = "Picture")]
        dir: String,

        /// Translation consulted before the game's own images
        #[arg(short, long)]
        translation: Option<String>,

        #[command(flatten)]
        rtp: RtpOptions,

        /// Logical asset names as stored in the game data
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Check whether a directory holds a game and guess its engine revision
    Check {
        /// The game directory
        project: String,

        /// Engine generation of the game
        #[arg(short, long, value_enum, default_value = "2003")]
        family: FamilyArg,

        /// Code page of the game data
        #[arg(long)]
        codepage: Option<u32>,

        /// Directory holding the save files, defaults to the game directory
        #[arg(short, long)]
        save_dir: Option<String>,
    },
    /// List RTP directories and the releases detected in them
    Rtp {
        #[command(flatten)]
        rtp: RtpOptions,
    },
    /// Manage config.toml
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the current configuration
    Show,
    /// Add a directory searched before the platform RTP locations
    AddRtpPath { path: String },
    /// Set the RTP manifest used when none is passed on the command line
    SetManifest { path: String },
    /// Reset the configuration to defaults
    Reset,
}

/// RTP settings shared by the commands that resolve assets.
#[derive(clap::Args, Debug, Clone)]
pub struct RtpOptions {
    /// Engine revision of the game
    #[arg(short, long, value_enum, default_value = "2003e")]
    pub engine: EngineArg,

    /// Code page of the game data
    #[arg(long)]
    pub codepage: Option<u32>,

    /// RTP manifest (.json or .toml), overrides config.toml
    #[arg(short, long)]
    pub manifest: Option<String>,

    /// Do not search any RTP
    #[arg(long)]
    pub no_rtp: bool,

    /// The game declares that it ships every asset it uses
    #[arg(long)]
    pub full_package: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum CategoryArg {
    Image,
    Music,
    Sound,
    Font,
    Default,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum EngineArg {
    #[value(name = "2000")]
    Rpg2k,
    #[value(name = "2000e")]
    Rpg2kE,
    #[value(name = "2003")]
    Rpg2k3,
    #[value(name = "2003e")]
    Rpg2k3E,
}

impl From<EngineArg> for EngineVersion {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::Rpg2k => EngineVersion::Rpg2k,
            EngineArg::Rpg2kE => EngineVersion::Rpg2kE,
            EngineArg::Rpg2k3 => EngineVersion::Rpg2k3,
            EngineArg::Rpg2k3E => EngineVersion::Rpg2k3E,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum FamilyArg {
    #[value(name = "2000")]
    Rpg2000,
    #[value(name = "2003")]
    Rpg2003,
}

impl From<FamilyArg> for EngineFamily {
    fn from(arg: FamilyArg) -> Self {
        match arg {
            FamilyArg::Rpg2000 => EngineFamily::Rpg2000,
            FamilyArg::Rpg2003 => EngineFamily::Rpg2003,
        }
    }
}

fn parse_args() -> Args {
    // Configure colored/styled help output
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default())
        .placeholder(AnsiColor::Blue.on_default());

    let matches = Args::command()
        .styles(styles)
        .color(ColorChoice::Auto)
        .get_matches();

    Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("rtp_finder=debug,rtp_discovery=debug,rtp_find=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "rtp_finder=info".into())
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .init();
}

fn main() -> Result<()> {
    let args = parse_args();
    init_logging(args.verbose);

    match args.command {
        Commands::Resolve {
            project,
            category,
            dir,
            translation,
            rtp,
            names,
        } => resolve_assets(ResolveAssetsArgs {
            project,
            category,
            dir,
            translation,
            rtp,
            names,
        }),
        Commands::Check {
            project,
            family,
            codepage,
            save_dir,
        } => check_project(CheckProjectArgs {
            project,
            family: family.into(),
            codepage,
            save_dir,
        }),
        Commands::Rtp { rtp } => list_rtp(rtp),
        Commands::Config { action } => match action {
            ConfigCommand::Show => show_config(),
            ConfigCommand::AddRtpPath { path } => add_rtp_path(path),
            ConfigCommand::SetManifest { path } => set_manifest_path(path),
            ConfigCommand::Reset => reset_config(),
        },
    }
}
