//! BBS Theme Tool - terminal color theme editor for BBS aesthetics
//!
//! Runs the interactive editor by default; headless subcommands export theme
//! files, serve the theme pages, and exchange themes with a BBS install.

mod bbs;
mod clipboard;
mod config;
mod core;
mod data;
mod frontend;
mod server;
mod theme;

use crate::config::Config;
use crate::core::{AppCore, DisplayOptions, ThemeController};
use crate::frontend::{Frontend, TuiFrontend};
use crate::theme::{ColorField, ThemeCatalog};
use anyhow::{bail, Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

const LOG_FILE: &str = "bbs-theme-tool.log";

#[derive(ClapParser)]
#[command(name = "bbs-theme-tool")]
#[command(about = "Terminal color theme editor for BBS aesthetics", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Custom data directory (default: ~/.bbs-theme-tool)
    /// Can also be set via BBS_THEME_TOOL_DIR environment variable
    #[arg(long, value_name = "DIR", global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive theme editor (default)
    Edit {
        /// Preset to start from (name or index)
        #[arg(long)]
        preset: Option<String>,
    },

    /// Print the built-in presets
    List,

    /// Write bbs-theme.json for a preset
    Export {
        /// Preset to export (name or index, default: first preset)
        #[arg(long)]
        preset: Option<String>,

        /// Enable the preview border
        #[arg(long)]
        border: bool,

        /// Enable the accent glow
        #[arg(long)]
        shadow: bool,

        /// Use the sans-serif font instead of the pixel font
        #[arg(long)]
        no_pixel_font: bool,

        /// Directory to write into (default: config export.directory)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Print the JSON instead of writing a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },

    /// Serve the theme pages over HTTP
    Serve {
        /// Port to listen on (default: PORT env var, then config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory to serve (default: config server.root)
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,
    },

    /// Work with a BBS config/bbs directory
    Bbs {
        #[command(subcommand)]
        action: BbsAction,
    },
}

#[derive(Subcommand)]
enum BbsAction {
    /// List theme folders
    List {
        /// config/bbs directory (default: config bbs.config_path)
        #[arg(value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Only show themes containing this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Apply a theme folder to the live settings
    Import {
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        #[arg(value_name = "THEME")]
        theme: String,
    },

    /// Save the live settings as a new theme folder
    Snapshot {
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        #[arg(value_name = "NAME")]
        name: String,
    },
}

fn init_logging(to_file: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if to_file {
        // The editor owns the terminal, so logs go to a file
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(LOG_FILE)
            .with_context(|| format!("Failed to open {}", LOG_FILE))?;

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(log_file))
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let interactive = matches!(cli.command, None | Some(Commands::Edit { .. }));
    init_logging(interactive)?;

    // Set custom data directory if specified (via CLI or environment variable)
    if let Some(data_dir) = &cli.data_dir {
        std::env::set_var(config::DATA_DIR_ENV, data_dir);
        tracing::info!("Using custom data directory: {:?}", data_dir);
    } else if let Ok(env_dir) = std::env::var(config::DATA_DIR_ENV) {
        tracing::info!("Using data directory from {}: {}", config::DATA_DIR_ENV, env_dir);
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    match cli.command {
        None => run_tui(config),
        Some(Commands::Edit { preset }) => {
            if let Some(preset) = preset {
                config.ui.default_preset = preset;
            }
            run_tui(config)
        }
        Some(Commands::List) => {
            print_catalog();
            Ok(())
        }
        Some(Commands::Export {
            preset,
            border,
            shadow,
            no_pixel_font,
            output,
            stdout,
        }) => {
            let options = DisplayOptions {
                enable_border: border,
                enable_shadow: shadow,
                pixel_font: !no_pixel_font,
            };
            run_export(&config, preset.as_deref(), options, output, stdout)
        }
        Some(Commands::Serve { port, root }) => run_serve(&config, port, root),
        Some(Commands::Bbs { action }) => run_bbs(&config, action),
    }
}

/// Run the terminal editor
fn run_tui(config: Config) -> Result<()> {
    // Notification timers need a runtime; the editor itself is single-threaded
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;
    runtime.block_on(async_run_tui(config))
}

async fn async_run_tui(config: Config) -> Result<()> {
    let frame_interval = config.ui.poll_timeout();
    let mut app = AppCore::new(config)?;
    let mut frontend = TuiFrontend::new()?;
    tracing::info!(
        "Editor started with preset {}",
        app.controller.current_theme().name
    );

    let result = editor_loop(&mut app, &mut frontend, frame_interval).await;

    frontend.cleanup()?;
    tracing::info!("Editor closed");
    result
}

async fn editor_loop(
    app: &mut AppCore,
    frontend: &mut TuiFrontend,
    frame_interval: std::time::Duration,
) -> Result<()> {
    while app.running {
        for event in frontend.poll_events()? {
            app.handle_event(event, frontend);
            if !app.running {
                return Ok(());
            }
        }

        app.controller.pump_notifications();
        frontend.render(app)?;

        // Yield so notification timers can fire between frames
        tokio::time::sleep(frame_interval).await;
    }
    Ok(())
}

fn print_catalog() {
    println!(
        "{:>3}  {:<16} {:<8} {:<8} {:<8} {:<8}",
        "#",
        "Name",
        ColorField::Bg.key(),
        ColorField::Text.key(),
        ColorField::Accent.key(),
        ColorField::Border.key()
    );
    for (index, preset) in ThemeCatalog::list().iter().enumerate() {
        let c = &preset.colors;
        println!(
            "{:>3}  {:<16} {:<8} {:<8} {:<8} {:<8}",
            index, preset.name, c.bg, c.text, c.accent, c.border
        );
    }
}

fn run_export(
    config: &Config,
    preset: Option<&str>,
    options: DisplayOptions,
    output: Option<PathBuf>,
    to_stdout: bool,
) -> Result<()> {
    let index = match preset {
        Some(reference) => ThemeCatalog::resolve(reference)?,
        None => 0,
    };

    let dir = output.unwrap_or_else(|| config.export.directory.clone());
    let mut controller = ThemeController::new(dir, config.ui.notification_hold());
    controller.select_theme(index)?;
    controller.apply_options(options);

    if to_stdout {
        println!("{}", controller.export_json()?);
        return Ok(());
    }

    let path = controller
        .exported_file()
        .write_to_dir(controller.export_dir())?;
    println!(
        "Exported {} to {}",
        controller.current_theme().name,
        path.display()
    );
    Ok(())
}

fn run_serve(config: &Config, port: Option<u16>, root: Option<PathBuf>) -> Result<()> {
    let env_port = std::env::var(config::PORT_ENV).ok();
    let port = config.server.resolve_port(port, env_port.as_deref());
    let root = root.unwrap_or_else(|| config.server.root.clone());
    if !root.is_dir() {
        bail!("Cannot serve {:?}: not a directory", root);
    }

    let runtime = tokio::runtime::Runtime::new().context("Failed to build tokio runtime")?;
    runtime.block_on(async move {
        let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
        let server = server::StaticServer::bind(root, addr).await?;

        tokio::select! {
            result = server.serve() => result,
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl+C")?;
                tracing::info!("Shutting down server");
                Ok(())
            }
        }
    })
}

fn bbs_dir(config: &Config, dir: Option<PathBuf>) -> Result<bbs::BbsDir> {
    let path = dir
        .or_else(|| config.bbs.config_path.clone())
        .context("Specify a config/bbs directory or set bbs.config_path in config")?;
    bbs::BbsDir::open(path)
}

fn run_bbs(config: &Config, action: BbsAction) -> Result<()> {
    match action {
        BbsAction::List { dir, search } => {
            let bbs = bbs_dir(config, dir)?;
            let themes = match search.as_deref() {
                Some(term) => bbs.search(term)?,
                None => bbs.available_themes()?,
            };
            if themes.is_empty() {
                println!("No themes found in {}", bbs.root().display());
            }
            for name in themes {
                println!("{}", name);
            }
        }
        BbsAction::Import { dir, theme } => {
            let bbs = bbs::BbsDir::open(dir)?;
            let summary = bbs.import_theme(&theme)?;
            println!("Theme '{}' applied successfully!", theme);
            if let Some(color) = summary.primary_color {
                println!("  primary_color = {}", color);
            }
            if let Some(color) = summary.background_color {
                println!("  background_color = {}", color);
            }
            for texture in &summary.textures_copied {
                println!("  copied {}", texture);
            }
            if let Some(backup) = &summary.backup {
                println!("  backup at {}", backup.display());
            }
        }
        BbsAction::Snapshot { dir, name } => {
            let bbs = bbs::BbsDir::open(dir)?;
            let dest = bbs.snapshot_theme(&name)?;
            println!("Snapshot saved to {}", dest.display());
        }
    }
    Ok(())
}
