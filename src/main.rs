use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

mod config;
mod editor;
mod media;
mod vault;

use config::Settings;
use editor::{Cursor, Document, Notifier, Outcome};
use media::YtDlpDownloader;
use vault::LocalVault;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the config file
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Download the reel under the cursor and embed it in the note
    Download {
        /// Markdown note holding the cursor
        #[arg(long)]
        note: PathBuf,
        /// Zero-based cursor line
        #[arg(long)]
        line: usize,
        /// Zero-based cursor column, counted in characters
        #[arg(long)]
        col: usize,
        /// Vault root; defaults to $REELGRAB_VAULT or marker discovery
        #[arg(long)]
        vault: Option<PathBuf>,
        /// Override the configured download folder for this run
        #[arg(long)]
        folder: Option<String>,
    },
    /// List vault folders, for download-folder completion
    Folders {
        /// Case-insensitive substring filter
        #[arg(long)]
        query: Option<String>,
        /// Emit a JSON array instead of one folder per line
        #[arg(long)]
        json: bool,
        /// Vault root; defaults to $REELGRAB_VAULT or marker discovery
        #[arg(long)]
        vault: Option<PathBuf>,
    },
    /// Read or change persisted settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Check that yt-dlp is installed and reachable
    Doctor,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the value of a setting
    Get { key: String },
    /// Change a setting and persist it
    Set { key: String, value: String },
}

/// Prints notices to stdout, the CLI stand-in for editor popups.
struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn notify(&self, message: &str) {
        println!("{}", message);
    }
}

fn get_config_path(args: &Args) -> Option<String> {
    if let Some(path) = &args.config {
        return Some(path.clone());
    }

    if let Ok(path) = std::env::var("CONFIG_FILE") {
        return Some(path);
    }

    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        let config_path = format!("{}/reelgrab/config.toml", xdg_config_home);
        if Path::new(&config_path).exists() {
            return Some(config_path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        let config_path = format!("{}/.config/reelgrab/config.toml", home.display());
        if Path::new(&config_path).exists() {
            return Some(config_path);
        }
    }

    None
}

/// Where `config set` writes when no config file exists yet.
fn default_config_path() -> Result<String> {
    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        return Ok(format!("{}/reelgrab/config.toml", xdg_config_home));
    }

    let home = dirs::home_dir().context("Cannot determine home directory")?;
    Ok(format!("{}/.config/reelgrab/config.toml", home.display()))
}

fn resolve_vault_root(explicit: Option<PathBuf>, start: &Path) -> Result<PathBuf> {
    if let Some(root) = explicit {
        return Ok(root);
    }

    if let Ok(root) = std::env::var("REELGRAB_VAULT") {
        return Ok(PathBuf::from(root));
    }

    vault::discover_root(start).ok_or_else(|| media::DownloadError::NoVaultRoot.into())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let config_path = get_config_path(&args);
    let settings = match &config_path {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path))?,
        None => Settings::default(),
    };

    if settings.logging_format() == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }

    match args.command {
        Command::Download {
            note,
            line,
            col,
            vault,
            folder,
        } => run_download(settings, note, line, col, vault, folder).await,
        Command::Folders { query, json, vault } => run_folders(query, json, vault).await,
        Command::Config { action } => run_config(settings, config_path, action),
        Command::Doctor => run_doctor().await,
    }
}

async fn run_download(
    mut settings: Settings,
    note: PathBuf,
    line: usize,
    col: usize,
    vault_root: Option<PathBuf>,
    folder: Option<String>,
) -> Result<()> {
    if let Some(folder) = folder {
        settings.set_download_folder(&folder);
    }

    let note = std::path::absolute(&note)
        .with_context(|| format!("Failed to resolve note path {}", note.display()))?;
    let start = note.parent().unwrap_or(Path::new("/"));
    let root = resolve_vault_root(vault_root, start)?;
    info!("Using vault root {}", root.display());

    let vault = LocalVault::new(root);
    let mut document = Document::open(&note).await?;
    let downloader = YtDlpDownloader::new();

    let outcome = editor::download_at_cursor(
        &mut document,
        Cursor { line, ch: col },
        &settings,
        &vault,
        &downloader,
        &StdoutNotifier,
    )
    .await;

    match outcome {
        Outcome::Embedded { filename, artifact } => {
            info!("Embedded {} from {}", filename, artifact);
            Ok(())
        }
        _ => std::process::exit(1),
    }
}

async fn run_folders(query: Option<String>, json: bool, vault_root: Option<PathBuf>) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to resolve current directory")?;
    let root = resolve_vault_root(vault_root, &cwd)?;
    let vault = LocalVault::new(root);

    let mut folders = vault::all_folders(&vault)
        .await
        .context("Failed to list vault folders")?;

    if let Some(query) = query {
        let query = query.to_lowercase();
        folders.retain(|folder| folder.to_lowercase().contains(&query));
    }

    if json {
        println!("{}", serde_json::to_string(&folders)?);
    } else {
        for folder in &folders {
            println!("{}", if folder.is_empty() { "/" } else { folder.as_str() });
        }
    }

    Ok(())
}

fn run_config(mut settings: Settings, config_path: Option<String>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            match key.as_str() {
                "download-folder" => println!("{}", settings.download_folder()),
                _ => anyhow::bail!("Unknown setting: {}", key),
            }
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            match key.as_str() {
                "download-folder" => settings.set_download_folder(&value),
                _ => anyhow::bail!("Unknown setting: {}", key),
            }

            let path = match config_path {
                Some(path) => path,
                None => default_config_path()?,
            };
            settings.save(&path)?;
            info!("Saved config to {}", path);
            println!("download-folder = {}", settings.download_folder());
            Ok(())
        }
    }
}

async fn run_doctor() -> Result<()> {
    match media::locate_ytdlp().await {
        Some(path) => {
            let version = media::ytdlp_version(&path).await?;
            println!("✅ yt-dlp {} at {}", version, path.display());
            Ok(())
        }
        None => Err(media::DownloadError::NotInstalled.into()),
    }
}
