use anyhow::Result;
use clap::{Parser, Subcommand};
use immwall_cli::ImmWallApp;
use immwall_core::{ConfigOverrides, DemoOptions, WorkflowMode};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "immwall")]
#[command(about = "Fetch the daily Bing wallpaper and apply it as the desktop background")]
#[command(version)]
struct Cli {
    /// Settings file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Folder the wallpapers are downloaded into
    #[arg(long, global = true)]
    downloads: Option<PathBuf>,

    /// Folder for application data (background copies)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download today's wallpaper and apply it (default)
    Fetch {
        /// Portrait download and apply only, without the existence check
        #[arg(long)]
        legacy: bool,
    },
    /// Copy a file through the buffered copier
    Copy { source: PathBuf, destination: PathBuf },
    /// Check whether a file can be opened
    Exists { path: PathBuf },
    /// Print the file name derived from an image URL
    Filename { url: String },
    /// Run the host services demo
    Demo {
        /// Timer delay in milliseconds
        #[arg(long, default_value_t = 2500)]
        delay: u64,
        /// Fetch a JSON document and print its title
        #[arg(long)]
        fetch: Option<String>,
        /// Save the fetched document here
        #[arg(long, requires = "fetch")]
        save: Option<PathBuf>,
        /// Download a file into the downloads folder
        #[arg(long)]
        download: Option<String>,
    },
    /// Show resolved paths and feed URL
    Paths {
        /// Also write the effective settings to the settings file
        #[arg(long)]
        write_settings: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let overrides = ConfigOverrides {
        settings_file: cli.config,
        downloads_dir: cli.downloads,
        data_dir: cli.data,
    };
    let app = ImmWallApp::new(overrides, cli.verbose)?;

    match cli.command.unwrap_or(Commands::Fetch { legacy: false }) {
        Commands::Fetch { legacy } => {
            let mode = if legacy { WorkflowMode::Legacy } else { WorkflowMode::Full };
            app.fetch(mode)?;
        }
        Commands::Copy { source, destination } => {
            app.copy(&source, &destination)?;
        }
        Commands::Exists { path } => {
            if !app.exists(&path) {
                std::process::exit(1);
            }
        }
        Commands::Filename { url } => {
            app.filename(&url);
        }
        Commands::Demo {
            delay,
            fetch,
            save,
            download,
        } => {
            let options = DemoOptions {
                delay: Duration::from_millis(delay),
                fetch_url: fetch,
                save_path: save,
                download_url: download,
            };
            app.demo(&options)?;
        }
        Commands::Paths { write_settings } => {
            app.show_paths();
            if write_settings {
                app.write_settings()?;
            }
        }
    }

    Ok(())
}
