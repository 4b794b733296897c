//! Daily wallpaper workflow: fetch the image feed, download the portrait and
//! landscape variants, apply the background and tell the user about it.

use crate::config::Config;
use crate::copy::{copy_file, file_exists, FileOps};
use crate::feed::parse_feed;
use crate::filename::{derive_file_name, portrait_url, sanitize_filename};
use crate::host::{Host, NotifyLevel};
use crate::runtime::Runtime;
use anyhow::Result;
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;

const LANDSCAPE_FOLDER: &str = "landscape";
const BACKGROUNDS_FOLDER: &str = "backgrounds/landscape";
const BACKGROUND_FILE: &str = "background.jpg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowMode {
    /// Existence check, portrait and landscape downloads, background copy.
    #[default]
    Full,
    /// Portrait download and apply only, no existence check.
    Legacy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Host reported no network; nothing was fetched.
    Offline,
    /// The wallpapers folder could not be created.
    FolderUnavailable,
    /// The wallpaper was already on disk, so nothing was downloaded.
    AlreadyPresent(PathBuf),
    Applied {
        wallpaper: PathBuf,
        /// Copy of the landscape image in the backgrounds folder, when it succeeded.
        background_copy: Option<PathBuf>,
    },
    DownloadFailed,
}

/// Resolved URLs and names for the current feed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WallpaperTarget {
    pub landscape_url: String,
    pub portrait_url: String,
    /// Single path component, safe to join onto the wallpapers folder.
    pub file_name: String,
    pub info: String,
}

/// Fetches the feed and resolves what to download. Parse failures propagate.
pub fn resolve_target<H: Host>(host: &H, config: &Config) -> Result<WallpaperTarget> {
    let settings = &config.settings;
    let body = host.get_response(&config.feed_url())?;
    let image = parse_feed(&body)?;

    let landscape_url = image.full_url(&settings.base_url);
    let portrait = portrait_url(&landscape_url, &settings.portrait_resolution);
    let file_name = sanitize_filename(&derive_file_name(&landscape_url));

    info!("Landscape: {}", landscape_url);
    info!("Info: {}", image.copyright);

    Ok(WallpaperTarget {
        landscape_url,
        portrait_url: portrait,
        file_name,
        info: image.copyright,
    })
}

pub fn fetch_wallpaper<H: Host, F: FileOps>(
    host: &H,
    ops: &F,
    config: &Config,
    runtime: &Runtime,
    mode: WorkflowMode,
) -> Result<Outcome> {
    info!("Fetching wallpaper ({:?} mode, runtime {})", mode, runtime.id);
    if !host.is_online() {
        warn!("Offline, skipping wallpaper fetch");
        return Ok(Outcome::Offline);
    }

    let target = resolve_target(host, config)?;

    let Some(folder) = host.create_folder(&config.downloads_dir, &config.settings.folder_name) else {
        error!("Failed to create wallpapers folder");
        return Ok(Outcome::FolderUnavailable);
    };
    let wallpaper_path = folder.join(&target.file_name);
    info!("Wallpaper target path: {}", wallpaper_path.display());

    let outcome = match mode {
        WorkflowMode::Full => run_full(host, ops, config, &target, &folder, wallpaper_path),
        WorkflowMode::Legacy => run_legacy(host, &target, wallpaper_path),
    };

    host.sleep(Duration::from_millis(config.settings.notify_delay_ms));
    host.notify(&target.info, NotifyLevel::Info);

    Ok(outcome)
}

fn run_full<H: Host, F: FileOps>(
    host: &H,
    ops: &F,
    config: &Config,
    target: &WallpaperTarget,
    folder: &Path,
    wallpaper_path: PathBuf,
) -> Outcome {
    if file_exists(ops, &wallpaper_path) {
        info!("Wallpaper already exists and set: {}", target.file_name);
        return Outcome::AlreadyPresent(wallpaper_path);
    }

    let landscape_folder = host.create_folder(folder, LANDSCAPE_FOLDER);

    download(host, &target.portrait_url, &wallpaper_path);
    let landscape_path = match &landscape_folder {
        Some(dir) => {
            let path = dir.join(&target.file_name);
            download(host, &target.landscape_url, &path);
            Some(path)
        }
        None => {
            error!("Failed to create landscape folder, skipping landscape download");
            None
        }
    };

    if !file_exists(ops, &wallpaper_path) {
        error!("Failed to download the image");
        return Outcome::DownloadFailed;
    }

    info!("Applying background: {}", target.file_name);
    apply_background(host, &wallpaper_path);

    let background_copy = landscape_path.and_then(|path| copy_to_backgrounds(host, ops, config, &path));

    Outcome::Applied {
        wallpaper: wallpaper_path,
        background_copy,
    }
}

fn run_legacy<H: Host>(host: &H, target: &WallpaperTarget, wallpaper_path: PathBuf) -> Outcome {
    if !download(host, &target.portrait_url, &wallpaper_path) {
        return Outcome::DownloadFailed;
    }

    info!("Applying background: {}", target.file_name);
    apply_background(host, &wallpaper_path);

    Outcome::Applied {
        wallpaper: wallpaper_path,
        background_copy: None,
    }
}

fn download<H: Host>(host: &H, url: &str, destination: &Path) -> bool {
    match host.quick_download(url, destination) {
        Ok(()) => true,
        Err(e) => {
            error!("Failed to download {}: {:#}", url, e);
            false
        }
    }
}

fn apply_background<H: Host>(host: &H, path: &Path) {
    match host.change_background(path) {
        Ok(true) => {}
        Ok(false) => warn!("No backend accepted background {}", path.display()),
        Err(e) => error!("Failed to apply background {}: {:#}", path.display(), e),
    }
}

/// Copies the landscape image to `<data>/backgrounds/landscape/background.jpg`.
fn copy_to_backgrounds<H: Host, F: FileOps>(
    host: &H,
    ops: &F,
    config: &Config,
    landscape_path: &Path,
) -> Option<PathBuf> {
    let backgrounds = host.create_folder(&config.data_dir, BACKGROUNDS_FOLDER)?;
    let destination = backgrounds.join(BACKGROUND_FILE);
    info!("Copying image to: {}", destination.display());

    match copy_file(ops, landscape_path, &destination) {
        Ok(_) => {
            info!("File copied successfully.");
            Some(destination)
        }
        Err(e) => {
            error!("Copy error: {}", e);
            None
        }
    }
}
