use crate::host::{Host, NotifyLevel};
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

const ONLINE_TIMEOUT: Duration = Duration::from_secs(5);

/// `Host` for a desktop session: attohttpc for the network, `std::fs` for
/// folders and the `wallpaper` crate for the background.
#[derive(Debug, Clone)]
pub struct DesktopHost {
    check_url: String,
}

impl DesktopHost {
    /// `check_url` is hit with a HEAD request to decide whether we are online.
    pub fn new(check_url: impl Into<String>) -> Self {
        Self {
            check_url: check_url.into(),
        }
    }
}

impl Host for DesktopHost {
    fn is_online(&self) -> bool {
        match attohttpc::head(&self.check_url).timeout(ONLINE_TIMEOUT).send() {
            Ok(_) => true,
            Err(e) => {
                debug!("Online check against {} failed: {}", self.check_url, e);
                false
            }
        }
    }

    fn get_response(&self, url: &str) -> Result<String> {
        let response = attohttpc::get(url)
            .send()
            .with_context(|| format!("requesting {}", url))?
            .error_for_status()
            .with_context(|| format!("bad status from {}", url))?;
        Ok(response.text()?)
    }

    fn create_folder(&self, parent: &Path, name: &str) -> Option<PathBuf> {
        let folder = parent.join(name);
        match fs::create_dir_all(&folder) {
            Ok(()) => Some(folder),
            Err(e) => {
                error!("Failed to create folder {}: {}", folder.display(), e);
                None
            }
        }
    }

    fn quick_download(&self, url: &str, destination: &Path) -> Result<()> {
        let response = attohttpc::get(url)
            .send()
            .with_context(|| format!("requesting {}", url))?
            .error_for_status()
            .with_context(|| format!("bad status from {}", url))?;

        let file = File::create(destination)
            .with_context(|| format!("creating {}", destination.display()))?;
        match response.write_to(file) {
            Ok(bytes) => {
                debug!("Downloaded {} bytes to {}", bytes, destination.display());
                Ok(())
            }
            Err(e) => {
                // a truncated image would pass the existence check next run
                let _ = fs::remove_file(destination);
                Err(e).with_context(|| format!("downloading {}", url))
            }
        }
    }

    fn change_background(&self, path: &Path) -> Result<bool> {
        let file_loc = path.to_string_lossy();
        match wallpaper::set_from_path(&file_loc) {
            Ok(()) => {
                info!("Wallpaper set successfully to: {}", file_loc);
                Ok(true)
            }
            Err(e) => {
                warn!("Failed to set wallpaper: {}", e);
                if cfg!(target_os = "linux") {
                    return set_wallpaper_linux_fallback(path);
                }
                Ok(false)
            }
        }
    }

    fn notify(&self, message: &str, level: NotifyLevel) {
        match level {
            NotifyLevel::Error => error!("{}", message),
            NotifyLevel::Warn => warn!("{}", message),
            NotifyLevel::Info | NotifyLevel::Success => info!("{}", message),
        }
        println!("[{}] {}", level, message);
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

fn get_desktop_environment() -> String {
    if let Ok(desktop_session) = std::env::var("DESKTOP_SESSION") {
        let session = desktop_session.to_lowercase();
        if ["gnome", "unity", "cinnamon", "mate", "xfce4", "kde"].contains(&session.as_str()) {
            return session;
        }

        if session.contains("xfce") || session.starts_with("xubuntu") {
            return "xfce4".to_string();
        } else if session.starts_with("kubuntu") || session.starts_with("plasma") {
            return "kde".to_string();
        } else if session.starts_with("ubuntu") {
            return "gnome".to_string();
        }
    }

    if std::env::var("KDE_FULL_SESSION").unwrap_or_default() == "true" {
        return "kde".to_string();
    }

    if std::env::var("GNOME_DESKTOP_SESSION_ID").is_ok() {
        return "gnome".to_string();
    }

    "unknown".to_string()
}

fn set_wallpaper_linux_fallback(file_path: &Path) -> Result<bool> {
    let file_loc = file_path.to_string_lossy();
    let desktop_env = get_desktop_environment();

    match desktop_env.as_str() {
        "gnome" | "unity" | "cinnamon" => {
            let uri = format!("file://{}", file_loc);
            let output = Command::new("gsettings")
                .args(["set", "org.gnome.desktop.background", "picture-uri", &uri])
                .output()?;
            // Dark-style sessions read a separate key; older GNOME lacks it.
            let _ = Command::new("gsettings")
                .args(["set", "org.gnome.desktop.background", "picture-uri-dark", &uri])
                .output();
            Ok(output.status.success())
        }
        "mate" => {
            let output = Command::new("gsettings")
                .args(["set", "org.mate.background", "picture-filename", &file_loc])
                .output()?;
            Ok(output.status.success())
        }
        "xfce4" => {
            let list_output = Command::new("xfconf-query")
                .args(["-c", "xfce4-desktop", "-l"])
                .output()?;
            if !list_output.status.success() {
                return Ok(false);
            }

            let paths = String::from_utf8_lossy(&list_output.stdout);
            let mut applied = false;
            for path in paths.lines().map(str::trim).filter(|line| line.ends_with("last-image")) {
                let output = Command::new("xfconf-query")
                    .args(["-c", "xfce4-desktop", "-p", path, "-s", &file_loc])
                    .output()?;
                applied |= output.status.success();
            }
            Ok(applied)
        }
        "kde" => {
            let output = Command::new("plasma-apply-wallpaperimage")
                .arg(file_loc.as_ref())
                .output()?;
            Ok(output.status.success())
        }
        _ => {
            warn!("Desktop environment '{}' not supported", desktop_env);
            Ok(false)
        }
    }
}
