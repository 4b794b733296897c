use anyhow::{Context, Result};
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_feed_url() -> String {
    "https://www.bing.com/HPImageArchive.aspx?format=js&idx=0&n=1".to_string()
}

fn default_base_url() -> String {
    "https://www.bing.com".to_string()
}

fn default_portrait_resolution() -> String {
    "1080x1920".to_string()
}

fn default_folder_name() -> String {
    "BingWallpapers".to_string()
}

fn default_notify_delay_ms() -> u64 {
    4000
}

/// User-tunable settings, read from `settings.json` when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_feed_url")]
    pub feed_url: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_portrait_resolution")]
    pub portrait_resolution: String,
    #[serde(default = "default_folder_name")]
    pub folder_name: String,
    #[serde(default = "default_notify_delay_ms")]
    pub notify_delay_ms: u64,
    #[serde(default)]
    pub market: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            feed_url: default_feed_url(),
            base_url: default_base_url(),
            portrait_resolution: default_portrait_resolution(),
            folder_name: default_folder_name(),
            notify_delay_ms: default_notify_delay_ms(),
            market: None,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("reading settings {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("parsing settings {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("creating settings directory")?;
        }
        let json = serde_json::to_string_pretty(self).context("serializing settings")?;
        fs::write(path, json).with_context(|| format!("writing settings {}", path.display()))?;
        Ok(())
    }
}

/// Directory overrides, usually coming from the command line.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub settings_file: Option<PathBuf>,
    pub downloads_dir: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
    pub downloads_dir: PathBuf,
    pub settings_file: PathBuf,
    pub settings: Settings,
}

impl Config {
    pub fn new_with(overrides: ConfigOverrides) -> Result<Self> {
        let proj_dirs = ProjectDirs::from("com", "immwall", "immwall")
            .context("Failed to get project directories")?;

        let config_dir = proj_dirs.config_dir().to_path_buf();
        let data_dir = overrides
            .data_dir
            .unwrap_or_else(|| proj_dirs.data_dir().to_path_buf());
        let downloads_dir = overrides.downloads_dir.unwrap_or_else(|| {
            UserDirs::new()
                .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
                .unwrap_or_else(|| data_dir.join("downloads"))
        });
        let settings_file = overrides
            .settings_file
            .unwrap_or_else(|| config_dir.join("settings.json"));

        Self::from_dirs(config_dir, data_dir, downloads_dir, settings_file)
    }

    /// Builds a config rooted at explicit directories, creating them if needed.
    pub fn from_dirs(
        config_dir: PathBuf,
        data_dir: PathBuf,
        downloads_dir: PathBuf,
        settings_file: PathBuf,
    ) -> Result<Self> {
        // Create directories if they don't exist
        fs::create_dir_all(&config_dir)
            .with_context(|| format!("creating {}", config_dir.display()))?;
        fs::create_dir_all(&data_dir).with_context(|| format!("creating {}", data_dir.display()))?;
        fs::create_dir_all(&downloads_dir)
            .with_context(|| format!("creating {}", downloads_dir.display()))?;

        let settings = Settings::load(&settings_file)?;
        log::debug!("Config loaded: data_dir={:?}, downloads_dir={:?}", data_dir, downloads_dir);

        Ok(Config {
            config_dir,
            data_dir,
            downloads_dir,
            settings_file,
            settings,
        })
    }

    /// Feed URL with the configured market applied.
    pub fn feed_url(&self) -> String {
        crate::feed::feed_url(&self.settings.feed_url, self.settings.market.as_deref())
    }
}
