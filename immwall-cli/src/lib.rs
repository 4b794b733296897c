pub use crate::app::ImmWallApp;

mod app {
    use anyhow::{Context, Result};
    use immwall_core::runtime::{self, Runtime};
    use immwall_core::*;
    use std::path::Path;

    pub struct ImmWallApp {
        config: Config,
        runtime: Runtime,
        host: DesktopHost,
    }

    impl ImmWallApp {
        /// Resets the runtime, then loads the config. Call once per run.
        pub fn new(overrides: ConfigOverrides, verbose: bool) -> Result<Self> {
            let runtime = runtime::reset(verbose);
            let config = Config::new_with(overrides)?;
            let host = DesktopHost::new(config.settings.base_url.clone());

            Ok(Self { config, runtime, host })
        }

        pub fn config(&self) -> &Config {
            &self.config
        }

        pub fn fetch(&self, mode: WorkflowMode) -> Result<Outcome> {
            let outcome = fetch_wallpaper(&self.host, &StdFileOps, &self.config, &self.runtime, mode)?;
            match &outcome {
                Outcome::Offline => println!("Offline, nothing fetched"),
                Outcome::FolderUnavailable => eprintln!("Failed to create wallpapers folder"),
                Outcome::AlreadyPresent(path) => println!("Wallpaper already exists: {}", path.display()),
                Outcome::Applied { wallpaper, background_copy } => {
                    println!("Set wallpaper: {}", wallpaper.display());
                    if let Some(copy) = background_copy {
                        println!("Background copy: {}", copy.display());
                    }
                }
                Outcome::DownloadFailed => eprintln!("Failed to download the image"),
            }
            Ok(outcome)
        }

        pub fn copy(&self, source: &Path, destination: &Path) -> Result<u64> {
            let copied = copy_file(&StdFileOps, source, destination)
                .with_context(|| format!("copying {} to {}", source.display(), destination.display()))?;
            println!("Copied {} bytes to {}", copied, destination.display());
            Ok(copied)
        }

        pub fn exists(&self, path: &Path) -> bool {
            let exists = file_exists(&StdFileOps, path);
            println!("{}: {}", path.display(), if exists { "exists" } else { "not found" });
            exists
        }

        pub fn filename(&self, url: &str) -> String {
            let name = derive_file_name(url);
            println!("{}", name);
            name
        }

        pub fn demo(&self, options: &DemoOptions) -> Result<DemoReport> {
            println!("{}", self.runtime.banner());
            let report = run_demo(&self.host, &self.config, &self.runtime, options)?;
            println!("Random String: {}", report.random);
            println!("{}", if report.online { "Online" } else { "Offline" });
            if let Some(title) = &report.title {
                println!("Title: {}", title);
            }
            Ok(report)
        }

        pub fn show_paths(&self) {
            println!("Config file:   {}", self.config.settings_file.display());
            println!("Data dir:      {}", self.config.data_dir.display());
            println!("Downloads dir: {}", self.config.downloads_dir.display());
            println!("Feed URL:      {}", self.config.feed_url());
        }

        /// Writes the effective settings, defaults included, to the settings file.
        pub fn write_settings(&self) -> Result<()> {
            self.config.settings.save(&self.config.settings_file)?;
            println!("Wrote settings: {}", self.config.settings_file.display());
            Ok(())
        }
    }
}
