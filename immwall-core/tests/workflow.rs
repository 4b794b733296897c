use anyhow::{bail, Result};
use immwall_core::runtime::Runtime;
use immwall_core::{
    fetch_wallpaper, run_demo, Config, DemoOptions, FeedError, Host, NotifyLevel, Outcome, StdFileOps, WorkflowMode,
    DEFAULT_FILE_NAME,
};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::{tempdir, TempDir};

const FEED: &str = r#"{"images":[{
    "url": "/th?id=OHR.HappySunflower_EN-US8791544241_1920x1080.jpg&rf=LaDigue_1920x1080.jpg&pid=hp",
    "copyright": "Sunflowers in a field in summer (© Arsgera/Shutterstock)",
    "title": "Sunflowers"
}]}"#;

const FILE_NAME: &str = "OHR.HappySunflower_EN-US8791544241_1920x1080.jpg";

#[derive(Default)]
struct FakeHost {
    offline: bool,
    body: String,
    fail_downloads: bool,
    fail_folders: bool,
    fetched: RefCell<Vec<String>>,
    downloads: RefCell<Vec<(String, PathBuf)>>,
    backgrounds: RefCell<Vec<PathBuf>>,
    notifications: RefCell<Vec<(String, NotifyLevel)>>,
    sleeps: RefCell<Vec<Duration>>,
}

impl FakeHost {
    fn with_body(body: &str) -> Self {
        Self {
            body: body.to_string(),
            ..Default::default()
        }
    }
}

impl Host for FakeHost {
    fn is_online(&self) -> bool {
        !self.offline
    }

    fn get_response(&self, url: &str) -> Result<String> {
        self.fetched.borrow_mut().push(url.to_string());
        Ok(self.body.clone())
    }

    fn create_folder(&self, parent: &Path, name: &str) -> Option<PathBuf> {
        if self.fail_folders {
            return None;
        }
        let folder = parent.join(name);
        fs::create_dir_all(&folder).ok()?;
        Some(folder)
    }

    fn quick_download(&self, url: &str, destination: &Path) -> Result<()> {
        self.downloads
            .borrow_mut()
            .push((url.to_string(), destination.to_path_buf()));
        if self.fail_downloads {
            bail!("connection reset");
        }
        fs::write(destination, format!("image from {}", url))?;
        Ok(())
    }

    fn change_background(&self, path: &Path) -> Result<bool> {
        self.backgrounds.borrow_mut().push(path.to_path_buf());
        Ok(true)
    }

    fn notify(&self, message: &str, level: NotifyLevel) {
        self.notifications.borrow_mut().push((message.to_string(), level));
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
    }
}

fn test_config() -> (TempDir, Config) {
    let dir = tempdir().unwrap();
    let config = Config::from_dirs(
        dir.path().join("config"),
        dir.path().join("data"),
        dir.path().join("downloads"),
        dir.path().join("config").join("settings.json"),
    )
    .unwrap();
    (dir, config)
}

fn feed_with_id(id: &str) -> String {
    serde_json::json!({
        "images": [{
            "url": format!("/th?id={}&pid=hp", id),
            "copyright": "Somewhere (© Someone)",
        }]
    })
    .to_string()
}

fn run(host: &FakeHost, config: &Config, mode: WorkflowMode) -> Result<Outcome> {
    fetch_wallpaper(host, &StdFileOps, config, &Runtime::new(0), mode)
}

#[test]
fn test_offline_does_nothing() {
    let (_dir, config) = test_config();
    let host = FakeHost {
        offline: true,
        ..FakeHost::with_body(FEED)
    };

    assert_eq!(run(&host, &config, WorkflowMode::Full).unwrap(), Outcome::Offline);
    assert!(host.fetched.borrow().is_empty());
    assert!(host.notifications.borrow().is_empty());
}

#[test]
fn test_fresh_run_downloads_applies_and_copies() {
    let (_dir, config) = test_config();
    let host = FakeHost::with_body(FEED);

    let outcome = run(&host, &config, WorkflowMode::Full).unwrap();

    let wallpaper = config.downloads_dir.join("BingWallpapers").join(FILE_NAME);
    let landscape = config.downloads_dir.join("BingWallpapers").join("landscape").join(FILE_NAME);
    let background = config.data_dir.join("backgrounds/landscape").join("background.jpg");
    assert_eq!(
        outcome,
        Outcome::Applied {
            wallpaper: wallpaper.clone(),
            background_copy: Some(background.clone()),
        }
    );

    let downloads = host.downloads.borrow();
    assert_eq!(downloads.len(), 2);
    assert!(downloads[0].0.contains("_1080x1920.jpg&rf=LaDigue_1920x1080.jpg"));
    assert_eq!(downloads[0].1, wallpaper);
    assert!(downloads[1].0.starts_with("https://www.bing.com/th?id=OHR.HappySunflower"));
    assert!(downloads[1].0.contains("_1920x1080.jpg&rf="));
    assert_eq!(downloads[1].1, landscape);

    assert_eq!(*host.backgrounds.borrow(), vec![wallpaper]);
    assert_eq!(fs::read(&background).unwrap(), fs::read(&landscape).unwrap());
    assert_eq!(*host.sleeps.borrow(), vec![Duration::from_millis(4000)]);
    assert_eq!(
        *host.notifications.borrow(),
        vec![(
            "Sunflowers in a field in summer (© Arsgera/Shutterstock)".to_string(),
            NotifyLevel::Info
        )]
    );
}

#[test]
fn test_existing_wallpaper_skips_downloads_but_notifies() {
    let (_dir, config) = test_config();
    let folder = config.downloads_dir.join("BingWallpapers");
    fs::create_dir_all(&folder).unwrap();
    fs::write(folder.join(FILE_NAME), b"already here").unwrap();
    let host = FakeHost::with_body(FEED);

    let outcome = run(&host, &config, WorkflowMode::Full).unwrap();

    assert_eq!(outcome, Outcome::AlreadyPresent(folder.join(FILE_NAME)));
    assert!(host.downloads.borrow().is_empty());
    assert!(host.backgrounds.borrow().is_empty());
    assert_eq!(host.notifications.borrow().len(), 1);
}

#[test]
fn test_absolute_id_stays_in_wallpapers_folder() {
    let (dir, config) = test_config();
    let outside = dir.path().join("outside.jpg");
    let host = FakeHost::with_body(&feed_with_id(&outside.to_string_lossy()));

    let outcome = run(&host, &config, WorkflowMode::Full).unwrap();

    let folder = config.downloads_dir.join("BingWallpapers");
    let Outcome::Applied { wallpaper, .. } = outcome else {
        panic!("expected the wallpaper to be applied, got {:?}", outcome);
    };
    assert_eq!(wallpaper.parent(), Some(folder.as_path()));
    assert!(wallpaper.is_file());
    assert!(!outside.exists());
    for (_, destination) in host.downloads.borrow().iter() {
        assert!(destination.starts_with(&folder), "{}", destination.display());
    }
}

#[test]
fn test_parent_dir_id_stays_in_wallpapers_folder() {
    let (dir, config) = test_config();
    let host = FakeHost::with_body(&feed_with_id("../../escaped.jpg"));

    let outcome = run(&host, &config, WorkflowMode::Full).unwrap();

    let folder = config.downloads_dir.join("BingWallpapers");
    let Outcome::Applied { wallpaper, .. } = outcome else {
        panic!("expected the wallpaper to be applied, got {:?}", outcome);
    };
    assert_eq!(wallpaper.parent(), Some(folder.as_path()));
    assert!(!dir.path().join("escaped.jpg").exists());
    assert!(!config.downloads_dir.join("escaped.jpg").exists());
    for (_, destination) in host.downloads.borrow().iter() {
        assert!(destination.starts_with(&folder), "{}", destination.display());
    }
}

#[test]
fn test_dot_dot_id_falls_back_to_default_name() {
    let (_dir, config) = test_config();
    let host = FakeHost::with_body(&feed_with_id(".."));

    run(&host, &config, WorkflowMode::Legacy).unwrap();

    let downloads = host.downloads.borrow();
    assert_eq!(downloads.len(), 1);
    assert_eq!(
        downloads[0].1,
        config.downloads_dir.join("BingWallpapers").join(DEFAULT_FILE_NAME)
    );
}

// Opening a directory read-only succeeds on Unix, so it counts as present.
#[cfg(unix)]
#[test]
fn test_directory_at_wallpaper_path_counts_as_present() {
    let (_dir, config) = test_config();
    let taken = config.downloads_dir.join("BingWallpapers").join(FILE_NAME);
    fs::create_dir_all(&taken).unwrap();
    let host = FakeHost::with_body(FEED);

    let outcome = run(&host, &config, WorkflowMode::Full).unwrap();

    assert_eq!(outcome, Outcome::AlreadyPresent(taken.clone()));
    assert!(taken.is_dir());
    assert!(host.downloads.borrow().is_empty());
    assert!(host.backgrounds.borrow().is_empty());
}

#[test]
fn test_malformed_feed_propagates() {
    let (_dir, config) = test_config();
    let host = FakeHost::with_body("<html>rate limited</html>");

    let err = run(&host, &config, WorkflowMode::Full).unwrap_err();

    assert!(matches!(err.downcast_ref::<FeedError>(), Some(FeedError::Parse(_))));
    assert!(host.downloads.borrow().is_empty());
    assert!(host.notifications.borrow().is_empty());
}

#[test]
fn test_folder_failure_stops_before_download() {
    let (_dir, config) = test_config();
    let host = FakeHost {
        fail_folders: true,
        ..FakeHost::with_body(FEED)
    };

    assert_eq!(run(&host, &config, WorkflowMode::Full).unwrap(), Outcome::FolderUnavailable);
    assert!(host.downloads.borrow().is_empty());
    assert!(host.notifications.borrow().is_empty());
}

#[test]
fn test_failed_download_does_not_apply() {
    let (_dir, config) = test_config();
    let host = FakeHost {
        fail_downloads: true,
        ..FakeHost::with_body(FEED)
    };

    assert_eq!(run(&host, &config, WorkflowMode::Full).unwrap(), Outcome::DownloadFailed);
    assert!(host.backgrounds.borrow().is_empty());
    assert!(!config.data_dir.join("backgrounds").exists());
    assert_eq!(host.notifications.borrow().len(), 1);
}

#[test]
fn test_legacy_downloads_portrait_only_even_when_present() {
    let (_dir, config) = test_config();
    let folder = config.downloads_dir.join("BingWallpapers");
    fs::create_dir_all(&folder).unwrap();
    fs::write(folder.join(FILE_NAME), b"stale").unwrap();
    let host = FakeHost::with_body(FEED);

    let outcome = run(&host, &config, WorkflowMode::Legacy).unwrap();

    assert_eq!(
        outcome,
        Outcome::Applied {
            wallpaper: folder.join(FILE_NAME),
            background_copy: None,
        }
    );
    assert_eq!(host.downloads.borrow().len(), 1);
    assert!(!folder.join("landscape").exists());
    assert_ne!(fs::read(folder.join(FILE_NAME)).unwrap(), b"stale");
}

#[test]
fn test_market_is_appended_to_feed_url() {
    let (_dir, mut config) = test_config();
    config.settings.market = Some("fr-FR".to_string());
    let host = FakeHost::with_body(FEED);

    run(&host, &config, WorkflowMode::Full).unwrap();

    assert!(host.fetched.borrow()[0].ends_with("&mkt=fr-FR"));
}

#[test]
fn test_demo_fetches_saves_and_downloads() {
    let (dir, config) = test_config();
    let host = FakeHost::with_body(r#"{"userId":1,"id":1,"title":"delectus aut autem","completed":false}"#);
    let save_path = dir.path().join("todo.json");
    let options = DemoOptions {
        delay: Duration::ZERO,
        fetch_url: Some("https://jsonplaceholder.typicode.com/todos/1".to_string()),
        save_path: Some(save_path.clone()),
        download_url: Some("https://example.com/releases/WUTMini.7z".to_string()),
    };

    let report = run_demo(&host, &config, &Runtime::new(0), &options).unwrap();

    assert!(report.online);
    assert_eq!(report.random.len(), 10);
    assert_eq!(report.title.as_deref(), Some("delectus aut autem"));
    assert_eq!(report.saved, Some(save_path.clone()));
    assert!(fs::read_to_string(&save_path).unwrap().contains("delectus"));
    assert_eq!(report.downloaded, Some(config.downloads_dir.join("WUTMini.7z")));
    assert_eq!(*host.sleeps.borrow(), vec![Duration::ZERO]);
    assert!(host
        .notifications
        .borrow()
        .iter()
        .any(|(message, level)| message.starts_with("Time now is: ") && *level == NotifyLevel::Success));
}
