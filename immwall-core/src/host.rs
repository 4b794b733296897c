// Host services the workflows call into. The desktop build uses `DesktopHost`,
// tests swap in an in-memory host.
use anyhow::Result;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Success,
    Warn,
    Error,
}

impl fmt::Display for NotifyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NotifyLevel::Info => "info",
            NotifyLevel::Success => "success",
            NotifyLevel::Warn => "warn",
            NotifyLevel::Error => "error",
        };
        f.write_str(label)
    }
}

pub trait Host {
    /// Whether the network is reachable
    fn is_online(&self) -> bool;

    /// Fetch `url` and return the response body as text
    fn get_response(&self, url: &str) -> Result<String>;

    /// Create `parent/name` if missing, `None` when it cannot be created
    fn create_folder(&self, parent: &Path, name: &str) -> Option<PathBuf>;

    /// Download `url` into `destination`
    fn quick_download(&self, url: &str, destination: &Path) -> Result<()>;

    /// Apply `path` as the background. `Ok(false)` when no backend accepted it
    fn change_background(&self, path: &Path) -> Result<bool>;

    fn notify(&self, message: &str, level: NotifyLevel);

    fn sleep(&self, duration: Duration);
}
