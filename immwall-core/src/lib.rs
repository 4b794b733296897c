pub mod config;
pub mod copy;
pub mod demo;
pub mod desktop;
pub mod error;
pub mod feed;
pub mod filename;
pub mod host;
pub mod runtime;
pub mod workflow;

pub use config::{Config, ConfigOverrides, Settings};
pub use copy::{copy_file, copy_file_with_capacity, file_exists, FileOps, OpenFlags, StdFileOps, BUFFER_SIZE};
pub use demo::{run_demo, DemoOptions, DemoReport};
pub use desktop::DesktopHost;
pub use error::{CopyError, FeedError};
pub use feed::{parse_feed, ImageInfo};
pub use filename::{derive_file_name, online_file_name, portrait_url, sanitize_filename, DEFAULT_FILE_NAME};
pub use host::{Host, NotifyLevel};
pub use runtime::Runtime;
pub use workflow::{fetch_wallpaper, resolve_target, Outcome, WallpaperTarget, WorkflowMode};
