//! Small tour of the host services: notifications, timers, online check,
//! JSON fetch and a quick download.

use crate::config::Config;
use crate::filename::{online_file_name, sanitize_filename};
use crate::host::{Host, NotifyLevel};
use crate::runtime::{random_string, Runtime};
use anyhow::{Context, Result};
use chrono::Local;
use log::{info, warn};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DemoOptions {
    pub delay: Duration,
    /// URL returning a JSON object; its `title` field is logged.
    pub fetch_url: Option<String>,
    /// Where to write the fetched body.
    pub save_path: Option<PathBuf>,
    pub download_url: Option<String>,
}

impl Default for DemoOptions {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(2500),
            fetch_url: None,
            save_path: None,
            download_url: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct DemoReport {
    pub random: String,
    pub online: bool,
    pub title: Option<String>,
    pub saved: Option<PathBuf>,
    pub downloaded: Option<PathBuf>,
}

pub fn run_demo<H: Host>(host: &H, config: &Config, runtime: &Runtime, options: &DemoOptions) -> Result<DemoReport> {
    let mut report = DemoReport::default();

    info!("{}", runtime.banner());
    report.random = random_string(10);
    info!("Random String: {}", report.random);

    host.notify(&format!("Runtime ({}) started", runtime.id), NotifyLevel::Info);
    host.notify("Timer started", NotifyLevel::Warn);
    host.sleep(options.delay);
    let now = Local::now().format("%H:%M:%S").to_string();
    host.notify(&format!("Time now is: {}", now), NotifyLevel::Success);

    report.online = host.is_online();
    if report.online {
        info!("Online");
    } else {
        warn!("Offline");
    }

    if let Some(url) = &options.fetch_url {
        let body = host.get_response(url)?;
        let value: serde_json::Value =
            serde_json::from_str(&body).with_context(|| format!("parsing response from {}", url))?;
        report.title = value.get("title").and_then(|t| t.as_str()).map(str::to_string);
        info!("Title: {}", report.title.as_deref().unwrap_or("(none)"));

        if let Some(path) = &options.save_path {
            fs::write(path, &body).with_context(|| format!("writing {}", path.display()))?;
            host.notify(&format!("Saved: {}", path.display()), NotifyLevel::Success);
            report.saved = Some(path.clone());
        }
    }

    if let Some(url) = &options.download_url {
        let destination = config
            .downloads_dir
            .join(sanitize_filename(&online_file_name(url, "download.bin")));
        host.quick_download(url, &destination)?;
        host.notify(&format!("Downloaded: {}", destination.display()), NotifyLevel::Success);
        report.downloaded = Some(destination);
    }

    Ok(report)
}
