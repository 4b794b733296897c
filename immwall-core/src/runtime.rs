//! Per-run setup. Every command starts from `reset()` and threads the returned
//! `Runtime` through instead of keeping process-wide state.

use chrono::{DateTime, Local};
use rand::Rng;

const ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

#[derive(Debug, Clone)]
pub struct Runtime {
    pub index: usize,
    pub id: String,
    pub started: DateTime<Local>,
}

impl Runtime {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            id: random_string(10),
            started: Local::now(),
        }
    }

    pub fn banner(&self) -> String {
        format!(
            "Runtime (index-> {}, id-> {}, time-> {})",
            self.index,
            self.id,
            self.started.format("%H:%M:%S")
        )
    }
}

/// Initializes logging (once per process) and returns a fresh runtime.
///
/// `RUST_LOG` wins over `verbose` when set.
pub fn reset(verbose: bool) -> Runtime {
    let default_level = if verbose { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .try_init();

    let runtime = Runtime::new(0);
    log::debug!("{}", runtime.banner());
    runtime
}

/// Random alphanumeric string of `length` characters.
pub fn random_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| ID_CHARSET[rng.gen_range(0..ID_CHARSET.len())] as char)
        .collect()
}
