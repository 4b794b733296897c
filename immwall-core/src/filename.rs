use log::debug;
use regex::Regex;
use std::sync::OnceLock;

/// Name used when a URL carries no `id=` parameter.
pub const DEFAULT_FILE_NAME: &str = "wallpaper.jpg";

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"id=([^&]+)").expect("valid id pattern"))
}

fn resolution_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d+)x(\d+)").expect("valid resolution pattern"))
}

/// Extracts the `id=` query value from an image URL, e.g.
/// "/th?id=OHR.TemplePhilae_EN-US5062419351_1920x1080.jpg&rf=...&pid=hp"
/// gives "OHR.TemplePhilae_EN-US5062419351_1920x1080.jpg".
///
/// Never fails: anything without a match falls back to [`DEFAULT_FILE_NAME`].
/// The value is returned as found; run it through [`sanitize_filename`]
/// before joining it onto a directory.
pub fn derive_file_name(file_url: &str) -> String {
    let file_name = match id_pattern().captures(file_url).and_then(|caps| caps.get(1)) {
        Some(id) => id.as_str().to_string(),
        None => {
            debug!("No filename match found in {}", file_url);
            DEFAULT_FILE_NAME.to_string()
        }
    };

    debug!("Filename: {}", file_name);
    file_name
}

/// Makes `name` safe to join onto a directory as a single path component.
///
/// Separators and anything outside `[A-Za-z0-9 ._-]` become `_`. Names that end
/// up empty or made only of dots fall back to [`DEFAULT_FILE_NAME`].
pub fn sanitize_filename(name: &str) -> String {
    let sanitized = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim()
        .to_string();

    if sanitized.chars().all(|c| c == '.') {
        return DEFAULT_FILE_NAME.to_string();
    }

    // Limit filename length to avoid filesystem issues
    if sanitized.len() > 100 {
        sanitized.chars().take(100).collect()
    } else {
        sanitized
    }
}

/// Last path segment of `url` with query and fragment stripped, or `fallback`.
pub fn online_file_name(url: &str, fallback: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or_default();
    let path = without_query
        .split_once("://")
        .map(|(_, rest)| rest.split_once('/').map(|(_, path)| path).unwrap_or(""))
        .unwrap_or(without_query);

    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}

/// Swaps the first `WIDTHxHEIGHT` token in `url` for `resolution`.
pub fn portrait_url(url: &str, resolution: &str) -> String {
    resolution_pattern()
        .replace(url, regex::NoExpand(resolution))
        .into_owned()
}
