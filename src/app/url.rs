//! URL validation and normalization utilities.

use log::warn;

/// Maximum URL length (2048 characters), matching common browser and server limits.
const MAX_URL_LENGTH: usize = 2048;

/// Validates and normalizes a resource link.
///
/// Trims whitespace and adds an `https://` prefix if the scheme is missing,
/// then checks that the result parses and uses http/https. Logs a warning and
/// returns `None` if the link is empty, too long, invalid, or uses another
/// scheme.
///
/// # Arguments
///
/// * `url` - The link as written in the content store
///
/// # Returns
///
/// `Some(normalized_url)` if the link can be checked, `None` otherwise.
pub fn validate_and_normalize_url(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        warn!("Skipping empty link");
        return None;
    }

    let normalized = if url.contains("://") {
        url.to_string()
    } else {
        format!("https://{url}")
    };

    if normalized.len() > MAX_URL_LENGTH {
        warn!(
            "Skipping link exceeding maximum length ({} > {}): {}...",
            normalized.len(),
            MAX_URL_LENGTH,
            normalized.chars().take(50).collect::<String>()
        );
        return None;
    }

    match url::Url::parse(&normalized) {
        Ok(parsed) => match parsed.scheme() {
            "http" | "https" if parsed.host_str().is_some() => Some(normalized),
            "http" | "https" => {
                warn!("Skipping link without host: {url}");
                None
            }
            _ => {
                warn!("Skipping unsupported scheme for link: {url}");
                None
            }
        },
        Err(_) => {
            warn!("Skipping invalid link: {url}");
            None
        }
    }
}

/// Host name of `url`, or `None` if it does not parse.
pub fn host_of(url: &str) -> Option<String> {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}
