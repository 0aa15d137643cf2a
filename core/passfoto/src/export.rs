//! Download naming for exported photos.

use chrono::{DateTime, Utc};

use crate::format::PhotoFormat;
use crate::OutputFormat;

/// Lowercase a display name and keep only ASCII letters, digits and
/// underscores, with whitespace runs collapsed to a single underscore.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;
    for ch in name.trim().chars() {
        if ch.is_whitespace() {
            pending_separator = !slug.is_empty();
            continue;
        }
        for lower in ch.to_lowercase() {
            if lower.is_ascii_alphanumeric() || lower == '_' {
                if pending_separator {
                    slug.push('_');
                    pending_separator = false;
                }
                slug.push(lower);
            }
        }
    }
    slug
}

/// File name for a composed photo downloaded at `at`:
/// `{slug-}passport-{format}-{width}x{height}-{millis}.{ext}`.
///
/// The person-name prefix is dropped when the name is missing or slugifies
/// to nothing; the millisecond timestamp keeps repeated exports distinct.
pub fn download_file_name(
    person_name: Option<&str>,
    format: &PhotoFormat,
    output: OutputFormat,
    at: DateTime<Utc>,
) -> String {
    let slug = person_name.map(slugify).unwrap_or_default();
    let prefix = if slug.is_empty() {
        String::new()
    } else {
        format!("{slug}-")
    };
    format!(
        "{prefix}passport-{}-{}x{}-{}.{}",
        format.id,
        format.width_px,
        format.height_px,
        at.timestamp_millis(),
        output.extension()
    )
}

/// [`download_file_name`] stamped with the current time.
pub fn download_file_name_now(
    person_name: Option<&str>,
    format: &PhotoFormat,
    output: OutputFormat,
) -> String {
    download_file_name(person_name, format, output, Utc::now())
}
