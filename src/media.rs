//! Filename validation, sanitization, and MIME lookup for stored images.

use std::collections::HashSet;

use image::ImageFormat;

/// True when `filename` has an extension and it belongs to `allowed`
/// (case-insensitive). Names without a `.` are rejected outright.
pub fn is_allowed(filename: &str, allowed: &HashSet<String>) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => allowed.contains(&ext.to_ascii_lowercase()),
        None => false,
    }
}

/// Reduce an untrusted upload filename to a safe flat name.
///
/// Path separators become underscores before filtering, so traversal
/// sequences like `../../etc/passwd` collapse to `etc_passwd` and the
/// result can never address anything outside the upload root. Only
/// `[A-Za-z0-9._-]` survives; runs of dropped characters collapse to a
/// single underscore, and leading/trailing `.`/`_` are trimmed.
pub fn sanitize_filename(filename: &str) -> String {
    let mut out = String::with_capacity(filename.len());
    let mut last_was_sep = false;
    for ch in filename.chars() {
        if matches!(ch, 'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '-') {
            out.push(ch);
            last_was_sep = false;
        } else if !last_was_sep && !out.is_empty() {
            out.push('_');
            last_was_sep = true;
        } else {
            last_was_sep = true;
        }
    }
    out.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// MIME type for serving a stored file, derived from its extension.
pub fn mime_for(filename: &str) -> &'static str {
    filename
        .rsplit_once('.')
        .and_then(|(_, ext)| ImageFormat::from_extension(ext))
        .map(|f| f.to_mime_type())
        .unwrap_or("application/octet-stream")
}
