//! Audio source resolution
//!
//! A source is a filesystem path or a `file://` URL.

use crate::error::AnalysisError;
use std::path::PathBuf;

const FILE_SCHEME: &str = "file://";

/// Resolve a source string to a local path
///
/// Accepts plain paths and `file://` URLs (with an optional `localhost`
/// authority and percent-encoded characters). The file is not opened here.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for an empty source, a URL with any
/// other scheme, or malformed percent-encoding.
///
/// # Example
///
/// ```
/// use rhythmic_dsp::io::resolve_source;
/// use std::path::PathBuf;
///
/// assert_eq!(resolve_source("/music/a.wav").unwrap(), PathBuf::from("/music/a.wav"));
/// assert_eq!(
///     resolve_source("file:///music/my%20song.wav").unwrap(),
///     PathBuf::from("/music/my song.wav")
/// );
/// assert!(resolve_source("https://example.com/a.wav").is_err());
/// ```
pub fn resolve_source(source: &str) -> Result<PathBuf, AnalysisError> {
    let source = source.trim();
    if source.is_empty() {
        return Err(AnalysisError::InvalidInput("Empty audio source".to_string()));
    }

    if let Some(rest) = strip_prefix_ignore_case(source, FILE_SCHEME) {
        let rest = strip_prefix_ignore_case(rest, "localhost").unwrap_or(rest);
        if !rest.starts_with('/') {
            return Err(AnalysisError::InvalidInput(format!(
                "Unsupported file URL authority: {}",
                source
            )));
        }
        let decoded = percent_decode(rest)?;
        return Ok(PathBuf::from(decoded));
    }

    if let Some(scheme) = url_scheme(source) {
        return Err(AnalysisError::InvalidInput(format!(
            "Unsupported URL scheme '{}': only local files can be analyzed",
            scheme
        )));
    }

    Ok(PathBuf::from(source))
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

/// `scheme` of a `scheme://...` string
///
/// Single-letter schemes are left alone so Windows drive paths pass through.
fn url_scheme(source: &str) -> Option<&str> {
    let (scheme, _) = source.split_once("://")?;
    let valid = scheme.len() > 1
        && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(scheme)
}

fn percent_decode(input: &str) -> Result<String, AnalysisError> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = input
                .get(i + 1..i + 3)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| {
                    AnalysisError::InvalidInput(format!("Malformed percent-encoding in '{}'", input))
                })?;
            out.push(hex);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8(out)
        .map_err(|_| AnalysisError::InvalidInput(format!("File URL is not valid UTF-8: '{}'", input)))
}
