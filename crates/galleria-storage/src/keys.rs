//! Shared key derivation for the ingestion pipeline.
//!
//! Thumbnail keys are a pure function of the source key: the upload prefix is
//! substituted by the thumbnail prefix, so regenerating a thumbnail always
//! overwrites the previous one.

/// Derive the thumbnail key for a source key.
///
/// `uploads/abc.jpg` becomes `thumbnails/abc.jpg` with the default prefixes.
/// A key outside the upload prefix is prefixed as-is; the orchestrator only
/// calls this for keys it has already filtered to the upload prefix.
pub fn thumbnail_key(source_key: &str, upload_prefix: &str, thumbnail_prefix: &str) -> String {
    match source_key.strip_prefix(upload_prefix) {
        Some(rest) => format!("{}{}", thumbnail_prefix, rest),
        None => format!("{}{}", thumbnail_prefix, source_key),
    }
}

/// Final path segment of a key, used as the fallback filename when the
/// upload annotations carry none.
pub fn file_name_from_key(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_upload_prefix() {
        assert_eq!(
            thumbnail_key("uploads/abc-photo.jpg", "uploads/", "thumbnails/"),
            "thumbnails/abc-photo.jpg"
        );
    }

    #[test]
    fn preserves_nested_paths() {
        assert_eq!(
            thumbnail_key("uploads/2024/06/pic.png", "uploads/", "thumbnails/"),
            "thumbnails/2024/06/pic.png"
        );
    }

    #[test]
    fn is_deterministic() {
        let a = thumbnail_key("uploads/x.jpg", "uploads/", "thumbnails/");
        let b = thumbnail_key("uploads/x.jpg", "uploads/", "thumbnails/");
        assert_eq!(a, b);
    }

    #[test]
    fn file_name_is_last_segment() {
        assert_eq!(file_name_from_key("uploads/abc-photo.jpg"), "abc-photo.jpg");
        assert_eq!(file_name_from_key("abc-photo.jpg"), "abc-photo.jpg");
        assert_eq!(file_name_from_key("a/b/c.png"), "c.png");
    }
}
