//! Annotation normalizer.
//!
//! Upload-time annotations arrive with arbitrary key casing and separators
//! (`galleryid`, `gallery-id`, `Gallery_Id`, ...). Each canonical field maps
//! to a fixed list of accepted spellings tried in priority order; the first
//! present non-empty value wins. The function is total: any map shape
//! normalizes without error.

use std::collections::HashMap;

/// Accepted spellings per canonical field, in priority order.
const GALLERY_ID_KEYS: &[&str] = &["galleryid", "gallery-id", "gallery_id"];
const TITLE_KEYS: &[&str] = &["title", "image-title", "imagetitle"];
const DESCRIPTION_KEYS: &[&str] = &["description", "image-description", "imagedescription"];
const FILE_NAME_KEYS: &[&str] = &["filename", "file-name", "file_name"];

/// Canonical annotation record. Absent fields stay unset, never empty
/// strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedAnnotation {
    pub gallery_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub file_name: Option<String>,
    /// Keys matching no canonical field, retained for pass-through (e.g.
    /// propagating custom annotations onto generated thumbnails).
    pub overflow: HashMap<String, String>,
}

/// Normalize a raw annotation map into the canonical record.
pub fn normalize(annotations: &HashMap<String, String>) -> NormalizedAnnotation {
    let folded: HashMap<String, &str> = annotations
        .iter()
        .map(|(k, v)| (k.to_lowercase(), v.as_str()))
        .collect();

    let pick = |spellings: &[&str]| {
        spellings
            .iter()
            .find_map(|k| folded.get(*k).filter(|v| !v.is_empty()))
            .map(|v| v.to_string())
    };

    let recognized = |key: &str| {
        [GALLERY_ID_KEYS, TITLE_KEYS, DESCRIPTION_KEYS, FILE_NAME_KEYS]
            .iter()
            .any(|spellings| spellings.contains(&key))
    };

    let overflow = annotations
        .iter()
        .filter(|(k, _)| !recognized(k.to_lowercase().as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    NormalizedAnnotation {
        gallery_id: pick(GALLERY_ID_KEYS),
        title: pick(TITLE_KEYS),
        description: pick(DESCRIPTION_KEYS),
        file_name: pick(FILE_NAME_KEYS),
        overflow,
    }
}
