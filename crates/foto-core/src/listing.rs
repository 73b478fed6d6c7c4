//! Listing payloads and directory entry model.
//!
//! The fetcher treats a [`Listing`] as an opaque JSON value; [`FileInfo`] is
//! the entry shape the photo server emits, for consumers that want typed access.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Path fetched when the navigation path is empty or absent.
pub const DEFAULT_PATH: &str = "/photos/";

/// Effective retrieval path for a navigation value.
///
/// Empty or missing values resolve to [`DEFAULT_PATH`]; anything else is used verbatim.
pub fn resolve_path(raw: Option<&str>) -> String {
    resolve_path_or(raw, DEFAULT_PATH)
}

/// Like [`resolve_path`] with a caller-chosen default.
pub fn resolve_path_or(raw: Option<&str>, default: &str) -> String {
    match raw {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => default.to_string(),
    }
}

/// Pass-through payload returned by a listing retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Listing(serde_json::Value);

impl Listing {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }

    /// Decode the payload as a photo server directory listing.
    pub fn entries(&self) -> Result<Vec<FileInfo>, serde_json::Error> {
        Vec::<FileInfo>::deserialize(&self.0)
    }
}

impl From<serde_json::Value> for Listing {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// Summary of a photo's header: EXIF orientation and pixel dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoHeader {
    /// EXIF orientation tag value (1..=8).
    pub orientation: u8,
    pub width: u32,
    pub height: u32,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub size: u64,
    pub mode: u32,
    pub mod_time: DateTime<Utc>,
    pub is_dir: bool,
    pub is_photo: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exif: Option<PhotoHeader>,
    /// Link to the raw file under `/photos/`.
    #[serde(rename = "img")]
    pub url: String,
    /// Link to the thumbnail under `/thumbnail/`.
    #[serde(rename = "thumb")]
    pub thumb_url: String,
}

/// True for non-directory entries with a JPEG extension.
pub fn is_photo_name(name: &str, is_dir: bool) -> bool {
    if is_dir {
        return false;
    }
    let lower = name.to_ascii_lowercase();
    lower.ends_with(".jpg") || lower.ends_with(".jpeg")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolve_empty_and_missing_to_default() {
        assert_eq!(resolve_path(None), "/photos/");
        assert_eq!(resolve_path(Some("")), "/photos/");
    }

    #[test]
    fn resolve_non_empty_verbatim() {
        assert_eq!(resolve_path(Some("/photos/2020/")), "/photos/2020/");
        assert_eq!(resolve_path(Some("relative")), "relative");
        assert_eq!(resolve_path(Some(" ")), " ");
    }

    #[test]
    fn resolve_with_custom_default() {
        assert_eq!(resolve_path_or(Some(""), "/albums/"), "/albums/");
        assert_eq!(resolve_path_or(Some("/x/"), "/albums/"), "/x/");
    }

    #[test]
    fn photo_name_detection() {
        assert!(is_photo_name("a.jpg", false));
        assert!(is_photo_name("B.JPG", false));
        assert!(is_photo_name("c.jpeg", false));
        assert!(!is_photo_name("a.jpg", true));
        assert!(!is_photo_name("notes.txt", false));
        assert!(!is_photo_name("jpg", false));
    }

    #[test]
    fn listing_entries_decode_server_shape() {
        let listing = Listing::new(json!([
            {
                "name": "a.jpg",
                "size": 1024,
                "mode": 420,
                "modTime": "2020-05-01T10:00:00Z",
                "isDir": false,
                "isPhoto": true,
                "exif": { "orientation": 6, "width": 4000, "height": 3000 },
                "img": "/photos/2020/a.jpg",
                "thumb": "/thumbnail/2020/a.jpg"
            },
            {
                "size": 0,
                "mode": 493,
                "modTime": "2020-05-01T12:00:00+02:00",
                "isDir": true,
                "isPhoto": false,
                "img": "/photos/2020/",
                "thumb": "/thumbnail/2020/"
            }
        ]));
        let entries = listing.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "a.jpg");
        assert_eq!(entries[0].exif.as_ref().map(|e| e.orientation), Some(6));
        assert_eq!(entries[0].url, "/photos/2020/a.jpg");
        assert!(entries[1].name.is_empty());
        assert!(entries[1].is_dir);
        assert_eq!(entries[1].mod_time.to_rfc3339(), "2020-05-01T10:00:00+00:00");
    }

    #[test]
    fn listing_opaque_payload_is_not_entries() {
        let listing = Listing::new(json!({ "unexpected": true }));
        assert!(listing.entries().is_err());
        assert_eq!(listing.as_value()["unexpected"], json!(true));
    }
}
