//! Listing output shared by `browse` and `watch`.

use anyhow::Result;
use foto_core::listing::{FileInfo, Listing};

fn kind(entry: &FileInfo) -> &'static str {
    if entry.is_dir {
        "dir"
    } else if entry.is_photo {
        "photo"
    } else {
        "file"
    }
}

fn size_column(entry: &FileInfo) -> String {
    if entry.is_dir {
        "-".to_string()
    } else {
        entry.size.to_string()
    }
}

/// Renders a listing as a table, or pretty JSON when it is not a directory listing.
pub fn render_listing(listing: &Listing, json: bool) -> Result<String> {
    if !json {
        if let Ok(entries) = listing.entries() {
            return Ok(render_table(&entries));
        }
    }
    Ok(serde_json::to_string_pretty(listing.as_value())?)
}

fn render_table(entries: &[FileInfo]) -> String {
    if entries.is_empty() {
        return "(empty)".to_string();
    }
    let mut out = format!("{:<6} {:>12} {:<20} {}\n", "TYPE", "SIZE", "MODIFIED", "NAME");
    for e in entries {
        let name = if e.is_dir {
            format!("{}/", e.name)
        } else {
            e.name.clone()
        };
        out.push_str(&format!(
            "{:<6} {:>12} {:<20} {}\n",
            kind(e),
            size_column(e),
            e.mod_time.format("%Y-%m-%d %H:%M:%S"),
            name
        ));
    }
    out.pop();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn table_for_directory_listing() {
        let listing = Listing::new(json!([
            {
                "name": "2020", "size": 4096, "mode": 493,
                "modTime": "2020-01-02T03:04:05Z", "isDir": true, "isPhoto": false,
                "img": "/photos/2020/", "thumb": "/thumbnail/2020"
            },
            {
                "name": "a.jpg", "size": 1234, "mode": 420,
                "modTime": "2021-06-07T08:09:10Z", "isDir": false, "isPhoto": true,
                "img": "/photos/a.jpg", "thumb": "/thumbnail/a.jpg"
            }
        ]));
        let out = render_listing(&listing, false).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("TYPE"));
        assert!(lines[1].starts_with("dir"));
        assert!(lines[1].ends_with("2020/"));
        assert!(lines[1].contains("2020-01-02 03:04:05"));
        assert!(lines[2].starts_with("photo"));
        assert!(lines[2].contains("1234"));
    }

    #[test]
    fn opaque_payload_falls_back_to_json() {
        let listing = Listing::new(json!({ "k": 1 }));
        let out = render_listing(&listing, false).unwrap();
        assert!(out.contains("\"k\": 1"));
    }

    #[test]
    fn json_flag_forces_raw_output() {
        let listing = Listing::new(json!([]));
        assert_eq!(render_listing(&listing, true).unwrap(), "[]");
        assert_eq!(render_listing(&listing, false).unwrap(), "(empty)");
    }
}
