//! Request path decoding and confinement to the storage root.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::path::{Path, PathBuf};

use super::error::ServerError;

/// Characters escaped inside a single URL path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Decoded, validated segments of a request path relative to a mount point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelPath {
    segments: Vec<String>,
}

impl RelPath {
    /// Parses a percent-encoded request path such as `/2020/summer%20trip/`.
    ///
    /// Empty segments are ignored. `.`, `..`, backslashes and NUL are rejected.
    pub fn parse(encoded: &str) -> Result<Self, ServerError> {
        let decoded = percent_decode_str(encoded)
            .decode_utf8()
            .map_err(|_| ServerError::BadRequest(format!("path is not UTF-8: {}", encoded)))?;
        let mut segments = Vec::new();
        for seg in decoded.split('/') {
            if seg.is_empty() {
                continue;
            }
            if seg == "." || seg == ".." || seg.contains('\\') || seg.contains('\0') {
                return Err(ServerError::BadRequest(format!(
                    "invalid path segment {:?}",
                    seg
                )));
            }
            segments.push(seg.to_string());
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Filesystem location under `root`.
    pub fn under(&self, root: &Path) -> PathBuf {
        let mut p = root.to_path_buf();
        for seg in &self.segments {
            p.push(seg);
        }
        p
    }

    /// URL path for `name` inside this directory, below `mount` (e.g. "/photos").
    pub fn link(&self, mount: &str, name: &str) -> String {
        let mut out = String::from(mount.trim_end_matches('/'));
        for seg in self.segments.iter().map(String::as_str).chain(Some(name)) {
            out.push('/');
            out.extend(utf8_percent_encode(seg, SEGMENT));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_root_and_nested() {
        assert!(RelPath::parse("/").unwrap().segments().is_empty());
        assert!(RelPath::parse("").unwrap().segments().is_empty());
        assert_eq!(
            RelPath::parse("/2020//summer%20trip/").unwrap().segments(),
            &["2020".to_string(), "summer trip".to_string()]
        );
    }

    #[test]
    fn parse_rejects_traversal() {
        assert!(matches!(
            RelPath::parse("/../etc/passwd"),
            Err(ServerError::BadRequest(_))
        ));
        assert!(matches!(
            RelPath::parse("/a/%2e%2e/b"),
            Err(ServerError::BadRequest(_))
        ));
        assert!(matches!(
            RelPath::parse("/a%5c..%5cb"),
            Err(ServerError::BadRequest(_))
        ));
        assert!(RelPath::parse("/%ff").is_err());
    }

    #[test]
    fn under_joins_segments() {
        let rel = RelPath::parse("/2020/a.jpg").unwrap();
        assert_eq!(
            rel.under(Path::new("/srv/photos")),
            PathBuf::from("/srv/photos/2020/a.jpg")
        );
    }

    #[test]
    fn link_encodes_segments() {
        let rel = RelPath::parse("/summer%20trip/").unwrap();
        assert_eq!(rel.link("/photos", "a #1.jpg"), "/photos/summer%20trip/a%20%231.jpg");
        let root = RelPath::parse("/").unwrap();
        assert_eq!(root.link("/thumbnail/", "b.jpg"), "/thumbnail/b.jpg");
    }
}
