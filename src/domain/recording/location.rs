//! Recording location value object

use std::fmt;
use std::path::{self, Path, PathBuf};

use url::Url;

use crate::domain::error::EmptyLocationError;

/// Locator of a finished recording.
///
/// Always non-empty. Locations created from a path are percent-encoded
/// `file://` URIs of the absolute path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordingLocation(String);

impl RecordingLocation {
    pub fn new(uri: impl Into<String>) -> Result<Self, EmptyLocationError> {
        let uri = uri.into();
        if uri.trim().is_empty() {
            return Err(EmptyLocationError);
        }
        Ok(Self(uri))
    }

    /// Relative paths are resolved against the working directory first.
    pub fn from_path(path: &Path) -> Result<Self, EmptyLocationError> {
        let absolute = path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        match Url::from_file_path(&absolute) {
            Ok(url) => Ok(Self(url.into())),
            Err(()) => Self::new(absolute.to_string_lossy()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Local file path, if this location points to the filesystem.
    ///
    /// Plain paths without a scheme are treated as local files.
    pub fn to_path(&self) -> Option<PathBuf> {
        match Url::parse(&self.0) {
            Ok(url) if url.scheme() == "file" => url.to_file_path().ok(),
            _ if !self.0.contains("://") => Some(PathBuf::from(&self.0)),
            _ => None,
        }
    }
}

impl fmt::Display for RecordingLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_uri() {
        assert!(RecordingLocation::new("").is_err());
        assert!(RecordingLocation::new("   ").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn from_path_uses_file_scheme() {
        let location = RecordingLocation::from_path(Path::new("/tmp/recording-1.wav")).unwrap();
        assert_eq!(location.as_str(), "file:///tmp/recording-1.wav");
        assert_eq!(location.to_path(), Some(PathBuf::from("/tmp/recording-1.wav")));
    }

    #[cfg(unix)]
    #[test]
    fn from_path_percent_encodes() {
        let path = Path::new("/tmp/my memo #1.wav");
        let location = RecordingLocation::from_path(path).unwrap();

        assert_eq!(location.as_str(), "file:///tmp/my%20memo%20%231.wav");
        assert_eq!(location.to_path(), Some(path.to_path_buf()));
    }

    #[cfg(unix)]
    #[test]
    fn from_path_keeps_non_utf8_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new(OsStr::from_bytes(b"/tmp/memo-\xff.wav"));
        let location = RecordingLocation::from_path(path).unwrap();

        assert!(location.as_str().contains("%FF"));
        assert_eq!(location.to_path(), Some(path.to_path_buf()));
    }

    #[test]
    fn from_path_resolves_relative_paths() {
        let location = RecordingLocation::from_path(Path::new("memo.wav")).unwrap();
        assert!(location.as_str().starts_with("file://"));

        let path = location.to_path().unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("memo.wav"));
    }

    #[test]
    fn from_empty_path_is_rejected() {
        assert!(RecordingLocation::from_path(Path::new("")).is_err());
    }

    #[test]
    fn plain_path_is_local() {
        let location = RecordingLocation::new("memo.wav").unwrap();
        assert_eq!(location.to_path(), Some(PathBuf::from("memo.wav")));
    }

    #[test]
    fn remote_uri_has_no_path() {
        let location = RecordingLocation::new("https://example.com/memo.wav").unwrap();
        assert!(location.to_path().is_none());
    }
}
