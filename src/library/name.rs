use crate::error::{DllDocError, Result};
use std::fmt;

/// Case-sensitive marker that identifies a path as a dynamic library.
pub const LIBRARY_MARKER: &str = ".dll";

/// Bare library identifier: the file name without directories or the `.dll` suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryName(String);

impl LibraryName {
    /// Derive the identifier from a library path.
    ///
    /// Both `/` and `\` are accepted as separators, with `/` taking precedence
    /// when a path mixes the two.
    pub fn from_path(path: &str) -> Result<Self> {
        let marker = path
            .find(LIBRARY_MARKER)
            .ok_or_else(|| DllDocError::InvalidArgument {
                path: path.to_string(),
            })?;

        let start = path
            .rfind('/')
            .or_else(|| path.rfind('\\'))
            .map(|separator| separator + 1)
            .unwrap_or(0);

        // A separator after the marker ("a.dll/b") leaves nothing between them.
        let start = start.min(marker);

        Ok(Self(path[start..marker].to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name used for the document when no output path is given.
    pub fn default_document_name(&self) -> String {
        format!("{}_exports.md", self.0)
    }
}

impl fmt::Display for LibraryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
