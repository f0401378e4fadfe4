//! Loading manual content from TOML files.
//!
//! A content file carries the page header, an optional output path and the sections in order:
//!
//! ```toml
//! header = "My Manual"
//! output = "my_manual.pdf"
//!
//! [[sections]]
//! title = "1. Introduction"
//! body = """
//! First line.
//! Second line."""
//! ```

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use pdf_manual::{Document, Section};
use serde::{Deserialize, Serialize};

/// Errors produced while reading a content file.
#[derive(Debug)]
pub enum ContentError {
    /// The file could not be read.
    Read { path: PathBuf, source: io::Error },
    /// The file is not valid content TOML.
    Parse { path: PathBuf, source: toml::de::Error },
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, .. } => write!(f, "Failed to read content file {}", path.display()),
            Self::Parse { path, .. } => {
                write!(f, "Failed to parse content file {}", path.display())
            }
        }
    }
}

impl std::error::Error for ContentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// On-disk representation of a manual.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContentFile {
    #[serde(flatten)]
    pub document: Document,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl ContentFile {
    /// Wraps a document without an output path.
    pub fn new(document: Document) -> Self {
        Self {
            document,
            output: None,
        }
    }

    /// Parses content from a TOML string.
    pub fn from_toml(input: &str, path: &Path) -> Result<Self, ContentError> {
        toml::from_str(input).map_err(|source| ContentError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads and parses the content file at `path`.
    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let input = fs::read_to_string(path).map_err(|source| ContentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let content = Self::from_toml(&input, path)?;
        log::debug!(
            "Loaded {} sections from {}",
            content.document.sections().len(),
            path.display()
        );
        Ok(content)
    }

    /// Serializes the content as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    /// Returns the sections in order.
    pub fn sections(&self) -> &[Section] {
        self.document.sections()
    }
}
