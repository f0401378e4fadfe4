//! Errors surfaced by the composition driver.

use std::io;
use std::path::PathBuf;

#[cfg(feature = "bookmarks")]
use crate::bookmarks::OutlineError;

/// Errors that can occur while composing and finalizing a manual.
///
/// The composer never recovers from any of these: the first failure aborts the render and no
/// output file is guaranteed to exist.
#[derive(Debug)]
pub enum ComposeError {
    /// No usable font family could be loaded.
    FontLoad(genpdf::error::Error),
    /// The rendering engine failed while laying out or serializing the document.
    Render(genpdf::error::Error),
    /// The rendered document could not be written to its output path.
    Write {
        /// Destination that could not be written.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// The section outline could not be added to the rendered document.
    #[cfg(feature = "bookmarks")]
    Outline(OutlineError),
}

impl std::fmt::Display for ComposeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FontLoad(_) => write!(f, "Failed to load fonts for the document"),
            Self::Render(_) => write!(f, "Failed to render the document"),
            Self::Write { path, .. } => {
                write!(f, "Failed to write document to {}", path.display())
            }
            #[cfg(feature = "bookmarks")]
            Self::Outline(_) => write!(f, "Failed to add the section outline"),
        }
    }
}

impl std::error::Error for ComposeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FontLoad(err) | Self::Render(err) => Some(err),
            Self::Write { source, .. } => Some(source),
            #[cfg(feature = "bookmarks")]
            Self::Outline(err) => Some(err),
        }
    }
}

#[cfg(feature = "bookmarks")]
impl From<OutlineError> for ComposeError {
    fn from(err: OutlineError) -> Self {
        Self::Outline(err)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;
    use std::io;

    use super::ComposeError;

    #[test]
    fn write_error_names_the_path_and_keeps_the_source() {
        let err = ComposeError::Write {
            path: "out/manual.pdf".into(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
        };

        assert!(err.to_string().contains("out/manual.pdf"));
        assert_eq!(err.source().map(|s| s.to_string()), Some("read-only".to_string()));
    }
}
