//! Font discovery for the `pdf_manual` crate.
//!
//! The composer needs one TrueType family with regular, bold, italic and bold-italic faces. The
//! bundled Roboto family is searched for first; when it cannot be found a handful of common system
//! families are tried instead, so that rendering works out of the box on most machines.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{self, FontData, FontFamily};
use log::{debug, warn};

/// Name of the bundled font family.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "Roboto";

/// Environment variable pointing at a directory with the bundled font files.
pub const FONTS_DIR_ENV: &str = "PDF_MANUAL_FONTS_DIR";

/// Environment variable overriding the Windows font directory used for the Arial fallback.
pub const WINDOWS_FONTS_DIR_ENV: &str = "PDF_MANUAL_WINDOWS_FONTS_DIR";

const FONT_FILES: &[&str] = &[
    "Roboto-Regular.ttf",
    "Roboto-Bold.ttf",
    "Roboto-Italic.ttf",
    "Roboto-BoldItalic.ttf",
];

/// File names of the four faces of a system font family.
struct SystemFamily {
    name: &'static str,
    regular: &'static str,
    bold: &'static str,
    italic: &'static str,
    bold_italic: &'static str,
    windows: bool,
    directories: &'static [&'static str],
}

const SYSTEM_FAMILIES: &[SystemFamily] = &[
    SystemFamily {
        name: "Arial",
        regular: "arial.ttf",
        bold: "arialbd.ttf",
        italic: "ariali.ttf",
        bold_italic: "arialbi.ttf",
        windows: true,
        directories: &[],
    },
    SystemFamily {
        name: "Liberation Sans",
        regular: "LiberationSans-Regular.ttf",
        bold: "LiberationSans-Bold.ttf",
        italic: "LiberationSans-Italic.ttf",
        bold_italic: "LiberationSans-BoldItalic.ttf",
        windows: false,
        directories: &[
            "/usr/share/fonts/truetype/liberation",
            "/usr/share/fonts/truetype/liberation2",
            "/usr/share/fonts/liberation-sans",
            "/usr/share/fonts/liberation",
            "/usr/share/fonts/TTF",
        ],
    },
    SystemFamily {
        name: "DejaVu Sans",
        regular: "DejaVuSans.ttf",
        bold: "DejaVuSans-Bold.ttf",
        italic: "DejaVuSans-Oblique.ttf",
        bold_italic: "DejaVuSans-BoldOblique.ttf",
        windows: false,
        directories: &[
            "/usr/share/fonts/truetype/dejavu",
            "/usr/share/fonts/dejavu",
            "/usr/share/fonts/dejavu-sans-fonts",
            "/usr/share/fonts/TTF",
        ],
    },
];

impl SystemFamily {
    fn files(&self) -> [(&'static str, &'static str); 4] {
        [
            (self.regular, "regular"),
            (self.bold, "bold"),
            (self.italic, "italic"),
            (self.bold_italic, "bold italic"),
        ]
    }

    fn candidate_directories(&self) -> Vec<PathBuf> {
        let mut candidates: Vec<PathBuf> = Vec::new();

        if self.windows {
            candidates.extend(windows_font_directory());
        }

        candidates.extend(self.directories.iter().map(PathBuf::from));
        candidates
    }

    fn resolve_directory(&self) -> Option<PathBuf> {
        self.candidate_directories().into_iter().find(|directory| {
            self.files()
                .iter()
                .all(|(file, _)| directory.join(file).is_file())
        })
    }

    fn load(&self, directory: &Path) -> Result<FontFamily<FontData>, Error> {
        Ok(FontFamily {
            regular: load_font_file(directory, self.regular, self.name, "regular")?,
            bold: load_font_file(directory, self.bold, self.name, "bold")?,
            italic: load_font_file(directory, self.italic, self.name, "italic")?,
            bold_italic: load_font_file(directory, self.bold_italic, self.name, "bold italic")?,
        })
    }
}

fn env_dir(var: &str) -> Option<PathBuf> {
    env::var_os(var)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn windows_font_directory() -> Option<PathBuf> {
    env_dir(WINDOWS_FONTS_DIR_ENV).or_else(windows_system_fonts)
}

#[cfg(windows)]
fn windows_system_fonts() -> Option<PathBuf> {
    ["WINDIR", "SystemRoot"]
        .into_iter()
        .filter_map(env_dir)
        .map(|root| root.join("Fonts"))
        .find(|directory| directory.is_dir())
}

#[cfg(not(windows))]
fn windows_system_fonts() -> Option<PathBuf> {
    None
}

/// Directory holding the bundled fonts inside the crate sources.
pub fn bundled_fonts_source_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts")
}

fn font_directory_candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    let exe_assets = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("assets/fonts")));

    let ordered = explicit
        .map(Path::to_path_buf)
        .into_iter()
        .chain(env_dir(FONTS_DIR_ENV))
        .chain(exe_assets)
        .chain(Some(bundled_fonts_source_dir()));

    let mut candidates: Vec<PathBuf> = Vec::new();
    for candidate in ordered {
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }
    candidates
}

/// Why a candidate directory cannot supply the bundled family.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Rejection {
    NotADirectory,
    MissingFaces(Vec<&'static str>),
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotADirectory => write!(f, "not a directory"),
            Self::MissingFaces(faces) => write!(f, "lacks {}", faces.join(", ")),
        }
    }
}

fn inspect_candidate(directory: &Path) -> Option<Rejection> {
    if !directory.is_dir() {
        return Some(Rejection::NotADirectory);
    }

    let missing: Vec<&'static str> = FONT_FILES
        .iter()
        .copied()
        .filter(|file| !directory.join(file).is_file())
        .collect();
    (!missing.is_empty()).then_some(Rejection::MissingFaces(missing))
}

/// Returns the first complete candidate, or every candidate with the reason it was passed over.
fn survey_font_directories(
    explicit: Option<&Path>,
) -> Result<PathBuf, Vec<(PathBuf, Rejection)>> {
    let mut rejected = Vec::new();

    for candidate in font_directory_candidates(explicit) {
        match inspect_candidate(&candidate) {
            None => return Ok(candidate),
            Some(rejection) => {
                if Some(candidate.as_path()) == explicit {
                    warn!(
                        "Requested font directory {} {}; searching elsewhere",
                        candidate.display(),
                        rejection
                    );
                }
                rejected.push((candidate, rejection));
            }
        }
    }

    Err(rejected)
}

fn unresolved_fonts_error(rejected: &[(PathBuf, Rejection)]) -> Error {
    let summary = rejected
        .iter()
        .map(|(directory, rejection)| format!("{} {}", directory.display(), rejection))
        .collect::<Vec<_>>()
        .join("; ");

    Error::new(
        format!(
            "No directory provides the {} faces ({}). Copy them as described in \
             assets/fonts/README.md or set {}",
            DEFAULT_FONT_FAMILY_NAME, summary, FONTS_DIR_ENV
        ),
        io::Error::new(io::ErrorKind::NotFound, "bundled fonts not found"),
    )
}

fn resolve_font_directory(explicit: Option<&Path>) -> Result<PathBuf, Error> {
    survey_font_directories(explicit).map_err(|rejected| unresolved_fonts_error(&rejected))
}

fn load_bundled_font_family(explicit: Option<&Path>) -> Result<FontFamily<FontData>, Error> {
    let directory = resolve_font_directory(explicit)?;
    debug!("Loading {} fonts from {}", DEFAULT_FONT_FAMILY_NAME, directory.display());

    // Faces that exist but fail to parse are not a reason to fall back to system fonts.
    fonts::from_files(&directory, DEFAULT_FONT_FAMILY_NAME, None).map_err(|err| {
        Error::new(
            format!(
                "{} faces in {} are present but unreadable: {}",
                DEFAULT_FONT_FAMILY_NAME,
                directory.display(),
                err
            ),
            io::Error::new(io::ErrorKind::InvalidData, err.to_string()),
        )
    })
}

fn load_font_file(directory: &Path, file: &str, family: &str, style: &str) -> Result<FontData, Error> {
    let path = directory.join(file);
    FontData::load(&path, None).map_err(|err| {
        let io_kind = if path.is_file() {
            io::ErrorKind::Other
        } else {
            io::ErrorKind::NotFound
        };
        Error::new(
            format!(
                "Failed to load fallback {} {} font at {}: {}",
                family,
                style,
                path.display(),
                err
            ),
            io::Error::new(io_kind, err.to_string()),
        )
    })
}

fn system_fallback_font_family() -> Result<FontFamily<FontData>, Error> {
    for family in SYSTEM_FAMILIES {
        if let Some(directory) = family.resolve_directory() {
            let loaded = family.load(&directory)?;
            warn!(
                "Bundled fonts unavailable; falling back to system '{}' family from {}.",
                family.name,
                directory.display()
            );
            return Ok(loaded);
        }
    }

    let names = SYSTEM_FAMILIES
        .iter()
        .map(|family| family.name)
        .collect::<Vec<_>>()
        .join(", ");
    Err(Error::new(
        format!("No system fallback font family found (tried {})", names),
        io::Error::new(io::ErrorKind::NotFound, "system fonts not found"),
    ))
}

fn fonts_missing(err: &Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::IoError(io_err)
            if io_err.kind() == io::ErrorKind::NotFound
                || io_err.kind() == io::ErrorKind::PermissionDenied
    )
}

/// Returns the font family used for rendering.
///
/// `explicit` is searched before the environment, the executable directory and the crate's bundled
/// assets. When the bundled Roboto family is missing, the first complete system family is used.
pub fn load_font_family(explicit: Option<&Path>) -> Result<FontFamily<FontData>, Error> {
    match load_bundled_font_family(explicit) {
        Ok(family) => Ok(family),
        Err(err) if fonts_missing(&err) => match system_fallback_font_family() {
            Ok(fallback) => Ok(fallback),
            Err(fallback_err) => {
                warn!(
                    "Bundled fonts unavailable ({}); system fallback failed: {}",
                    err, fallback_err
                );
                Err(Error::new(
                    format!(
                        "Bundled fonts unavailable and system fallback failed: {}",
                        fallback_err
                    ),
                    io::Error::new(io::ErrorKind::NotFound, "default fonts are not available"),
                ))
            }
        },
        Err(err) => Err(err),
    }
}

/// Indicates whether any usable font family can be resolved without an explicit directory.
pub fn fonts_available() -> bool {
    resolve_font_directory(None).is_ok()
        || SYSTEM_FAMILIES
            .iter()
            .any(|family| family.resolve_directory().is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_directory_is_searched_first() {
        let explicit = PathBuf::from("/opt/manual-fonts");
        let candidates = font_directory_candidates(Some(&explicit));
        assert_eq!(candidates.first(), Some(&explicit));
        assert!(candidates.contains(&bundled_fonts_source_dir()));
    }

    #[test]
    fn candidates_are_unique() {
        let bundled = bundled_fonts_source_dir();
        let candidates = font_directory_candidates(Some(&bundled));
        let count = candidates.iter().filter(|path| **path == bundled).count();
        assert_eq!(count, 1);
    }

    #[test]
    fn absent_directory_is_rejected() {
        let missing = Path::new("/__pdf_manual_missing_fonts__");
        assert_eq!(inspect_candidate(missing), Some(Rejection::NotADirectory));
    }

    #[test]
    fn partial_directory_lists_missing_faces() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("Roboto-Regular.ttf"), b"").expect("write face");

        assert_eq!(
            inspect_candidate(dir.path()),
            Some(Rejection::MissingFaces(vec![
                "Roboto-Bold.ttf",
                "Roboto-Italic.ttf",
                "Roboto-BoldItalic.ttf",
            ]))
        );
    }

    #[test]
    fn missing_explicit_directory_is_never_selected() {
        let missing = PathBuf::from("/__pdf_manual_missing_fonts__");
        match survey_font_directories(Some(&missing)) {
            Ok(found) => assert_ne!(found, missing),
            Err(rejected) => {
                assert_eq!(rejected[0], (missing.clone(), Rejection::NotADirectory));
                let err = unresolved_fonts_error(&rejected);
                assert!(fonts_missing(&err));
                assert!(err
                    .to_string()
                    .contains("/__pdf_manual_missing_fonts__ not a directory"));
            }
        }
    }

    #[test]
    fn error_summary_names_every_rejected_candidate() {
        let rejected = [
            (PathBuf::from("/opt/one"), Rejection::NotADirectory),
            (
                PathBuf::from("/opt/two"),
                Rejection::MissingFaces(vec!["Roboto-Bold.ttf"]),
            ),
        ];
        let err = unresolved_fonts_error(&rejected);

        assert!(fonts_missing(&err));
        let message = err.to_string();
        assert!(message.contains("/opt/one not a directory"));
        assert!(message.contains("/opt/two lacks Roboto-Bold.ttf"));
        assert!(message.contains(FONTS_DIR_ENV));
    }
}
