//! Core entry point for the pdf_manual crate.
//!
//! The crate turns an ordered list of titled sections into a paginated PDF manual. Layout and
//! serialization are delegated to [`genpdf`]; this crate only decides which elements are emitted
//! and in what order, and how every page is decorated.

pub mod composer;
pub mod config;
pub mod elements;
pub mod error;
pub mod fonts;
pub mod model;
pub mod page;

#[cfg(feature = "bookmarks")]
pub mod bookmarks;

pub use composer::{compose, compose_to_file, DocumentComposer, RenderedPdf, SectionPage};
pub use config::ComposerConfig;
pub use error::ComposeError;
pub use model::{Document, Section};
pub use page::{render_page_header, PageHeader};
