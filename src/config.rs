//! Layout configuration for the document composer.
//!
//! The defaults reproduce a classic A4 report: 10 mm side and top margins, a 20 mm bottom margin
//! at which content breaks to the next page, 12 pt fonts and 10 mm tall header and heading cells.

use std::path::{Path, PathBuf};

use genpdf::{Margins, Mm, PaperSize, Size};

const DEFAULT_MARGIN_MM: f64 = 10.0;
const DEFAULT_BOTTOM_MARGIN_MM: f64 = 20.0;
const DEFAULT_FONT_SIZE: u8 = 12;
const DEFAULT_CELL_HEIGHT_MM: f64 = 10.0;
const DEFAULT_HEADING_GAP_MM: f64 = 5.0;
const DEFAULT_BODY_GAP_MM: f64 = 10.0;
const DEFAULT_BODY_LINE_SPACING: f64 = 2.0;
const DEFAULT_FOOTER_HEIGHT_MM: f64 = 10.0;
const DEFAULT_FOOTER_FONT_SIZE: u8 = 8;

/// Typed configuration consumed by [`DocumentComposer`](crate::composer::DocumentComposer).
#[derive(Clone, Debug)]
pub struct ComposerConfig {
    pub(crate) paper_size: Size,
    pub(crate) margins: Margins,
    pub(crate) header_font_size: u8,
    pub(crate) header_height: Mm,
    pub(crate) heading_font_size: u8,
    pub(crate) heading_height: Mm,
    pub(crate) heading_gap: Mm,
    pub(crate) body_font_size: u8,
    pub(crate) body_line_spacing: f64,
    pub(crate) body_gap: Mm,
    pub(crate) page_numbers: bool,
    pub(crate) footer_height: Mm,
    pub(crate) footer_font_size: u8,
    pub(crate) fonts_dir: Option<PathBuf>,
    pub(crate) bookmarks: bool,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4.into(),
            margins: Margins::trbl(
                DEFAULT_MARGIN_MM,
                DEFAULT_MARGIN_MM,
                DEFAULT_BOTTOM_MARGIN_MM,
                DEFAULT_MARGIN_MM,
            ),
            header_font_size: DEFAULT_FONT_SIZE,
            header_height: Mm::from(DEFAULT_CELL_HEIGHT_MM),
            heading_font_size: DEFAULT_FONT_SIZE,
            heading_height: Mm::from(DEFAULT_CELL_HEIGHT_MM),
            heading_gap: Mm::from(DEFAULT_HEADING_GAP_MM),
            body_font_size: DEFAULT_FONT_SIZE,
            body_line_spacing: DEFAULT_BODY_LINE_SPACING,
            body_gap: Mm::from(DEFAULT_BODY_GAP_MM),
            page_numbers: false,
            footer_height: Mm::from(DEFAULT_FOOTER_HEIGHT_MM),
            footer_font_size: DEFAULT_FOOTER_FONT_SIZE,
            fonts_dir: None,
            bookmarks: false,
        }
    }
}

impl ComposerConfig {
    /// Creates a configuration with the default report layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the paper size of every page.
    pub fn with_paper_size(mut self, paper_size: impl Into<Size>) -> Self {
        self.paper_size = paper_size.into();
        self
    }

    /// Sets the page margins. The bottom margin is where content breaks to the next page.
    pub fn with_margins(mut self, margins: impl Into<Margins>) -> Self {
        self.margins = margins.into();
        self
    }

    /// Sets the font size and cell height of the page header.
    pub fn with_header_style(mut self, font_size: u8, height: impl Into<Mm>) -> Self {
        self.header_font_size = font_size;
        self.header_height = height.into();
        self
    }

    /// Sets the font size and cell height of section headings.
    pub fn with_heading_style(mut self, font_size: u8, height: impl Into<Mm>) -> Self {
        self.heading_font_size = font_size;
        self.heading_height = height.into();
        self
    }

    /// Sets the vertical gap between a heading and its body.
    pub fn with_heading_gap(mut self, gap: impl Into<Mm>) -> Self {
        self.heading_gap = gap.into();
        self
    }

    /// Sets the body font size and the line spacing factor applied to body lines.
    pub fn with_body_style(mut self, font_size: u8, line_spacing: f64) -> Self {
        self.body_font_size = font_size;
        self.body_line_spacing = line_spacing;
        self
    }

    /// Sets the vertical gap emitted after every section body.
    pub fn with_body_gap(mut self, gap: impl Into<Mm>) -> Self {
        self.body_gap = gap.into();
        self
    }

    /// Enables or disables the centered "Page N" footer.
    pub fn with_page_numbers(mut self, enabled: bool) -> Self {
        self.page_numbers = enabled;
        self
    }

    /// Sets the font size and reserved height of the page number footer.
    pub fn with_footer_style(mut self, font_size: u8, height: impl Into<Mm>) -> Self {
        self.footer_font_size = font_size;
        self.footer_height = height.into();
        self
    }

    /// Loads fonts from `dir` before trying any other location.
    pub fn with_fonts_dir(mut self, dir: impl Into<Option<PathBuf>>) -> Self {
        self.fonts_dir = dir.into();
        self
    }

    /// Requests a PDF outline with one entry per section.
    ///
    /// Only honoured when the crate is built with the `bookmarks` feature.
    pub fn with_bookmarks(mut self, enabled: bool) -> Self {
        self.bookmarks = enabled;
        self
    }

    /// Returns the font directory override, if any.
    pub fn fonts_dir(&self) -> Option<&Path> {
        self.fonts_dir.as_deref()
    }

    /// Returns whether page numbers are rendered.
    pub fn page_numbers(&self) -> bool {
        self.page_numbers
    }

    /// Returns whether bookmarks were requested.
    pub fn bookmarks(&self) -> bool {
        self.bookmarks
    }
}
