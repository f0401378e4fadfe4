//! The document composer and the composition driver.
//!
//! [`DocumentComposer`] translates headings and bodies into `genpdf` elements. It never measures
//! text or decides where pages break itself; `genpdf` lays the elements out when the composer is
//! finalized, calling back into the page decorator for every page it starts.

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use genpdf::elements::{PageBreak, StyledElement};
use genpdf::error::Error;
use genpdf::style::Style;
use genpdf::{render, Element, RenderResult};
use log::{debug, info};

use crate::config::ComposerConfig;
use crate::elements::{BodyText, Spacer, TextCell};
use crate::error::ComposeError;
use crate::fonts;
use crate::model::Document;
use crate::page::{FixedHeader, LayoutLog, ManualPageDecorator, PageHeader, SharedLayoutLog};

/// Lifecycle of a composer that has not been finalized yet.
///
/// Finalizing consumes the composer, so the terminal state is never observable on a live value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComposerState {
    /// No page has been started.
    Created,
    /// The initial page is active; further pages are created by overflow or [`DocumentComposer::add_page`].
    PageActive,
}

/// The page a section heading was placed on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionPage {
    title: String,
    page: Option<usize>,
}

impl SectionPage {
    /// Creates a new entry.
    pub fn new(title: impl Into<String>, page: Option<usize>) -> Self {
        Self {
            title: title.into(),
            page,
        }
    }

    /// Returns the section title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the 1-based page of the heading, if it was rendered.
    pub fn page(&self) -> Option<usize> {
        self.page
    }
}

/// Result of a finished render pass.
#[derive(Clone, Debug)]
pub struct RenderedPdf {
    /// Serialized PDF document.
    pub bytes: Vec<u8>,
    /// Number of pages in the document.
    pub page_count: usize,
    /// Pages that received the page header, in order.
    pub header_pages: Vec<usize>,
    /// Every section heading in input order with the page it landed on.
    pub sections: Vec<SectionPage>,
}

/// Section heading that records the page it lands on.
struct Heading {
    cell: TextCell,
    index: usize,
    log: SharedLayoutLog,
}

impl Element for Heading {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let result = self.cell.render(context, area, style)?;
        if !result.has_more {
            self.log.borrow_mut().place_section(self.index);
        }
        Ok(result)
    }
}

/// Turns an ordered list of sections into a paginated PDF document.
pub struct DocumentComposer {
    document: genpdf::Document,
    config: ComposerConfig,
    log: SharedLayoutLog,
    titles: Vec<String>,
    state: ComposerState,
}

impl DocumentComposer {
    /// Creates a composer that shows `header` centered at the top of every page.
    pub fn new(header: impl Into<String>, config: ComposerConfig) -> Result<Self, ComposeError> {
        let header = header.into();
        let fixed = FixedHeader::new(header.clone(), &config);
        let mut composer = Self::with_page_header(fixed, config)?;
        composer.document.set_title(header);
        Ok(composer)
    }

    /// Creates a composer whose page header is produced by `header` on every page start.
    pub fn with_page_header(
        header: impl PageHeader + 'static,
        config: ComposerConfig,
    ) -> Result<Self, ComposeError> {
        let font_family =
            fonts::load_font_family(config.fonts_dir()).map_err(ComposeError::FontLoad)?;
        let mut document = genpdf::Document::new(font_family);
        document.set_paper_size(config.paper_size);

        let log: SharedLayoutLog = Rc::new(RefCell::new(LayoutLog::default()));
        let decorator = ManualPageDecorator::new(&config, Box::new(header), Rc::clone(&log));
        document.set_page_decorator(decorator);

        Ok(Self {
            document,
            config,
            log,
            titles: Vec::new(),
            state: ComposerState::Created,
        })
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> ComposerState {
        self.state
    }

    /// Number of sections begun so far.
    pub fn section_count(&self) -> usize {
        self.titles.len()
    }

    /// Starts a page.
    ///
    /// The first call activates the initial page. Later calls force the following content onto a
    /// fresh page; pages caused by overflow never need this.
    pub fn add_page(&mut self) {
        match self.state {
            ComposerState::Created => {
                debug!("Activating initial page");
                self.state = ComposerState::PageActive;
            }
            ComposerState::PageActive => {
                debug!("Forcing page break");
                self.document.push(PageBreak::new());
            }
        }
    }

    fn ensure_page(&mut self) {
        if self.state == ComposerState::Created {
            self.add_page();
        }
    }

    /// Emits a bold, left-aligned heading cell followed by the configured gap.
    ///
    /// The heading is a single atomic cell: when it does not fit on the current page the whole cell
    /// moves to the next page.
    pub fn begin_section(&mut self, title: &str) {
        self.ensure_page();
        debug!("Beginning section {:?}", title);

        let index = self.log.borrow_mut().register_section();
        self.titles.push(title.to_string());

        let cell = TextCell::new(title, self.config.heading_height).with_style(
            Style::new()
                .bold()
                .with_font_size(self.config.heading_font_size),
        );
        self.document.push(Heading {
            cell,
            index,
            log: Rc::clone(&self.log),
        });
        self.document.push(Spacer::new(self.config.heading_gap));
    }

    /// Emits the body as regular-weight text wrapped at the printable width, followed by a gap.
    ///
    /// Every `\n` in `body` is a hard line break. The text may continue over any number of pages.
    pub fn write_section_body(&mut self, body: &str) {
        self.ensure_page();

        let text = BodyText::new(body);
        debug!("Writing section body with {} lines", text.line_count());

        let style = Style::new()
            .with_font_size(self.config.body_font_size)
            .with_line_spacing(self.config.body_line_spacing);
        self.document.push(StyledElement::new(text, style));
        self.document.push(Spacer::new(self.config.body_gap));
    }

    /// Lays out every page and returns the serialized document.
    pub fn render(self) -> Result<RenderedPdf, ComposeError> {
        let Self {
            document,
            config,
            log,
            titles,
            ..
        } = self;

        let mut bytes = Vec::new();
        document.render(&mut bytes).map_err(ComposeError::Render)?;

        let log = log.borrow().clone();
        let sections: Vec<SectionPage> = titles
            .into_iter()
            .zip(log.section_pages().iter().copied())
            .map(|(title, page)| SectionPage::new(title, page))
            .collect();

        debug!(
            "Rendered {} sections onto {} pages",
            sections.len(),
            log.page_count()
        );

        let mut rendered = RenderedPdf {
            bytes,
            page_count: log.page_count(),
            header_pages: log.header_pages().to_vec(),
            sections,
        };
        apply_outline(&mut rendered, &config)?;
        Ok(rendered)
    }

    /// Renders the document and writes it to `path`.
    pub fn finalize(self, path: impl AsRef<Path>) -> Result<RenderedPdf, ComposeError> {
        let path = path.as_ref();
        let rendered = self.render()?;
        fs::write(path, &rendered.bytes).map_err(|source| ComposeError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            "Wrote {} ({} pages, {} bytes)",
            path.display(),
            rendered.page_count,
            rendered.bytes.len()
        );
        Ok(rendered)
    }
}

#[cfg(feature = "bookmarks")]
fn apply_outline(pdf: &mut RenderedPdf, config: &ComposerConfig) -> Result<(), ComposeError> {
    if config.bookmarks() {
        crate::bookmarks::add_section_outline(pdf)?;
    }
    Ok(())
}

#[cfg(not(feature = "bookmarks"))]
fn apply_outline(_pdf: &mut RenderedPdf, config: &ComposerConfig) -> Result<(), ComposeError> {
    if config.bookmarks() {
        log::warn!("Bookmarks requested but the `bookmarks` feature is disabled; skipping");
    }
    Ok(())
}

fn compose_sections(
    document: &Document,
    config: ComposerConfig,
) -> Result<DocumentComposer, ComposeError> {
    let mut composer = DocumentComposer::new(document.header(), config)?;
    composer.add_page();

    for section in document.sections() {
        composer.begin_section(section.title());
        composer.write_section_body(section.body());
    }

    Ok(composer)
}

/// Composes `document` in a single pass and returns the rendered bytes.
pub fn compose(document: &Document, config: ComposerConfig) -> Result<RenderedPdf, ComposeError> {
    compose_sections(document, config)?.render()
}

/// Composes `document` in a single pass and writes the result to `path`.
pub fn compose_to_file(
    document: &Document,
    config: ComposerConfig,
    path: impl AsRef<Path>,
) -> Result<RenderedPdf, ComposeError> {
    compose_sections(document, config)?.finalize(path)
}
