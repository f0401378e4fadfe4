//! Per-page decoration: margins, the repeated page header and the optional page number footer.
//!
//! `genpdf` calls the page decorator every time it starts a page, whether the page was requested
//! explicitly or created because content overflowed. The decorator forwards that event to a
//! [`PageHeader`] and records it in the shared [`LayoutLog`].

use std::cell::RefCell;
use std::rc::Rc;

use genpdf::error::{Error, ErrorKind};
use genpdf::style::{self, Style};
use genpdf::{Alignment, Element, Margins, Mm, PageDecorator, Position};

use crate::config::ComposerConfig;
use crate::elements::TextCell;

/// Capability invoked at the start of every page.
///
/// The returned element is rendered at the top of the page and the remaining content starts below
/// it. Closures taking the 1-based page number implement this trait.
pub trait PageHeader {
    /// Produces the header element for `page`.
    fn on_page_start(&mut self, page: usize) -> Box<dyn Element>;
}

impl<F, E> PageHeader for F
where
    F: FnMut(usize) -> E,
    E: Element + 'static,
{
    fn on_page_start(&mut self, page: usize) -> Box<dyn Element> {
        Box::new(self(page))
    }
}

/// Builds the header cell: bold text at the configured size, centered in one full-width cell.
pub fn render_page_header(text: &str, config: &ComposerConfig) -> TextCell {
    TextCell::new(text, config.header_height)
        .with_alignment(Alignment::Center)
        .with_style(Style::new().bold().with_font_size(config.header_font_size))
}

/// Page header that repeats the same document title on every page.
pub struct FixedHeader {
    text: String,
    config: ComposerConfig,
}

impl FixedHeader {
    /// Creates a header showing `text` with the sizes from `config`.
    pub fn new(text: impl Into<String>, config: &ComposerConfig) -> Self {
        Self {
            text: text.into(),
            config: config.clone(),
        }
    }
}

impl PageHeader for FixedHeader {
    fn on_page_start(&mut self, _page: usize) -> Box<dyn Element> {
        Box::new(render_page_header(&self.text, &self.config))
    }
}

/// Pagination facts collected while the document renders.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayoutLog {
    pages_started: usize,
    header_pages: Vec<usize>,
    section_pages: Vec<Option<usize>>,
}

impl LayoutLog {
    /// Number of pages started so far.
    pub fn page_count(&self) -> usize {
        self.pages_started
    }

    /// Pages on which the header element was rendered completely.
    pub fn header_pages(&self) -> &[usize] {
        &self.header_pages
    }

    /// Page of every registered section heading, in registration order.
    pub fn section_pages(&self) -> &[Option<usize>] {
        &self.section_pages
    }

    /// The page currently being filled, or `None` before the first page starts.
    pub fn current_page(&self) -> Option<usize> {
        (self.pages_started > 0).then_some(self.pages_started)
    }

    pub(crate) fn start_page(&mut self) -> usize {
        self.pages_started += 1;
        self.pages_started
    }

    pub(crate) fn record_header(&mut self, page: usize) {
        self.header_pages.push(page);
    }

    pub(crate) fn register_section(&mut self) -> usize {
        self.section_pages.push(None);
        self.section_pages.len() - 1
    }

    pub(crate) fn place_section(&mut self, index: usize) {
        let page = self.current_page();
        if let Some(slot) = self.section_pages.get_mut(index) {
            *slot = page;
        }
    }
}

/// Shared handle to the log, owned jointly by the decorator and the heading elements.
pub type SharedLayoutLog = Rc<RefCell<LayoutLog>>;

struct FooterSpec {
    height: Mm,
    font_size: u8,
}

/// Decorator installed on every composed document.
pub(crate) struct ManualPageDecorator {
    margins: Margins,
    header: Box<dyn PageHeader>,
    footer: Option<FooterSpec>,
    log: SharedLayoutLog,
}

impl ManualPageDecorator {
    pub(crate) fn new(
        config: &ComposerConfig,
        header: Box<dyn PageHeader>,
        log: SharedLayoutLog,
    ) -> Self {
        let footer = config.page_numbers.then(|| FooterSpec {
            height: config.footer_height,
            font_size: config.footer_font_size,
        });

        Self {
            margins: config.margins,
            header,
            footer,
            log,
        }
    }
}

impl PageDecorator for ManualPageDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        style: style::Style,
    ) -> Result<genpdf::render::Area<'a>, Error> {
        let page = self.log.borrow_mut().start_page();
        log::debug!("Starting page {}", page);

        area.add_margins(self.margins);

        let mut header = self.header.on_page_start(page);
        let result = header.render(context, area.clone(), style)?;
        if result.has_more {
            return Err(Error::new(
                "Page header does not fit on the page",
                ErrorKind::PageSizeExceeded,
            ));
        }
        self.log.borrow_mut().record_header(page);
        area.add_offset(Position::new(0, result.size.height));

        if let Some(footer) = &self.footer {
            let available = area.size().height;
            if footer.height > available {
                return Err(Error::new(
                    "Footer height exceeds available space",
                    ErrorKind::InvalidData,
                ));
            }

            let mut footer_area = area.clone();
            footer_area.add_offset(Position::new(0, available - footer.height));
            let mut element = TextCell::new(format!("Page {}", page), footer.height)
                .with_alignment(Alignment::Center)
                .with_style(Style::new().italic().with_font_size(footer.font_size));
            let result = element.render(context, footer_area, style)?;
            if result.has_more {
                return Err(Error::new(
                    "Footer element does not fit into the reserved space",
                    ErrorKind::PageSizeExceeded,
                ));
            }

            area.set_height(available - footer.height);
        }

        Ok(area)
    }
}

#[cfg(test)]
mod tests {
    use super::LayoutLog;

    #[test]
    fn sections_are_placed_on_the_current_page() {
        let mut log = LayoutLog::default();
        let first = log.register_section();
        let second = log.register_section();
        assert_eq!(log.current_page(), None);

        log.start_page();
        log.place_section(first);
        log.start_page();
        log.place_section(second);

        assert_eq!(log.section_pages(), [Some(1), Some(2)]);
        assert_eq!(log.page_count(), 2);
    }

    #[test]
    fn unplaced_sections_stay_unknown() {
        let mut log = LayoutLog::default();
        log.register_section();
        assert_eq!(log.section_pages(), [None]);
    }
}
