//! Document outline listing every section heading.
//!
//! The outline is added after rendering: the pages recorded for each heading in a [`RenderedPdf`]
//! are resolved against the page tree of the serialized document and handed to `lopdf`'s bookmark
//! table, which writes the `/Outlines` tree.

use lopdf::{Bookmark, Document, Object};

use crate::composer::RenderedPdf;

/// Errors raised while adding the section outline.
#[derive(Debug)]
pub enum OutlineError {
    /// The rendered bytes could not be read back or written out again.
    Pdf(lopdf::Error),
    /// A heading was recorded on a page the serialized document does not have.
    PageOutOfRange {
        /// Title of the heading.
        title: String,
        /// Page the heading was recorded on.
        page: usize,
        /// Pages in the serialized document.
        page_count: usize,
    },
}

impl From<lopdf::Error> for OutlineError {
    fn from(err: lopdf::Error) -> Self {
        Self::Pdf(err)
    }
}

impl std::fmt::Display for OutlineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pdf(_) => write!(f, "Rendered document could not be reopened for the outline"),
            Self::PageOutOfRange {
                title,
                page,
                page_count,
            } => write!(
                f,
                "Heading {:?} was placed on page {} but the document has {} pages",
                title, page, page_count
            ),
        }
    }
}

impl std::error::Error for OutlineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Pdf(err) => Some(err),
            Self::PageOutOfRange { .. } => None,
        }
    }
}

/// Headings that were placed, in input order, with their pages.
fn placed_headings(pdf: &RenderedPdf) -> Vec<(&str, usize)> {
    pdf.sections
        .iter()
        .filter_map(|section| section.page().map(|page| (section.title(), page)))
        .collect()
}

/// Rewrites `pdf.bytes` with a flat outline holding one entry per placed heading.
///
/// Entries jump to the page of their heading and the viewer is asked to open with the outline
/// visible. Returns the number of entries; a document without placed headings is left untouched.
pub fn add_section_outline(pdf: &mut RenderedPdf) -> Result<usize, OutlineError> {
    let headings = placed_headings(pdf);
    if headings.is_empty() {
        return Ok(0);
    }

    let mut document = Document::load_mem(&pdf.bytes)?;
    let pages = document.get_pages();

    for (title, page) in &headings {
        let page_id = u32::try_from(*page)
            .ok()
            .and_then(|number| pages.get(&number))
            .copied()
            .ok_or_else(|| OutlineError::PageOutOfRange {
                title: title.to_string(),
                page: *page,
                page_count: pages.len(),
            })?;
        document.add_bookmark(Bookmark::new(title.to_string(), [0.0; 3], 0, page_id), None);
    }

    let entries = headings.len();
    if let Some(outline_id) = document.build_outline() {
        let catalog = document.catalog_mut()?;
        catalog.set("Outlines", outline_id);
        catalog.set("PageMode", Object::Name(b"UseOutlines".to_vec()));
    }

    let mut bytes = Vec::new();
    document.save_to(&mut bytes).map_err(lopdf::Error::from)?;
    pdf.bytes = bytes;

    log::debug!("Added outline with {} headings", entries);
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::SectionPage;

    fn rendered(bytes: &[u8], sections: Vec<SectionPage>) -> RenderedPdf {
        RenderedPdf {
            bytes: bytes.to_vec(),
            page_count: 1,
            header_pages: vec![1],
            sections,
        }
    }

    #[test]
    fn unplaced_headings_leave_bytes_alone() {
        let mut pdf = rendered(b"not a pdf", vec![SectionPage::new("Intro", None)]);
        assert_eq!(add_section_outline(&mut pdf).expect("nothing to add"), 0);
        assert_eq!(pdf.bytes, b"not a pdf");
    }

    #[test]
    fn unreadable_bytes_are_reported() {
        let mut pdf = rendered(b"not a pdf", vec![SectionPage::new("Intro", Some(1))]);
        let err = add_section_outline(&mut pdf).unwrap_err();
        assert!(matches!(err, OutlineError::Pdf(_)));
    }

    #[test]
    fn out_of_range_page_names_the_heading() {
        let err = OutlineError::PageOutOfRange {
            title: "Usage".into(),
            page: 9,
            page_count: 2,
        };
        let message = err.to_string();
        assert!(message.contains("\"Usage\""));
        assert!(message.contains("page 9"));
        assert!(message.contains("2 pages"));
    }
}
