//! Data structures describing the content of a manual.
//!
//! The types in this module are plain data: they do not reference the rendering crate so that
//! content can be authored in code, loaded from configuration files (with the `serde` feature), or
//! generated by other tools before being handed to the composer.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One titled unit of content: a heading followed by a body of flowing text.
///
/// The body may contain `\n` characters, which are rendered as hard line breaks. Neither the title
/// nor the body is validated; an empty title produces an empty heading cell and an empty body
/// produces no text below the heading.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Section {
    title: String,
    #[cfg_attr(feature = "serde", serde(default))]
    body: String,
}

impl Section {
    /// Creates a new section with the provided title and body.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Returns the title of the section.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the body text of the section.
    pub fn body(&self) -> &str {
        &self.body
    }
}

impl<T, B> From<(T, B)> for Section
where
    T: Into<String>,
    B: Into<String>,
{
    fn from((title, body): (T, B)) -> Self {
        Self::new(title, body)
    }
}

/// An ordered list of sections together with the header shown at the top of every page.
///
/// Section order is rendering order; the composer never sorts or reorders them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Document {
    header: String,
    #[cfg_attr(feature = "serde", serde(default))]
    sections: Vec<Section>,
}

impl Document {
    /// Creates an empty document with the given page header.
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            sections: Vec::new(),
        }
    }

    /// Creates a document from `(title, body)` pairs, preserving their order.
    pub fn from_pairs<I, S>(header: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Section>,
    {
        Self::new(header).with_sections(pairs.into_iter().map(Into::into))
    }

    /// Returns the header text repeated on every page.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Returns the sections in rendering order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Appends a section and returns the updated document.
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Extends the document with additional sections and returns the updated instance.
    pub fn with_sections<I>(mut self, sections: I) -> Self
    where
        I: IntoIterator<Item = Section>,
    {
        self.sections.extend(sections);
        self
    }
}
