//! Element implementations built on top of `genpdf` primitives.
//!
//! `genpdf` ships wrapping paragraphs but no fixed-height, single-line cell and no gap measured in
//! millimetres. The composer needs both to keep headings atomic and spacing independent of the
//! active font, so they are provided here together with [`BodyText`], which turns a body string with
//! hard line breaks into flowing paragraphs.

use genpdf::elements::{Break, LinearLayout, Paragraph};
use genpdf::error::Error;
use genpdf::style::{Style, StyledString};
use genpdf::{render, Alignment, Element, Mm, Position, RenderResult, Size};

fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

/// A single line of text placed in a cell of fixed height spanning the full available width.
///
/// The cell never wraps and is never split: when the remaining space on the page is smaller than
/// the cell, nothing is drawn and the element asks for a new page. The text is vertically centered
/// inside the cell and horizontally positioned according to the alignment.
pub struct TextCell {
    text: String,
    style: Style,
    height: Mm,
    alignment: Alignment,
}

impl TextCell {
    /// Creates a left-aligned cell of the given height.
    pub fn new(text: impl Into<String>, height: impl Into<Mm>) -> Self {
        Self {
            text: text.into(),
            style: Style::new(),
            height: height.into(),
            alignment: Alignment::Left,
        }
    }

    /// Sets the alignment and returns the updated cell.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Sets the style that is merged on top of the inherited style and returns the updated cell.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl Element for TextCell {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let style = style.and(self.style);
        let line_height = style.line_height(&context.font_cache);
        let height = self.height.max(line_height);

        let mut result = RenderResult::default();
        if height > area.size().height {
            result.has_more = true;
            return Ok(result);
        }

        let available_width = area.size().width;
        let text_width = StyledString::new(self.text.clone(), style).width(&context.font_cache);
        let x_offset = match self.alignment {
            Alignment::Left => Mm::default(),
            Alignment::Center => (available_width - text_width) / 2.0,
            Alignment::Right => available_width - text_width,
        };
        let y_offset = (height - line_height) / 2.0;

        if let Some(mut section) =
            area.text_section(&context.font_cache, Position::new(x_offset, y_offset), style)
        {
            section.print_str(&self.text, style)?;
        } else {
            result.has_more = true;
            return Ok(result);
        }

        result.size = Size::new(available_width, height);
        Ok(result)
    }
}

/// Vertical whitespace of a fixed height.
///
/// A gap that reaches the bottom of the page is truncated instead of being carried over, so a page
/// break never starts with leftover whitespace.
#[derive(Clone, Copy, Debug)]
pub struct Spacer {
    height: Mm,
}

impl Spacer {
    /// Creates a gap of the given height.
    pub fn new(height: impl Into<Mm>) -> Self {
        Self {
            height: height.into(),
        }
    }
}

impl Element for Spacer {
    fn render(
        &mut self,
        _context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let mut result = RenderResult::default();
        if mm_to_f64(self.height) <= 0.0 {
            return Ok(result);
        }

        let available = area.size().height;
        let height = if self.height > available {
            available
        } else {
            self.height
        };
        result.size = Size::new(0, height);
        Ok(result)
    }
}

/// Splits a body into its hard lines.
///
/// Every `\n` ends a line and a `\r` directly before it is dropped. Empty lines are kept so that
/// blank lines in the input stay blank in the output. An empty body yields no lines.
pub fn body_lines(body: &str) -> Vec<&str> {
    if body.is_empty() {
        return Vec::new();
    }

    body.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Flowing body text that wraps at the available width and honours explicit line breaks.
///
/// Each hard line becomes its own [`Paragraph`], so wrapping only ever adds breaks on top of the
/// ones present in the input. Blank lines are rendered as one line of whitespace at the current
/// line height. Paragraph lines are split across pages by `genpdf` itself.
pub struct BodyText {
    layout: LinearLayout,
    line_count: usize,
}

impl BodyText {
    /// Builds the body element for `body`.
    pub fn new(body: &str) -> Self {
        let mut layout = LinearLayout::vertical();
        let lines = body_lines(body);
        let line_count = lines.len();

        for line in lines {
            if line.trim().is_empty() {
                layout.push(Break::new(1));
            } else {
                layout.push(Paragraph::new(line));
            }
        }

        Self { layout, line_count }
    }

    /// Number of hard lines in the body.
    pub fn line_count(&self) -> usize {
        self.line_count
    }
}

impl Element for BodyText {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        self.layout.render(context, area, style)
    }
}

#[cfg(test)]
mod tests {
    use super::{body_lines, BodyText};

    #[test]
    fn newlines_are_hard_breaks() {
        assert_eq!(body_lines("one\ntwo\n\nfour"), ["one", "two", "", "four"]);
    }

    #[test]
    fn carriage_returns_are_dropped() {
        assert_eq!(body_lines("one\r\ntwo"), ["one", "two"]);
    }

    #[test]
    fn trailing_newline_produces_blank_line() {
        assert_eq!(body_lines("line\n"), ["line", ""]);
    }

    #[test]
    fn empty_body_has_no_lines() {
        assert!(body_lines("").is_empty());
        assert_eq!(BodyText::new("").line_count(), 0);
    }

    #[test]
    fn long_line_without_breaks_stays_single() {
        let body = "filler ".repeat(700);
        assert_eq!(BodyText::new(&body).line_count(), 1);
    }
}
