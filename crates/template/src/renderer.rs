//! Template rendering

use crate::blocks::TextContent;
use crate::parser::{is_truthy, resolve_binding, value_to_string};
use crate::schema::*;
use crate::{Result, TemplateError};
use log::debug;
use pdf_core::{FontStyle as PdfFontStyle, FontWeight, PdfDocument, StandardFont};
use serde_json::Value;

/// Template renderer
pub struct TemplateRenderer<'a> {
    /// The template to render
    template: &'a Template,
}

impl<'a> TemplateRenderer<'a> {
    /// Create a new renderer for a template
    pub fn new(template: &'a Template) -> Self {
        Self { template }
    }

    /// Build a fresh document from the page setup, render, and return PDF bytes
    pub fn render_to_bytes(&self, data: &Value) -> Result<Vec<u8>> {
        let mut doc = PdfDocument::new();
        for _ in 0..self.template.page.pages.max(1) {
            doc.add_blank_page();
        }
        if let Some(title) = &self.template.page.title {
            doc.set_title(title);
        }

        self.render(&mut doc, data)?;
        Ok(doc.to_bytes()?)
    }

    /// Render the template with data
    ///
    /// # Arguments
    /// * `doc` - PDF document to render into
    /// * `data` - Data for binding
    pub fn render(&self, doc: &mut PdfDocument, data: &Value) -> Result<()> {
        debug!(
            "rendering {} blocks onto {} page(s)",
            self.template.blocks.len(),
            doc.page_count()
        );

        for block in &self.template.blocks {
            self.render_block(doc, block, data)?;
        }

        Ok(())
    }

    /// Convert a template length to points
    fn pt(&self, value: f64) -> f64 {
        self.template.page.unit.to_points(value)
    }

    /// Set font on document based on Font specification
    fn set_font(&self, doc: &mut PdfDocument, font: &Font) {
        let (weight, style) = match font.style {
            FontStyle::Regular => (FontWeight::Regular, PdfFontStyle::Normal),
            FontStyle::Bold => (FontWeight::Bold, PdfFontStyle::Normal),
            FontStyle::Italic => (FontWeight::Regular, PdfFontStyle::Italic),
            FontStyle::BoldItalic => (FontWeight::Bold, PdfFontStyle::Italic),
        };

        doc.set_font(StandardFont::from_variant(weight, style), font.size as f32);
        doc.set_text_color(font.color.unwrap_or_default().into());
    }

    /// Render a single block
    fn render_block(&self, doc: &mut PdfDocument, block: &Block, data: &Value) -> Result<()> {
        if !self.is_block_enabled(block, data) {
            return Ok(());
        }

        match block {
            Block::Text(b) => self.render_text_block(doc, b, data),
            Block::Table(b) => self.render_table_block(doc, b, data),
            Block::List(b) => self.render_list_block(doc, b, data),
            Block::Rect(b) => self.render_rect_block(doc, b),
            Block::Line(b) => self.render_line_block(doc, b),
        }
    }

    /// Check if a block is enabled based on its enable binding
    fn is_block_enabled(&self, block: &Block, data: &Value) -> bool {
        match block.enable() {
            None => true,
            Some(bind) => match resolve_binding(bind, data) {
                None => false,
                Some(value) => is_truthy(value),
            },
        }
    }

    /// Render a text block
    fn render_text_block(&self, doc: &mut PdfDocument, block: &TextBlock, data: &Value) -> Result<()> {
        let text = block.get_text(data).unwrap_or_default();

        if text.is_empty() {
            return Ok(());
        }

        let mut formatted_text = format_text(&text, block.format.as_deref(), block.format_type)?;
        if let Some(max) = block.max_chars {
            formatted_text = pdf_core::truncate_chars(&formatted_text, max);
        }

        if let Some(font) = &block.font {
            self.set_font(doc, font);
        }

        let (lines, line_height) = match &block.word_wrap {
            Some(wrap) => (
                pdf_core::simple_word_wrap(&formatted_text, wrap.max_chars),
                wrap.line_height,
            ),
            None => (vec![formatted_text], 0.0),
        };

        let pages = resolve_pages(block.pages.as_deref(), doc.page_count());
        let align = convert_align(block.align);

        for page in pages {
            let mut y = block.position.y;
            for line in &lines {
                doc.insert_text(line, page, self.pt(block.position.x), self.pt(y), align)?;
                y += line_height;
            }
        }

        Ok(())
    }

    /// Render a table block
    fn render_table_block(&self, doc: &mut PdfDocument, block: &TableBlock, data: &Value) -> Result<()> {
        let rows = match block.bind.as_deref().and_then(|bind| resolve_binding(bind, data)) {
            None | Some(Value::Null) => return Ok(()),
            Some(Value::Array(rows)) => rows,
            Some(_) => {
                return Err(TemplateError::BindingError(format!(
                    "table binding {} is not an array",
                    block.bind.as_deref().unwrap_or_default()
                )))
            }
        };

        let rows: Vec<&Value> = rows
            .iter()
            .filter(|row| match &block.require_field {
                Some(field) => row
                    .get(field)
                    .map(value_to_string)
                    .is_some_and(|v| !v.trim().is_empty()),
                None => true,
            })
            .take(block.max_rows.unwrap_or(usize::MAX))
            .collect();

        if rows.is_empty() {
            return Ok(());
        }

        if let Some(font) = &block.font {
            self.set_font(doc, font);
        }

        let pages = resolve_pages(block.pages.as_deref(), doc.page_count());

        for page in pages {
            let mut y = block.position.y;

            for row in &rows {
                for col in &block.columns {
                    let cell_text = col.cell_text(row);
                    let formatted = format_text(&cell_text, col.format.as_deref(), None)?;
                    let x = block.position.x + col.x;

                    doc.insert_text(&formatted, page, self.pt(x), self.pt(y), convert_align(col.align))?;
                }

                y += block.row_height;
            }
        }

        Ok(())
    }

    /// Render a list block
    fn render_list_block(&self, doc: &mut PdfDocument, block: &ListBlock, data: &Value) -> Result<()> {
        let entries = block.entries(data);
        if entries.is_empty() {
            return Ok(());
        }

        if let Some(font) = &block.font {
            self.set_font(doc, font);
        }

        let pages = resolve_pages(block.pages.as_deref(), doc.page_count());

        for page in pages {
            let mut y = block.position.y;
            for entry in &entries {
                let line = format!("{} {}", entry.marker, entry.text);
                doc.insert_text(
                    &line,
                    page,
                    self.pt(block.position.x),
                    self.pt(y),
                    pdf_core::Align::Left,
                )?;
                y += block.line_height;
            }
        }

        Ok(())
    }

    /// Render a rectangle outline
    fn render_rect_block(&self, doc: &mut PdfDocument, block: &RectBlock) -> Result<()> {
        self.apply_stroke(doc, block.line_width, block.color);

        for page in resolve_pages(block.pages.as_deref(), doc.page_count()) {
            doc.draw_rect(
                page,
                self.pt(block.position.x),
                self.pt(block.position.y),
                self.pt(block.size.width),
                self.pt(block.size.height),
            )?;
        }

        Ok(())
    }

    /// Render a straight line
    fn render_line_block(&self, doc: &mut PdfDocument, block: &LineBlock) -> Result<()> {
        self.apply_stroke(doc, block.line_width, block.color);

        for page in resolve_pages(block.pages.as_deref(), doc.page_count()) {
            doc.draw_line(
                page,
                self.pt(block.from.x),
                self.pt(block.from.y),
                self.pt(block.to.x),
                self.pt(block.to.y),
            )?;
        }

        Ok(())
    }

    fn apply_stroke(&self, doc: &mut PdfDocument, line_width: Option<f64>, color: Option<Color>) {
        doc.set_line_width(line_width.unwrap_or(1.0));
        doc.set_stroke_color(color.unwrap_or_default().into());
    }
}

/// Format text with optional format pattern or special format type
fn format_text(text: &str, format: Option<&str>, format_type: Option<FormatType>) -> Result<String> {
    if let Some(ft) = format_type {
        let number = || text.trim().parse::<f64>().unwrap_or(0.0);
        return match ft {
            FormatType::Number => Ok(rupee_text::render_float(format.unwrap_or("#,###.##"), number())),
            FormatType::Rupees => Ok(rupee_text::format_rupees(number())),
            FormatType::RupeeWords => Ok(rupee_text::format_rupees_words(number())),
            FormatType::DateLong => Ok(rupee_text::format_iso_date_long(text)?),
        };
    }

    if let Some(format_pattern) = format {
        if let Ok(n) = text.trim().parse::<f64>() {
            return Ok(rupee_text::render_float(format_pattern, n));
        }
    }

    Ok(text.to_string())
}

/// Resolve pages to render on
fn resolve_pages(pages: Option<&[usize]>, total_pages: usize) -> Vec<usize> {
    match pages {
        Some(p) if !p.is_empty() => p.to_vec(),
        _ => (1..=total_pages).collect(),
    }
}

/// Convert schema Align to pdf_core Align
fn convert_align(align: Align) -> pdf_core::Align {
    match align {
        Align::Left => pdf_core::Align::Left,
        Align::Center => pdf_core::Align::Center,
        Align::Right => pdf_core::Align::Right,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_text_types() {
        assert_eq!(format_text("2210", None, Some(FormatType::Number)).unwrap(), "2,210.00");
        assert_eq!(format_text("2210", None, Some(FormatType::Rupees)).unwrap(), "Rs. 2,210.00");
        assert_eq!(
            format_text("50.5", None, Some(FormatType::RupeeWords)).unwrap(),
            "Fifty Rupees and Fifty Cents Only"
        );
        assert_eq!(
            format_text("2026-10-19", None, Some(FormatType::DateLong)).unwrap(),
            "19 October 2026"
        );
    }

    #[test]
    fn test_format_text_bad_date() {
        let result = format_text("19/10/2026", None, Some(FormatType::DateLong));
        assert!(matches!(result, Err(TemplateError::TextError(_))));
    }

    #[test]
    fn test_format_text_pattern() {
        assert_eq!(format_text("1234.5", Some("#,###.##"), None).unwrap(), "1,234.50");
        assert_eq!(format_text("n/a", Some("#,###.##"), None).unwrap(), "n/a");
        assert_eq!(format_text("plain", None, None).unwrap(), "plain");
    }

    #[test]
    fn test_resolve_pages() {
        assert_eq!(resolve_pages(None, 2), vec![1, 2]);
        assert_eq!(resolve_pages(Some(&[]), 1), vec![1]);
        assert_eq!(resolve_pages(Some(&[2]), 3), vec![2]);
    }
}
