//! PDF Document wrapper

use crate::text::{generate_text_operators, TextRenderContext};
use crate::{Align, FontStyle, FontWeight, PdfError, Result, StandardFont};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::collections::{BTreeSet, HashMap};
use std::io::Write;
use std::path::Path;

/// A4 width in points
pub const A4_WIDTH: f64 = 595.28;

/// A4 height in points
pub const A4_HEIGHT: f64 = 841.89;

/// RGB Color (values 0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values 0.0 - 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create color from RGB values (0-255)
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    /// Red color
    pub fn red() -> Self {
        Self::rgb(1.0, 0.0, 0.0)
    }

    /// Gray color
    pub fn gray() -> Self {
        Self::rgb(0.5, 0.5, 0.5)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// PDF Document built from blank A4 pages
pub struct PdfDocument {
    /// The underlying lopdf document
    inner: Document,
    /// Root Pages node
    pages_id: ObjectId,
    /// Page objects (index 0 = page 1)
    page_ids: Vec<ObjectId>,
    /// Content stream object per page
    content_ids: Vec<ObjectId>,
    /// Current font
    current_font: StandardFont,
    /// Current font size
    current_font_size: f32,
    /// Current text color
    current_text_color: Color,
    /// Current stroke color for lines and rectangles
    current_stroke_color: Color,
    /// Current line width in points
    current_line_width: f64,
    /// Fonts referenced by each page
    page_fonts: HashMap<usize, BTreeSet<StandardFont>>,
    /// Font dictionaries already added to the document
    font_objects: HashMap<StandardFont, ObjectId>,
    /// Buffered content operators per page (page number -> operators)
    page_content_buffer: HashMap<usize, Vec<u8>>,
    /// Compress content streams with FlateDecode
    compress: bool,
}

impl Default for PdfDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfDocument {
    /// Create an empty document with no pages
    pub fn new() -> Self {
        let mut inner = Document::with_version("1.5");

        let pages_id = inner.new_object_id();
        inner.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => Vec::<Object>::new(),
                "Count" => 0,
            }),
        );

        let catalog_id = inner.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        inner.trailer.set("Root", catalog_id);

        Self {
            inner,
            pages_id,
            page_ids: Vec::new(),
            content_ids: Vec::new(),
            current_font: StandardFont::default(),
            current_font_size: 12.0,
            current_text_color: Color::default(),
            current_stroke_color: Color::default(),
            current_line_width: 1.0,
            page_fonts: HashMap::new(),
            font_objects: HashMap::new(),
            page_content_buffer: HashMap::new(),
            compress: true,
        }
    }

    /// Create a document with a single blank A4 page
    ///
    /// # Example
    /// ```ignore
    /// let doc = PdfDocument::new_a4();
    /// assert_eq!(doc.page_count(), 1);
    /// ```
    pub fn new_a4() -> Self {
        let mut doc = Self::new();
        doc.add_blank_page();
        doc
    }

    /// Enable or disable content stream compression (enabled by default)
    pub fn set_compression(&mut self, compress: bool) {
        self.compress = compress;
    }

    /// Get the number of pages in the document
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Append a blank A4 page (595.28 x 841.89 points)
    ///
    /// # Returns
    /// New page number (1-indexed)
    pub fn add_blank_page(&mut self) -> usize {
        let contents_id = self
            .inner
            .add_object(Object::Stream(Stream::new(Dictionary::new(), vec![])));

        let page_id = self.inner.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real(595.28),
                Object::Real(841.89),
            ],
            "Resources" => Dictionary::new(),
            "Contents" => contents_id,
        });

        self.page_ids.push(page_id);
        self.content_ids.push(contents_id);

        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::Reference(*id)).collect();
        self.inner.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => self.page_ids.len() as i64,
            }),
        );

        self.page_ids.len()
    }

    /// Set the document title (written to the Info dictionary)
    pub fn set_title(&mut self, title: &str) {
        let info_id = self.inner.add_object(dictionary! {
            "Title" => Object::string_literal(title),
            "Producer" => Object::string_literal("sltb-voucher"),
        });
        self.inner.trailer.set("Info", info_id);
    }

    /// Set current font and size
    pub fn set_font(&mut self, font: StandardFont, size: f32) {
        self.current_font = font;
        self.current_font_size = size;
    }

    /// Set current font size, keeping the face
    pub fn set_font_size(&mut self, size: f32) {
        self.current_font_size = size;
    }

    /// Switch weight/style within the Helvetica family
    pub fn set_font_variant(&mut self, weight: FontWeight, style: FontStyle) {
        self.current_font = StandardFont::from_variant(weight, style);
    }

    /// Set text color for subsequent text insertions
    pub fn set_text_color(&mut self, color: Color) {
        self.current_text_color = color;
    }

    /// Set stroke color for subsequent lines and rectangles
    pub fn set_stroke_color(&mut self, color: Color) {
        self.current_stroke_color = color;
    }

    /// Set line width in points for subsequent lines and rectangles
    pub fn set_line_width(&mut self, width: f64) {
        self.current_line_width = width;
    }

    /// Current font
    pub fn font(&self) -> StandardFont {
        self.current_font
    }

    /// Current font size
    pub fn font_size(&self) -> f32 {
        self.current_font_size
    }

    /// Width of text in points using the current font and size
    pub fn text_width(&self, text: &str) -> f64 {
        self.current_font
            .text_width_points(text, self.current_font_size)
    }

    /// Insert text at a specific position
    ///
    /// # Arguments
    /// * `text` - Text to insert
    /// * `page` - Page number (1-indexed)
    /// * `x` - X coordinate in points
    /// * `y` - Y coordinate in points (baseline, from top)
    /// * `align` - Text alignment relative to `x`
    pub fn insert_text(
        &mut self,
        text: &str,
        page: usize,
        x: f64,
        y: f64,
        align: Align,
    ) -> Result<()> {
        self.check_page(page)?;

        if text.is_empty() {
            return Ok(());
        }

        let font = self.current_font;
        self.page_fonts.entry(page).or_default().insert(font);

        let ctx = TextRenderContext {
            font_name: font.resource_name().to_string(),
            font_size: self.current_font_size,
            text_width: self.text_width(text),
            color: self.current_text_color,
        };

        let pdf_y = A4_HEIGHT - y;
        let operators =
            generate_text_operators(&font.encode_text_hex(text), x, pdf_y, align, &ctx);
        self.buffer_content(page, &operators);

        Ok(())
    }

    /// Draw a rectangle outline
    ///
    /// `x`/`y` is the top-left corner (from top of page).
    pub fn draw_rect(&mut self, page: usize, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        self.check_page(page)?;

        let pdf_y = A4_HEIGHT - y - height;
        let ops = format!(
            "q\n{} w\n{} {} {} RG\n{x} {pdf_y} {width} {height} re\nS\nQ\n",
            self.current_line_width,
            self.current_stroke_color.r,
            self.current_stroke_color.g,
            self.current_stroke_color.b,
        );
        self.buffer_content(page, ops.as_bytes());

        Ok(())
    }

    /// Draw a straight line between two points (from top of page)
    pub fn draw_line(&mut self, page: usize, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<()> {
        self.check_page(page)?;

        let ops = format!(
            "q\n{} w\n{} {} {} RG\n{x1} {} m\n{x2} {} l\nS\nQ\n",
            self.current_line_width,
            self.current_stroke_color.r,
            self.current_stroke_color.g,
            self.current_stroke_color.b,
            A4_HEIGHT - y1,
            A4_HEIGHT - y2,
        );
        self.buffer_content(page, ops.as_bytes());

        Ok(())
    }

    /// Save the document to a file
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.finalize()?;
        self.inner
            .save(path)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        Ok(())
    }

    /// Save the document to bytes
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.finalize()?;

        let mut buffer = Vec::new();
        self.inner
            .save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;

        Ok(buffer)
    }

    /// Access the underlying lopdf document
    pub fn inner(&self) -> &Document {
        &self.inner
    }

    fn check_page(&self, page: usize) -> Result<()> {
        let page_count = self.page_count();
        if page == 0 || page > page_count {
            return Err(PdfError::InvalidPage(page, page_count));
        }
        Ok(())
    }

    /// Buffer content operators for a page (written at save time)
    fn buffer_content(&mut self, page: usize, content: &[u8]) {
        self.page_content_buffer
            .entry(page)
            .or_default()
            .extend_from_slice(content);
    }

    /// Write buffered content and font resources into the page objects
    ///
    /// Safe to call more than once: each page keeps a single content stream
    /// object that is replaced on every call.
    fn finalize(&mut self) -> Result<()> {
        for page in 1..=self.page_count() {
            let fonts = self.page_fonts.get(&page).cloned().unwrap_or_default();

            let mut font_dict = Dictionary::new();
            for font in fonts {
                let font_id = self.font_object(font);
                font_dict.set(font.resource_name(), Object::Reference(font_id));
            }

            let content = self
                .page_content_buffer
                .get(&page)
                .cloned()
                .unwrap_or_default();
            let stream = self.content_stream(content)?;
            let content_id = self.content_ids[page - 1];
            self.inner
                .objects
                .insert(content_id, Object::Stream(stream));

            let page_id = self.page_ids[page - 1];
            let mut page_dict = self
                .inner
                .get_object(page_id)?
                .as_dict()
                .map_err(|_| PdfError::SaveError("Page object is not a dictionary".to_string()))?
                .clone();
            page_dict.set(
                "Resources",
                dictionary! {
                    "Font" => font_dict,
                    "ProcSet" => vec![Object::Name(b"PDF".to_vec()), Object::Name(b"Text".to_vec())],
                },
            );
            page_dict.set("Contents", Object::Reference(content_id));
            self.inner.objects.insert(page_id, Object::Dictionary(page_dict));
        }

        Ok(())
    }

    /// Get or create the font dictionary for a standard font
    fn font_object(&mut self, font: StandardFont) -> ObjectId {
        if let Some(id) = self.font_objects.get(&font) {
            return *id;
        }

        let id = self.inner.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        self.font_objects.insert(font, id);
        id
    }

    fn content_stream(&self, content: Vec<u8>) -> Result<Stream> {
        if !self.compress || content.is_empty() {
            return Ok(Stream::new(Dictionary::new(), content));
        }

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(&content)
            .map_err(|e| PdfError::CompressionError(e.to_string()))?;
        let compressed = encoder
            .finish()
            .map_err(|e| PdfError::CompressionError(e.to_string()))?;

        Ok(Stream::new(
            dictionary! { "Filter" => "FlateDecode" },
            compressed,
        ))
    }
}
