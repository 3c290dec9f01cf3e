//! Template JSON schema types

use serde::{Deserialize, Serialize};

/// RGB Color for text and strokes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Color {
    /// Red component (0.0 - 1.0)
    pub r: f64,
    /// Green component (0.0 - 1.0)
    pub g: f64,
    /// Blue component (0.0 - 1.0)
    pub b: f64,
}

impl Color {
    /// Create a new RGB color (values 0.0 - 1.0)
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
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

impl From<Color> for pdf_core::Color {
    fn from(c: Color) -> Self {
        pdf_core::Color::rgb(c.r as f32, c.g as f32, c.b as f32)
    }
}

/// Root template structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    /// Schema version
    pub version: String,

    /// Page setup
    #[serde(default)]
    pub page: PageSetup,

    /// Content blocks
    pub blocks: Vec<Block>,

    // === Internal state for fluent API (not serialized) ===
    #[serde(skip, default = "default_font_size")]
    current_font_size: u8,

    #[serde(skip)]
    current_font_style: FontStyle,

    #[serde(skip)]
    current_text_color: Option<Color>,

    #[serde(skip)]
    current_line_width: Option<f64>,
}

impl Default for Template {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            page: PageSetup::default(),
            blocks: Vec::new(),
            current_font_size: 10,
            current_font_style: FontStyle::Regular,
            current_text_color: None,
            current_line_width: None,
        }
    }
}

impl Template {
    /// Create an empty template measured in millimetres
    pub fn new_mm(title: &str) -> Self {
        Self {
            page: PageSetup {
                unit: Unit::Mm,
                title: Some(title.to_string()),
                pages: 1,
            },
            ..Self::default()
        }
    }

    /// Serialize the template (blocks and page setup) to pretty JSON
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set current font size and style for subsequent text insertions
    pub fn set_font(&mut self, size: u8, style: FontStyle) -> &mut Self {
        self.current_font_size = size;
        self.current_font_style = style;
        self
    }

    /// Set font style (bold, italic, etc.) for subsequent text insertions
    pub fn set_font_style(&mut self, style: FontStyle) -> &mut Self {
        self.current_font_style = style;
        self
    }

    /// Set text color for subsequent text insertions
    pub fn set_text_color(&mut self, color: Color) -> &mut Self {
        self.current_text_color = Some(color);
        self
    }

    /// Set line width (points) for subsequent rectangles and lines
    pub fn set_line_width(&mut self, width: f64) -> &mut Self {
        self.current_line_width = Some(width);
        self
    }

    fn current_font(&self) -> Font {
        Font {
            size: self.current_font_size,
            style: self.current_font_style,
            color: self.current_text_color,
        }
    }

    /// Insert static text at position
    ///
    /// Uses the current font settings from `set_font()` and `set_font_style()`.
    pub fn insert_text(&mut self, text: &str, page: usize, x: f64, y: f64, align: Align) -> &mut Self {
        let block = Block::Text(TextBlock {
            text: Some(text.to_string()),
            position: Position { x, y },
            font: Some(self.current_font()),
            align,
            pages: Some(vec![page]),
            ..TextBlock::default()
        });
        self.blocks.push(block);
        self
    }

    /// Insert text with data binding at position
    pub fn insert_binding(&mut self, bind: &str, page: usize, x: f64, y: f64, align: Align) -> &mut Self {
        let block = Block::Text(TextBlock {
            bind: Some(bind.to_string()),
            position: Position { x, y },
            font: Some(self.current_font()),
            align,
            pages: Some(vec![page]),
            ..TextBlock::default()
        });
        self.blocks.push(block);
        self
    }

    /// Insert bound text rendered through a special format type
    pub fn insert_formatted(
        &mut self,
        bind: &str,
        format_type: FormatType,
        page: usize,
        x: f64,
        y: f64,
        align: Align,
    ) -> &mut Self {
        let block = Block::Text(TextBlock {
            bind: Some(bind.to_string()),
            position: Position { x, y },
            font: Some(self.current_font()),
            align,
            format_type: Some(format_type),
            pages: Some(vec![page]),
            ..TextBlock::default()
        });
        self.blocks.push(block);
        self
    }

    /// Insert a rectangle outline (`x`/`y` is the top-left corner)
    pub fn draw_rect(&mut self, page: usize, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        let block = Block::Rect(RectBlock {
            id: None,
            position: Position { x, y },
            size: Size { width, height },
            line_width: self.current_line_width,
            color: None,
            pages: Some(vec![page]),
            enable: None,
        });
        self.blocks.push(block);
        self
    }

    /// Insert a straight line
    pub fn draw_line(&mut self, page: usize, x1: f64, y1: f64, x2: f64, y2: f64) -> &mut Self {
        let block = Block::Line(LineBlock {
            id: None,
            from: Position { x: x1, y: y1 },
            to: Position { x: x2, y: y2 },
            line_width: self.current_line_width,
            color: None,
            pages: Some(vec![page]),
            enable: None,
        });
        self.blocks.push(block);
        self
    }

    /// Insert a table bound to an array of row objects
    ///
    /// The table font is the current font.
    pub fn insert_table(&mut self, mut table: TableBlock) -> &mut Self {
        table.font = Some(self.current_font());
        self.blocks.push(Block::Table(table));
        self
    }

    /// Insert a bulleted list bound to an array
    ///
    /// The list font is the current font.
    pub fn insert_list(&mut self, mut list: ListBlock) -> &mut Self {
        list.font = Some(self.current_font());
        self.blocks.push(Block::List(list));
        self
    }

    /// Attach an enable binding to the most recently inserted block
    pub fn only_if(&mut self, enable: &str) -> &mut Self {
        if let Some(block) = self.blocks.last_mut() {
            block.set_enable(enable);
        }
        self
    }
}

/// Page setup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSetup {
    /// Unit for every coordinate and size in the blocks
    #[serde(default)]
    pub unit: Unit,

    /// Document title (Info dictionary)
    #[serde(default)]
    pub title: Option<String>,

    /// Number of blank A4 pages to create
    #[serde(default = "default_pages")]
    pub pages: usize,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            unit: Unit::default(),
            title: None,
            pages: 1,
        }
    }
}

fn default_pages() -> usize {
    1
}

/// Coordinate unit
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Pt,
    Mm,
}

impl Unit {
    /// Convert a length in this unit to points
    pub fn to_points(self, value: f64) -> f64 {
        match self {
            Unit::Pt => value,
            Unit::Mm => pdf_core::mm(value),
        }
    }
}

/// Content block (tagged union)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    /// Text block
    Text(TextBlock),

    /// Table block
    Table(TableBlock),

    /// Bulleted list block
    List(ListBlock),

    /// Rectangle outline
    Rect(RectBlock),

    /// Straight line
    Line(LineBlock),
}

/// Position (from the top-left corner of the page)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Size specification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Font specification for a block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Font {
    /// Font size in points
    #[serde(default = "default_font_size")]
    pub size: u8,

    /// Font style
    #[serde(default)]
    pub style: FontStyle,

    /// Text color (RGB, values 0.0-1.0)
    #[serde(default)]
    pub color: Option<Color>,
}

fn default_font_size() -> u8 {
    10
}

/// Font style
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
    Italic,
    #[serde(rename = "bold-italic")]
    BoldItalic,
}

/// Text alignment
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Word wrap configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordWrap {
    /// Maximum characters per line
    #[serde(rename = "maxChars")]
    pub max_chars: usize,

    /// Line height (template unit)
    #[serde(rename = "lineHeight")]
    pub line_height: f64,
}

/// Special format types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FormatType {
    /// `#,###.##` style number
    Number,
    /// "Rs. 2,210.00"
    Rupees,
    /// "Two Thousand ... Rupees Only"
    RupeeWords,
    /// "19 October 2026" from `YYYY-MM-DD`
    DateLong,
}

/// Text block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextBlock {
    /// Block identifier
    #[serde(default)]
    pub id: Option<String>,

    /// Data binding path (JSONPath-like)
    #[serde(default)]
    pub bind: Option<String>,

    /// Static text (used if bind is not specified)
    #[serde(default)]
    pub text: Option<String>,

    /// Position
    pub position: Position,

    /// Font specification
    #[serde(default)]
    pub font: Option<Font>,

    /// Text alignment
    #[serde(default)]
    pub align: Align,

    /// Word wrap configuration
    #[serde(rename = "wordWrap")]
    #[serde(default)]
    pub word_wrap: Option<WordWrap>,

    /// Cut the text to this many characters
    #[serde(rename = "maxChars")]
    #[serde(default)]
    pub max_chars: Option<usize>,

    /// Number format pattern
    #[serde(default)]
    pub format: Option<String>,

    /// Special format type
    #[serde(rename = "formatType")]
    #[serde(default)]
    pub format_type: Option<FormatType>,

    /// Pages to render on (1-indexed)
    #[serde(default)]
    pub pages: Option<Vec<usize>>,

    /// Optional enable flag - if set, evaluates binding to determine if block is rendered
    /// If the bound value is falsy (null, false, 0, empty string), block is not rendered
    #[serde(default)]
    pub enable: Option<String>,
}

fn default_row_height() -> f64 {
    5.0
}

/// Table block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableBlock {
    /// Block identifier
    #[serde(default)]
    pub id: Option<String>,

    /// Data binding path (to array of rows)
    #[serde(default)]
    pub bind: Option<String>,

    /// Position of the first row baseline
    pub position: Position,

    /// Font specification
    #[serde(default)]
    pub font: Option<Font>,

    /// Row height (template unit)
    #[serde(rename = "rowHeight")]
    #[serde(default = "default_row_height")]
    pub row_height: f64,

    /// Column definitions
    pub columns: Vec<TableColumn>,

    /// Stop after this many rendered rows
    #[serde(rename = "maxRows")]
    #[serde(default)]
    pub max_rows: Option<usize>,

    /// Skip rows whose value for this field is blank
    #[serde(rename = "requireField")]
    #[serde(default)]
    pub require_field: Option<String>,

    /// Pages to render on
    #[serde(default)]
    pub pages: Option<Vec<usize>>,

    /// Optional enable flag - if set, evaluates binding to determine if block is rendered
    /// If the bound value is falsy (null, false, 0, empty string), block is not rendered
    #[serde(default)]
    pub enable: Option<String>,
}

impl TableBlock {
    /// Table bound to `bind` with the given columns, first row at `x`/`y`
    pub fn new(bind: &str, page: usize, x: f64, y: f64, columns: Vec<TableColumn>) -> Self {
        Self {
            id: None,
            bind: Some(bind.to_string()),
            position: Position { x, y },
            font: None,
            row_height: default_row_height(),
            columns,
            max_rows: None,
            require_field: None,
            pages: Some(vec![page]),
            enable: None,
        }
    }
}

/// Table column definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableColumn {
    /// Field name in row object
    pub field: String,

    /// X offset from table position
    pub x: f64,

    /// Text alignment
    #[serde(default)]
    pub align: Align,

    /// Cut cell text to this many characters
    #[serde(rename = "maxChars")]
    #[serde(default)]
    pub max_chars: Option<usize>,

    /// Text used when the cell is blank
    #[serde(default)]
    pub fallback: Option<String>,

    /// Number format pattern
    #[serde(default)]
    pub format: Option<String>,
}

impl TableColumn {
    /// Left-aligned column at offset `x`
    pub fn new(field: &str, x: f64) -> Self {
        Self {
            field: field.to_string(),
            x,
            align: Align::Left,
            max_chars: None,
            fallback: None,
            format: None,
        }
    }
}

fn default_bullet() -> String {
    "\u{2022}".to_string()
}

fn default_line_height() -> f64 {
    4.0
}

/// Bulleted list block
///
/// Items are strings, or objects with `text` and an optional `marker` that
/// replaces the bullet for that item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListBlock {
    /// Block identifier
    #[serde(default)]
    pub id: Option<String>,

    /// Data binding path (to array of items)
    #[serde(default)]
    pub bind: Option<String>,

    /// Static items (used if bind is not specified)
    #[serde(default)]
    pub items: Vec<String>,

    /// Position of the first item baseline
    pub position: Position,

    /// Font specification
    #[serde(default)]
    pub font: Option<Font>,

    /// Bullet printed before each item
    #[serde(default = "default_bullet")]
    pub bullet: String,

    /// Line height (template unit)
    #[serde(rename = "lineHeight")]
    #[serde(default = "default_line_height")]
    pub line_height: f64,

    /// Pages to render on
    #[serde(default)]
    pub pages: Option<Vec<usize>>,

    /// Optional enable flag
    #[serde(default)]
    pub enable: Option<String>,
}

impl ListBlock {
    /// List bound to an array of items
    pub fn bound(bind: &str, page: usize, x: f64, y: f64) -> Self {
        Self {
            bind: Some(bind.to_string()),
            ..Self::fixed(Vec::new(), page, x, y)
        }
    }

    /// List of static items
    pub fn fixed(items: Vec<String>, page: usize, x: f64, y: f64) -> Self {
        Self {
            id: None,
            bind: None,
            items,
            position: Position { x, y },
            font: None,
            bullet: default_bullet(),
            line_height: default_line_height(),
            pages: Some(vec![page]),
            enable: None,
        }
    }
}

/// Rectangle outline block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RectBlock {
    /// Block identifier
    #[serde(default)]
    pub id: Option<String>,

    /// Top-left corner
    pub position: Position,

    /// Size
    pub size: Size,

    /// Line width in points
    #[serde(rename = "lineWidth")]
    #[serde(default)]
    pub line_width: Option<f64>,

    /// Stroke color
    #[serde(default)]
    pub color: Option<Color>,

    /// Pages to render on
    #[serde(default)]
    pub pages: Option<Vec<usize>>,

    /// Optional enable flag
    #[serde(default)]
    pub enable: Option<String>,
}

/// Line block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineBlock {
    /// Block identifier
    #[serde(default)]
    pub id: Option<String>,

    /// Start point
    pub from: Position,

    /// End point
    pub to: Position,

    /// Line width in points
    #[serde(rename = "lineWidth")]
    #[serde(default)]
    pub line_width: Option<f64>,

    /// Stroke color
    #[serde(default)]
    pub color: Option<Color>,

    /// Pages to render on
    #[serde(default)]
    pub pages: Option<Vec<usize>>,

    /// Optional enable flag
    #[serde(default)]
    pub enable: Option<String>,
}

impl Block {
    /// Get the block ID if present
    pub fn id(&self) -> Option<&str> {
        match self {
            Block::Text(b) => b.id.as_deref(),
            Block::Table(b) => b.id.as_deref(),
            Block::List(b) => b.id.as_deref(),
            Block::Rect(b) => b.id.as_deref(),
            Block::Line(b) => b.id.as_deref(),
        }
    }

    /// Get the data binding path if present
    pub fn bind(&self) -> Option<&str> {
        match self {
            Block::Text(b) => b.bind.as_deref(),
            Block::Table(b) => b.bind.as_deref(),
            Block::List(b) => b.bind.as_deref(),
            Block::Rect(_) | Block::Line(_) => None,
        }
    }

    /// Get the enable binding if present
    pub fn enable(&self) -> Option<&str> {
        match self {
            Block::Text(b) => b.enable.as_deref(),
            Block::Table(b) => b.enable.as_deref(),
            Block::List(b) => b.enable.as_deref(),
            Block::Rect(b) => b.enable.as_deref(),
            Block::Line(b) => b.enable.as_deref(),
        }
    }

    /// Set the enable binding
    pub fn set_enable(&mut self, enable: &str) {
        let enable = Some(enable.to_string());
        match self {
            Block::Text(b) => b.enable = enable,
            Block::Table(b) => b.enable = enable,
            Block::List(b) => b.enable = enable,
            Block::Rect(b) => b.enable = enable,
            Block::Line(b) => b.enable = enable,
        }
    }

    /// Get the pages this block is limited to
    pub fn pages(&self) -> Option<&[usize]> {
        match self {
            Block::Text(b) => b.pages.as_deref(),
            Block::Table(b) => b.pages.as_deref(),
            Block::List(b) => b.pages.as_deref(),
            Block::Rect(b) => b.pages.as_deref(),
            Block::Line(b) => b.pages.as_deref(),
        }
    }
}
