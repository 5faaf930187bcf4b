//! In-memory word-processing document: paragraphs, runs, tables and pictures

/// Twentieths of a point, the unit used for page geometry and table widths
pub type Twips = u32;

pub const TWIPS_PER_INCH: f64 = 1440.0;
pub const EMU_PER_INCH: f64 = 914_400.0;

pub fn inches(value: f64) -> Twips {
    (value * TWIPS_PER_INCH).round() as Twips
}

pub fn points(value: f64) -> Twips {
    (value * 20.0).round() as Twips
}

/// RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    /// Footnote and note colour
    pub const HIGHLIGHT: Color = Color(0, 0, 153);
    pub const ERROR: Color = Color(255, 0, 0);

    pub fn hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Character formatting
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunProperties {
    pub bold: Option<bool>,
    pub color: Option<Color>,
    /// Size in points
    pub size: Option<f64>,
    pub superscript: bool,
    pub font_name: Option<String>,
}

impl RunProperties {
    pub fn is_empty(&self) -> bool {
        *self == RunProperties::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakKind {
    Line,
    Page,
}

/// Index of an embedded media part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaId(pub usize);

/// An inline picture referencing embedded media
#[derive(Debug, Clone, PartialEq)]
pub struct Picture {
    pub media: MediaId,
    pub width_emu: u64,
    pub height_emu: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunContent {
    Text(String),
    Break(BreakKind),
    Tab,
    Picture(Picture),
}

/// A run of uniformly formatted content
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    pub content: Vec<RunContent>,
    pub properties: RunProperties,
}

impl Run {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        let mut run = Self::new();
        run.add_text(text);
        run
    }

    /// Append text; `\n` and vertical tab become line breaks, `\t` a tab
    pub fn add_text(&mut self, text: impl Into<String>) -> &mut Self {
        let text = text.into();
        let mut pending = String::new();
        for c in text.chars() {
            let control = match c {
                '\n' | '\u{0B}' => RunContent::Break(BreakKind::Line),
                '\t' => RunContent::Tab,
                '\r' => continue,
                _ => {
                    pending.push(c);
                    continue;
                }
            };
            self.push_text(std::mem::take(&mut pending));
            self.content.push(control);
        }
        self.push_text(pending);
        self
    }

    fn push_text(&mut self, text: String) {
        if !text.is_empty() {
            self.content.push(RunContent::Text(text));
        }
    }

    pub fn add_break(&mut self, kind: BreakKind) -> &mut Self {
        self.content.push(RunContent::Break(kind));
        self
    }

    pub fn add_picture(&mut self, picture: Picture) -> &mut Self {
        self.content.push(RunContent::Picture(picture));
        self
    }

    pub fn bold(&mut self, bold: bool) -> &mut Self {
        self.properties.bold = Some(bold);
        self
    }

    pub fn color(&mut self, color: Color) -> &mut Self {
        self.properties.color = Some(color);
        self
    }

    pub fn size(&mut self, points: f64) -> &mut Self {
        self.properties.size = Some(points);
        self
    }

    pub fn superscript(&mut self, superscript: bool) -> &mut Self {
        self.properties.superscript = superscript;
        self
    }

    /// Concatenated text content; breaks read as `\n`
    pub fn text(&self) -> String {
        let mut out = String::new();
        for item in &self.content {
            match item {
                RunContent::Text(t) => out.push_str(t),
                RunContent::Break(_) => out.push('\n'),
                RunContent::Tab => out.push('\t'),
                RunContent::Picture(_) => {}
            }
        }
        out
    }

    /// Replace all content with `text`
    pub fn set_text(&mut self, text: &str) {
        self.content.clear();
        self.add_text(text);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn as_str(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub runs: Vec<Run>,
    pub alignment: Option<Alignment>,
    /// Bottom border width in eighths of a point (horizontal rule)
    pub bottom_border: Option<u32>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a run holding `text` and return it for formatting
    pub fn add_run(&mut self, text: impl Into<String>) -> &mut Run {
        self.runs.push(Run::with_text(text));
        let last = self.runs.len() - 1;
        &mut self.runs[last]
    }

    pub fn align(&mut self, alignment: Alignment) -> &mut Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(Run::text).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.content.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    /// Always holds at least one paragraph
    pub paragraphs: Vec<Paragraph>,
    pub width: Option<Twips>,
}

impl Default for TableCell {
    fn default() -> Self {
        Self {
            paragraphs: vec![Paragraph::new()],
            width: None,
        }
    }
}

impl TableCell {
    /// The cell's first paragraph
    pub fn paragraph_mut(&mut self) -> &mut Paragraph {
        if self.paragraphs.is_empty() {
            self.paragraphs.push(Paragraph::new());
        }
        &mut self.paragraphs[0]
    }

    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

impl TableRow {
    fn with_cols(cols: usize) -> Self {
        Self {
            cells: vec![TableCell::default(); cols],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub rows: Vec<TableRow>,
    pub cols: usize,
    pub column_widths: Vec<Twips>,
    pub alignment: Option<Alignment>,
}

impl Table {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows: vec![TableRow::with_cols(cols); rows],
            cols,
            column_widths: Vec::new(),
            alignment: None,
        }
    }

    pub fn add_row(&mut self) -> &mut TableRow {
        self.rows.push(TableRow::with_cols(self.cols));
        let last = self.rows.len() - 1;
        &mut self.rows[last]
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut TableCell> {
        self.rows.get_mut(row).and_then(|r| r.cells.get_mut(col))
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&TableCell> {
        self.rows.get(row).and_then(|r| r.cells.get(col))
    }

    /// Set widths for every column; also applied to each cell
    pub fn set_column_widths(&mut self, widths: &[Twips]) {
        self.column_widths = widths.iter().copied().take(self.cols).collect();
        for row in &mut self.rows {
            for (cell, width) in row.cells.iter_mut().zip(widths) {
                cell.width = Some(*width);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

/// Binary part stored under `word/media/`
#[derive(Debug, Clone, PartialEq)]
pub struct Media {
    pub data: Vec<u8>,
    /// File extension without the dot (`png`, `jpeg`, ...)
    pub extension: String,
}

impl Media {
    pub fn file_name(&self, id: MediaId) -> String {
        format!("image{}.{}", id.0 + 1, self.extension)
    }

    pub fn content_type(&self) -> &'static str {
        match self.extension.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "bmp" => "image/bmp",
            _ => "application/octet-stream",
        }
    }
}

/// Page size and margins
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSetup {
    pub width: Twips,
    pub height: Twips,
    pub margin_top: Twips,
    pub margin_bottom: Twips,
    pub margin_left: Twips,
    pub margin_right: Twips,
}

impl Default for PageSetup {
    /// US Letter with one-inch margins
    fn default() -> Self {
        Self {
            width: 12240,
            height: 15840,
            margin_top: 1440,
            margin_bottom: 1440,
            margin_left: 1440,
            margin_right: 1440,
        }
    }
}

impl PageSetup {
    pub fn set_margins(&mut self, margin: Twips) {
        self.margin_top = margin;
        self.margin_bottom = margin;
        self.margin_left = margin;
        self.margin_right = margin;
    }
}

/// Defaults written to the `Normal` style
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentStyle {
    pub font_name: Option<String>,
    /// Size in points
    pub font_size: Option<f64>,
    /// Zero space before and after paragraphs
    pub compact_spacing: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub body: Vec<Block>,
    pub header: Vec<Paragraph>,
    pub footer: Vec<Paragraph>,
    pub media: Vec<Media>,
    pub page: PageSetup,
    pub style: DocumentStyle,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_paragraph(&mut self) -> &mut Paragraph {
        self.body.push(Block::Paragraph(Paragraph::new()));
        match self.body.last_mut() {
            Some(Block::Paragraph(p)) => p,
            _ => unreachable!("a paragraph was just pushed"),
        }
    }

    pub fn add_table(&mut self, rows: usize, cols: usize) -> &mut Table {
        self.body.push(Block::Table(Table::new(rows, cols)));
        match self.body.last_mut() {
            Some(Block::Table(t)) => t,
            _ => unreachable!("a table was just pushed"),
        }
    }

    /// Append a paragraph holding a single page break
    pub fn add_page_break(&mut self) {
        self.add_paragraph()
            .add_run("")
            .add_break(BreakKind::Page);
    }

    /// Register media bytes and return their id
    pub fn add_media(&mut self, data: Vec<u8>, extension: impl Into<String>) -> MediaId {
        self.media.push(Media {
            data,
            extension: extension.into(),
        });
        MediaId(self.media.len() - 1)
    }

    /// Top-level paragraphs (table cells excluded)
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            Block::Table(_) => None,
        })
    }

    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.body.iter_mut().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            Block::Table(_) => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.body.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            Block::Paragraph(_) => None,
        })
    }

    pub fn has_tables(&self) -> bool {
        self.tables().next().is_some()
    }

    /// Plain text of every top-level paragraph, one per line
    pub fn text(&self) -> String {
        self.paragraphs()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_set_text_splits_lines() {
        let mut run = Run::new();
        run.set_text("\nWi-Fi\n");
        assert_eq!(
            run.content,
            vec![
                RunContent::Break(BreakKind::Line),
                RunContent::Text("Wi-Fi".into()),
                RunContent::Break(BreakKind::Line),
            ]
        );
        assert_eq!(run.text(), "\nWi-Fi\n");
    }

    #[test]
    fn test_add_text_maps_cell_controls() {
        let run = Run::with_text("2 x USB-C\r\n1 x HDMI\u{0B}RJ-45\tGbE");
        assert_eq!(
            run.content,
            vec![
                RunContent::Text("2 x USB-C".into()),
                RunContent::Break(BreakKind::Line),
                RunContent::Text("1 x HDMI".into()),
                RunContent::Break(BreakKind::Line),
                RunContent::Text("RJ-45".into()),
                RunContent::Tab,
                RunContent::Text("GbE".into()),
            ]
        );
        assert_eq!(run.text(), "2 x USB-C\n1 x HDMI\nRJ-45\tGbE");
    }

    #[test]
    fn test_table_widths_apply_to_cells() {
        let mut table = Table::new(2, 3);
        table.set_column_widths(&[inches(2.0), inches(2.0), inches(4.0)]);
        assert_eq!(table.column_widths, vec![2880, 2880, 5760]);
        assert_eq!(table.cell(1, 2).and_then(|c| c.width), Some(5760));
        assert!(table.cell(2, 0).is_none());
    }

    #[test]
    fn test_color_hex() {
        assert_eq!(Color::HIGHLIGHT.hex(), "000099");
        assert_eq!(Color::ERROR.hex(), "FF0000");
    }
}
