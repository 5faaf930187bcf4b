//! DOCX package writer: serializes a Document into an OOXML zip archive

use super::document::{
    Block, BreakKind, Document, MediaId, Paragraph, Picture, Run, RunContent, Table,
};
use anyhow::{Context, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_WP: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_PIC: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";
const NS_PKG_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_STYLES: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const REL_HEADER: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header";
const REL_FOOTER: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer";
const REL_IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

const CT_MAIN: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const CT_STYLES: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
const CT_HEADER: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml";
const CT_FOOTER: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml";

const HEADER_REL_ID: &str = "rIdHeader1";
const FOOTER_REL_ID: &str = "rIdFooter1";

/// Save a document to `path`
pub fn save_docx<P: AsRef<Path>>(document: &Document, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_docx(document, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Serialize a document into an in-memory `.docx`
pub fn docx_bytes(document: &Document) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    write_docx(document, &mut cursor)?;
    Ok(cursor.into_inner())
}

/// Write the complete `.docx` package
pub fn write_docx<W: Write + Seek>(document: &Document, output: W) -> Result<()> {
    let mut zip_writer = ZipWriter::new(output);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let has_header = !document.header.is_empty();
    let has_footer = !document.footer.is_empty();

    let mut parts: Vec<(String, Vec<u8>)> = vec![
        ("[Content_Types].xml".into(), content_types_xml(document)?),
        ("_rels/.rels".into(), package_rels_xml()?),
        ("word/document.xml".into(), document_xml(document)?),
        ("word/styles.xml".into(), styles_xml(document)?),
        (
            "word/_rels/document.xml.rels".into(),
            part_rels_xml(document, true)?,
        ),
    ];
    if has_header {
        parts.push(("word/header1.xml".into(), story_xml(document, "w:hdr", &document.header)?));
        parts.push(("word/_rels/header1.xml.rels".into(), part_rels_xml(document, false)?));
    }
    if has_footer {
        parts.push(("word/footer1.xml".into(), story_xml(document, "w:ftr", &document.footer)?));
        parts.push(("word/_rels/footer1.xml.rels".into(), part_rels_xml(document, false)?));
    }

    for (name, content) in &parts {
        zip_writer.start_file(name.as_str(), options)?;
        zip_writer.write_all(content)?;
    }

    for (index, media) in document.media.iter().enumerate() {
        let name = format!("word/media/{}", media.file_name(MediaId(index)));
        zip_writer.start_file(name, options)?;
        zip_writer.write_all(&media.data)?;
    }

    zip_writer.finish()?;
    Ok(())
}

// Helper functions

type XmlWriter = Writer<Cursor<Vec<u8>>>;

fn new_writer() -> Result<XmlWriter> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    Ok(writer)
}

fn finish(writer: XmlWriter) -> Vec<u8> {
    writer.into_inner().into_inner()
}

fn start(writer: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut element = BytesStart::new(name);
    for attr in attrs {
        element.push_attribute(*attr);
    }
    writer.write_event(Event::Start(element))?;
    Ok(())
}

fn end(writer: &mut XmlWriter, name: &str) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn empty(writer: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut element = BytesStart::new(name);
    for attr in attrs {
        element.push_attribute(*attr);
    }
    writer.write_event(Event::Empty(element))?;
    Ok(())
}

fn text(writer: &mut XmlWriter, content: &str) -> Result<()> {
    let content = xml_chars(content);
    writer.write_event(Event::Text(BytesText::new(&content)))?;
    Ok(())
}

/// Drops characters outside the XML 1.0 `Char` production
fn xml_chars(content: &str) -> Cow<'_, str> {
    fn allowed(c: char) -> bool {
        matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
    }
    if content.chars().all(allowed) {
        Cow::Borrowed(content)
    } else {
        Cow::Owned(content.chars().filter(|&c| allowed(c)).collect())
    }
}

fn media_rel_id(id: MediaId) -> String {
    format!("rIdImg{}", id.0 + 1)
}

fn content_types_xml(document: &Document) -> Result<Vec<u8>> {
    let mut w = new_writer()?;
    start(
        &mut w,
        "Types",
        &[(
            "xmlns",
            "http://schemas.openxmlformats.org/package/2006/content-types",
        )],
    )?;
    empty(
        &mut w,
        "Default",
        &[
            ("Extension", "rels"),
            (
                "ContentType",
                "application/vnd.openxmlformats-package.relationships+xml",
            ),
        ],
    )?;
    empty(
        &mut w,
        "Default",
        &[("Extension", "xml"), ("ContentType", "application/xml")],
    )?;

    let mut seen: Vec<&str> = Vec::new();
    for media in &document.media {
        if seen.contains(&media.extension.as_str()) {
            continue;
        }
        seen.push(media.extension.as_str());
        empty(
            &mut w,
            "Default",
            &[
                ("Extension", media.extension.as_str()),
                ("ContentType", media.content_type()),
            ],
        )?;
    }

    empty(
        &mut w,
        "Override",
        &[("PartName", "/word/document.xml"), ("ContentType", CT_MAIN)],
    )?;
    empty(
        &mut w,
        "Override",
        &[("PartName", "/word/styles.xml"), ("ContentType", CT_STYLES)],
    )?;
    if !document.header.is_empty() {
        empty(
            &mut w,
            "Override",
            &[("PartName", "/word/header1.xml"), ("ContentType", CT_HEADER)],
        )?;
    }
    if !document.footer.is_empty() {
        empty(
            &mut w,
            "Override",
            &[("PartName", "/word/footer1.xml"), ("ContentType", CT_FOOTER)],
        )?;
    }
    end(&mut w, "Types")?;
    Ok(finish(w))
}

fn package_rels_xml() -> Result<Vec<u8>> {
    let mut w = new_writer()?;
    start(&mut w, "Relationships", &[("xmlns", NS_PKG_RELS)])?;
    empty(
        &mut w,
        "Relationship",
        &[
            ("Id", "rId1"),
            ("Type", REL_OFFICE_DOCUMENT),
            ("Target", "word/document.xml"),
        ],
    )?;
    end(&mut w, "Relationships")?;
    Ok(finish(w))
}

/// Relationships of the main part (`main = true`) or of a header/footer part.
/// Every part gets a relationship to every media item.
fn part_rels_xml(document: &Document, main: bool) -> Result<Vec<u8>> {
    let mut w = new_writer()?;
    start(&mut w, "Relationships", &[("xmlns", NS_PKG_RELS)])?;
    if main {
        empty(
            &mut w,
            "Relationship",
            &[("Id", "rIdStyles"), ("Type", REL_STYLES), ("Target", "styles.xml")],
        )?;
        if !document.header.is_empty() {
            empty(
                &mut w,
                "Relationship",
                &[("Id", HEADER_REL_ID), ("Type", REL_HEADER), ("Target", "header1.xml")],
            )?;
        }
        if !document.footer.is_empty() {
            empty(
                &mut w,
                "Relationship",
                &[("Id", FOOTER_REL_ID), ("Type", REL_FOOTER), ("Target", "footer1.xml")],
            )?;
        }
    }
    for (index, media) in document.media.iter().enumerate() {
        let id = MediaId(index);
        let rel_id = media_rel_id(id);
        let target = format!("media/{}", media.file_name(id));
        empty(
            &mut w,
            "Relationship",
            &[
                ("Id", rel_id.as_str()),
                ("Type", REL_IMAGE),
                ("Target", target.as_str()),
            ],
        )?;
    }
    end(&mut w, "Relationships")?;
    Ok(finish(w))
}

const STORY_NAMESPACES: [(&str, &str); 5] = [
    ("xmlns:w", NS_W),
    ("xmlns:r", NS_R),
    ("xmlns:wp", NS_WP),
    ("xmlns:a", NS_A),
    ("xmlns:pic", NS_PIC),
];

fn document_xml(document: &Document) -> Result<Vec<u8>> {
    let mut w = new_writer()?;
    let mut pictures = PictureCounter::default();
    start(&mut w, "w:document", &STORY_NAMESPACES)?;
    start(&mut w, "w:body", &[])?;

    for block in &document.body {
        match block {
            Block::Paragraph(p) => write_paragraph(&mut w, p, &mut pictures)?,
            Block::Table(t) => write_table(&mut w, t, &mut pictures)?,
        }
    }

    write_section_properties(&mut w, document)?;
    end(&mut w, "w:body")?;
    end(&mut w, "w:document")?;
    Ok(finish(w))
}

fn story_xml(document: &Document, root: &str, paragraphs: &[Paragraph]) -> Result<Vec<u8>> {
    let mut w = new_writer()?;
    // Header/footer drawings get ids clear of the body's
    let mut pictures = PictureCounter {
        next: 1000 * (document.media.len() as u32 + 1),
    };
    start(&mut w, root, &STORY_NAMESPACES)?;
    for paragraph in paragraphs {
        write_paragraph(&mut w, paragraph, &mut pictures)?;
    }
    end(&mut w, root)?;
    Ok(finish(w))
}

fn write_section_properties(w: &mut XmlWriter, document: &Document) -> Result<()> {
    let page = &document.page;
    start(w, "w:sectPr", &[])?;
    if !document.header.is_empty() {
        empty(
            w,
            "w:headerReference",
            &[("w:type", "default"), ("r:id", HEADER_REL_ID)],
        )?;
    }
    if !document.footer.is_empty() {
        empty(
            w,
            "w:footerReference",
            &[("w:type", "default"), ("r:id", FOOTER_REL_ID)],
        )?;
    }
    let width = page.width.to_string();
    let height = page.height.to_string();
    empty(w, "w:pgSz", &[("w:w", width.as_str()), ("w:h", height.as_str())])?;
    let top = page.margin_top.to_string();
    let bottom = page.margin_bottom.to_string();
    let left = page.margin_left.to_string();
    let right = page.margin_right.to_string();
    empty(
        w,
        "w:pgMar",
        &[
            ("w:top", top.as_str()),
            ("w:right", right.as_str()),
            ("w:bottom", bottom.as_str()),
            ("w:left", left.as_str()),
            ("w:header", "360"),
            ("w:footer", "360"),
            ("w:gutter", "0"),
        ],
    )?;
    end(w, "w:sectPr")
}

/// Hands out unique `wp:docPr` ids
#[derive(Default)]
struct PictureCounter {
    next: u32,
}

impl PictureCounter {
    fn next_id(&mut self) -> u32 {
        self.next += 1;
        self.next
    }
}

fn write_paragraph(w: &mut XmlWriter, paragraph: &Paragraph, pictures: &mut PictureCounter) -> Result<()> {
    start(w, "w:p", &[])?;

    if paragraph.alignment.is_some() || paragraph.bottom_border.is_some() {
        start(w, "w:pPr", &[])?;
        if let Some(size) = paragraph.bottom_border {
            let size = size.to_string();
            start(w, "w:pBdr", &[])?;
            empty(
                w,
                "w:bottom",
                &[
                    ("w:val", "single"),
                    ("w:sz", size.as_str()),
                    ("w:space", "1"),
                    ("w:color", "auto"),
                ],
            )?;
            end(w, "w:pBdr")?;
        }
        if let Some(alignment) = paragraph.alignment {
            empty(w, "w:jc", &[("w:val", alignment.as_str())])?;
        }
        end(w, "w:pPr")?;
    }

    for run in &paragraph.runs {
        write_run(w, run, pictures)?;
    }

    end(w, "w:p")
}

fn write_run(w: &mut XmlWriter, run: &Run, pictures: &mut PictureCounter) -> Result<()> {
    start(w, "w:r", &[])?;

    let props = &run.properties;
    if !props.is_empty() {
        start(w, "w:rPr", &[])?;
        if let Some(font) = &props.font_name {
            empty(
                w,
                "w:rFonts",
                &[("w:ascii", font.as_str()), ("w:hAnsi", font.as_str()), ("w:cs", font.as_str())],
            )?;
        }
        if let Some(bold) = props.bold {
            if bold {
                empty(w, "w:b", &[])?;
            } else {
                empty(w, "w:b", &[("w:val", "0")])?;
            }
        }
        if let Some(color) = props.color {
            let hex = color.hex();
            empty(w, "w:color", &[("w:val", hex.as_str())])?;
        }
        if let Some(size) = props.size {
            let half_points = ((size * 2.0).round() as u32).to_string();
            empty(w, "w:sz", &[("w:val", half_points.as_str())])?;
            empty(w, "w:szCs", &[("w:val", half_points.as_str())])?;
        }
        if props.superscript {
            empty(w, "w:vertAlign", &[("w:val", "superscript")])?;
        }
        end(w, "w:rPr")?;
    }

    for item in &run.content {
        match item {
            RunContent::Text(content) => {
                start(w, "w:t", &[("xml:space", "preserve")])?;
                text(w, content)?;
                end(w, "w:t")?;
            }
            RunContent::Break(BreakKind::Line) => empty(w, "w:br", &[])?,
            RunContent::Break(BreakKind::Page) => empty(w, "w:br", &[("w:type", "page")])?,
            RunContent::Tab => empty(w, "w:tab", &[])?,
            RunContent::Picture(picture) => write_picture(w, picture, pictures.next_id())?,
        }
    }

    end(w, "w:r")
}

fn write_picture(w: &mut XmlWriter, picture: &Picture, doc_pr_id: u32) -> Result<()> {
    let cx = picture.width_emu.to_string();
    let cy = picture.height_emu.to_string();
    let id = doc_pr_id.to_string();
    let rel_id = media_rel_id(picture.media);

    start(w, "w:drawing", &[])?;
    start(
        w,
        "wp:inline",
        &[("distT", "0"), ("distB", "0"), ("distL", "0"), ("distR", "0")],
    )?;
    empty(w, "wp:extent", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    empty(
        w,
        "wp:effectExtent",
        &[("l", "0"), ("t", "0"), ("r", "0"), ("b", "0")],
    )?;
    empty(w, "wp:docPr", &[("id", id.as_str()), ("name", picture.name.as_str())])?;
    start(w, "wp:cNvGraphicFramePr", &[])?;
    empty(w, "a:graphicFrameLocks", &[("noChangeAspect", "1")])?;
    end(w, "wp:cNvGraphicFramePr")?;
    start(w, "a:graphic", &[])?;
    start(w, "a:graphicData", &[("uri", NS_PIC)])?;
    start(w, "pic:pic", &[])?;
    start(w, "pic:nvPicPr", &[])?;
    empty(w, "pic:cNvPr", &[("id", "0"), ("name", picture.name.as_str())])?;
    empty(w, "pic:cNvPicPr", &[])?;
    end(w, "pic:nvPicPr")?;
    start(w, "pic:blipFill", &[])?;
    empty(w, "a:blip", &[("r:embed", rel_id.as_str())])?;
    start(w, "a:stretch", &[])?;
    empty(w, "a:fillRect", &[])?;
    end(w, "a:stretch")?;
    end(w, "pic:blipFill")?;
    start(w, "pic:spPr", &[])?;
    start(w, "a:xfrm", &[])?;
    empty(w, "a:off", &[("x", "0"), ("y", "0")])?;
    empty(w, "a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    end(w, "a:xfrm")?;
    start(w, "a:prstGeom", &[("prst", "rect")])?;
    empty(w, "a:avLst", &[])?;
    end(w, "a:prstGeom")?;
    end(w, "pic:spPr")?;
    end(w, "pic:pic")?;
    end(w, "a:graphicData")?;
    end(w, "a:graphic")?;
    end(w, "wp:inline")?;
    end(w, "w:drawing")
}

fn write_table(w: &mut XmlWriter, table: &Table, pictures: &mut PictureCounter) -> Result<()> {
    start(w, "w:tbl", &[])?;

    start(w, "w:tblPr", &[])?;
    empty(w, "w:tblW", &[("w:w", "0"), ("w:type", "auto")])?;
    if let Some(alignment) = table.alignment {
        empty(w, "w:jc", &[("w:val", alignment.as_str())])?;
    }
    empty(w, "w:tblLook", &[("w:val", "04A0")])?;
    end(w, "w:tblPr")?;

    start(w, "w:tblGrid", &[])?;
    for col in 0..table.cols {
        match table.column_widths.get(col) {
            Some(width) => {
                let width = width.to_string();
                empty(w, "w:gridCol", &[("w:w", width.as_str())])?;
            }
            None => empty(w, "w:gridCol", &[])?,
        }
    }
    end(w, "w:tblGrid")?;

    for row in &table.rows {
        start(w, "w:tr", &[])?;
        for cell in &row.cells {
            start(w, "w:tc", &[])?;
            start(w, "w:tcPr", &[])?;
            match cell.width {
                Some(width) => {
                    let width = width.to_string();
                    empty(w, "w:tcW", &[("w:w", width.as_str()), ("w:type", "dxa")])?;
                }
                None => empty(w, "w:tcW", &[("w:w", "0"), ("w:type", "auto")])?,
            }
            end(w, "w:tcPr")?;
            if cell.paragraphs.is_empty() {
                empty(w, "w:p", &[])?;
            }
            for paragraph in &cell.paragraphs {
                write_paragraph(w, paragraph, pictures)?;
            }
            end(w, "w:tc")?;
        }
        end(w, "w:tr")?;
    }

    end(w, "w:tbl")
}

fn styles_xml(document: &Document) -> Result<Vec<u8>> {
    let style = &document.style;
    let mut w = new_writer()?;
    start(&mut w, "w:styles", &[("xmlns:w", NS_W)])?;

    start(&mut w, "w:docDefaults", &[])?;
    start(&mut w, "w:rPrDefault", &[])?;
    start(&mut w, "w:rPr", &[])?;
    if let Some(font) = &style.font_name {
        empty(
            &mut w,
            "w:rFonts",
            &[("w:ascii", font.as_str()), ("w:hAnsi", font.as_str()), ("w:cs", font.as_str())],
        )?;
    }
    if let Some(size) = style.font_size {
        let half_points = ((size * 2.0).round() as u32).to_string();
        empty(&mut w, "w:sz", &[("w:val", half_points.as_str())])?;
        empty(&mut w, "w:szCs", &[("w:val", half_points.as_str())])?;
    }
    end(&mut w, "w:rPr")?;
    end(&mut w, "w:rPrDefault")?;
    start(&mut w, "w:pPrDefault", &[])?;
    start(&mut w, "w:pPr", &[])?;
    if style.compact_spacing {
        empty(&mut w, "w:spacing", &[("w:before", "0"), ("w:after", "0")])?;
    } else {
        empty(
            &mut w,
            "w:spacing",
            &[("w:after", "200"), ("w:line", "276"), ("w:lineRule", "auto")],
        )?;
    }
    end(&mut w, "w:pPr")?;
    end(&mut w, "w:pPrDefault")?;
    end(&mut w, "w:docDefaults")?;

    start(
        &mut w,
        "w:style",
        &[("w:type", "paragraph"), ("w:default", "1"), ("w:styleId", "Normal")],
    )?;
    empty(&mut w, "w:name", &[("w:val", "Normal")])?;
    empty(&mut w, "w:qFormat", &[])?;
    end(&mut w, "w:style")?;

    end(&mut w, "w:styles")?;
    Ok(finish(w))
}
