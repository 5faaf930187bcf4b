//! Word-processing output: document model and `.docx` packaging

pub mod document;
mod package;

pub use document::{
    Alignment, Block, BreakKind, Color, Document, DocumentStyle, Media, MediaId, PageSetup,
    Paragraph, Picture, Run, RunContent, RunProperties, Table, TableCell, TableRow, Twips,
    EMU_PER_INCH, inches, points,
};
pub use package::{docx_bytes, save_docx, write_docx};
