//! Footnote-marked text: bracket references, marker rows and footnote areas

pub mod footnote;
pub mod scan;
pub mod segment;

pub use footnote::{Classified, FootnoteEntry, RowClass, classify_cells, classify_row, partition_rows};
pub use scan::{Marker, scan_range};
pub use segment::{Segment, SegmentKind, reconstruct, segment};
