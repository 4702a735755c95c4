//! PDF access layer
//!
//! Everything that touches PDFium lives under this module.

mod reader;

pub use reader::{pdfium_available, FormDocument, SectionScan, TextLine};
