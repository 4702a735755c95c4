//! Form document wrapper for PDFium
//!
//! All PDFium access is contained in this module. `FormDocument::scan_section`
//! walks the document once, locates the page carrying the section heading,
//! and returns an owned [`SectionScan`] (assembled text lines plus the page
//! rasterized at the template scale). Everything downstream of the scan is
//! pure and needs no PDF library.

use crate::error::{Error, Result};
use crate::template::FormTemplate;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;

/// Characters within this vertical distance are grouped into the same line
const Y_TOLERANCE: f32 = 5.0;

/// Horizontal gap treated as a word break when assembling line text
const SPACE_THRESHOLD: f32 = 10.0;

/// Get PDFium instance (creates new instance each time - PDFium is not thread-safe)
fn create_pdfium() -> Result<Pdfium> {
    // Try to bind to system library or use static linking
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                "/opt/pdfium/lib",
            ))
        })
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| Error::Pdfium {
            reason: format!("Failed to initialize PDFium: {}", e),
        })?;

    Ok(Pdfium::new(bindings))
}

/// Whether a PDFium library can be bound in this environment
pub fn pdfium_available() -> bool {
    create_pdfium().is_ok()
}

/// Map PDFium errors to our error type
fn map_pdfium_error(err: PdfiumError) -> Error {
    match err {
        PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::PasswordError) => {
            Error::PasswordRequired
        }
        _ => Error::Pdfium {
            reason: format!("{}", err),
        },
    }
}

/// One assembled text line with its top edge measured from the top of the page
#[derive(Debug, Clone)]
pub struct TextLine {
    /// Line text with word gaps collapsed to single spaces
    pub text: String,
    /// Distance from the top of the page to the top of the line, in points
    pub top: f32,
}

/// Extracted content of the section page
///
/// Lines are ordered top to bottom. The raster is the full page rendered at
/// `scale` pixels per point, so page coordinates map to pixels by simple
/// multiplication.
pub struct SectionScan {
    page_number: u32,
    page_width: f32,
    page_height: f32,
    lines: Vec<TextLine>,
    raster: DynamicImage,
    scale: f32,
}

impl SectionScan {
    /// 1-indexed number of the section page
    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    /// Page width in points
    pub fn page_width(&self) -> f32 {
        self.page_width
    }

    /// Page height in points
    pub fn page_height(&self) -> f32 {
        self.page_height
    }

    /// Full-page raster at `scale` pixels per point
    pub fn raster(&self) -> &DynamicImage {
        &self.raster
    }

    /// Linear magnification the raster was rendered at
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Top y-coordinate of the first line containing `needle`, scanning top
    /// to bottom. Returns `None` when no line matches.
    pub fn find_anchor(&self, needle: &str) -> Option<f32> {
        self.lines
            .iter()
            .find(|line| line.text.contains(needle))
            .map(|line| line.top)
    }

    /// Assembled page text, one line per text row
    pub fn text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.text);
            out.push('\n');
        }
        out.trim_end().to_string()
    }
}

/// An opened form document
///
/// Owns the raw PDF bytes; the PDFium handle is created inside each scan call
/// and dropped on every exit path.
pub struct FormDocument {
    data: Vec<u8>,
    password: Option<String>,
}

impl FormDocument {
    /// Open a PDF from a file path
    pub fn open<P: AsRef<Path>>(path: P, password: Option<&str>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(Error::PdfNotFound {
                path: path.display().to_string(),
            });
        }

        let data = std::fs::read(path)?;
        Self::open_bytes(&data, password)
    }

    /// Open a PDF from bytes
    pub fn open_bytes(data: &[u8], password: Option<&str>) -> Result<Self> {
        if data.len() < 4 || &data[0..4] != b"%PDF" {
            return Err(Error::InvalidPdf {
                reason: "Not a valid PDF file".to_string(),
            });
        }

        Ok(Self {
            data: data.to_vec(),
            password: password.map(|p| p.to_string()),
        })
    }

    /// Locate the page whose text contains the template's section heading and
    /// return its scan. Pages are checked in order; the first match wins.
    /// Errors with [`Error::SectionNotFound`] when no page matches.
    pub fn scan_section(&self, template: &FormTemplate) -> Result<SectionScan> {
        let pdfium = create_pdfium()?;

        let document = match self.password.as_deref() {
            Some(pwd) => pdfium.load_pdf_from_byte_slice(&self.data, Some(pwd)),
            None => pdfium.load_pdf_from_byte_slice(&self.data, None),
        }
        .map_err(map_pdfium_error)?;

        let pages = document.pages();

        for index in 0..pages.len() {
            let page = pages.get(index).map_err(|e| Error::Pdfium {
                reason: format!("Failed to get page {}: {}", index + 1, e),
            })?;

            let page_height = page.height().value;
            let lines = collect_lines(&page, page_height);

            if !lines
                .iter()
                .any(|line| line.text.contains(&template.section_heading))
            {
                continue;
            }

            tracing::debug!(page = index as u32 + 1, "section heading found");

            let config = PdfRenderConfig::new().scale_page_by_factor(template.render_scale);
            let bitmap = page.render_with_config(&config).map_err(|e| Error::Pdfium {
                reason: format!("Failed to render page {}: {}", index + 1, e),
            })?;

            return Ok(SectionScan {
                page_number: index as u32 + 1,
                page_width: page.width().value,
                page_height,
                lines,
                raster: bitmap.as_image(),
                scale: template.render_scale,
            });
        }

        Err(Error::SectionNotFound {
            heading: template.section_heading.clone(),
        })
    }
}

/// Assemble a page's characters into ordered text lines
///
/// Characters are grouped by Y-coordinate proximity and joined left to right,
/// inserting a space wherever the horizontal gap exceeds a typical character
/// width. Line tops are converted from PDF page coordinates (origin at the
/// bottom) to top-origin coordinates.
fn collect_lines(page: &PdfPage, page_height: f32) -> Vec<TextLine> {
    let text_obj = match page.text() {
        Ok(t) => t,
        Err(_) => return Vec::new(),
    };

    // Collect all characters with their positions
    let mut chars_with_pos: Vec<(char, f32, f32)> = Vec::new();

    for segment in text_obj.segments().iter() {
        if let Ok(chars) = segment.chars() {
            for char_result in chars.iter() {
                if let Some(c) = char_result.unicode_char() {
                    if let Ok(bounds) = char_result.loose_bounds() {
                        let x = bounds.left().value;
                        let y = bounds.top().value;
                        chars_with_pos.push((c, x, y));
                    }
                }
            }
        }
    }

    if chars_with_pos.is_empty() {
        return Vec::new();
    }

    // Sort by Y descending (top to bottom in page coordinates), then X ascending
    chars_with_pos.sort_by(|a, b| {
        let y_cmp = b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal);
        if y_cmp == std::cmp::Ordering::Equal {
            a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal)
        } else {
            y_cmp
        }
    });

    // Group into lines based on Y-coordinate proximity
    let mut groups: Vec<Vec<(char, f32)>> = Vec::new();
    let mut group_tops: Vec<f32> = Vec::new();
    let mut current_line: Vec<(char, f32)> = Vec::new();
    let mut current_y: Option<f32> = None;

    for (c, x, y) in chars_with_pos {
        match current_y {
            Some(cur_y) if (cur_y - y).abs() <= Y_TOLERANCE => {
                current_line.push((c, x));
            }
            _ => {
                if !current_line.is_empty() {
                    groups.push(current_line);
                }
                current_line = vec![(c, x)];
                if let Some(cur_y) = current_y {
                    group_tops.push(cur_y);
                }
                current_y = Some(y);
            }
        }
    }

    if !current_line.is_empty() {
        groups.push(current_line);
    }
    if let Some(cur_y) = current_y {
        group_tops.push(cur_y);
    }

    // Sort each line by X coordinate and join, spacing on large gaps
    let mut lines = Vec::with_capacity(groups.len());
    for (mut group, group_top) in groups.into_iter().zip(group_tops) {
        group.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        let mut text = String::new();
        let mut prev_x: Option<f32> = None;

        for (c, x) in group {
            if let Some(px) = prev_x {
                if x - px > SPACE_THRESHOLD && c != ' ' {
                    text.push(' ');
                }
            }
            text.push(c);
            prev_x = Some(x);
        }

        lines.push(TextLine {
            text,
            top: page_height - group_top,
        });
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_pdf_detection() {
        let result = FormDocument::open_bytes(b"not a pdf", None);
        assert!(matches!(result, Err(Error::InvalidPdf { .. })));
    }

    #[test]
    fn test_open_nonexistent_file() {
        let result = FormDocument::open("/nonexistent/path/form.pdf", None);
        assert!(matches!(result, Err(Error::PdfNotFound { .. })));
    }

    #[test]
    fn test_open_truncated_header() {
        let result = FormDocument::open_bytes(b"%PD", None);
        assert!(matches!(result, Err(Error::InvalidPdf { .. })));
    }
}
