//! Extraction pipeline and report formatting
//!
//! One linear pass: locate the section page, then for each question
//! independently find its anchor, sample and classify both checkbox regions,
//! and resolve the answer. A question whose anchor is missing yields an
//! undetectable answer without affecting the others.

use crate::answer::{resolve, Answer};
use crate::detect::{classify, sample_region, BoxRead, Region};
use crate::error::Result;
use crate::pdf::{FormDocument, SectionScan};
use crate::template::{CheckboxColumn, FormTemplate, QuestionSpec};
use std::fmt;

/// Outcome for one question
#[derive(Debug, Clone)]
pub struct QuestionResult {
    /// Question prompt as printed in the report
    pub prompt: String,
    /// Resolved answer
    pub answer: Answer,
    /// YES-box read, absent when the anchor or region was unavailable
    pub yes: Option<BoxRead>,
    /// NA-box read, absent when the anchor or region was unavailable
    pub na: Option<BoxRead>,
}

/// Full extraction result for one document
#[derive(Debug, Clone)]
pub struct ExtractionReport {
    /// Heading of the extracted section
    pub section_heading: String,
    /// 1-indexed page the section was found on
    pub section_page: u32,
    /// Per-question outcomes in template order
    pub results: Vec<QuestionResult>,
}

/// Run the extraction pipeline over an opened document
pub fn extract_answers(
    document: &FormDocument,
    template: &FormTemplate,
) -> Result<ExtractionReport> {
    template.validate()?;

    let scan = document.scan_section(template)?;
    tracing::info!(
        page = scan.page_number(),
        heading = %template.section_heading,
        "located section page"
    );

    let results = template
        .questions
        .iter()
        .map(|question| extract_one(&scan, template, question))
        .collect();

    Ok(ExtractionReport {
        section_heading: template.section_heading.clone(),
        section_page: scan.page_number(),
        results,
    })
}

fn extract_one(
    scan: &SectionScan,
    template: &FormTemplate,
    question: &QuestionSpec,
) -> QuestionResult {
    let anchor_y = match scan.find_anchor(&question.anchor) {
        Some(y) => y,
        None => {
            tracing::warn!(
                anchor = %question.anchor,
                "question anchor not found on section page"
            );
            return QuestionResult {
                prompt: question.prompt.clone(),
                answer: Answer::Undetectable,
                yes: None,
                na: None,
            };
        }
    };

    let yes = read_checkbox(scan, template, anchor_y, &template.yes_column);
    let na = read_checkbox(scan, template, anchor_y, &template.na_column);

    let answer = resolve(yes.map(|r| r.checked), na.map(|r| r.checked));

    if let (Some(y), Some(n)) = (yes, na) {
        if y.checked && n.checked {
            tracing::warn!(
                anchor = %question.anchor,
                "both checkboxes marked; resolving to YES"
            );
        }
        tracing::debug!(
            anchor = %question.anchor,
            yes_fill = y.fill_ratio,
            na_fill = n.fill_ratio,
            %answer,
            "classified checkboxes"
        );
    }

    QuestionResult {
        prompt: question.prompt.clone(),
        answer,
        yes,
        na,
    }
}

fn read_checkbox(
    scan: &SectionScan,
    template: &FormTemplate,
    anchor_y: f32,
    column: &CheckboxColumn,
) -> Option<BoxRead> {
    let region = Region::around_anchor(anchor_y, column, template.band_above, template.band_below);
    let sample = sample_region(scan.raster(), scan.scale(), &region)?;
    let read = classify(&sample, template.darkness_cutoff, template.fill_threshold);

    if read.marginal {
        tracing::warn!(
            fill_ratio = read.fill_ratio,
            threshold = template.fill_threshold,
            "fill ratio close to the decision threshold"
        );
    }

    Some(read)
}

impl fmt::Display for ExtractionReport {
    /// Plain-text report: banner, one Q/A block per question, completion
    /// footer.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bar = "=".repeat(80);

        writeln!(f, "\n{}", bar)?;
        writeln!(f, "{} SECTION", self.section_heading)?;
        writeln!(f, "{}\n", bar)?;

        for result in &self.results {
            writeln!(f, "Q: {}", result.prompt)?;
            writeln!(f, "A: {}\n", result.answer)?;
        }

        writeln!(f, "{}", bar)?;
        writeln!(f, "Extraction complete!")?;
        write!(f, "{}", bar)
    }
}
