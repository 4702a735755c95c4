//! Form template configuration
//!
//! A template binds one form layout: the section heading to look for, the
//! ordered question list, the x-bounds of the YES and NA checkbox columns,
//! and the detection parameters. The compiled-in default describes the
//! referral requirements section of the G040 appeal form; other layouts can
//! be loaded from a JSON file without code changes.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One question to extract: the prompt shown in the report and the substring
/// used to locate it on the page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSpec {
    /// Full question text, printed in the report
    pub prompt: String,
    /// Search substring anchoring the question's line on the section page
    pub anchor: String,
}

impl QuestionSpec {
    pub fn new(prompt: &str, anchor: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            anchor: anchor.to_string(),
        }
    }
}

/// Horizontal bounds of one checkbox column, in page points
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CheckboxColumn {
    pub x_start: f32,
    pub x_end: f32,
}

impl CheckboxColumn {
    pub fn new(x_start: f32, x_end: f32) -> Self {
        Self { x_start, x_end }
    }

    /// Column width in points
    pub fn width(&self) -> f32 {
        self.x_end - self.x_start
    }
}

/// Layout and detection parameters for one form template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormTemplate {
    /// Heading identifying the section page
    pub section_heading: String,
    /// Questions in report order
    pub questions: Vec<QuestionSpec>,
    /// Bounds of the YES checkbox column
    pub yes_column: CheckboxColumn,
    /// Bounds of the NA checkbox column
    pub na_column: CheckboxColumn,
    /// Points above the anchor's top edge included in the sampled band
    #[serde(default = "default_band_above")]
    pub band_above: f32,
    /// Points below the anchor's top edge included in the sampled band
    #[serde(default = "default_band_below")]
    pub band_below: f32,
    /// Linear magnification used when rasterizing the section page
    #[serde(default = "default_render_scale")]
    pub render_scale: f32,
    /// Grayscale values strictly below this count as dark (0-255)
    #[serde(default = "default_darkness_cutoff")]
    pub darkness_cutoff: u8,
    /// A region is checked when its dark-pixel fraction exceeds this
    #[serde(default = "default_fill_threshold")]
    pub fill_threshold: f32,
}

fn default_band_above() -> f32 {
    1.0
}

fn default_band_below() -> f32 {
    10.0
}

fn default_render_scale() -> f32 {
    10.0
}

fn default_darkness_cutoff() -> u8 {
    200
}

fn default_fill_threshold() -> f32 {
    0.12
}

impl Default for FormTemplate {
    /// The referral requirements template: six questions, YES boxes at
    /// x 465-480, N/A boxes at x 507-522, an 11-point band starting one
    /// point above each question's top edge.
    fn default() -> Self {
        Self {
            section_heading: "REFERRAL REQUIREMENTS".to_string(),
            questions: vec![
                QuestionSpec::new(
                    "Has new information been submitted since the original decision?",
                    "Has new information been submitted",
                ),
                QuestionSpec::new(
                    "If yes, has this information been acknowledged?",
                    "If yes, has this information been acknowledged",
                ),
                QuestionSpec::new(
                    "Have the reasons the appellant feels the decision is incorrect been addressed?",
                    "Have the reasons the appellant feels",
                ),
                QuestionSpec::new(
                    "Are all medical investigations and assessments related to the appeal complete?",
                    "Are all medical investigations",
                ),
                QuestionSpec::new(
                    "Is the G040 within one year of the decision?",
                    "Is the G040 within one year",
                ),
                QuestionSpec::new(
                    "Has the G040 been converted, if applicable (e.g., LWKR, LREP, AO submission)?",
                    "Has the G040 been converted",
                ),
            ],
            yes_column: CheckboxColumn::new(465.0, 480.0),
            na_column: CheckboxColumn::new(507.0, 522.0),
            band_above: default_band_above(),
            band_below: default_band_below(),
            render_scale: default_render_scale(),
            darkness_cutoff: default_darkness_cutoff(),
            fill_threshold: default_fill_threshold(),
        }
    }
}

impl FormTemplate {
    /// Load a template from a JSON file and validate it
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let template: FormTemplate = serde_json::from_str(&data)?;
        template.validate()?;
        Ok(template)
    }

    /// Check that the template describes a usable layout
    pub fn validate(&self) -> Result<()> {
        if self.section_heading.trim().is_empty() {
            return Err(Error::InvalidTemplate {
                reason: "section heading is empty".to_string(),
            });
        }
        if self.questions.is_empty() {
            return Err(Error::InvalidTemplate {
                reason: "template has no questions".to_string(),
            });
        }
        for (i, question) in self.questions.iter().enumerate() {
            if question.anchor.trim().is_empty() {
                return Err(Error::InvalidTemplate {
                    reason: format!("question {} has an empty anchor", i + 1),
                });
            }
        }
        for (name, column) in [("yes", &self.yes_column), ("na", &self.na_column)] {
            if column.x_end <= column.x_start {
                return Err(Error::InvalidTemplate {
                    reason: format!(
                        "{} column is degenerate: x_end {} <= x_start {}",
                        name, column.x_end, column.x_start
                    ),
                });
            }
        }
        if self.band_above + self.band_below <= 0.0 {
            return Err(Error::InvalidTemplate {
                reason: "sampling band has no height".to_string(),
            });
        }
        if !self.render_scale.is_finite() || self.render_scale <= 0.0 {
            return Err(Error::InvalidTemplate {
                reason: format!("render scale must be positive, got {}", self.render_scale),
            });
        }
        if !(0.0..=1.0).contains(&self.fill_threshold) {
            return Err(Error::InvalidTemplate {
                reason: format!(
                    "fill threshold must be within 0..=1, got {}",
                    self.fill_threshold
                ),
            });
        }
        Ok(())
    }
}
