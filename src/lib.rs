//! Checkbox answer extraction from referral requirement PDF forms
//!
//! The pipeline is a single linear pass:
//! - locate the page carrying the section heading and rasterize it once
//! - anchor each question by its search substring
//! - crop the YES and NA checkbox bands next to each anchor
//! - classify each band by dark-pixel density
//! - resolve the two reads into YES / NO / NA / undetectable
//!
//! Layout constants (heading, questions, column bounds, thresholds) live in
//! [`template::FormTemplate`]; the built-in default describes the referral
//! requirements section of the G040 appeal form.

pub mod answer;
pub mod detect;
pub mod error;
pub mod extract;
pub mod pdf;
pub mod template;

pub use answer::{resolve, Answer};
pub use error::{Error, Result};
pub use extract::{extract_answers, ExtractionReport, QuestionResult};
pub use template::{CheckboxColumn, FormTemplate, QuestionSpec};
