//! Answer resolution
//!
//! Two checkbox reads (YES-box, NA-box) collapse into one of four answers.
//! The whole truth table lives in [`resolve`].

use std::fmt;

/// Resolved answer for one question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    NotApplicable,
    /// The question's anchor was never found, or a checkbox region could not
    /// be sampled
    Undetectable,
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Answer::Yes => "YES",
            Answer::No => "NO",
            Answer::NotApplicable => "NA",
            Answer::Undetectable => "Unable to detect",
        };
        f.write_str(s)
    }
}

/// Combine the YES-box and NA-box reads into an answer
///
/// An absent read on either side short-circuits to `Undetectable`. Both boxes
/// marked is a double-marked form; it shouldn't happen, but when it does the
/// answer is YES.
pub fn resolve(yes_checked: Option<bool>, na_checked: Option<bool>) -> Answer {
    match (yes_checked, na_checked) {
        (None, _) | (_, None) => Answer::Undetectable,
        (Some(true), Some(false)) => Answer::Yes,
        (Some(false), Some(true)) => Answer::NotApplicable,
        (Some(true), Some(true)) => Answer::Yes,
        (Some(false), Some(false)) => Answer::No,
    }
}
