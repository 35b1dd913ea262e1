//! Verdict model - what the page shows after a prediction

use serde::{Deserialize, Serialize};

pub const ELIGIBLE_LABEL: &str = "Eligible for Placement ✅";
pub const NOT_ELIGIBLE_LABEL: &str = "Not Eligible ❌";

/// Class the classifier must output for an eligible student
pub const ELIGIBLE_CLASS: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Eligible,
    NotEligible,
}

impl Verdict {
    /// Anything other than class 1 is not eligible
    pub fn from_class(class: i64) -> Self {
        if class == ELIGIBLE_CLASS {
            Verdict::Eligible
        } else {
            Verdict::NotEligible
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Verdict::Eligible => ELIGIBLE_LABEL,
            Verdict::NotEligible => NOT_ELIGIBLE_LABEL,
        }
    }

    pub fn is_eligible(self) -> bool {
        self == Verdict::Eligible
    }
}
