//! Fitted categorical encoder
//!
//! Shipped in the bundle next to the model. The prediction path binarizes the
//! YES/NO selectors itself and never calls into it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Encoder {
    /// Ordered class list; a label's code is its position
    Label { classes: Vec<String> },
}

impl Encoder {
    pub fn kind(&self) -> &'static str {
        match self {
            Encoder::Label { .. } => "label",
        }
    }

    pub fn classes(&self) -> &[String] {
        match self {
            Encoder::Label { classes } => classes,
        }
    }

    pub fn encode(&self, label: &str) -> Option<usize> {
        self.classes().iter().position(|c| c == label)
    }

    pub fn check(&self) -> Result<(), String> {
        if self.classes().is_empty() {
            return Err("encoder.classes is empty".to_string());
        }
        Ok(())
    }
}
