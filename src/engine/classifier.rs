//! Fitted classifiers
//!
//! Three families cover what a placement bundle is usually exported as: a
//! linear model, a single CART tree, or a forest of them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::inference::InferenceError;

/// Capability: map a scaled feature vector onto a class label
pub trait Classifier {
    fn predict(&self, features: &[f64]) -> Result<i64, InferenceError>;
}

fn default_classes() -> [i64; 2] {
    [0, 1]
}

/// One entry of a flattened tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    /// `x[feature] <= threshold` goes to `left`, otherwise `right`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf { class: i64 },
}

/// CART tree stored as a node table, root at index 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    fn check(&self, n_features: usize, label: &str) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err(format!("{} has no nodes", label));
        }

        for (i, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split { feature, threshold, left, right } = node {
                if *feature >= n_features {
                    return Err(format!(
                        "{} node {} splits on feature {}, only {} features exist",
                        label, i, feature, n_features
                    ));
                }
                if threshold.is_nan() {
                    return Err(format!("{} node {} has a NaN threshold", label, i));
                }
                // Children must point forward, which also rules out cycles
                for child in [left, right] {
                    if *child <= i || *child >= self.nodes.len() {
                        return Err(format!(
                            "{} node {} has invalid child index {}",
                            label, i, child
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}

impl Classifier for DecisionTree {
    fn predict(&self, features: &[f64]) -> Result<i64, InferenceError> {
        let mut index = 0;

        // A valid tree reaches a leaf in at most `nodes.len()` steps
        for _ in 0..self.nodes.len() {
            match self.nodes.get(index) {
                Some(TreeNode::Leaf { class }) => return Ok(*class),
                Some(TreeNode::Split { feature, threshold, left, right }) => {
                    let value = features.get(*feature).ok_or(InferenceError::DimensionMismatch {
                        stage: "decision_tree",
                        expected: feature + 1,
                        actual: features.len(),
                    })?;
                    index = if *value <= *threshold { *left } else { *right };
                }
                None => break,
            }
        }

        Err(InferenceError::Model(format!(
            "tree walk did not reach a leaf (stopped at node {})",
            index
        )))
    }
}

/// Classifier variants a bundle can hold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Model {
    /// `classes[1]` when `coef · x + intercept > 0`, else `classes[0]`
    LogisticRegression {
        coef: Vec<f64>,
        intercept: f64,
        #[serde(default = "default_classes")]
        classes: [i64; 2],
    },

    DecisionTree(DecisionTree),

    /// Majority vote; ties go to the smallest class
    RandomForest { trees: Vec<DecisionTree> },
}

impl Model {
    pub fn kind(&self) -> &'static str {
        match self {
            Model::LogisticRegression { .. } => "logistic_regression",
            Model::DecisionTree(_) => "decision_tree",
            Model::RandomForest { .. } => "random_forest",
        }
    }

    /// Check fitted parameters against the expected input width
    pub fn check_dimensions(&self, n_features: usize) -> Result<(), String> {
        match self {
            Model::LogisticRegression { coef, intercept, .. } => {
                if coef.len() != n_features {
                    return Err(format!(
                        "model.coef has {} values, expected {}",
                        coef.len(),
                        n_features
                    ));
                }
                if coef.iter().any(|c| !c.is_finite()) || !intercept.is_finite() {
                    return Err("model coefficients must be finite".to_string());
                }
                Ok(())
            }
            Model::DecisionTree(tree) => tree.check(n_features, "model"),
            Model::RandomForest { trees } => {
                if trees.is_empty() {
                    return Err("model.trees is empty".to_string());
                }
                for (i, tree) in trees.iter().enumerate() {
                    tree.check(n_features, &format!("model.trees[{}]", i))?;
                }
                Ok(())
            }
        }
    }

    /// Linear score for logistic models, `None` for trees
    pub fn decision_function(&self, features: &[f64]) -> Option<f64> {
        match self {
            Model::LogisticRegression { coef, intercept, .. } => Some(
                coef.iter().zip(features).map(|(w, x)| w * x).sum::<f64>() + intercept,
            ),
            _ => None,
        }
    }
}

impl Classifier for Model {
    fn predict(&self, features: &[f64]) -> Result<i64, InferenceError> {
        match self {
            Model::LogisticRegression { coef, classes, .. } => {
                if features.len() != coef.len() {
                    return Err(InferenceError::DimensionMismatch {
                        stage: "logistic_regression",
                        expected: coef.len(),
                        actual: features.len(),
                    });
                }
                let score = self.decision_function(features).unwrap_or_default();
                Ok(if score > 0.0 { classes[1] } else { classes[0] })
            }
            Model::DecisionTree(tree) => tree.predict(features),
            Model::RandomForest { trees } => {
                let mut votes: BTreeMap<i64, usize> = BTreeMap::new();
                for tree in trees {
                    *votes.entry(tree.predict(features)?).or_default() += 1;
                }

                // BTreeMap iterates ascending, so the first maximum wins ties
                let mut winner: Option<(i64, usize)> = None;
                for (class, count) in votes {
                    if winner.map_or(true, |(_, best)| count > best) {
                        winner = Some((class, count));
                    }
                }

                winner
                    .map(|(class, _)| class)
                    .ok_or_else(|| InferenceError::Model("forest has no trees".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: usize, threshold: f64, low: i64, high: i64) -> DecisionTree {
        DecisionTree {
            nodes: vec![
                TreeNode::Split { feature, threshold, left: 1, right: 2 },
                TreeNode::Leaf { class: low },
                TreeNode::Leaf { class: high },
            ],
        }
    }

    #[test]
    fn test_logistic_sign_decides_class() {
        let model = Model::LogisticRegression {
            coef: vec![1.0, -1.0],
            intercept: 0.0,
            classes: [0, 1],
        };
        assert_eq!(model.predict(&[2.0, 1.0]).unwrap(), 1);
        assert_eq!(model.predict(&[1.0, 2.0]).unwrap(), 0);
        // Exactly zero is the negative class
        assert_eq!(model.predict(&[1.0, 1.0]).unwrap(), 0);
        assert_eq!(model.decision_function(&[3.0, 1.0]), Some(2.0));
    }

    #[test]
    fn test_logistic_custom_classes() {
        let model = Model::LogisticRegression {
            coef: vec![1.0],
            intercept: -0.5,
            classes: [-1, 7],
        };
        assert_eq!(model.predict(&[1.0]).unwrap(), 7);
        assert_eq!(model.predict(&[0.0]).unwrap(), -1);
    }

    #[test]
    fn test_logistic_wrong_width() {
        let model = Model::LogisticRegression {
            coef: vec![1.0; 10],
            intercept: 0.0,
            classes: [0, 1],
        };
        assert!(matches!(
            model.predict(&[1.0; 9]),
            Err(InferenceError::DimensionMismatch { expected: 10, actual: 9, .. })
        ));
    }

    #[test]
    fn test_tree_threshold_is_inclusive_left() {
        let tree = stump(0, 6.5, 0, 1);
        assert_eq!(tree.predict(&[6.5]).unwrap(), 0);
        assert_eq!(tree.predict(&[6.6]).unwrap(), 1);
    }

    #[test]
    fn test_deeper_tree() {
        let tree = DecisionTree {
            nodes: vec![
                TreeNode::Split { feature: 0, threshold: 6.0, left: 1, right: 2 },
                TreeNode::Leaf { class: 0 },
                TreeNode::Split { feature: 1, threshold: 0.5, left: 3, right: 4 },
                TreeNode::Leaf { class: 0 },
                TreeNode::Leaf { class: 1 },
            ],
        };
        assert_eq!(tree.predict(&[5.0, 1.0]).unwrap(), 0);
        assert_eq!(tree.predict(&[8.0, 0.0]).unwrap(), 0);
        assert_eq!(tree.predict(&[8.0, 1.0]).unwrap(), 1);
    }

    #[test]
    fn test_tree_check_rejects_backward_child() {
        let tree = DecisionTree {
            nodes: vec![
                TreeNode::Split { feature: 0, threshold: 1.0, left: 1, right: 0 },
                TreeNode::Leaf { class: 0 },
            ],
        };
        let err = tree.check(10, "model").unwrap_err();
        assert!(err.contains("invalid child index 0"));
    }

    #[test]
    fn test_tree_check_rejects_unknown_feature() {
        let tree = stump(10, 1.0, 0, 1);
        assert!(tree.check(10, "model").unwrap_err().contains("feature 10"));
        assert!(tree.check(11, "model").is_ok());
    }

    #[test]
    fn test_forest_majority_vote() {
        let model = Model::RandomForest {
            trees: vec![stump(0, 5.0, 0, 1), stump(0, 7.0, 0, 1), stump(0, 9.0, 0, 1)],
        };
        assert_eq!(model.predict(&[8.0]).unwrap(), 1);
        assert_eq!(model.predict(&[6.0]).unwrap(), 0);
    }

    #[test]
    fn test_forest_tie_goes_to_smallest_class() {
        let model = Model::RandomForest {
            trees: vec![stump(0, 5.0, 0, 1), stump(0, 7.0, 0, 1)],
        };
        assert_eq!(model.predict(&[6.0]).unwrap(), 0);
    }

    #[test]
    fn test_empty_forest_rejected() {
        let model = Model::RandomForest { trees: vec![] };
        assert!(model.check_dimensions(10).is_err());
    }

    #[test]
    fn test_deserialize_tree_bundle_entry() {
        let json = r#"{
            "kind": "decision_tree",
            "nodes": [
                {"type": "split", "feature": 0, "threshold": 7.5, "left": 1, "right": 2},
                {"type": "leaf", "class": 0},
                {"type": "leaf", "class": 1}
            ]
        }"#;
        let model: Model = serde_json::from_str(json).unwrap();
        assert_eq!(model.kind(), "decision_tree");
        assert!(model.check_dimensions(10).is_ok());
        assert_eq!(model.predict(&[8.0]).unwrap(), 1);
    }
}
