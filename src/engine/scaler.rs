//! Fitted feature scalers
//!
//! The bundle carries already-fitted parameters; nothing here fits anything.

use serde::{Deserialize, Serialize};

use super::inference::InferenceError;

/// Capability: map a raw feature vector onto the distribution the classifier
/// was trained on
pub trait FeatureScaler {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError>;

    /// Input width the scaler was fitted on, if it is fixed
    fn n_features(&self) -> Option<usize>;
}

fn default_feature_range() -> [f64; 2] {
    [0.0, 1.0]
}

/// Scaler variants a bundle can hold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaler {
    /// `(x - mean) / scale`
    Standard { mean: Vec<f64>, scale: Vec<f64> },

    /// `(x - data_min) / (data_max - data_min) * (hi - lo) + lo`
    MinMax {
        data_min: Vec<f64>,
        data_max: Vec<f64>,
        #[serde(default = "default_feature_range")]
        feature_range: [f64; 2],
    },

    /// Pass-through, for bundles whose classifier was fitted on raw values
    Identity,
}

impl Scaler {
    pub fn kind(&self) -> &'static str {
        match self {
            Scaler::Standard { .. } => "standard",
            Scaler::MinMax { .. } => "min_max",
            Scaler::Identity => "identity",
        }
    }

    /// Check fitted parameters against the expected input width
    pub fn check_dimensions(&self, expected: usize) -> Result<(), String> {
        match self {
            Scaler::Standard { mean, scale } => {
                check_len("scaler.mean", mean, expected)?;
                check_len("scaler.scale", scale, expected)
            }
            Scaler::MinMax { data_min, data_max, feature_range } => {
                check_len("scaler.data_min", data_min, expected)?;
                check_len("scaler.data_max", data_max, expected)?;
                if !(feature_range[0] < feature_range[1]) {
                    return Err(format!(
                        "scaler.feature_range must be increasing, got {:?}",
                        feature_range
                    ));
                }
                Ok(())
            }
            Scaler::Identity => Ok(()),
        }
    }
}

fn check_len(field: &str, values: &[f64], expected: usize) -> Result<(), String> {
    if values.len() != expected {
        return Err(format!(
            "{} has {} values, expected {}",
            field,
            values.len(),
            expected
        ));
    }
    if let Some(i) = values.iter().position(|v| !v.is_finite()) {
        return Err(format!("{}[{}] is not finite", field, i));
    }
    Ok(())
}

/// Zero-variance and zero-range columns divide by one instead
fn non_zero(value: f64) -> f64 {
    if value == 0.0 { 1.0 } else { value }
}

impl FeatureScaler for Scaler {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        if let Some(expected) = self.n_features() {
            if features.len() != expected {
                return Err(InferenceError::DimensionMismatch {
                    stage: "scaler",
                    expected,
                    actual: features.len(),
                });
            }
        }

        let scaled = match self {
            Scaler::Standard { mean, scale } => features
                .iter()
                .zip(mean.iter().zip(scale))
                .map(|(x, (m, s))| (x - m) / non_zero(*s))
                .collect(),
            Scaler::MinMax { data_min, data_max, feature_range } => {
                let [lo, hi] = *feature_range;
                features
                    .iter()
                    .zip(data_min.iter().zip(data_max))
                    .map(|(x, (min, max))| (x - min) / non_zero(max - min) * (hi - lo) + lo)
                    .collect()
            }
            Scaler::Identity => features.to_vec(),
        };

        Ok(scaled)
    }

    fn n_features(&self) -> Option<usize> {
        match self {
            Scaler::Standard { mean, .. } => Some(mean.len()),
            Scaler::MinMax { data_min, .. } => Some(data_min.len()),
            Scaler::Identity => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_transform() {
        let scaler = Scaler::Standard {
            mean: vec![5.0, 50.0],
            scale: vec![2.0, 10.0],
        };
        let out = scaler.transform(&[7.0, 30.0]).unwrap();
        assert_eq!(out, vec![1.0, -2.0]);
    }

    #[test]
    fn test_standard_zero_scale_divides_by_one() {
        let scaler = Scaler::Standard {
            mean: vec![1.0],
            scale: vec![0.0],
        };
        assert_eq!(scaler.transform(&[4.0]).unwrap(), vec![3.0]);
    }

    #[test]
    fn test_min_max_transform() {
        let scaler = Scaler::MinMax {
            data_min: vec![0.0, 0.0],
            data_max: vec![10.0, 100.0],
            feature_range: [0.0, 1.0],
        };
        assert_eq!(scaler.transform(&[5.0, 25.0]).unwrap(), vec![0.5, 0.25]);
    }

    #[test]
    fn test_min_max_constant_column_divides_by_one() {
        let scaler = Scaler::MinMax {
            data_min: vec![3.0, 0.0],
            data_max: vec![3.0, 10.0],
            feature_range: [0.0, 1.0],
        };
        let out = scaler.transform(&[5.0, 5.0]).unwrap();
        assert_eq!(out, vec![2.0, 0.5]);
        assert!(out.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_min_max_custom_range_is_not_clipped() {
        let scaler = Scaler::MinMax {
            data_min: vec![0.0],
            data_max: vec![10.0],
            feature_range: [-1.0, 1.0],
        };
        assert_eq!(scaler.transform(&[5.0]).unwrap(), vec![0.0]);
        assert_eq!(scaler.transform(&[20.0]).unwrap(), vec![3.0]);
    }

    #[test]
    fn test_identity_passes_through() {
        let out = Scaler::Identity.transform(&[1.5, 2.5, 3.5]).unwrap();
        assert_eq!(out, vec![1.5, 2.5, 3.5]);
        assert_eq!(Scaler::Identity.n_features(), None);
    }

    #[test]
    fn test_transform_rejects_wrong_width() {
        let scaler = Scaler::Standard {
            mean: vec![0.0; 3],
            scale: vec![1.0; 3],
        };
        let err = scaler.transform(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            InferenceError::DimensionMismatch { expected: 3, actual: 2, .. }
        ));
    }

    #[test]
    fn test_check_dimensions() {
        let scaler = Scaler::Standard {
            mean: vec![0.0; 10],
            scale: vec![1.0; 9],
        };
        let err = scaler.check_dimensions(10).unwrap_err();
        assert!(err.contains("scaler.scale has 9 values"));

        let scaler = Scaler::MinMax {
            data_min: vec![0.0; 10],
            data_max: vec![1.0; 10],
            feature_range: [1.0, 0.0],
        };
        assert!(scaler.check_dimensions(10).is_err());
        assert!(Scaler::Identity.check_dimensions(10).is_ok());
    }

    #[test]
    fn test_deserialize_tagged() {
        let json = r#"{"kind": "min_max", "data_min": [0.0], "data_max": [2.0]}"#;
        let scaler: Scaler = serde_json::from_str(json).unwrap();
        assert_eq!(scaler.kind(), "min_max");
        assert_eq!(scaler.transform(&[1.0]).unwrap(), vec![0.5]);
    }
}
