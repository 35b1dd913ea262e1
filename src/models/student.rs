//! Student profile model - the prediction request

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::features::FeatureVector;

/// YES/NO selector value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Choice {
    #[default]
    Yes,
    No,
}

impl Choice {
    pub const ALL: [Choice; 2] = [Choice::Yes, Choice::No];

    /// YES → 1, NO → 0
    pub fn as_flag(self) -> f64 {
        match self {
            Choice::Yes => 1.0,
            Choice::No => 0.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Choice::Yes => "YES",
            Choice::No => "NO",
        }
    }
}

impl FromStr for Choice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "YES" => Ok(Choice::Yes),
            "NO" => Ok(Choice::No),
            other => Err(format!("expected YES or NO, got {:?}", other)),
        }
    }
}

/// The ten form fields, bounded the same way the page's controls are
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StudentProfile {
    #[validate(range(min = 0.0, max = 10.0))]
    pub cgpa: f64,

    #[validate(range(max = 10))]
    pub internships: u32,

    #[validate(range(max = 10))]
    pub projects: u32,

    #[validate(range(max = 10))]
    pub certifications: u32,

    #[validate(range(max = 100))]
    pub aptitude_score: u32,

    #[validate(range(min = 0.0, max = 10.0))]
    pub skill_rating: f64,

    pub extra_curricular: Choice,

    pub placement_training: Choice,

    #[validate(range(max = 100))]
    pub ssc_marks: u32,

    #[validate(range(max = 100))]
    pub hsc_marks: u32,
}

impl Default for StudentProfile {
    /// Values the form opens with
    fn default() -> Self {
        Self {
            cgpa: 7.0,
            internships: 0,
            projects: 0,
            certifications: 0,
            aptitude_score: 50,
            skill_rating: 5.0,
            extra_curricular: Choice::Yes,
            placement_training: Choice::Yes,
            ssc_marks: 75,
            hsc_marks: 75,
        }
    }
}

impl StudentProfile {
    /// Range rules plus a finiteness check; `range` lets NaN through
    pub fn check(&self) -> Result<(), ValidationErrors> {
        self.validate()?;

        let mut errors = ValidationErrors::new();
        if !self.cgpa.is_finite() {
            errors.add("cgpa", ValidationError::new("finite"));
        }
        if !self.skill_rating.is_finite() {
            errors.add("skill_rating", ValidationError::new("finite"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Profile from raw form fields
    ///
    /// Every field that parses is kept, so the page can be re-rendered with
    /// what was typed. Missing or unparseable fields keep their default and are
    /// reported as `required` / `invalid`.
    pub fn from_form_fields(fields: &HashMap<String, String>) -> (Self, ValidationErrors) {
        let mut profile = Self::default();
        let mut errors = ValidationErrors::new();

        read_field(fields, "cgpa", &mut profile.cgpa, &mut errors);
        read_field(fields, "internships", &mut profile.internships, &mut errors);
        read_field(fields, "projects", &mut profile.projects, &mut errors);
        read_field(fields, "certifications", &mut profile.certifications, &mut errors);
        read_field(fields, "aptitude_score", &mut profile.aptitude_score, &mut errors);
        read_field(fields, "skill_rating", &mut profile.skill_rating, &mut errors);
        read_field(fields, "extra_curricular", &mut profile.extra_curricular, &mut errors);
        read_field(fields, "placement_training", &mut profile.placement_training, &mut errors);
        read_field(fields, "ssc_marks", &mut profile.ssc_marks, &mut errors);
        read_field(fields, "hsc_marks", &mut profile.hsc_marks, &mut errors);

        (profile, errors)
    }

    /// Assemble the model input in layout order
    pub fn to_features(&self) -> FeatureVector {
        FeatureVector::from_values([
            self.cgpa,
            f64::from(self.internships),
            f64::from(self.projects),
            f64::from(self.certifications),
            f64::from(self.aptitude_score),
            self.skill_rating,
            self.extra_curricular.as_flag(),
            self.placement_training.as_flag(),
            f64::from(self.ssc_marks),
            f64::from(self.hsc_marks),
        ])
    }
}

fn read_field<T: FromStr>(
    fields: &HashMap<String, String>,
    name: &'static str,
    slot: &mut T,
    errors: &mut ValidationErrors,
) {
    match fields.get(name) {
        None => errors.add(name, ValidationError::new("required")),
        Some(raw) => match raw.trim().parse() {
            Ok(value) => *slot = value,
            Err(_) => errors.add(name, ValidationError::new("invalid")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::layout::FEATURE_LAYOUT;

    fn minimum() -> StudentProfile {
        StudentProfile {
            cgpa: 0.0,
            internships: 0,
            projects: 0,
            certifications: 0,
            aptitude_score: 0,
            skill_rating: 0.0,
            extra_curricular: Choice::No,
            placement_training: Choice::No,
            ssc_marks: 0,
            hsc_marks: 0,
        }
    }

    fn maximum() -> StudentProfile {
        StudentProfile {
            cgpa: 10.0,
            internships: 10,
            projects: 10,
            certifications: 10,
            aptitude_score: 100,
            skill_rating: 10.0,
            extra_curricular: Choice::Yes,
            placement_training: Choice::Yes,
            ssc_marks: 100,
            hsc_marks: 100,
        }
    }

    #[test]
    fn test_default_matches_form() {
        let profile = StudentProfile::default();
        assert_eq!(profile.cgpa, 7.0);
        assert_eq!(profile.aptitude_score, 50);
        assert_eq!(profile.skill_rating, 5.0);
        assert_eq!(profile.extra_curricular, Choice::Yes);
        assert_eq!(profile.ssc_marks, 75);
        assert_eq!(profile.hsc_marks, 75);
        assert!(profile.check().is_ok());
    }

    #[test]
    fn test_minimum_is_all_zeros() {
        let profile = minimum();
        assert!(profile.check().is_ok());
        assert_eq!(profile.to_features().values, [0.0; 10]);
    }

    #[test]
    fn test_maximum_vector_order() {
        let profile = maximum();
        assert!(profile.check().is_ok());
        assert_eq!(
            profile.to_features().values,
            [10.0, 10.0, 10.0, 10.0, 100.0, 10.0, 1.0, 1.0, 100.0, 100.0]
        );
    }

    #[test]
    fn test_every_field_lands_at_its_layout_index() {
        let profile = StudentProfile {
            cgpa: 8.1,
            internships: 2,
            projects: 3,
            certifications: 4,
            aptitude_score: 65,
            skill_rating: 6.6,
            extra_curricular: Choice::No,
            placement_training: Choice::Yes,
            ssc_marks: 81,
            hsc_marks: 92,
        };
        let features = profile.to_features();

        let expected = [
            ("cgpa", 8.1),
            ("internships", 2.0),
            ("projects", 3.0),
            ("certifications", 4.0),
            ("aptitude_score", 65.0),
            ("skill_rating", 6.6),
            ("extra_curricular", 0.0),
            ("placement_training", 1.0),
            ("ssc_marks", 81.0),
            ("hsc_marks", 92.0),
        ];
        for (index, (name, value)) in expected.iter().enumerate() {
            assert_eq!(FEATURE_LAYOUT[index], *name);
            assert_eq!(features.values[index], *value, "{name}");
        }
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut profile = StudentProfile::default();
        profile.cgpa = 10.5;
        assert!(profile.check().is_err());

        let mut profile = StudentProfile::default();
        profile.aptitude_score = 101;
        let errors = profile.check().unwrap_err();
        assert!(errors.field_errors().contains_key("aptitude_score"));

        let mut profile = StudentProfile::default();
        profile.internships = 11;
        assert!(profile.check().is_err());
    }

    #[test]
    fn test_nan_rejected() {
        let mut profile = StudentProfile::default();
        profile.skill_rating = f64::NAN;
        let errors = profile.check().unwrap_err();
        assert!(errors.field_errors().contains_key("skill_rating"));
    }

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_from_form_fields_complete() {
        let (profile, errors) = StudentProfile::from_form_fields(&fields(&[
            ("cgpa", "10.0"),
            ("internships", "10"),
            ("projects", "10"),
            ("certifications", "10"),
            ("aptitude_score", "100"),
            ("skill_rating", "10.0"),
            ("extra_curricular", "YES"),
            ("placement_training", "YES"),
            ("ssc_marks", "100"),
            ("hsc_marks", "100"),
        ]));
        assert!(errors.is_empty());
        assert_eq!(profile, maximum());
    }

    #[test]
    fn test_from_form_fields_keeps_what_parses() {
        let (profile, errors) = StudentProfile::from_form_fields(&fields(&[
            ("cgpa", "8.3"),
            ("internships", "-1"),
            ("projects", "4"),
            ("extra_curricular", "MAYBE"),
            ("placement_training", "NO"),
        ]));

        assert_eq!(profile.cgpa, 8.3);
        assert_eq!(profile.projects, 4);
        assert_eq!(profile.placement_training, Choice::No);
        // Unparseable values fall back to the form default
        assert_eq!(profile.internships, 0);
        assert_eq!(profile.extra_curricular, Choice::Yes);

        let field_errors = errors.field_errors();
        assert_eq!(field_errors["internships"][0].code, "invalid");
        assert_eq!(field_errors["extra_curricular"][0].code, "invalid");
        assert_eq!(field_errors["hsc_marks"][0].code, "required");
        assert!(!field_errors.contains_key("cgpa"));
    }

    #[test]
    fn test_choice_serde() {
        let json = serde_json::to_string(&Choice::Yes).unwrap();
        assert_eq!(json, "\"YES\"");
        let parsed: Choice = serde_json::from_str("\"NO\"").unwrap();
        assert_eq!(parsed, Choice::No);
        assert_eq!(parsed.as_flag(), 0.0);
    }
}
