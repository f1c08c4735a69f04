//! Intake form validation.
//!
//! Turns raw form input into a [`NewPatient`]: required fields checked in
//! form order, disease and subtype normalized to lookup keys, aliases
//! resolved to the canonical disease.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::knowledge::{normalize_key, KnowledgeBase};
use crate::models::enums::{Disease, Gender};
use crate::models::NewPatient;

pub const MAX_AGE: i64 = 120;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },

    #[error("Invalid gender: {0} (expected Male, Female or Other)")]
    InvalidGender(String),
}

/// Raw values as entered on the intake form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntakeForm {
    pub name: String,
    pub age: Option<i64>,
    pub gender: String,
    pub district: String,
    /// Disease name or a symptom phrase such as "runny nose".
    pub disease: String,
    pub subtype: Option<String>,
    pub days_suffering: Option<i64>,
}

/// Validate and normalize a submitted form. Has no side effects.
pub fn validate(kb: &KnowledgeBase, form: &IntakeForm) -> Result<NewPatient, ValidationError> {
    let name = required("Name", &form.name)?;
    let age = form.age.ok_or(ValidationError::MissingField("Age"))?;
    let gender_raw = required("Gender", &form.gender)?;
    let district = required("District", &form.district)?;
    let disease_raw = required("Disease", &form.disease)?;
    let days = form
        .days_suffering
        .ok_or(ValidationError::MissingField("Days suffering"))?;

    let age = in_range("Age", age, 0, MAX_AGE)?;
    let days_suffering = in_range("Days suffering", days, 0, u32::MAX as i64)?;
    let gender = Gender::from_input(gender_raw)
        .ok_or_else(|| ValidationError::InvalidGender(gender_raw.to_string()))?;

    let disease = kb.canonical_key(&normalize_key(disease_raw)).to_string();
    let subtype = if kb.disease(&disease) == Some(Disease::SkinInfection) {
        form.subtype
            .as_deref()
            .map(normalize_key)
            .filter(|s| !s.is_empty())
    } else {
        None
    };

    Ok(NewPatient {
        name: name.to_string(),
        age: age as u8,
        gender,
        district: district.to_string(),
        disease,
        subtype,
        days_suffering: days_suffering as u32,
    })
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed)
}

fn in_range(field: &'static str, value: i64, min: i64, max: i64) -> Result<i64, ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            min,
            max,
            value,
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> IntakeForm {
        IntakeForm {
            name: "Sunita Patil".into(),
            age: Some(42),
            gender: "Female".into(),
            district: "Sangli".into(),
            disease: "Fever".into(),
            subtype: None,
            days_suffering: Some(2),
        }
    }

    fn check(form: &IntakeForm) -> Result<NewPatient, ValidationError> {
        validate(&KnowledgeBase::builtin(), form)
    }

    #[test]
    fn accepts_complete_form() {
        let patient = check(&valid_form()).unwrap();
        assert_eq!(patient.name, "Sunita Patil");
        assert_eq!(patient.age, 42);
        assert_eq!(patient.gender, Gender::Female);
        assert_eq!(patient.disease, "fever");
        assert_eq!(patient.days_suffering, 2);
    }

    #[test]
    fn rejects_blank_required_text_fields() {
        type Setter = fn(&mut IntakeForm);
        let cases: [(&str, Setter); 4] = [
            ("Name", |f| f.name = "   ".into()),
            ("Gender", |f| f.gender = "".into()),
            ("District", |f| f.district = "\t".into()),
            ("Disease", |f| f.disease = " \n ".into()),
        ];
        for (field, blank) in cases {
            let mut form = valid_form();
            blank(&mut form);
            assert_eq!(check(&form), Err(ValidationError::MissingField(field)));
        }
    }

    #[test]
    fn rejects_missing_numbers() {
        let mut form = valid_form();
        form.age = None;
        assert_eq!(check(&form), Err(ValidationError::MissingField("Age")));

        let mut form = valid_form();
        form.days_suffering = None;
        assert_eq!(check(&form), Err(ValidationError::MissingField("Days suffering")));
    }

    #[test]
    fn zero_age_and_days_are_accepted() {
        let mut form = valid_form();
        form.age = Some(0);
        form.days_suffering = Some(0);
        let patient = check(&form).unwrap();
        assert_eq!((patient.age, patient.days_suffering), (0, 0));
    }

    #[test]
    fn rejects_out_of_range_numbers() {
        let mut form = valid_form();
        form.age = Some(121);
        assert!(matches!(check(&form), Err(ValidationError::OutOfRange { field: "Age", .. })));

        let mut form = valid_form();
        form.days_suffering = Some(-1);
        assert!(matches!(
            check(&form),
            Err(ValidationError::OutOfRange { field: "Days suffering", .. })
        ));
    }

    #[test]
    fn rejects_unknown_gender() {
        let mut form = valid_form();
        form.gender = "robot".into();
        assert_eq!(check(&form), Err(ValidationError::InvalidGender("robot".into())));
    }

    #[test]
    fn first_missing_field_in_form_order_is_reported() {
        let form = IntakeForm::default();
        assert_eq!(check(&form), Err(ValidationError::MissingField("Name")));
    }

    #[test]
    fn symptom_phrase_is_stored_as_canonical_disease() {
        let mut form = valid_form();
        form.disease = "  Runny Nose ".into();
        assert_eq!(check(&form).unwrap().disease, "cold");
    }

    #[test]
    fn subtype_kept_only_for_skin_infection() {
        let mut form = valid_form();
        form.disease = "Skin Infection".into();
        form.subtype = Some(" Fungal ".into());
        assert_eq!(check(&form).unwrap().subtype.as_deref(), Some("fungal"));

        form.disease = "itching".into();
        assert_eq!(check(&form).unwrap().subtype.as_deref(), Some("fungal"));

        form.disease = "fever".into();
        assert_eq!(check(&form).unwrap().subtype, None);
    }

    #[test]
    fn blank_subtype_is_no_subtype() {
        let mut form = valid_form();
        form.disease = "skin infection".into();
        form.subtype = Some("   ".into());
        assert_eq!(check(&form).unwrap().subtype, None);
    }
}
