use serde::Serialize;

use super::SubmitError;
use crate::advice::{resolve_advice, AdviceKind};
use crate::db::{PatientStore, StoreError};
use crate::intake::{self, IntakeForm};
use crate::knowledge::{DiseaseInfo, KnowledgeBase};
use crate::models::PatientRecord;

/// What the patient is told after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrescriptionMessage {
    pub patient_id: i64,
    pub patient_name: String,
    pub disease_key: String,
    /// Disease key with its first letter capitalised, for display.
    pub disease_label: String,
    pub subtype: Option<String>,
    pub advice: String,
    pub advice_kind: AdviceKind,
    pub urgent: bool,
}

/// Validate, persist, then resolve advice.
///
/// Nothing is written when validation fails. When the insert fails no
/// advice is returned, so the caller never reports an unsaved record as saved.
pub fn submit(
    store: &PatientStore,
    kb: &KnowledgeBase,
    form: IntakeForm,
) -> Result<PrescriptionMessage, SubmitError> {
    let patient = intake::validate(kb, &form).inspect_err(|e| {
        tracing::warn!(error = %e, "Intake rejected");
    })?;

    let patient_id = store.insert(&patient)?;

    let advice = resolve_advice(
        kb,
        &patient.disease,
        patient.days_suffering,
        patient.subtype.as_deref(),
    );

    tracing::info!(
        patient_id,
        disease = %patient.disease,
        days_suffering = patient.days_suffering,
        urgent = advice.is_urgent(),
        "Intake recorded"
    );

    Ok(PrescriptionMessage {
        patient_id,
        patient_name: patient.name,
        disease_label: capitalize(&patient.disease),
        disease_key: patient.disease,
        subtype: patient.subtype,
        advice: advice.text.to_string(),
        advice_kind: advice.kind,
        urgent: advice.is_urgent(),
    })
}

/// Every stored patient, oldest first.
pub fn list_records(store: &PatientStore) -> Result<Vec<PatientRecord>, StoreError> {
    store.fetch_all()
}

pub fn list_diseases(kb: &KnowledgeBase) -> Vec<DiseaseInfo> {
    kb.diseases()
}

/// Upper-case the first character, leave the rest as is.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::{NO_MATCH_MESSAGE, OVERRIDE_MESSAGE, SUBTYPE_REQUIRED_MESSAGE};
    use crate::intake::ValidationError;
    use crate::models::enums::{Disease, Gender, SkinSubtype};

    fn setup() -> (PatientStore, KnowledgeBase) {
        (
            PatientStore::open_in_memory().expect("in-memory store"),
            KnowledgeBase::builtin(),
        )
    }

    fn form(disease: &str, days: i64) -> IntakeForm {
        IntakeForm {
            name: "Arjun".into(),
            age: Some(29),
            gender: "male".into(),
            district: "Nashik".into(),
            disease: disease.into(),
            subtype: None,
            days_suffering: Some(days),
        }
    }

    #[test]
    fn submit_stores_and_prescribes() {
        let (store, kb) = setup();
        let msg = submit(&store, &kb, form("Fever", 2)).unwrap();

        assert_eq!(msg.disease_key, "fever");
        assert_eq!(msg.disease_label, "Fever");
        assert_eq!(msg.advice, Disease::Fever.advice());
        assert!(!msg.urgent);

        let records = list_records(&store).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, msg.patient_id);
        assert_eq!(records[0].gender, Some(Gender::Male));
    }

    #[test]
    fn long_suffering_is_urgent_but_still_recorded() {
        let (store, kb) = setup();
        let msg = submit(&store, &kb, form("fever", 4)).unwrap();
        assert_eq!(msg.advice, OVERRIDE_MESSAGE);
        assert!(msg.urgent);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn symptom_phrase_is_recorded_as_disease() {
        let (store, kb) = setup();
        let msg = submit(&store, &kb, form("Shortness of breath", 1)).unwrap();
        assert_eq!(msg.disease_key, "asthma");
        assert_eq!(msg.advice, Disease::Asthma.advice());
        assert_eq!(list_records(&store).unwrap()[0].disease, "asthma");
    }

    #[test]
    fn skin_infection_subtype_flows_through() {
        let (store, kb) = setup();
        let mut f = form("skin infection", 2);
        f.subtype = Some("Fungal".into());
        let msg = submit(&store, &kb, f).unwrap();
        assert_eq!(msg.advice, SkinSubtype::Fungal.advice());
        assert_eq!(msg.subtype.as_deref(), Some("fungal"));
        assert_eq!(list_records(&store).unwrap()[0].subtype.as_deref(), Some("fungal"));
    }

    #[test]
    fn skin_infection_without_subtype_is_accepted() {
        let (store, kb) = setup();
        let msg = submit(&store, &kb, form("skin infection", 1)).unwrap();
        assert_eq!(msg.advice, SUBTYPE_REQUIRED_MESSAGE);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn unknown_disease_is_recorded_with_fallback() {
        let (store, kb) = setup();
        let msg = submit(&store, &kb, form("Unknown Disease", 0)).unwrap();
        assert_eq!(msg.advice, NO_MATCH_MESSAGE);
        assert_eq!(msg.disease_label, "Unknown disease");
    }

    #[test]
    fn invalid_form_writes_nothing() {
        let (store, kb) = setup();
        let mut f = form("fever", 1);
        f.district = "  ".into();
        let err = submit(&store, &kb, f).unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Validation(ValidationError::MissingField("District"))
        ));
        assert!(list_records(&store).unwrap().is_empty());
    }

    #[test]
    fn store_failure_surfaces_as_store_error() {
        let (store, kb) = setup();
        store
            .connection()
            .execute_batch(
                "CREATE TRIGGER reject_insert BEFORE INSERT ON patients
                 BEGIN SELECT RAISE(ABORT, 'disk full'); END;",
            )
            .unwrap();
        let err = submit(&store, &kb, form("fever", 1)).unwrap_err();
        assert!(matches!(err, SubmitError::Store(_)));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn ids_strictly_increase_across_submissions() {
        let (store, kb) = setup();
        let ids: Vec<i64> = (0..5)
            .map(|d| submit(&store, &kb, form("cold", d)).unwrap().patient_id)
            .collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn capitalize_handles_edge_cases() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("loose motion"), "Loose motion");
    }

    #[test]
    fn diseases_listing_covers_table() {
        let (_, kb) = setup();
        assert_eq!(list_diseases(&kb).len(), Disease::ALL.len());
    }
}
