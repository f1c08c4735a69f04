//! Advice resolution: pick the prescription text for a submission.
//!
//! Precedence, first match wins:
//! 1. more than [`URGENT_AFTER_DAYS`] days of suffering → consult a doctor
//! 2. skin infection → subtype advice, or ask for the subtype
//! 3. disease table
//! 4. no match → consult a doctor

use serde::Serialize;

use crate::knowledge::KnowledgeBase;
use crate::models::enums::Disease;

/// Suffering for longer than this many days overrides any disease advice.
pub const URGENT_AFTER_DAYS: u32 = 3;

pub const OVERRIDE_MESSAGE: &str =
    "You have been suffering for more than 3 days. Please consult a doctor immediately.";

pub const SUBTYPE_REQUIRED_MESSAGE: &str = "Please specify the type of skin infection \
     (fungal, bacterial, viral or allergic) for a specific prescription.";

pub const NO_MATCH_MESSAGE: &str = "No exact match found. Please consult a doctor.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceKind {
    Override,
    Disease,
    Subtype,
    SubtypeRequired,
    NoMatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advice {
    pub kind: AdviceKind,
    pub text: &'static str,
}

impl Advice {
    fn new(kind: AdviceKind, text: &'static str) -> Self {
        Self { kind, text }
    }

    pub fn is_urgent(&self) -> bool {
        self.kind == AdviceKind::Override
    }
}

/// Resolve advice for an already-normalized disease key.
pub fn resolve_advice(
    kb: &KnowledgeBase,
    disease_key: &str,
    days_suffering: u32,
    subtype_key: Option<&str>,
) -> Advice {
    if days_suffering > URGENT_AFTER_DAYS {
        return Advice::new(AdviceKind::Override, OVERRIDE_MESSAGE);
    }

    let advice = match kb.disease(kb.canonical_key(disease_key)) {
        Some(Disease::SkinInfection) => match subtype_key.and_then(|s| kb.subtype(s)) {
            Some(subtype) => Advice::new(AdviceKind::Subtype, subtype.advice()),
            None => Advice::new(AdviceKind::SubtypeRequired, SUBTYPE_REQUIRED_MESSAGE),
        },
        Some(disease) => Advice::new(AdviceKind::Disease, disease.advice()),
        None => Advice::new(AdviceKind::NoMatch, NO_MATCH_MESSAGE),
    };

    tracing::debug!(disease = disease_key, days_suffering, kind = ?advice.kind, "Resolved advice");
    advice
}
