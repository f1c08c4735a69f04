//! Static advice tables.
//!
//! Disease → advice, skin-infection subtype → advice, and colloquial
//! symptom phrase → disease. All of it is compile-time data; a
//! [`KnowledgeBase`] is built once at startup and only ever read.

use std::collections::HashMap;
use std::str::FromStr;

use serde::Serialize;

use crate::models::enums::{Disease, SkinSubtype};

// ═══════════════════════════════════════════
// Tables
// ═══════════════════════════════════════════

impl Disease {
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Fever => "Paracetamol 500mg twice a day, stay hydrated, take rest.",
            Self::Cold => "Cetrizine 10mg once daily, steam inhalation, warm fluids.",
            Self::Cough => "Cough syrup (dextromethorphan), honey with warm water.",
            Self::Headache => "Paracetamol 500mg if needed, good sleep, avoid stress.",
            Self::Diabetes => "Metformin 500mg after meals, regular sugar check.",
            Self::Hypertension => "Amlodipine 5mg daily, reduce salt intake, regular BP check.",
            Self::Asthma => "Use inhaler as prescribed, avoid dust, do breathing exercises.",
            Self::Malaria => {
                "Chloroquine as per dosage, drink fluids, consult doctor if no improvement."
            }
            Self::Typhoid => "Ciprofloxacin (as prescribed), take boiled water, light diet.",
            Self::Allergy => "Antihistamine (Loratadine), avoid allergens, drink water.",
            Self::Migraine => "Ibuprofen 400mg if needed, rest in dark room, avoid triggers.",
            Self::Cholera => "ORS solution frequently, antibiotics if prescribed, hydration is key.",
            Self::Covid => {
                "Paracetamol for fever, isolation, steam inhalation, consult doctor if severe."
            }
            Self::Tuberculosis => "Antitubercular drugs (as prescribed), regular checkups.",
            Self::Stomachache => "Drotaverine (as prescribed), drink warm water, avoid spicy food.",
            Self::Acidity => "Pantoprazole 40mg before food, avoid oily & spicy meals.",
            Self::LooseMotion => "ORS solution, probiotics, avoid outside food.",
            Self::Constipation => "High fiber diet, drink plenty of water, mild laxative if needed.",
            Self::SkinInfection => "Apply antifungal/antibacterial cream, keep area clean and dry.",
            Self::ThroatPain => "Warm salt water gargle, lozenges, paracetamol if fever.",
            Self::PeriodPain => "Mefenamic acid 250mg, hot water bag, rest and hydration.",
            Self::Vomiting => "Ondansetron (as prescribed), drink ORS, avoid oily food.",
            Self::BackPain => "Ibuprofen 400mg, gentle stretching, proper rest.",
        }
    }
}

impl SkinSubtype {
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Fungal => {
                "Clotrimazole 1% cream twice daily for 2 weeks, keep the area dry, avoid sharing towels."
            }
            Self::Bacterial => {
                "Mupirocin 2% ointment three times daily, wash with antiseptic soap, do not scratch."
            }
            Self::Viral => {
                "Calamine lotion for itching, keep lesions clean, avoid contact with others until healed."
            }
            Self::Allergic => {
                "Cetirizine 10mg once daily, hydrocortisone 1% cream, avoid the suspected trigger."
            }
        }
    }
}

/// Colloquial symptom phrases and the disease they stand for.
pub const SYMPTOM_ALIASES: &[(&str, Disease)] = &[
    ("high temperature", Disease::Fever),
    ("chills", Disease::Malaria),
    ("sneezing", Disease::Cold),
    ("runny nose", Disease::Cold),
    ("dry cough", Disease::Cough),
    ("severe cough", Disease::Tuberculosis),
    ("body pain", Disease::Fever),
    ("thirst", Disease::Diabetes),
    ("frequent urination", Disease::Diabetes),
    ("head pain", Disease::Headache),
    ("eye pain", Disease::Migraine),
    ("chest tightness", Disease::Asthma),
    ("shortness of breath", Disease::Asthma),
    ("loose stools", Disease::LooseMotion),
    ("abdominal pain", Disease::Stomachache),
    ("acidity", Disease::Acidity),
    ("irregular periods", Disease::PeriodPain),
    ("vomit", Disease::Vomiting),
    ("skin rash", Disease::SkinInfection),
    ("itching", Disease::SkinInfection),
    ("backache", Disease::BackPain),
    ("sore throat", Disease::ThroatPain),
];

// ═══════════════════════════════════════════
// KnowledgeBase
// ═══════════════════════════════════════════

/// Read-only lookup over the static tables.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    diseases: HashMap<&'static str, Disease>,
    aliases: HashMap<&'static str, Disease>,
}

/// One disease with its advice and the phrases that map to it (for listing).
#[derive(Debug, Clone, Serialize)]
pub struct DiseaseInfo {
    pub key: &'static str,
    pub advice: &'static str,
    pub aliases: Vec<&'static str>,
    pub subtypes: Vec<&'static str>,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}

impl KnowledgeBase {
    pub fn builtin() -> Self {
        Self {
            diseases: Disease::ALL.iter().map(|d| (d.as_str(), *d)).collect(),
            aliases: SYMPTOM_ALIASES.iter().copied().collect(),
        }
    }

    /// Map an alias to its canonical disease key; other keys pass through.
    pub fn canonical_key<'a>(&self, key: &'a str) -> &'a str {
        match self.aliases.get(key) {
            Some(disease) => disease.as_str(),
            None => key,
        }
    }

    pub fn disease(&self, key: &str) -> Option<Disease> {
        self.diseases.get(key).copied()
    }

    pub fn subtype(&self, key: &str) -> Option<SkinSubtype> {
        SkinSubtype::from_str(key).ok()
    }

    pub fn diseases(&self) -> Vec<DiseaseInfo> {
        Disease::ALL
            .iter()
            .map(|d| DiseaseInfo {
                key: d.as_str(),
                advice: d.advice(),
                aliases: SYMPTOM_ALIASES
                    .iter()
                    .filter(|(_, target)| target == d)
                    .map(|(alias, _)| *alias)
                    .collect(),
                subtypes: if *d == Disease::SkinInfection {
                    SkinSubtype::ALL.iter().map(|s| s.as_str()).collect()
                } else {
                    vec![]
                },
            })
            .collect()
    }
}

/// Trim and lowercase free text into a lookup key.
pub fn normalize_key(input: &str) -> String {
    input.trim().to_lowercase()
}
