use serde::{Deserialize, Serialize};

use super::enums::Gender;

/// A validated submission, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPatient {
    pub name: String,
    pub age: u8,
    pub gender: Gender,
    pub district: String,
    pub disease: String,
    pub subtype: Option<String>,
    pub days_suffering: u32,
}

/// One stored row of the `patients` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub id: i64,
    pub name: String,
    pub age: u8,
    /// `None` for legacy rows written before gender was required.
    pub gender: Option<Gender>,
    pub district: String,
    pub disease: String,
    pub subtype: Option<String>,
    pub days_suffering: u32,
}

impl PatientRecord {
    pub fn from_new(id: i64, patient: NewPatient) -> Self {
        Self {
            id,
            name: patient.name,
            age: patient.age,
            gender: Some(patient.gender),
            district: patient.district,
            disease: patient.disease,
            subtype: patient.subtype,
            days_suffering: patient.days_suffering,
        }
    }
}
