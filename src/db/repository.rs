use std::str::FromStr;

use rusqlite::{params, Connection, Transaction, TransactionBehavior};

use super::StoreError;
use crate::models::*;

// ═══════════════════════════════════════════
// Patient Repository
// ═══════════════════════════════════════════

/// Insert one patient in its own immediate transaction. Returns the new id.
pub fn insert_patient(conn: &Connection, patient: &NewPatient) -> Result<i64, StoreError> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    tx.execute(
        "INSERT INTO patients (name, age, gender, district, disease, subtype, days_suffering)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            patient.name,
            patient.age,
            patient.gender.as_str(),
            patient.district,
            patient.disease,
            patient.subtype,
            patient.days_suffering,
        ],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;
    Ok(id)
}

/// All patients in insertion (primary key) order.
pub fn get_all_patients(conn: &Connection) -> Result<Vec<PatientRecord>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, age, gender, district, disease, subtype, days_suffering
         FROM patients ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(PatientRow {
            id: row.get(0)?,
            name: row.get(1)?,
            age: row.get(2)?,
            gender: row.get(3)?,
            district: row.get(4)?,
            disease: row.get(5)?,
            subtype: row.get(6)?,
            days_suffering: row.get(7)?,
        })
    })?;

    let mut patients = Vec::new();
    for row in rows {
        patients.push(patient_from_row(row?)?);
    }
    Ok(patients)
}

pub fn count_patients(conn: &Connection) -> Result<i64, StoreError> {
    let count = conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
    Ok(count)
}

/// Raw column values. Every column but `id` may be NULL in rows written by
/// older releases, which never declared NOT NULL.
struct PatientRow {
    id: i64,
    name: Option<String>,
    age: Option<i64>,
    gender: Option<String>,
    district: Option<String>,
    disease: Option<String>,
    subtype: Option<String>,
    days_suffering: Option<i64>,
}

fn patient_from_row(row: PatientRow) -> Result<PatientRecord, StoreError> {
    let id = row.id;
    let corrupt = |reason: String| StoreError::CorruptRow { id, reason };

    let age = u8::try_from(row.age.unwrap_or(0))
        .map_err(|_| corrupt(format!("age out of range: {:?}", row.age)))?;
    let days_suffering = u32::try_from(row.days_suffering.unwrap_or(0))
        .map_err(|_| corrupt(format!("days_suffering out of range: {:?}", row.days_suffering)))?;
    let gender = match row.gender.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(g) => Some(Gender::from_str(g)?),
    };

    Ok(PatientRecord {
        id,
        name: row.name.unwrap_or_default(),
        age,
        gender,
        district: row.district.unwrap_or_default(),
        disease: row.disease.unwrap_or_default(),
        subtype: row.subtype.filter(|s| !s.is_empty()),
        days_suffering,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::{open_memory_connection, run_migrations};

    fn test_db() -> Connection {
        let conn = open_memory_connection().expect("in-memory DB");
        run_migrations(&conn).expect("migrations");
        conn
    }

    fn make_patient(name: &str, disease: &str, days: u32) -> NewPatient {
        NewPatient {
            name: name.into(),
            age: 34,
            gender: Gender::Female,
            district: "Kolhapur".into(),
            disease: disease.into(),
            subtype: None,
            days_suffering: days,
        }
    }

    #[test]
    fn insert_then_read_back() {
        let conn = test_db();
        let mut patient = make_patient("Meera", "skin infection", 2);
        patient.subtype = Some("fungal".into());

        let id = insert_patient(&conn, &patient).unwrap();
        let all = get_all_patients(&conn).unwrap();

        assert_eq!(all, vec![PatientRecord::from_new(id, patient)]);
    }

    #[test]
    fn ids_increase_with_each_insert() {
        let conn = test_db();
        let first = insert_patient(&conn, &make_patient("A", "fever", 1)).unwrap();
        let second = insert_patient(&conn, &make_patient("B", "cold", 1)).unwrap();
        let third = insert_patient(&conn, &make_patient("C", "cough", 1)).unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn fetch_orders_by_id() {
        let conn = test_db();
        for name in ["Z", "M", "A"] {
            insert_patient(&conn, &make_patient(name, "fever", 0)).unwrap();
        }
        let names: Vec<String> = get_all_patients(&conn)
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["Z", "M", "A"]);
    }

    #[test]
    fn fetch_empty_database() {
        let conn = test_db();
        assert!(get_all_patients(&conn).unwrap().is_empty());
        assert_eq!(count_patients(&conn).unwrap(), 0);
    }

    #[test]
    fn legacy_row_with_blank_gender_reads_as_none() {
        let conn = test_db();
        conn.execute(
            "INSERT INTO patients (name, age, gender, district, disease, days_suffering)
             VALUES ('Old', 50, '', 'Satara', 'cold', 1)",
            [],
        )
        .unwrap();
        let all = get_all_patients(&conn).unwrap();
        assert_eq!(all[0].gender, None);
        assert_eq!(all[0].subtype, None);
    }

    #[test]
    fn unknown_gender_is_invalid_enum() {
        let conn = test_db();
        conn.execute(
            "INSERT INTO patients (name, age, gender, district, disease, days_suffering)
             VALUES ('Odd', 50, 'robot', 'Satara', 'cold', 1)",
            [],
        )
        .unwrap();
        let err = get_all_patients(&conn).unwrap_err();
        assert!(matches!(err, StoreError::InvalidEnum { .. }));
    }

    #[test]
    fn negative_age_is_corrupt_row() {
        let conn = test_db();
        conn.execute(
            "INSERT INTO patients (name, age, gender, district, disease, days_suffering)
             VALUES ('Neg', -3, 'Male', 'Satara', 'cold', 1)",
            [],
        )
        .unwrap();
        let err = get_all_patients(&conn).unwrap_err();
        assert!(matches!(err, StoreError::CorruptRow { .. }));
    }

    #[test]
    fn failed_insert_leaves_no_row() {
        let conn = test_db();
        conn.execute_batch(
            "CREATE TRIGGER reject_insert BEFORE INSERT ON patients
             BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
        .unwrap();
        assert!(insert_patient(&conn, &make_patient("X", "fever", 1)).is_err());
        conn.execute_batch("DROP TRIGGER reject_insert;").unwrap();
        assert_eq!(count_patients(&conn).unwrap(), 0);
        // Connection is usable again after the rolled-back transaction.
        insert_patient(&conn, &make_patient("Y", "fever", 1)).unwrap();
        assert_eq!(count_patients(&conn).unwrap(), 1);
    }
}
