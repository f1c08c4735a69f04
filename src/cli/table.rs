//! Plain-text rendering of the patient register.

use crate::models::PatientRecord;

/// Column names of the `patients` table, in display order.
pub const COLUMNS: &[&str] = &[
    "id",
    "name",
    "age",
    "gender",
    "district",
    "disease",
    "subtype",
    "days_suffering",
];

/// `days_suffering` → `Days Suffering`, `id` → `ID`.
pub fn column_header(column: &str) -> String {
    if column.eq_ignore_ascii_case("id") {
        return "ID".into();
    }
    column
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn cells(record: &PatientRecord) -> Vec<String> {
    vec![
        record.id.to_string(),
        record.name.clone(),
        record.age.to_string(),
        record.gender.map(|g| g.as_str().to_string()).unwrap_or_default(),
        record.district.clone(),
        record.disease.clone(),
        record.subtype.clone().unwrap_or_default(),
        record.days_suffering.to_string(),
    ]
}

/// Render records as a left-aligned table with a header row.
pub fn render_table(records: &[PatientRecord]) -> String {
    let headers: Vec<String> = COLUMNS.iter().map(|c| column_header(c)).collect();
    let rows: Vec<Vec<String>> = records.iter().map(cells).collect();

    let widths: Vec<usize> = (0..headers.len())
        .map(|i| {
            rows.iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(headers[i].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_row = |row: &[String]| -> String {
        row.iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = format_row(&headers[..]);
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in &rows {
        out.push('\n');
        out.push_str(&format_row(&row[..]));
    }
    out
}
