use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use super::error::{DatasetError, Result};
use super::model::MetadataValue;

// ---------------------------------------------------------------------------
// PatientMetadata – one row of training_data.csv
// ---------------------------------------------------------------------------

/// Name of the row-key column. It must come first in the header.
pub const ID_COLUMN: &str = "Patient ID";

/// Every column the table must carry, in file order.
pub const COLUMNS: [&str; 23] = [
    ID_COLUMN,
    "Recording locations:",
    "Age",
    "Sex",
    "Height",
    "Weight",
    "Pregnancy status",
    "Murmur",
    "Murmur locations",
    "Most audible location",
    "Systolic murmur timing",
    "Systolic murmur shape",
    "Systolic murmur grading",
    "Systolic murmur pitch",
    "Systolic murmur quality",
    "Diastolic murmur timing",
    "Diastolic murmur shape",
    "Diastolic murmur grading",
    "Diastolic murmur pitch",
    "Diastolic murmur quality",
    "Outcome",
    "Campaign",
    "Additional ID",
];

/// Declared metadata fields for one patient.
///
/// Optional text columns treat empty cells and `nan` as missing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PatientMetadata {
    #[serde(rename = "Patient ID")]
    pub patient_id: u32,
    /// `+`-separated valve list, e.g. `AV+PV+TV+MV`.
    #[serde(rename = "Recording locations:")]
    pub recording_locations: String,
    #[serde(rename = "Age", deserialize_with = "nan_as_none")]
    pub age: Option<String>,
    #[serde(rename = "Sex")]
    pub sex: String,
    /// Centimetres.
    #[serde(rename = "Height", deserialize_with = "nan_as_none")]
    pub height: Option<f64>,
    /// Kilograms.
    #[serde(rename = "Weight", deserialize_with = "nan_as_none")]
    pub weight: Option<f64>,
    #[serde(rename = "Pregnancy status", deserialize_with = "capitalized_bool")]
    pub pregnancy_status: bool,
    #[serde(rename = "Murmur")]
    pub murmur: String,
    #[serde(rename = "Murmur locations", deserialize_with = "nan_as_none")]
    pub murmur_locations: Option<String>,
    #[serde(rename = "Most audible location", deserialize_with = "nan_as_none")]
    pub most_audible_location: Option<String>,
    #[serde(rename = "Systolic murmur timing", deserialize_with = "nan_as_none")]
    pub systolic_murmur_timing: Option<String>,
    #[serde(rename = "Systolic murmur shape", deserialize_with = "nan_as_none")]
    pub systolic_murmur_shape: Option<String>,
    #[serde(rename = "Systolic murmur grading", deserialize_with = "nan_as_none")]
    pub systolic_murmur_grading: Option<String>,
    #[serde(rename = "Systolic murmur pitch", deserialize_with = "nan_as_none")]
    pub systolic_murmur_pitch: Option<String>,
    #[serde(rename = "Systolic murmur quality", deserialize_with = "nan_as_none")]
    pub systolic_murmur_quality: Option<String>,
    #[serde(rename = "Diastolic murmur timing", deserialize_with = "nan_as_none")]
    pub diastolic_murmur_timing: Option<String>,
    #[serde(rename = "Diastolic murmur shape", deserialize_with = "nan_as_none")]
    pub diastolic_murmur_shape: Option<String>,
    #[serde(rename = "Diastolic murmur grading", deserialize_with = "nan_as_none")]
    pub diastolic_murmur_grading: Option<String>,
    #[serde(rename = "Diastolic murmur pitch", deserialize_with = "nan_as_none")]
    pub diastolic_murmur_pitch: Option<String>,
    #[serde(rename = "Diastolic murmur quality", deserialize_with = "nan_as_none")]
    pub diastolic_murmur_quality: Option<String>,
    #[serde(rename = "Outcome")]
    pub outcome: String,
    #[serde(rename = "Campaign")]
    pub campaign: String,
    #[serde(rename = "Additional ID", deserialize_with = "nan_as_none")]
    pub additional_id: Option<String>,
}

impl PatientMetadata {
    /// Valve names listed in `Recording locations:`.
    pub fn valves(&self) -> impl Iterator<Item = &str> {
        self.recording_locations
            .split('+')
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// All fields as `(column, value)` pairs in table order.
    pub fn fields(&self) -> Vec<(&'static str, MetadataValue)> {
        let text = |v: &Option<String>| v.clone().map_or(MetadataValue::Null, MetadataValue::String);
        let float = |v: Option<f64>| v.map_or(MetadataValue::Null, MetadataValue::Float);

        let values = [
            MetadataValue::Integer(i64::from(self.patient_id)),
            MetadataValue::String(self.recording_locations.clone()),
            text(&self.age),
            MetadataValue::String(self.sex.clone()),
            float(self.height),
            float(self.weight),
            MetadataValue::Bool(self.pregnancy_status),
            MetadataValue::String(self.murmur.clone()),
            text(&self.murmur_locations),
            text(&self.most_audible_location),
            text(&self.systolic_murmur_timing),
            text(&self.systolic_murmur_shape),
            text(&self.systolic_murmur_grading),
            text(&self.systolic_murmur_pitch),
            text(&self.systolic_murmur_quality),
            text(&self.diastolic_murmur_timing),
            text(&self.diastolic_murmur_shape),
            text(&self.diastolic_murmur_grading),
            text(&self.diastolic_murmur_pitch),
            text(&self.diastolic_murmur_quality),
            MetadataValue::String(self.outcome.clone()),
            MetadataValue::String(self.campaign.clone()),
            text(&self.additional_id),
        ];
        COLUMNS.into_iter().zip(values).collect()
    }
}

fn nan_as_none<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    raw.parse::<T>()
        .map(Some)
        .map_err(|e| serde::de::Error::custom(format!("'{raw}': {e}")))
}

/// Accepts `True`/`False` as well as lowercase.
fn capitalized_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim() {
        "True" | "true" => Ok(true),
        "False" | "false" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "'{other}' is not a boolean"
        ))),
    }
}

// ---------------------------------------------------------------------------
// MetadataTable
// ---------------------------------------------------------------------------

/// `training_data.csv`, keyed by integer patient ID.
#[derive(Debug, Clone, Default)]
pub struct MetadataTable {
    rows: BTreeMap<u32, PatientMetadata>,
}

impl MetadataTable {
    pub fn load(path: &Path) -> Result<Self> {
        let table_err = |source: csv::Error| DatasetError::Table {
            path: PathBuf::from(path),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_path(path)
            .map_err(table_err)?;
        let headers: Vec<String> = reader
            .headers()
            .map_err(table_err)?
            .iter()
            .map(str::to_string)
            .collect();
        check_columns(&headers)?;

        let mut rows = BTreeMap::new();
        for result in reader.deserialize::<PatientMetadata>() {
            let row = result.map_err(table_err)?;
            let id = row.patient_id;
            if rows.insert(id, row).is_some() {
                return Err(DatasetError::DuplicateRow { id });
            }
        }

        log::info!("Loaded {} metadata rows from {}", rows.len(), path.display());
        Ok(MetadataTable { rows })
    }

    pub fn get(&self, id: u32) -> Option<&PatientMetadata> {
        self.rows.get(&id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The ID column must lead; the rest must be exactly [`COLUMNS`].
fn check_columns(headers: &[String]) -> Result<()> {
    if headers.first().map(String::as_str) != Some(ID_COLUMN) {
        return Err(DatasetError::MissingColumn { column: ID_COLUMN });
    }
    if let Some(extra) = headers.iter().find(|h| !COLUMNS.contains(&h.as_str())) {
        return Err(DatasetError::UnexpectedColumn {
            column: extra.clone(),
        });
    }
    if let Some(missing) = COLUMNS.iter().find(|c| !headers.iter().any(|h| h == *c)) {
        return Err(DatasetError::MissingColumn { column: *missing });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::testutil;

    #[test]
    fn loads_rows_keyed_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("training_data.csv");
        testutil::write_table(&path, &[testutil::ROW_13918, testutil::ROW_2530]);

        let table = MetadataTable::load(&path).unwrap();
        assert_eq!(table.len(), 2);

        let row = table.get(13918).unwrap();
        assert_eq!(row.valves().collect::<Vec<_>>(), vec!["AV", "MV"]);
        assert_eq!(row.age.as_deref(), Some("Child"));
        assert_eq!(row.sex, "Female");
        assert_eq!(row.height, Some(98.0));
        assert_eq!(row.weight, Some(15.9));
        assert!(!row.pregnancy_status);
        assert_eq!(row.murmur, "Present");
        assert_eq!(row.systolic_murmur_grading.as_deref(), Some("I/VI"));
        assert_eq!(row.diastolic_murmur_timing, None);
        assert_eq!(row.outcome, "Abnormal");
        assert_eq!(row.campaign, "CC2015");
        assert_eq!(row.additional_id, None);

        let other = table.get(2530).unwrap();
        assert_eq!(other.height, None);
        assert!(other.pregnancy_status);
        assert!(table.get(1).is_none());
    }

    #[test]
    fn fields_follow_column_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("training_data.csv");
        testutil::write_table(&path, &[testutil::ROW_13918]);

        let table = MetadataTable::load(&path).unwrap();
        let fields = table.get(13918).unwrap().fields();
        assert_eq!(fields.len(), COLUMNS.len());
        assert_eq!(fields[0], (ID_COLUMN, MetadataValue::Integer(13918)));
        assert_eq!(fields[4], ("Height", MetadataValue::Float(98.0)));
        assert_eq!(fields[15], ("Diastolic murmur timing", MetadataValue::Null));
    }

    #[test]
    fn missing_column_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("training_data.csv");
        let header = COLUMNS[..COLUMNS.len() - 1].join(",");
        std::fs::write(&path, format!("{header}\n")).unwrap();

        let err = MetadataTable::load(&path).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn { column: "Additional ID" }));
    }

    #[test]
    fn unexpected_column_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("training_data.csv");
        let header = format!("{},Heart rate", COLUMNS.join(","));
        std::fs::write(&path, format!("{header}\n")).unwrap();

        let err = MetadataTable::load(&path).unwrap_err();
        assert!(
            matches!(err, DatasetError::UnexpectedColumn { ref column } if column == "Heart rate")
        );
    }

    #[test]
    fn id_column_must_come_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("training_data.csv");
        let mut columns = COLUMNS.to_vec();
        columns.swap(0, 1);
        std::fs::write(&path, format!("{}\n", columns.join(","))).unwrap();

        let err = MetadataTable::load(&path).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn { column: ID_COLUMN }));
    }

    #[test]
    fn malformed_row_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("training_data.csv");
        let bad = testutil::ROW_13918.replace("98.0", "tall");
        testutil::write_table(&path, &[bad.as_str()]);

        let err = MetadataTable::load(&path).unwrap_err();
        assert!(matches!(err, DatasetError::Table { .. }));
    }

    #[test]
    fn duplicate_row_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("training_data.csv");
        testutil::write_table(&path, &[testutil::ROW_13918, testutil::ROW_13918]);

        let err = MetadataTable::load(&path).unwrap_err();
        assert!(matches!(err, DatasetError::DuplicateRow { id: 13918 }));
    }

    #[test]
    fn missing_table_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = MetadataTable::load(&dir.path().join("training_data.csv")).unwrap_err();
        assert!(matches!(err, DatasetError::Table { .. }));
    }
}
