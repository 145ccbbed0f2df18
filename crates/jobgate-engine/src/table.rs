//! Table-schema documents returned by the engine.
//!
//! The engine serializes its result frame with a JSON table schema:
//!
//! ```json
//! {
//!   "schema": {
//!     "fields": [{"name": "index", "type": "integer"}, {"name": "title", "type": "string"}],
//!     "primaryKey": ["index"]
//!   },
//!   "data": [{"index": 0, "title": "Software Engineer"}]
//! }
//! ```
//!
//! The frame's gaps are written as `null`. Decoding restores the typed
//! sentinels a tabular engine uses for them, so the gateway sees NaN in
//! numeric columns and null timestamps in datetime columns.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

use jobgate_models::{CellValue, Job, ScrapeResult};

/// Column type as reported by the engine's table schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Integer,
    Number,
    Boolean,
    Datetime,
    String,
    #[serde(other)]
    Any,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableField {
    pub name: String,
    #[serde(rename = "type", default = "any_type")]
    pub kind: FieldType,
}

fn any_type() -> FieldType {
    FieldType::Any
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableSchema {
    pub fields: Vec<TableField>,
    #[serde(rename = "primaryKey", default)]
    pub primary_key: Vec<String>,
}

/// A decoded engine response body.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineTable {
    pub schema: TableSchema,
    #[serde(default)]
    pub data: Vec<Map<String, Value>>,
}

impl EngineTable {
    /// Columns forwarded to callers, in schema order.
    fn columns(&self) -> impl Iterator<Item = &TableField> {
        self.schema
            .fields
            .iter()
            .filter(|f| !self.schema.primary_key.contains(&f.name))
    }

    /// Convert rows into jobs. A column missing from a row is left out of
    /// that job, so field sets may differ between jobs.
    pub fn into_jobs(self) -> ScrapeResult {
        self.data
            .iter()
            .map(|row| {
                self.columns()
                    .filter_map(|field| {
                        row.get(&field.name)
                            .map(|value| (field.name.clone(), decode_cell(field.kind, value)))
                    })
                    .collect::<Job>()
            })
            .collect()
    }
}

/// Decode one JSON cell according to its column type.
pub fn decode_cell(kind: FieldType, value: &Value) -> CellValue {
    match (kind, value) {
        (FieldType::Number, Value::Null) => CellValue::Float(f64::NAN),
        (FieldType::Number, Value::Number(n)) => CellValue::Float(n.as_f64().unwrap_or(f64::NAN)),
        (FieldType::Integer, Value::Null) => CellValue::Float(f64::NAN),
        (FieldType::Datetime, Value::Null) => CellValue::Timestamp(None),
        (FieldType::Datetime, Value::String(s)) => CellValue::Timestamp(parse_timestamp(s)),
        (FieldType::Datetime, Value::Number(n)) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64));
            CellValue::Timestamp(millis.and_then(DateTime::<Utc>::from_timestamp_millis))
        }
        (_, other) => CellValue::from(other.clone()),
    }
}

/// Parse the timestamp formats engines emit. Unparsable text is a null
/// timestamp.
fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn sample_table() -> EngineTable {
        serde_json::from_value(json!({
            "schema": {
                "fields": [
                    {"name": "index", "type": "integer"},
                    {"name": "title", "type": "string"},
                    {"name": "min_amount", "type": "number"},
                    {"name": "date_posted", "type": "datetime"},
                    {"name": "is_remote", "type": "boolean"},
                    {"name": "emails", "type": "any"}
                ],
                "primaryKey": ["index"],
                "pandas_version": "1.4.0"
            },
            "data": [
                {"index": 0, "title": "Software Engineer", "min_amount": null,
                 "date_posted": "2024-01-15T00:00:00.000", "is_remote": true, "emails": ["a@b.c"]},
                {"index": 1, "title": "Data Scientist", "min_amount": 120000.0,
                 "date_posted": null, "is_remote": false, "emails": null}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_into_jobs_restores_sentinels() {
        let jobs = sample_table().into_jobs();
        assert_eq!(jobs.len(), 2);

        let first = &jobs[0];
        assert_eq!(
            first.field_names().collect::<Vec<_>>(),
            vec!["title", "min_amount", "date_posted", "is_remote", "emails"]
        );
        assert!(matches!(first.get("min_amount"), Some(CellValue::Float(f)) if f.is_nan()));
        assert_eq!(
            first.get("date_posted"),
            Some(&CellValue::Timestamp(Some(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap())))
        );
        assert_eq!(first.get("emails"), Some(&CellValue::Json(json!(["a@b.c"]))));

        let second = &jobs[1];
        assert_eq!(second.get("min_amount"), Some(&CellValue::Float(120000.0)));
        assert_eq!(second.get("date_posted"), Some(&CellValue::Timestamp(None)));
        assert_eq!(second.get("emails"), Some(&CellValue::Null));
    }

    #[test]
    fn test_index_column_is_skipped() {
        let jobs = sample_table().into_jobs();
        assert!(jobs.iter().all(|job| job.get("index").is_none()));
    }

    #[test]
    fn test_missing_column_is_omitted() {
        let table: EngineTable = serde_json::from_value(json!({
            "schema": {"fields": [{"name": "title", "type": "string"}, {"name": "company", "type": "string"}]},
            "data": [{"title": "A"}, {"title": "B", "company": "C"}]
        }))
        .unwrap();

        let jobs = table.into_jobs();
        assert_eq!(jobs[0].len(), 1);
        assert_eq!(jobs[1].len(), 2);
    }

    #[test]
    fn test_unknown_field_type_is_any() {
        let field: TableField =
            serde_json::from_value(json!({"name": "x", "type": "duration"})).unwrap();
        assert_eq!(field.kind, FieldType::Any);
    }

    #[test]
    fn test_decode_datetime_variants() {
        assert_eq!(
            decode_cell(FieldType::Datetime, &json!("2024-03-01T12:00:00Z")),
            CellValue::Timestamp(Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()))
        );
        assert_eq!(
            decode_cell(FieldType::Datetime, &json!("2024-03-01")),
            CellValue::Timestamp(Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()))
        );
        assert_eq!(
            decode_cell(FieldType::Datetime, &json!(1709294400000_i64)),
            CellValue::Timestamp(Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()))
        );
        assert_eq!(
            decode_cell(FieldType::Datetime, &json!(1709294400000.0_f64)),
            CellValue::Timestamp(Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()))
        );
        assert_eq!(decode_cell(FieldType::Datetime, &json!("not a date")), CellValue::Timestamp(None));
    }

    #[test]
    fn test_decode_integer_column() {
        assert_eq!(decode_cell(FieldType::Integer, &json!(7)), CellValue::Int(7));
        assert!(matches!(decode_cell(FieldType::Integer, &Value::Null), CellValue::Float(f) if f.is_nan()));
    }
}
