use crate::error::StoreError;
use chrono::{DateTime, NaiveDate, Utc};
use core_types::{Sample, Scalar, Series};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashSet;
use uuid::Uuid;

/// How many distinct example values are kept per column.
const UNIQUE_SAMPLE_SIZE: usize = 5;

/// A cell of a stored row; `None` is a missing value.
pub type Cell = Option<Scalar>;

/// The type inferred for a column from its non-null cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Date,
    Text,
    /// Every cell is null.
    Empty,
}

/// Column metadata shown to users when picking x and y.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMeta {
    pub name: String,
    pub dtype: ColumnKind,
    pub is_numeric: bool,
    pub unique_sample: Vec<Scalar>,
    pub unique_count: usize,
}

/// The body of an upload: column names and row-major JSON cells.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDataset {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<JsonValue>>,
}

/// A listing entry, without the rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub id: Uuid,
    pub original_name: String,
    pub upload_time: DateTime<Utc>,
    pub rows: usize,
    pub cols: usize,
    pub columns: Vec<ColumnMeta>,
}

/// The first rows of a dataset keyed by column name.
#[derive(Debug, Clone, Serialize)]
pub struct Preview {
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, JsonValue>>,
}

/// An uploaded dataset held in memory.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub id: Uuid,
    pub name: String,
    pub uploaded_at: DateTime<Utc>,
    pub columns: Vec<ColumnMeta>,
    pub rows: Vec<Vec<Cell>>,
}

impl Dataset {
    /// Validates and converts an upload, inferring a type for every column.
    pub fn from_upload(upload: NewDataset) -> Result<Self, StoreError> {
        if upload.name.trim().is_empty() {
            return Err(StoreError::InvalidDataset("dataset name is empty".to_string()));
        }
        if upload.columns.is_empty() {
            return Err(StoreError::InvalidDataset("dataset has no columns".to_string()));
        }
        let mut seen = HashSet::new();
        for column in &upload.columns {
            if !seen.insert(column.as_str()) {
                return Err(StoreError::InvalidDataset(format!("duplicate column '{}'", column)));
            }
        }

        let width = upload.columns.len();
        let rows = upload
            .rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                if row.len() != width {
                    return Err(StoreError::InvalidDataset(format!(
                        "row {} has {} cells, expected {}",
                        i + 1,
                        row.len(),
                        width
                    )));
                }
                row.into_iter().map(cell_from_json).collect::<Result<Vec<Cell>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let columns = upload
            .columns
            .into_iter()
            .enumerate()
            .map(|(index, name)| describe_column(name, rows.iter().map(|row| &row[index])))
            .collect();

        Ok(Self {
            id: Uuid::new_v4(),
            name: upload.name,
            uploaded_at: Utc::now(),
            columns,
            rows,
        })
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            id: self.id,
            original_name: self.name.clone(),
            upload_time: self.uploaded_at,
            rows: self.rows.len(),
            cols: self.columns.len(),
            columns: self.columns.clone(),
        }
    }

    pub fn column_index(&self, name: &str) -> Result<usize, StoreError> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| StoreError::ColumnNotFound(name.to_string()))
    }

    /// Extracts the `(x, y)` samples of a column pair in row order.
    ///
    /// Rows with a missing x are skipped; a missing y stays `None`.
    pub fn series(&self, x_column: &str, y_column: Option<&str>) -> Result<Series, StoreError> {
        let x_index = self.column_index(x_column)?;
        let y_index = y_column.map(|y| self.column_index(y)).transpose()?;

        let samples = self
            .rows
            .iter()
            .filter_map(|row| {
                let x = row[x_index].clone()?;
                let y = y_index.and_then(|i| row[i].clone());
                Some(Sample { x, y })
            })
            .collect();

        Ok(Series::new(x_column, y_column.map(str::to_string), samples))
    }

    /// The first `limit` rows as JSON objects; missing cells render as `""`.
    pub fn preview(&self, limit: usize) -> Preview {
        let names: Vec<String> = self.columns.iter().map(|c| c.name.clone()).collect();
        let rows = self
            .rows
            .iter()
            .take(limit)
            .map(|row| {
                names
                    .iter()
                    .zip(row)
                    .map(|(name, cell)| {
                        let value = match cell {
                            None => JsonValue::String(String::new()),
                            Some(Scalar::Number(v)) => serde_json::Number::from_f64(*v)
                                .map(JsonValue::Number)
                                .unwrap_or(JsonValue::Null),
                            Some(other) => JsonValue::String(other.label()),
                        };
                        (name.clone(), value)
                    })
                    .collect()
            })
            .collect();

        Preview { columns: names, rows }
    }
}

/// Converts an uploaded JSON cell. Numeric strings become numbers and
/// `YYYY-MM-DD` strings become dates.
pub fn cell_from_json(value: JsonValue) -> Result<Cell, StoreError> {
    match value {
        JsonValue::Null => Ok(None),
        JsonValue::Number(n) => n
            .as_f64()
            .map(|v| Some(Scalar::Number(v)))
            .ok_or_else(|| StoreError::InvalidDataset(format!("unsupported number {}", n))),
        JsonValue::Bool(b) => Ok(Some(Scalar::Text(b.to_string()))),
        JsonValue::String(s) => Ok(parse_text(s)),
        other => Err(StoreError::InvalidDataset(format!(
            "cells must be scalars, found {}",
            other
        ))),
    }
}

fn parse_text(s: String) -> Cell {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(v) = trimmed.parse::<f64>() {
        if v.is_finite() {
            return Some(Scalar::Number(v));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(Scalar::Date(date));
    }
    Some(Scalar::Text(s))
}

fn describe_column<'a>(name: String, cells: impl Iterator<Item = &'a Cell>) -> ColumnMeta {
    let mut kind: Option<ColumnKind> = None;
    let mut unique_labels = HashSet::new();
    let mut unique_sample = Vec::new();

    for value in cells.flatten() {
        let cell_kind = match value {
            Scalar::Number(_) => ColumnKind::Numeric,
            Scalar::Date(_) => ColumnKind::Date,
            Scalar::Text(_) => ColumnKind::Text,
        };
        kind = match kind {
            None => Some(cell_kind),
            Some(k) if k == cell_kind => Some(k),
            // Mixed columns are treated as text.
            Some(_) => Some(ColumnKind::Text),
        };
        if unique_labels.insert(value.label()) && unique_sample.len() < UNIQUE_SAMPLE_SIZE {
            unique_sample.push(value.clone());
        }
    }

    let dtype = kind.unwrap_or(ColumnKind::Empty);
    ColumnMeta {
        name,
        dtype,
        is_numeric: dtype == ColumnKind::Numeric,
        unique_sample,
        unique_count: unique_labels.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn upload() -> NewDataset {
        NewDataset {
            name: "sales.csv".to_string(),
            columns: vec!["region".into(), "month".into(), "revenue".into()],
            rows: vec![
                vec![json!("North"), json!("2024-01-01"), json!(120.5)],
                vec![json!("South"), json!("2024-02-01"), json!("80")],
                vec![json!(null), json!("2024-03-01"), json!(null)],
            ],
        }
    }

    #[test]
    fn infers_column_kinds() {
        let dataset = Dataset::from_upload(upload()).unwrap();
        let kinds: Vec<ColumnKind> = dataset.columns.iter().map(|c| c.dtype).collect();
        assert_eq!(kinds, [ColumnKind::Text, ColumnKind::Date, ColumnKind::Numeric]);
        assert!(dataset.columns[2].is_numeric);
        assert_eq!(dataset.columns[0].unique_count, 2);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let mut bad = upload();
        bad.rows.push(vec![json!("East")]);
        assert!(matches!(Dataset::from_upload(bad), Err(StoreError::InvalidDataset(_))));
    }

    #[test]
    fn duplicate_columns_are_rejected() {
        let mut bad = upload();
        bad.columns[1] = "region".to_string();
        assert!(matches!(Dataset::from_upload(bad), Err(StoreError::InvalidDataset(_))));
    }

    #[test]
    fn series_skips_missing_x_and_keeps_missing_y() {
        let dataset = Dataset::from_upload(upload()).unwrap();
        let series = dataset.series("region", Some("revenue")).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.samples[1].y, Some(Scalar::Number(80.0)));

        let by_month = dataset.series("month", Some("revenue")).unwrap();
        assert_eq!(by_month.len(), 3);
        assert_eq!(by_month.samples[2].y, None);
    }

    #[test]
    fn unknown_column_is_reported() {
        let dataset = Dataset::from_upload(upload()).unwrap();
        let err = dataset.series("region", Some("profit")).unwrap_err();
        assert_eq!(err, StoreError::ColumnNotFound("profit".to_string()));
    }

    #[test]
    fn preview_renders_missing_cells_as_empty_strings() {
        let dataset = Dataset::from_upload(upload()).unwrap();
        let preview = dataset.preview(2);
        assert_eq!(preview.rows.len(), 2);
        assert_eq!(preview.rows[0]["region"], json!("North"));
        assert_eq!(preview.rows[0]["month"], json!("2024-01-01"));

        let all = dataset.preview(200);
        assert_eq!(all.rows[2]["revenue"], json!(""));
    }
}
