use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell value lifted out of a dataset row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

impl Scalar {
    /// The numeric view of the value. Dates map to their day ordinal
    /// (days since 0001-01-01), text has no numeric view.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(v) => Some(*v),
            Scalar::Date(d) => Some(d.num_days_from_ce() as f64),
            Scalar::Text(_) => None,
        }
    }

    /// The date at a (possibly fractional) day ordinal, rounded to the
    /// nearest day. Inverse of `as_f64` for dates.
    pub fn date_from_ordinal(days: f64) -> Option<NaiveDate> {
        let rounded = days.round();
        if !rounded.is_finite() || rounded < i32::MIN as f64 || rounded > i32::MAX as f64 {
            return None;
        }
        NaiveDate::from_num_days_from_ce_opt(rounded as i32)
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Scalar::Text(_))
    }

    /// The value as a category label.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Whole numbers print without a trailing ".0" so years read as years.
            Scalar::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{}", *v as i64),
            Scalar::Number(v) => write!(f, "{}", v),
            Scalar::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<NaiveDate> for Scalar {
    fn from(value: NaiveDate) -> Self {
        Scalar::Date(value)
    }
}

/// One row's values for the selected x and y columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: Scalar,
    pub y: Option<Scalar>,
}

impl Sample {
    pub fn new(x: impl Into<Scalar>, y: Option<Scalar>) -> Self {
        Self { x: x.into(), y }
    }

    /// Shorthand for a sample with a numeric y.
    pub fn pair(x: impl Into<Scalar>, y: f64) -> Self {
        Self::new(x, Some(Scalar::Number(y)))
    }
}

/// The ordered samples of one (dataset, x column, y column) selection.
///
/// Order follows the source dataset's row order. It matters for line charts
/// and forecasts, not for ranking or distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub x_column: String,
    pub y_column: Option<String>,
    pub samples: Vec<Sample>,
}

impl Series {
    pub fn new(x_column: impl Into<String>, y_column: Option<String>, samples: Vec<Sample>) -> Self {
        Self {
            x_column: x_column.into(),
            y_column,
            samples,
        }
    }

    /// Builds a series of numeric y values keyed by the given x values.
    pub fn from_pairs<X: Into<Scalar>>(
        x_column: &str,
        y_column: &str,
        pairs: impl IntoIterator<Item = (X, f64)>,
    ) -> Self {
        let samples = pairs.into_iter().map(|(x, y)| Sample::pair(x, y)).collect();
        Self::new(x_column, Some(y_column.to_string()), samples)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The y column name, or the x column name when no y was selected.
    pub fn value_label(&self) -> &str {
        self.y_column.as_deref().unwrap_or(&self.x_column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_numbers_render_without_fraction() {
        assert_eq!(Scalar::Number(2020.0).label(), "2020");
        assert_eq!(Scalar::Number(2.5).label(), "2.5");
    }

    #[test]
    fn dates_have_an_ordinal_and_iso_label() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let s = Scalar::Date(d);
        assert_eq!(s.label(), "2024-03-01");
        let next = Scalar::Date(d.succ_opt().unwrap());
        assert_eq!(next.as_f64().unwrap() - s.as_f64().unwrap(), 1.0);
    }

    #[test]
    fn day_ordinals_map_back_to_dates() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let days = Scalar::Date(date).as_f64().unwrap();
        assert_eq!(Scalar::date_from_ordinal(days), Some(date));
        assert_eq!(Scalar::date_from_ordinal(days + 0.4), Some(date));
        assert_eq!(Scalar::date_from_ordinal(f64::INFINITY), None);
        assert_eq!(Scalar::date_from_ordinal(1e12), None);
    }

    #[test]
    fn untagged_scalars_round_trip_through_json() {
        let parsed: Vec<Scalar> = serde_json::from_str(r#"[3.5, "2021-05-04", "North"]"#).unwrap();
        assert_eq!(parsed[0], Scalar::Number(3.5));
        assert!(matches!(parsed[1], Scalar::Date(_)));
        assert_eq!(parsed[2], Scalar::Text("North".to_string()));
    }
}
