use crate::interface::geometry::{CartesianPoint, Frame};
use crate::series::{Column, SearchableSeries};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotColumn {
    pub column: Column,
    pub label: String,
    pub values: Vec<f64>,
}

/// Serializable copy of a series for presentation consumers.
///
/// Field accessors are not carried; consumers index the arrays directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesSnapshot {
    pub name: String,
    pub frame: Frame,
    pub is_line_series: bool,
    pub has_rbe_capability: bool,
    pub field_names: Vec<String>,
    pub time: Vec<f64>,
    pub columns: Vec<SnapshotColumn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<CartesianPoint>>,
}

impl SeriesSnapshot {
    pub fn from_series(series: &SearchableSeries) -> Self {
        Self {
            name: series.name().to_string(),
            frame: series.frame(),
            is_line_series: series.is_line_series(),
            has_rbe_capability: series.has_rbe_capability(),
            field_names: series.field_names().into_iter().map(String::from).collect(),
            time: series.time().to_vec(),
            columns: series
                .columns()
                .map(|column| SnapshotColumn {
                    column,
                    label: column.label().to_string(),
                    values: series.column(column).map(<[f64]>::to_vec).unwrap_or_default(),
                })
                .collect(),
            points: series.points().map(<[CartesianPoint]>::to_vec),
        }
    }

    pub fn summary(&self) -> SeriesSummary {
        SeriesSummary {
            name: self.name.clone(),
            frame: self.frame,
            len: self.time.len(),
            has_rbe_capability: self.has_rbe_capability,
            field_names: self.field_names.clone(),
        }
    }
}

/// Header-only view used for dataset listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesSummary {
    pub name: String,
    pub frame: Frame,
    pub len: usize,
    pub has_rbe_capability: bool,
    pub field_names: Vec<String>,
}
