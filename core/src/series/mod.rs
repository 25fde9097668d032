//! Named, time-searchable datasets.
//!
//! A [`SearchableSeries`] holds a sorted time array and a set of parallel
//! columns of the same length. Fields are looked up by display name through
//! plain accessor functions that take the series and a row index.

pub mod builder;
pub mod snapshot;

pub use builder::SeriesBuilder;
pub use snapshot::{SeriesSnapshot, SeriesSummary};

use crate::interface::geometry::{CartesianPoint, Frame};
use serde::{Deserialize, Serialize};

/// Reads one value of a series at a row index. The index must be in range.
pub type FieldAccessor = fn(&SearchableSeries, usize) -> f64;

pub const TIME_FIELD: &str = "Time (s)";

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    #[error("index {index} out of range for series of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("row has {found} values, series has {expected} columns")]
    RaggedRow { expected: usize, found: usize },
    #[error("series stores points but the row has none")]
    MissingPoint,
    #[error("series stores no points but the row has one")]
    UnexpectedPoint,
    #[error("time {time} at row {index} breaks ascending order")]
    UnsortedTime { index: usize, time: f64 },
}

pub type SeriesResult<T> = Result<T, SeriesError>;

/// Value columns a series can carry besides time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    X,
    Y,
    Z,
    Range,
    Bearing,
    Elevation,
}

impl Column {
    pub const POSITION: [Column; 3] = [Column::X, Column::Y, Column::Z];
    pub const RANGE_BEARING_ELEVATION: [Column; 3] =
        [Column::Range, Column::Bearing, Column::Elevation];

    pub fn label(self) -> &'static str {
        match self {
            Column::X => "X (m)",
            Column::Y => "Y (m)",
            Column::Z => "Z (m)",
            Column::Range => "Range (m)",
            Column::Bearing => "Bearing (deg)",
            Column::Elevation => "Elevation (deg)",
        }
    }

    pub(crate) fn accessor(self) -> FieldAccessor {
        match self {
            Column::X => x_at,
            Column::Y => y_at,
            Column::Z => z_at,
            Column::Range => range_at,
            Column::Bearing => bearing_at,
            Column::Elevation => elevation_at,
        }
    }
}

pub fn time_at(series: &SearchableSeries, index: usize) -> f64 {
    series.time.get(index).copied().unwrap_or(f64::NAN)
}

pub fn x_at(series: &SearchableSeries, index: usize) -> f64 {
    series.column_value(Column::X, index).unwrap_or(f64::NAN)
}

pub fn y_at(series: &SearchableSeries, index: usize) -> f64 {
    series.column_value(Column::Y, index).unwrap_or(f64::NAN)
}

pub fn z_at(series: &SearchableSeries, index: usize) -> f64 {
    series.column_value(Column::Z, index).unwrap_or(f64::NAN)
}

pub fn range_at(series: &SearchableSeries, index: usize) -> f64 {
    series.column_value(Column::Range, index).unwrap_or(f64::NAN)
}

pub fn bearing_at(series: &SearchableSeries, index: usize) -> f64 {
    series.column_value(Column::Bearing, index).unwrap_or(f64::NAN)
}

pub fn elevation_at(series: &SearchableSeries, index: usize) -> f64 {
    series.column_value(Column::Elevation, index).unwrap_or(f64::NAN)
}

#[derive(Clone)]
pub struct DataField {
    pub name: String,
    pub accessor: FieldAccessor,
}

impl std::fmt::Debug for DataField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataField").field("name", &self.name).finish()
    }
}

/// Immutable dataset produced by [`SeriesBuilder::build`].
#[derive(Debug, Clone)]
pub struct SearchableSeries {
    name: String,
    frame: Frame,
    line_series: bool,
    time: Vec<f64>,
    columns: Vec<(Column, Vec<f64>)>,
    points: Option<Vec<CartesianPoint>>,
    fields: Vec<DataField>,
}

impl SearchableSeries {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn is_line_series(&self) -> bool {
        self.line_series
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn column(&self, column: Column) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, values)| values.as_slice())
    }

    pub fn column_value(&self, column: Column, index: usize) -> Option<f64> {
        self.column(column).and_then(|values| values.get(index).copied())
    }

    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.columns.iter().map(|(c, _)| *c)
    }

    /// Positions relative to the scene origin, for geometric consumers.
    pub fn points(&self) -> Option<&[CartesianPoint]> {
        self.points.as_deref()
    }

    /// True when range, bearing and elevation are all meaningful here.
    pub fn has_rbe_capability(&self) -> bool {
        Column::RANGE_BEARING_ELEVATION
            .iter()
            .all(|c| self.column(*c).is_some())
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn value_at(&self, field: &str, index: usize) -> SeriesResult<f64> {
        let field = self
            .fields
            .iter()
            .find(|f| f.name == field)
            .ok_or_else(|| SeriesError::UnknownField(field.to_string()))?;
        if index >= self.len() {
            return Err(SeriesError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok((field.accessor)(self, index))
    }

    /// Every registered field at one row, in registration order.
    pub fn row(&self, index: usize) -> SeriesResult<Vec<(String, f64)>> {
        if index >= self.len() {
            return Err(SeriesError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok(self
            .fields
            .iter()
            .map(|f| (f.name.clone(), (f.accessor)(self, index)))
            .collect())
    }

    /// Index of the sample nearest to `query`. Queries outside the series
    /// clamp to the first or last sample; ties go to the later sample.
    pub fn nearest_time_index(&self, query: f64) -> Option<usize> {
        let time = &self.time;
        if time.is_empty() {
            return None;
        }
        let idx = time.partition_point(|&t| t < query);
        if idx == time.len() {
            return Some(time.len() - 1);
        }
        if idx == 0 {
            return Some(0);
        }
        if query - time[idx - 1] < time[idx] - query {
            Some(idx - 1)
        } else {
            Some(idx)
        }
    }

    /// Nearest sample, only if it lies strictly within `tolerance` of `query`.
    pub fn find_time_within(&self, query: f64, tolerance: f64) -> Option<usize> {
        self.nearest_time_index(query)
            .filter(|&idx| (self.time[idx] - query).abs() < tolerance)
    }

    pub fn snapshot(&self) -> SeriesSnapshot {
        SeriesSnapshot::from_series(self)
    }
}
