use crate::interface::geometry::{CartesianPoint, Frame};
use crate::series::{
    time_at, Column, DataField, FieldAccessor, SearchableSeries, SeriesError, SeriesResult,
    TIME_FIELD,
};

/// Write-once construction of a [`SearchableSeries`].
///
/// Columns and the point list are declared up front; every `push` appends one
/// row to all of them or fails without touching the builder.
#[derive(Debug)]
pub struct SeriesBuilder {
    name: String,
    frame: Frame,
    line_series: bool,
    columns: Vec<Column>,
    with_points: bool,
    time: Vec<f64>,
    values: Vec<Vec<f64>>,
    points: Vec<CartesianPoint>,
    extra_fields: Vec<DataField>,
}

impl SeriesBuilder {
    pub fn new(name: impl Into<String>, frame: Frame) -> Self {
        Self {
            name: name.into(),
            frame,
            line_series: false,
            columns: Vec::new(),
            with_points: false,
            time: Vec::new(),
            values: Vec::new(),
            points: Vec::new(),
            extra_fields: Vec::new(),
        }
    }

    pub fn line_series(mut self, line_series: bool) -> Self {
        self.line_series = line_series;
        self
    }

    /// Declares the value columns, in the order `push` expects them.
    pub fn columns(mut self, columns: &[Column]) -> Self {
        for column in columns {
            if !self.columns.contains(column) {
                self.columns.push(*column);
                self.values.push(Vec::new());
            }
        }
        self
    }

    pub fn with_points(mut self) -> Self {
        self.with_points = true;
        self
    }

    /// Adds a field on top of time and the declared columns. A field with the
    /// same name replaces the earlier one.
    pub fn register_field(mut self, name: impl Into<String>, accessor: FieldAccessor) -> Self {
        let name = name.into();
        self.extra_fields.retain(|f| f.name != name);
        self.extra_fields.push(DataField { name, accessor });
        self
    }

    pub fn with_capacity(mut self, rows: usize) -> Self {
        self.time.reserve(rows);
        for column in &mut self.values {
            column.reserve(rows);
        }
        if self.with_points {
            self.points.reserve(rows);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn push(
        &mut self,
        time: f64,
        values: &[f64],
        point: Option<CartesianPoint>,
    ) -> SeriesResult<()> {
        if values.len() != self.columns.len() {
            return Err(SeriesError::RaggedRow {
                expected: self.columns.len(),
                found: values.len(),
            });
        }
        match (self.with_points, point.is_some()) {
            (true, false) => return Err(SeriesError::MissingPoint),
            (false, true) => return Err(SeriesError::UnexpectedPoint),
            _ => {}
        }
        let index = self.time.len();
        let in_order = self.time.last().map_or(true, |&last| time >= last);
        if !time.is_finite() || !in_order {
            return Err(SeriesError::UnsortedTime { index, time });
        }

        self.time.push(time);
        for (column, &value) in self.values.iter_mut().zip(values) {
            column.push(value);
        }
        if let Some(point) = point {
            self.points.push(point);
        }
        Ok(())
    }

    pub fn build(self) -> SearchableSeries {
        let mut fields = vec![DataField {
            name: TIME_FIELD.to_string(),
            accessor: time_at,
        }];
        fields.extend(self.columns.iter().map(|c| DataField {
            name: c.label().to_string(),
            accessor: c.accessor(),
        }));
        for extra in self.extra_fields {
            fields.retain(|f| f.name != extra.name);
            fields.push(extra);
        }

        SearchableSeries {
            name: self.name,
            frame: self.frame,
            line_series: self.line_series,
            time: self.time,
            columns: self.columns.into_iter().zip(self.values).collect(),
            points: self.with_points.then_some(self.points),
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position_builder() -> SeriesBuilder {
        SeriesBuilder::new("truth", Frame::Local)
            .line_series(true)
            .columns(&Column::POSITION)
            .with_points()
    }

    #[test]
    fn builder_appends_rows_in_lockstep() {
        let mut builder = position_builder();
        builder
            .push(0.0, &[1.0, 2.0, 3.0], Some(CartesianPoint::new(1.0, 2.0, 3.0)))
            .unwrap();
        builder
            .push(0.5, &[4.0, 5.0, 6.0], Some(CartesianPoint::new(4.0, 5.0, 6.0)))
            .unwrap();
        let series = builder.build();

        assert_eq!(series.len(), 2);
        assert!(series.is_line_series());
        assert_eq!(series.column(Column::Y), Some(&[2.0, 5.0][..]));
        assert_eq!(series.points().map(|p| p.len()), Some(2));
        assert_eq!(series.field_names(), vec![TIME_FIELD, "X (m)", "Y (m)", "Z (m)"]);
    }

    #[test]
    fn rejected_rows_leave_builder_untouched() {
        let mut builder = position_builder();
        let point = Some(CartesianPoint::default());
        builder.push(1.0, &[0.0, 0.0, 0.0], point).unwrap();

        assert_eq!(
            builder.push(2.0, &[0.0, 0.0], point),
            Err(SeriesError::RaggedRow {
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            builder.push(2.0, &[0.0, 0.0, 0.0], None),
            Err(SeriesError::MissingPoint)
        );
        assert_eq!(
            builder.push(0.5, &[0.0, 0.0, 0.0], point),
            Err(SeriesError::UnsortedTime {
                index: 1,
                time: 0.5
            })
        );
        assert!(matches!(
            builder.push(f64::NAN, &[0.0, 0.0, 0.0], point),
            Err(SeriesError::UnsortedTime { .. })
        ));
        assert_eq!(builder.len(), 1);
        assert_eq!(builder.build().column(Column::X).map(|c| c.len()), Some(1));
    }

    #[test]
    fn unexpected_point_is_rejected() {
        let mut builder = SeriesBuilder::new("bare", Frame::Local).columns(&[Column::X]);
        assert_eq!(
            builder.push(0.0, &[1.0], Some(CartesianPoint::default())),
            Err(SeriesError::UnexpectedPoint)
        );
        assert!(builder.is_empty());
    }

    #[test]
    fn duplicate_columns_are_declared_once() {
        let builder = SeriesBuilder::new("dup", Frame::Local).columns(&[Column::X, Column::X]);
        assert_eq!(builder.build().field_names(), vec![TIME_FIELD, "X (m)"]);
    }

    #[test]
    fn registered_fields_follow_columns() {
        let mut builder = SeriesBuilder::new("servo", Frame::Local)
            .columns(&[Column::Bearing])
            .register_field("Turret Bearing (deg)", |_, _| 0.0)
            .register_field("Doubled Bearing", |s, i| 2.0 * s.time()[i]);
        builder.push(3.0, &[45.0], None).unwrap();
        let series = builder.build();

        assert_eq!(
            series.field_names(),
            vec![TIME_FIELD, "Bearing (deg)", "Turret Bearing (deg)", "Doubled Bearing"]
        );
        assert_eq!(series.value_at("Turret Bearing (deg)", 0), Ok(0.0));
        assert_eq!(series.value_at("Doubled Bearing", 0), Ok(6.0));
    }
}
