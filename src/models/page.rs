use crate::domain::Cursor;

/// One named series inside a page, in wire order.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSlice {
    pub name: String,
    pub values: Vec<f64>,
}

/// A bounded slice of time-series data returned by one fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub timestamps: Vec<Cursor>,
    pub series: Vec<SeriesSlice>,
}

impl Page {
    pub fn new(timestamps: Vec<Cursor>) -> Self {
        Self {
            timestamps,
            series: Vec::new(),
        }
    }

    pub fn with_series(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.series.push(SeriesSlice {
            name: name.into(),
            values,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// An empty page means "no more data from this cursor".
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn last_timestamp(&self) -> Option<&Cursor> {
        self.timestamps.last()
    }
}
