use std::collections::HashMap;

#[cfg(debug_assertions)]
use crate::config::DF;
use crate::domain::Cursor;
use crate::models::Page;

// ============================================================================
// WindowBuffer: fixed-capacity rolling window for one panel
// ============================================================================

/// Most recent `capacity` points of one panel.
///
/// Series are right-aligned against `timestamps`: the last value of every
/// series belongs to the last timestamp. With shape-consistent pages every
/// series has exactly `timestamps.len()` values; mismatched pages are accepted
/// and can leave a series shorter (it is never longer).
#[derive(Debug, Clone, PartialEq)]
pub struct WindowBuffer {
    capacity: usize,
    timestamps: Vec<Cursor>,
    /// Display order: order of first appearance.
    series_names: Vec<String>,
    series: HashMap<String, Vec<f64>>,
}

impl WindowBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            timestamps: Vec::with_capacity(capacity),
            series_names: Vec::new(),
            series: HashMap::new(),
        }
    }

    /// Append a page and evict from the front down to capacity.
    /// Merging the same page twice appends it twice.
    pub fn merge(&mut self, page: Page) {
        if let (Some(last), Some(first)) = (self.timestamps.last(), page.timestamps.first()) {
            if first <= last {
                log::warn!(
                    "Merging page starting at {} onto window ending at {} (not ascending).",
                    first,
                    last
                );
            }
        }

        self.timestamps.extend(page.timestamps);

        for slice in page.series {
            match self.series.get_mut(&slice.name) {
                Some(values) => values.extend(slice.values),
                None => {
                    self.series_names.push(slice.name.clone());
                    self.series.insert(slice.name, slice.values);
                }
            }
        }

        let final_len = self.timestamps.len().min(self.capacity);
        trim_front(&mut self.timestamps, final_len);
        for values in self.series.values_mut() {
            trim_front(values, final_len);
        }

        if !self.is_aligned() {
            log::warn!(
                "Window series lengths diverge from {} timestamps: {:?}",
                self.timestamps.len(),
                self.series_lengths()
            );
        }

        #[cfg(debug_assertions)]
        if DF.log_merges {
            log::info!(
                "Merged window: {} / {} points, {} series.",
                self.timestamps.len(),
                self.capacity,
                self.series_names.len()
            );
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[Cursor] {
        &self.timestamps
    }

    pub fn last_timestamp(&self) -> Option<&Cursor> {
        self.timestamps.last()
    }

    pub fn series_names(&self) -> &[String] {
        &self.series_names
    }

    pub fn series(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name).map(Vec::as_slice)
    }

    /// Value of `name` at the timestamp `index` (right-aligned).
    pub fn value_at(&self, name: &str, index: usize) -> Option<f64> {
        let values = self.series.get(name)?;
        if index >= self.timestamps.len() {
            return None;
        }
        let offset = self.timestamps.len() - values.len();
        index.checked_sub(offset).and_then(|i| values.get(i).copied())
    }

    /// True when every series has one value per timestamp.
    pub fn is_aligned(&self) -> bool {
        self.series
            .values()
            .all(|values| values.len() == self.timestamps.len())
    }

    fn series_lengths(&self) -> Vec<(&str, usize)> {
        self.series_names
            .iter()
            .filter_map(|name| self.series.get(name).map(|v| (name.as_str(), v.len())))
            .collect()
    }
}

/// Drop the oldest elements so that at most `keep` remain.
fn trim_front<T>(data: &mut Vec<T>, keep: usize) {
    if data.len() > keep {
        let excess = data.len() - keep;
        data.drain(..excess);
    }
}
