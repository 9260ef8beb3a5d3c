//! JSON shapes of the chart-data service and their conversion into models.

use {
    crate::{
        data::FetchError,
        domain::Cursor,
        models::{Page, SeriesSlice},
    },
    serde::{Deserialize, Serialize},
    indexmap::IndexMap,
};

/// `GET /k_time_info` body, also the JSON stored under the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryInfo {
    pub min_k_time: Cursor,
    /// Only the lower bound is needed to start a replay.
    #[serde(default)]
    pub max_k_time: Option<Cursor>,
}

#[derive(Debug, Deserialize)]
struct RawSeriesEntry {
    name: String,
    data: Vec<f64>,
}

/// The service has sent both `{name: values}` and `[{name, data}]`.
/// The map form keeps the key order of the body.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSeries {
    List(Vec<RawSeriesEntry>),
    Map(IndexMap<String, Vec<f64>>),
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPage {
    #[serde(rename = "xAxis")]
    x_axis: Option<Vec<Cursor>>,
    #[serde(default)]
    series: Option<RawSeries>,
    #[serde(default)]
    legend: Option<Vec<String>>,
}

impl TryFrom<RawPage> for Page {
    type Error = FetchError;

    fn try_from(raw: RawPage) -> Result<Self, Self::Error> {
        let timestamps = raw.x_axis.ok_or(FetchError::MissingTimestamps)?;

        let mut series: Vec<SeriesSlice> = match raw.series {
            Some(RawSeries::List(entries)) => entries
                .into_iter()
                .map(|e| SeriesSlice {
                    name: e.name,
                    values: e.data,
                })
                .collect(),
            Some(RawSeries::Map(map)) => map
                .into_iter()
                .map(|(name, values)| SeriesSlice { name, values })
                .collect(),
            None => Vec::new(),
        };

        if let Some(bad) = series.iter().find(|s| s.values.len() != timestamps.len()) {
            return Err(FetchError::ShapeMismatch {
                series: bad.name.clone(),
                values: bad.values.len(),
                timestamps: timestamps.len(),
            });
        }

        // Legend order wins; unlisted series keep their relative order after it.
        if let Some(legend) = raw.legend {
            series.sort_by_key(|s| {
                legend
                    .iter()
                    .position(|name| name == &s.name)
                    .unwrap_or(legend.len())
            });
        }

        Ok(Page { timestamps, series })
    }
}

pub(crate) fn decode_page(body: &str) -> Result<Page, FetchError> {
    let raw: RawPage = serde_json::from_str(body)?;
    raw.try_into()
}

pub(crate) fn decode_boundary(body: &str) -> Result<BoundaryInfo, FetchError> {
    Ok(serde_json::from_str(body)?)
}
