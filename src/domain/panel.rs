use {
    crate::config::REPLAY,
    serde::{Deserialize, Serialize},
    strum_macros::{AsRefStr, Display, EnumIter, EnumString},
};

/// One independently replayed chart stream.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Panel {
    Signal,
    Trend,
    Scope,
}

impl Panel {
    /// Name used in the `/chart_data/{panel}/...` route.
    pub fn wire_name(&self) -> &str {
        self.as_ref()
    }

    /// Max number of points retained in this panel's window.
    pub fn capacity(&self) -> usize {
        REPLAY.capacities.for_panel(*self)
    }
}
