//! Debugging feature flags.

#[allow(dead_code)]
pub struct LogFlags {
    /// Log every page request and the number of rows it returned.
    pub log_fetches: bool,

    /// Log buffer lengths after each merge.
    pub log_merges: bool,

    /// Log dropped (coalesced) advance requests.
    pub log_coalesced: bool,

    /// Warn about advance cycles slower than their budget (`trace_time!`).
    pub log_performance: bool,

    pub log_bootstrap: bool,

    pub log_orders: bool,
}

pub const DF: LogFlags = LogFlags {
    log_bootstrap: true,
    log_coalesced: true,
    log_performance: true,

    log_fetches: false,
    log_merges: false,
    log_orders: false,
};
