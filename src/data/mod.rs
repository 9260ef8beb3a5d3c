mod boundary_cache;
mod provider;
mod wire;

pub use {
    boundary_cache::{BoundaryCache, JsonFileCache, NoCache},
    provider::{FetchError, HttpPageProvider, PageAnchor, PageProvider},
    wire::BoundaryInfo,
};
