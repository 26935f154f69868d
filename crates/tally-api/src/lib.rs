//! Tally HTTP API.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::sync::Arc;

use tally_core::{Clock, RowStore};

pub mod config;
pub mod handlers;
pub mod server;

pub use config::Config;
pub use server::{create_router, start_server};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Row store the submissions table lives in.
    pub store: Arc<dyn RowStore>,
    /// Clock for legacy timestamps and health latency measurements.
    pub clock: Arc<dyn Clock>,
    /// Name of the submissions table.
    pub table: Arc<str>,
}

impl AppState {
    /// Bundles the collaborators into one state value.
    pub fn new(store: Arc<dyn RowStore>, clock: Arc<dyn Clock>, table: &str) -> Self {
        Self { store, clock, table: Arc::from(table) }
    }
}
