//! HTTP request handlers for the Tally API.
//!
//! Two handler groups:
//! - `submissions` - submission ingestion and read-back
//! - `health` - health and liveness probes
//!
//! Every outcome, including failure, is rendered as a JSON status body;
//! nothing propagates past a handler as a raw error.

pub mod health;
pub mod submissions;

pub use health::{health_check, liveness_check};
pub use submissions::{ingest_submission, list_submissions};
