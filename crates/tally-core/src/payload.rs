//! Ingest payload model.
//!
//! Current senders post `{headers, values, hash}`; older front-end builds
//! posted a flat object of named fields instead of a `values` array. Both
//! shapes deserialize into [`SubmissionPayload`] — the legacy fields ride
//! along flattened and are only consulted when `values` is absent.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{CoreError, Result};

/// Body of an ingest request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionPayload {
    /// Column names for schema provisioning. Only consulted when the table
    /// does not exist yet; a `Hash` column is appended on creation.
    #[serde(default)]
    pub headers: Option<Vec<String>>,

    /// Row cells, positionally aligned with the header row.
    #[serde(default)]
    pub values: Option<Vec<Value>>,

    /// Caller-supplied deduplication key.
    #[serde(default)]
    pub hash: Option<String>,

    /// Legacy fixed-field fallback, used when `values` is absent.
    #[serde(flatten)]
    pub legacy: LegacyFields,
}

/// Named scalar fields of the legacy payload shape, in no particular order.
/// Row construction applies the fixed order from
/// [`crate::columns::LEGACY_FIELDS`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyFields {
    /// Submission timestamp; generated from the clock when absent.
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Respondent role.
    #[serde(default)]
    pub role: Option<String>,
    /// Respondent function.
    #[serde(default)]
    pub func: Option<String>,
    /// Computed archetype label.
    #[serde(default)]
    pub archetype: Option<String>,
    /// Serialized score breakdown.
    #[serde(default)]
    pub scores: Option<String>,
    /// Contact email, if the respondent opted in.
    #[serde(default)]
    pub email: Option<String>,
    /// Company name.
    #[serde(default)]
    pub company: Option<String>,
    /// Free-form comments.
    #[serde(default)]
    pub comments: Option<String>,
}

impl SubmissionPayload {
    /// Parses a raw request body.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Payload`] when the body is not the JSON shape
    /// described above. The error message is safe to echo back to callers.
    pub fn parse(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|err| CoreError::Payload(err.to_string()))
    }

    /// Column names to provision the table with, empty when the payload
    /// carries none.
    pub fn candidate_headers(&self) -> &[String] {
        self.headers.as_deref().unwrap_or_default()
    }
}
