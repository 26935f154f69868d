//! Static column configuration for the Submissions table.
//!
//! The default header set, the header-to-output-key rename table and the
//! legacy field order are data, not logic. They live here as literals so the
//! mappings can be checked independently of any I/O path, and so the survey
//! front-end and this backend agree on one source of truth.

/// Name of the deduplication column. Always the last header of any table
/// this service provisions.
pub const HASH_COLUMN: &str = "Hash";

/// Default header row used when the first ingest carries no headers of its
/// own. The `Q1`..`Q12` columns hold raw question answers and have no rename;
/// they pass through to the output keyed as-is.
pub const DEFAULT_HEADERS: &[&str] = &[
    "Timestamp",
    "Role",
    "Function",
    "Seniority",
    "Company",
    "Company Size",
    "Industry",
    "Region",
    "Email",
    "Consent",
    "Q1",
    "Q2",
    "Q3",
    "Q4",
    "Q5",
    "Q6",
    "Q7",
    "Q8",
    "Q9",
    "Q10",
    "Q11",
    "Q12",
    "Builder Score",
    "Operator Score",
    "Strategist Score",
    "Connector Score",
    "Archetype",
    "Secondary Archetype",
    "Scores",
    "Comments",
    "Source",
    "User Agent",
    "Referrer",
    "Completion Time (s)",
    HASH_COLUMN,
];

/// Header-to-output-key renames applied on read-back. Headers not listed
/// here pass through unchanged as the key.
pub const OUTPUT_KEYS: &[(&str, &str)] = &[
    ("Timestamp", "timestamp"),
    ("Role", "role"),
    ("Function", "func"),
    ("Seniority", "seniority"),
    ("Company", "company"),
    ("Company Size", "companySize"),
    ("Industry", "industry"),
    ("Region", "region"),
    ("Email", "email"),
    ("Consent", "consent"),
    ("Builder Score", "builderScore"),
    ("Operator Score", "operatorScore"),
    ("Strategist Score", "strategistScore"),
    ("Connector Score", "connectorScore"),
    ("Archetype", "archetype"),
    ("Secondary Archetype", "secondaryArchetype"),
    ("Scores", "scores"),
    ("Comments", "comments"),
    ("Source", "source"),
    ("User Agent", "userAgent"),
    ("Referrer", "referrer"),
    ("Completion Time (s)", "completionSeconds"),
    (HASH_COLUMN, "hash"),
];

/// Field order of the legacy fixed-field payload. Rows built from legacy
/// payloads carry exactly these nine cells, `hash` last.
pub const LEGACY_FIELDS: &[&str] = &[
    "timestamp",
    "role",
    "func",
    "archetype",
    "scores",
    "email",
    "company",
    "comments",
    "hash",
];

/// Maps a column header to its stable output key.
///
/// Unmapped headers pass through unchanged.
pub fn output_key(header: &str) -> &str {
    OUTPUT_KEYS
        .iter()
        .find(|(name, _)| *name == header)
        .map_or(header, |(_, key)| *key)
}
