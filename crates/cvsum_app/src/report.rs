use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use cvsum_core::ResultPayload;
use cvsum_engine::write_atomically;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SavedReport<'a> {
    job_id: Option<&'a str>,
    saved_utc: String,
    questions: &'a [String],
    result: &'a ResultPayload,
}

/// Writes the finished job as pretty JSON. The job id is absent for synchronous summaries.
pub fn save_report(
    target: &Path,
    job_id: Option<&str>,
    questions: &[String],
    result: &ResultPayload,
    saved_at: DateTime<Utc>,
) -> Result<PathBuf> {
    let report = SavedReport {
        job_id,
        saved_utc: saved_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        questions,
        result,
    };
    let mut content = serde_json::to_string_pretty(&report).context("serializing report")?;
    content.push('\n');
    write_atomically(target, &content)
        .with_context(|| format!("writing report to {}", target.display()))
}
