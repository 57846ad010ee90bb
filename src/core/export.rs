// JobLogs - core/export.rs
//
// CSV and JSON export of discovered log matches, e.g. for attaching a
// "where to look" list to a failure report.
// Writes to any Write trait object.

use crate::core::ids::recency_key;
use crate::core::model::LogMatch;
use crate::util::constants::EXPORT_TIMESTAMP_FORMAT;
use crate::util::error::ExportError;
use std::io::Write;
use std::path::Path;

/// Export matches to CSV format.
///
/// Writes: path, application_id, container_id, job_id, task_id, attempt_id,
/// submitted_at. Attributes are not exported; use JSON for those.
pub fn export_csv<W: Write>(
    matches: &[LogMatch],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let csv_err = |e| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record([
            "path",
            "application_id",
            "container_id",
            "job_id",
            "task_id",
            "attempt_id",
            "submitted_at",
        ])
        .map_err(csv_err)?;

    let mut count = 0;
    for m in matches {
        let submitted_at = recency_key(&m.ids)
            .submitted_at()
            .map(|t| t.format(EXPORT_TIMESTAMP_FORMAT).to_string())
            .unwrap_or_default();

        csv_writer
            .write_record([
                m.path.as_str(),
                m.ids.application_id.as_deref().unwrap_or(""),
                m.ids.container_id.as_deref().unwrap_or(""),
                m.ids.job_id.as_deref().unwrap_or(""),
                m.ids.task_id.as_deref().unwrap_or(""),
                m.ids.attempt_id.as_deref().unwrap_or(""),
                submitted_at.as_str(),
            ])
            .map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(path = %export_path.display(), count, "Exported matches as CSV");
    Ok(count)
}

/// Export matches to JSON format (array of flat objects).
pub fn export_json<W: Write>(
    matches: &[LogMatch],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(writer, matches).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %export_path.display(), count = matches.len(), "Exported matches as JSON");
    Ok(matches.len())
}
