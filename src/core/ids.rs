// JobLogs - core/ids.rs
//
// Ordering and completion of runtime identifiers.
//
// IDs look like {attempt,task,job}_201601081945_0005[_m[_000005[_0]]].
// Every numeric field is zero-padded to a fixed width, so comparing the
// fields as strings orders them chronologically without parsing. Malformed
// IDs never fail; missing fields become empty strings, which sort first.

use crate::core::model::{IdKind, IdRecord};
use crate::util::constants::{
    ID_FIELD_SEPARATOR, JOB_ID_PREFIX, JOB_TIMESTAMP_FORMAT, TASK_ID_PREFIX,
};
use chrono::NaiveDateTime;
use std::cmp::Reverse;

// =============================================================================
// Recency key
// =============================================================================

/// Sort key ordering ID records roughly by time, earliest first.
///
/// Field order matters: the derived `Ord` compares fields top to bottom.
/// `attempt_num` precedes `task_num`, so a later attempt outranks a
/// higher-numbered task of the same step and type; fatal errors usually
/// occur on the final attempt of a task. Within a step, task type `m` sorts
/// before `r`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecencyKey {
    pub application_id: String,
    pub container_id: String,
    pub timestamp_and_step: String,
    pub task_type: String,
    pub attempt_num: String,
    pub task_num: String,
}

impl RecencyKey {
    /// When the job was submitted, parsed from the timestamp field.
    ///
    /// `None` if the record had no job/task/attempt ID or the field is not
    /// a `%Y%m%d%H%M` timestamp.
    pub fn submitted_at(&self) -> Option<NaiveDateTime> {
        let timestamp = self
            .timestamp_and_step
            .split(ID_FIELD_SEPARATOR)
            .next()
            .filter(|t| !t.is_empty())?;
        NaiveDateTime::parse_from_str(timestamp, JOB_TIMESTAMP_FORMAT).ok()
    }
}

/// Build the recency key for `record`.
///
/// Uses the most specific of `attempt_id`, `task_id`, `job_id`.
pub fn recency_key(record: &IdRecord) -> RecencyKey {
    let id = record
        .get(IdKind::AttemptId)
        .or_else(|| record.get(IdKind::TaskId))
        .or_else(|| record.get(IdKind::JobId))
        .unwrap_or("");
    let parts: Vec<&str> = id.split(ID_FIELD_SEPARATOR).collect();

    RecencyKey {
        application_id: record
            .get(IdKind::ApplicationId)
            .unwrap_or_default()
            .to_string(),
        container_id: record
            .get(IdKind::ContainerId)
            .unwrap_or_default()
            .to_string(),
        timestamp_and_step: join_fields(&parts, 1, 3),
        task_type: join_fields(&parts, 3, 4),
        attempt_num: join_fields(&parts, 5, 6),
        task_num: join_fields(&parts, 4, 5),
    }
}

/// Sort records so the most recent come first.
///
/// The sort is stable: records with equal keys keep their input order.
/// Records themselves are not modified.
pub fn sort_by_recency<T: AsRef<IdRecord>>(mut records: Vec<T>) -> Vec<T> {
    records.sort_by_cached_key(|r| Reverse(recency_key(r.as_ref())));
    records
}

// =============================================================================
// Implied IDs
// =============================================================================

/// Fill in `task_id` from `attempt_id`, then `job_id` from `task_id`.
///
/// Only absent or empty fields are filled; existing values are never
/// overwritten, even if they disagree with the more specific ID. Calling
/// this twice has the same effect as calling it once.
///
/// `application_id` and `container_id` belong to the resource manager's
/// namespace and cannot be derived from job IDs.
pub fn add_implied_ids(record: &mut IdRecord) -> &mut IdRecord {
    if record.is_missing(IdKind::TaskId) {
        if let Some(task_id) = record.get(IdKind::AttemptId).map(attempt_id_to_task_id) {
            record.set(IdKind::TaskId, task_id);
        }
    }

    if record.is_missing(IdKind::JobId) {
        if let Some(job_id) = record.get(IdKind::TaskId).map(task_id_to_job_id) {
            record.set(IdKind::JobId, job_id);
        }
    }

    record
}

/// Convert e.g. `attempt_201601081945_0005_m_000005_0`
/// to `task_201601081945_0005_m_000005`.
pub fn attempt_id_to_task_id(attempt_id: &str) -> String {
    let parts: Vec<&str> = attempt_id.split(ID_FIELD_SEPARATOR).collect();
    format!("{TASK_ID_PREFIX}{}", join_fields(&parts, 1, 5))
}

/// Convert e.g. `task_201601081945_0005_m_000005`
/// to `job_201601081945_0005`.
pub fn task_id_to_job_id(task_id: &str) -> String {
    let parts: Vec<&str> = task_id.split(ID_FIELD_SEPARATOR).collect();
    format!("{JOB_ID_PREFIX}{}", join_fields(&parts, 1, 3))
}

/// Join `parts[start..end]` with `_`, clamping the range to the slice.
fn join_fields(parts: &[&str], start: usize, end: usize) -> String {
    let end = end.min(parts.len());
    let start = start.min(end);
    parts[start..end].join("_")
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn attempt(id: &str) -> IdRecord {
        IdRecord::new().with(IdKind::AttemptId, id)
    }

    #[test]
    fn test_key_splits_attempt_id() {
        let key = recency_key(&attempt("attempt_201601081945_0005_m_000005_3"));
        assert_eq!(key.timestamp_and_step, "201601081945_0005");
        assert_eq!(key.task_type, "m");
        assert_eq!(key.task_num, "000005");
        assert_eq!(key.attempt_num, "3");
        assert_eq!(key.application_id, "");
    }

    #[test]
    fn test_key_prefers_attempt_over_task_and_job() {
        let record = IdRecord::new()
            .with(IdKind::JobId, "job_201601081945_0001")
            .with(IdKind::TaskId, "task_201601081945_0002_r_000001")
            .with(IdKind::AttemptId, "attempt_201601081945_0003_m_000007_1");
        let key = recency_key(&record);
        assert_eq!(key.timestamp_and_step, "201601081945_0003");
        assert_eq!(key.task_num, "000007");
    }

    #[test]
    fn test_key_falls_back_to_job_id() {
        let record = IdRecord::new().with(IdKind::JobId, "job_201601081945_0005");
        let key = recency_key(&record);
        assert_eq!(key.timestamp_and_step, "201601081945_0005");
        assert_eq!(key.task_type, "");
        assert_eq!(key.task_num, "");
        assert_eq!(key.attempt_num, "");
    }

    #[test]
    fn test_key_of_empty_record_is_all_empty() {
        assert_eq!(recency_key(&IdRecord::new()), RecencyKey::default());
    }

    #[test]
    fn test_key_of_malformed_id_degrades() {
        let key = recency_key(&attempt("garbage"));
        assert_eq!(key.timestamp_and_step, "");
        assert_eq!(key.task_type, "");

        let key = recency_key(&attempt("attempt_201601081945"));
        assert_eq!(key.timestamp_and_step, "201601081945");
        assert_eq!(key.task_type, "");
    }

    #[test]
    fn test_higher_attempt_sorts_first() {
        let records = vec![
            attempt("attempt_201601081945_0005_m_000005_0"),
            attempt("attempt_201601081945_0005_m_000005_2"),
            attempt("attempt_201601081945_0005_m_000005_1"),
        ];
        let sorted = sort_by_recency(records);
        let attempts: Vec<_> = sorted
            .iter()
            .map(|r| r.attempt_id.as_deref().unwrap())
            .collect();
        assert_eq!(
            attempts,
            vec![
                "attempt_201601081945_0005_m_000005_2",
                "attempt_201601081945_0005_m_000005_1",
                "attempt_201601081945_0005_m_000005_0",
            ]
        );
    }

    #[test]
    fn test_attempt_num_dominates_task_num() {
        // Task 1 attempt 3 is "later" than task 9 attempt 0.
        let sorted = sort_by_recency(vec![
            attempt("attempt_201601081945_0005_m_000009_0"),
            attempt("attempt_201601081945_0005_m_000001_3"),
        ]);
        assert_eq!(
            sorted[0].attempt_id.as_deref(),
            Some("attempt_201601081945_0005_m_000001_3")
        );
    }

    #[test]
    fn test_reduce_sorts_before_map_in_descending_order() {
        let sorted = sort_by_recency(vec![
            attempt("attempt_201601081945_0005_m_000000_0"),
            attempt("attempt_201601081945_0005_r_000000_0"),
        ]);
        assert_eq!(sorted[0].attempt_id.as_deref().unwrap().split('_').nth(3), Some("r"));
    }

    #[test]
    fn test_application_id_dominates() {
        let older_job_newer_app = IdRecord::new()
            .with(IdKind::ApplicationId, "application_1452815622929_0002")
            .with(IdKind::JobId, "job_201601081945_0001");
        let newer_job_older_app = IdRecord::new()
            .with(IdKind::ApplicationId, "application_1452815622929_0001")
            .with(IdKind::JobId, "job_201601081945_0009");
        let sorted = sort_by_recency(vec![newer_job_older_app, older_job_newer_app.clone()]);
        assert_eq!(sorted[0], older_job_newer_app);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let a = attempt("attempt_201601081945_0005_m_000005_0").with(IdKind::ContainerId, "");
        let b = attempt("attempt_201601081945_0005_m_000005_0");
        let sorted = sort_by_recency(vec![a.clone(), b.clone()]);
        assert_eq!(sorted, vec![a.clone(), b.clone()]);
        let sorted = sort_by_recency(vec![b.clone(), a.clone()]);
        assert_eq!(sorted, vec![b, a]);
    }

    #[test]
    fn test_records_without_ids_sort_last() {
        let sorted = sort_by_recency(vec![
            IdRecord::new(),
            IdRecord::new().with(IdKind::JobId, "job_201601081945_0001"),
        ]);
        assert_eq!(sorted[1], IdRecord::new());
    }

    #[test]
    fn test_implied_ids_from_attempt() {
        let mut record = attempt("attempt_201601081945_0005_m_000005_0");
        add_implied_ids(&mut record);
        assert_eq!(
            record.task_id.as_deref(),
            Some("task_201601081945_0005_m_000005")
        );
        assert_eq!(record.job_id.as_deref(), Some("job_201601081945_0005"));
    }

    #[test]
    fn test_implied_job_from_task() {
        let mut record = IdRecord::new().with(IdKind::TaskId, "task_201601081945_0005_r_000002");
        add_implied_ids(&mut record);
        assert_eq!(record.job_id.as_deref(), Some("job_201601081945_0005"));
        assert_eq!(record.attempt_id, None);
    }

    #[test]
    fn test_implied_ids_idempotent() {
        let mut once = attempt("attempt_201601081945_0005_m_000005_0");
        add_implied_ids(&mut once);
        let mut twice = once.clone();
        add_implied_ids(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_implied_ids_never_overwrite() {
        let mut record = attempt("attempt_201601081945_0005_m_000005_0")
            .with(IdKind::TaskId, "task_209901010000_0001_r_000001")
            .with(IdKind::JobId, "job_209901010000_0042");
        let before = record.clone();
        add_implied_ids(&mut record);
        assert_eq!(record, before);
    }

    #[test]
    fn test_implied_ids_fill_empty_strings() {
        let mut record = attempt("attempt_201601081945_0005_m_000005_0")
            .with(IdKind::TaskId, "")
            .with(IdKind::JobId, "");
        add_implied_ids(&mut record);
        assert_eq!(
            record.task_id.as_deref(),
            Some("task_201601081945_0005_m_000005")
        );
        assert_eq!(record.job_id.as_deref(), Some("job_201601081945_0005"));
    }

    #[test]
    fn test_implied_ids_leave_resource_manager_ids_alone() {
        let mut record = IdRecord::new().with(IdKind::ContainerId, "container_1_0001_01_000002");
        add_implied_ids(&mut record);
        assert_eq!(record.application_id, None);
        assert_eq!(record.job_id, None);
    }

    #[test]
    fn test_submitted_at_parses_timestamp() {
        let key = recency_key(&attempt("attempt_201601081945_0005_m_000005_0"));
        let ts = key.submitted_at().expect("timestamp should parse");
        assert_eq!(ts.to_string(), "2016-01-08 19:45:00");

        assert!(recency_key(&IdRecord::new()).submitted_at().is_none());
        assert!(recency_key(&attempt("attempt_notatime_0005"))
            .submitted_at()
            .is_none());
    }
}
