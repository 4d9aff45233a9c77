//! # Step-Order Registry
//!
//! Optional server-side sequencing of the wizard. When enabled, step 1
//! registers its submission id as [`WorkflowStage::Step1Validated`] and
//! step 2 must present that id. A completed submission is dropped, so its
//! id cannot be replayed. Entries expire after a fixed TTL.
//!
//! Thread safety: one `parking_lot::RwLock` over the map. Reads (the
//! readiness probe, the metrics gauge) never contend with each other.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use udyam_core::{SubmissionId, TransitionError, WorkflowStage};

/// How long a step 1 submission stays valid.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Why step 2 was refused.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StepOrderError {
    /// Step 2 arrived without a submission id.
    #[error("submissionId from step 1 is required")]
    MissingSubmission,

    /// The id was never issued, already used, or expired.
    #[error("Unknown or expired submissionId. Complete step 1 first")]
    UnknownSubmission,

    /// The submission is in a stage that does not accept step 2.
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    stage: WorkflowStage,
    issued_at: Instant,
}

/// How long readiness waits for the registry lock.
pub const READINESS_LOCK_WAIT: Duration = Duration::from_millis(100);

/// In-memory map from submission id to workflow stage.
#[derive(Debug)]
pub struct StepOrderRegistry {
    entries: RwLock<HashMap<String, Entry>>,
    ttl: Duration,
}

impl Default for StepOrderRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl StepOrderRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Record a successful step 1.
    ///
    /// Expired entries are purged on the way in.
    pub fn record_step1(&self, id: &SubmissionId) -> Result<(), TransitionError> {
        let stage = WorkflowStage::AwaitingStep1.submit(1)?;
        let now = Instant::now();
        let mut entries = self.entries.write();
        entries.retain(|_, e| now.duration_since(e.issued_at) < self.ttl);
        entries.insert(
            id.as_str().to_string(),
            Entry {
                stage,
                issued_at: now,
            },
        );
        Ok(())
    }

    /// Check step 2 against the registry and retire the submission.
    ///
    /// On success the entry reaches [`WorkflowStage::Completed`] and is
    /// removed. On failure the registry is left unchanged, apart from
    /// dropping the entry if it had expired.
    pub fn complete_step2(&self, id: Option<&str>) -> Result<WorkflowStage, StepOrderError> {
        let id = id
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(StepOrderError::MissingSubmission)?;

        let mut entries = self.entries.write();
        let entry = entries
            .get(id)
            .copied()
            .ok_or(StepOrderError::UnknownSubmission)?;

        if entry.issued_at.elapsed() >= self.ttl {
            entries.remove(id);
            return Err(StepOrderError::UnknownSubmission);
        }

        let completed = entry.stage.submit(2)?;
        if completed.is_terminal() {
            entries.remove(id);
        }
        Ok(completed)
    }

    /// Stage of a live submission, if any.
    pub fn stage(&self, id: &str) -> Option<WorkflowStage> {
        let entries = self.entries.read();
        entries
            .get(id)
            .filter(|e| e.issued_at.elapsed() < self.ttl)
            .map(|e| e.stage)
    }

    /// Number of submissions awaiting step 2, expired ones included until
    /// the next purge.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a read lock can be taken within [`READINESS_LOCK_WAIT`].
    /// Used by readiness; short writes such as the step 1 purge do not
    /// count as unavailable.
    pub fn is_available(&self) -> bool {
        self.entries.try_read_for(READINESS_LOCK_WAIT).is_some()
    }
}
