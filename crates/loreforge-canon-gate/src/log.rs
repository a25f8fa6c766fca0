use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use loreforge_canon_types::{
    CanonLane, CheckResult, Classification, ConflictReport, ContentKey, ContentSubmission,
    CreatorId, Reconciliation, RecordId,
};
use serde::{Deserialize, Serialize};

use crate::error::LogError;

/// What a pipeline run (or a reviewer) ultimately decided.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FinalDecision {
    Published { lane: CanonLane },
    ReviewQueued { proposed_lane: Option<CanonLane> },
    Rejected { reason: Option<String> },
}

/// Who produced a decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionSource {
    Pipeline,
    Reviewer,
}

/// Durable audit snapshot of one pipeline run: inputs, every check
/// result, the conflict report, reconciliations applied, and the final
/// decision.
///
/// Never mutated after creation. A resubmission creates a new record, not
/// an update.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationRecord {
    pub record_id: RecordId,
    pub submission: ContentSubmission,
    pub check_results: Vec<CheckResult>,
    pub report: ConflictReport,
    pub reconciliations: Vec<Reconciliation>,
    pub decision: FinalDecision,
    pub source: DecisionSource,
    pub recorded_at: DateTime<Utc>,
}

impl ValidationRecord {
    pub fn new(
        submission: ContentSubmission,
        check_results: Vec<CheckResult>,
        report: ConflictReport,
        reconciliations: Vec<Reconciliation>,
        decision: FinalDecision,
        source: DecisionSource,
    ) -> Self {
        Self {
            record_id: RecordId::new(),
            submission,
            check_results,
            report,
            reconciliations,
            decision,
            source,
            recorded_at: Utc::now(),
        }
    }

    pub fn key(&self) -> &ContentKey {
        &self.submission.key
    }
}

/// Filter for querying the validation log.
#[derive(Clone, Debug, Default)]
pub struct RecordFilter {
    pub key: Option<ContentKey>,
    pub creator: Option<CreatorId>,
    pub classification: Option<Classification>,
    pub since: Option<DateTime<Utc>>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, key: ContentKey) -> Self {
        self.key = Some(key);
        self
    }

    pub fn with_creator(mut self, creator: CreatorId) -> Self {
        self.creator = Some(creator);
        self
    }

    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.classification = Some(classification);
        self
    }

    pub fn with_since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn matches(&self, record: &ValidationRecord) -> bool {
        if let Some(ref key) = self.key {
            if record.key() != key {
                return false;
            }
        }
        if let Some(ref creator) = self.creator {
            if record.submission.creator != *creator {
                return false;
            }
        }
        if let Some(classification) = self.classification {
            if record.report.classification != classification {
                return false;
            }
        }
        if let Some(since) = self.since {
            if record.recorded_at < since {
                return false;
            }
        }
        true
    }
}

/// Append-only store for validation records. The pipeline never updates
/// or deletes a record once appended.
#[async_trait]
pub trait ValidationLogStore: Send + Sync {
    async fn append(&self, record: ValidationRecord) -> Result<(), LogError>;

    /// The most recent record for a content key.
    async fn latest_for(&self, key: &ContentKey) -> Result<Option<ValidationRecord>, LogError>;

    async fn query(&self, filter: &RecordFilter) -> Result<Vec<ValidationRecord>, LogError>;
}

/// In-process validation log. The only mutation is `append`; no update or
/// delete operations exist.
pub struct MemoryValidationLog {
    records: Mutex<Vec<ValidationRecord>>,
}

impl MemoryValidationLog {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().expect("log mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryValidationLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ValidationLogStore for MemoryValidationLog {
    async fn append(&self, record: ValidationRecord) -> Result<(), LogError> {
        self.records
            .lock()
            .expect("log mutex poisoned")
            .push(record);
        Ok(())
    }

    async fn latest_for(&self, key: &ContentKey) -> Result<Option<ValidationRecord>, LogError> {
        let records = self.records.lock().expect("log mutex poisoned");
        Ok(records.iter().rev().find(|r| r.key() == key).cloned())
    }

    async fn query(&self, filter: &RecordFilter) -> Result<Vec<ValidationRecord>, LogError> {
        let records = self.records.lock().expect("log mutex poisoned");
        Ok(records.iter().filter(|r| filter.matches(r)).cloned().collect())
    }
}
