//! Canon Gate: the decision half of the canonization pipeline.
//!
//! Check results flow in from the battery; this crate classifies them,
//! assigns a canon lane, applies non-destructive reconciliations, and
//! drives the publication state machine:
//!
//! ```text
//! received -> validating -> { published | review_needed | rejected }
//! ```
//!
//! ## Invariants
//!
//! - **At most one in flight**: a second submission for a content key
//!   while the first is validating fails with a conflict; it never races.
//! - **Supersede, never duplicate**: one live queue entry per content key;
//!   resubmission replaces the prior terminal entry.
//! - **Append-only audit**: every run writes a [`ValidationRecord`]; no
//!   update or delete operations exist on the log.
//! - **Atomic publish**: content-store visibility and the `published`
//!   queue status move together; a partial failure leaves the entry
//!   `validating` and retryable, never stuck.
//! - **Exactly-once review**: a manual decision resolves a
//!   `review_needed` entry once; later decisions are rejected.

pub mod classifier;
pub mod error;
pub mod gate;
pub mod lanes;
pub mod log;
pub mod mocks;
pub mod queue;
pub mod reconciler;
pub mod stores;

pub use classifier::{ClassifierConfig, ConflictClassifier};
pub use error::{GateError, LogError, QueueError, StoreError};
pub use gate::{CanonGate, GateConfig, StatusReport};
pub use lanes::{LaneAssigner, LaneDecision};
pub use log::{
    DecisionSource, FinalDecision, MemoryValidationLog, RecordFilter, ValidationLogStore,
    ValidationRecord,
};
pub use mocks::{FailingValidationLog, FlakyContentStore};
pub use queue::{ClaimToken, PublishingQueue, PublishingQueueEntry};
pub use reconciler::Reconciler;
pub use stores::{ContentStore, MemoryContentStore};
