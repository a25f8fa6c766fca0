//! Core type definitions for the Loreforge canon engine.
//!
//! This crate provides all shared canon-engine type definitions. No business
//! logic, just types. Every canon crate depends on this crate.
//!
//! The tagged unions here are closed sets on purpose: check verdicts,
//! finding severities, classifications, canon lanes, and queue statuses are
//! enumerated so the downstream lane assignment and state machine can match
//! exhaustively instead of interpreting open string fields.

pub mod finding;
pub mod ids;
pub mod report;
pub mod submission;
pub mod verdict;

// Re-export primary types at crate root for ergonomic use.
pub use finding::{CheckName, CheckResult, CheckVerdict, Finding, Severity};
pub use ids::{CreatorId, EntityId, RecordId, SubmissionId};
pub use report::{Classification, ConflictReport, FindingRef, Reconciliation};
pub use submission::{ContentKey, ContentKind, ContentSubmission, ContentSubmissionBuilder};
pub use verdict::{CanonLane, QueueStatus, ReviewDecision, Verdict};
