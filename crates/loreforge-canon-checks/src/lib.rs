//! Check Battery: the seven independent canon consistency checks.
//!
//! Each check is a pure evaluation `(submission, catalog) -> CheckResult`:
//! order-insensitive, deterministic against a catalog snapshot, and free of
//! shared mutable state, so the battery runs them concurrently. A check
//! that cannot evaluate reports `Partial` with a soft finding; a check that
//! errors, panics, or times out is degraded by the battery the same way.
//! One failing check never prevents the others from running.
//!
//! The semantic judgment behind the metaphysics and tone axes is delegated
//! to a [`ConsistencyOracle`], a pluggable capability with a fixed
//! contract and failure behavior. The bundled [`LexiconOracle`] is
//! deterministic and term-list driven.

pub mod battery;
pub mod checks;
pub mod error;
pub mod mocks;
pub mod oracle;
pub mod traits;

pub use battery::{BatteryConfig, CheckBattery};
pub use checks::{
    CharacterCheck, GeographyCheck, MetaphysicsCheck, ModerationCheck, TimelineCheck, ToneCheck,
    WorldLawCheck,
};
pub use error::{CheckError, OracleError};
pub use oracle::{LexiconOracle, LexiconRule};
pub use traits::{CanonCheck, ConsistencyOracle, OracleAssessment, OracleAxis, OracleConcern};
