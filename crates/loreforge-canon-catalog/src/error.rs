use loreforge_canon_types::EntityId;
use thiserror::Error;

/// Errors raised while assembling a catalog snapshot.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("duplicate canon entity: {0}")]
    DuplicateEntity(EntityId),

    #[error("duplicate time period: {0}")]
    DuplicateTimePeriod(EntityId),

    #[error("duplicate region: {0}")]
    DuplicateRegion(EntityId),

    #[error("duplicate world law: {0}")]
    DuplicateLaw(String),

    #[error("entity {entity} references unknown time period {period}")]
    UnknownTimePeriod { entity: EntityId, period: EntityId },

    #[error("entity {entity} references unknown region {region}")]
    UnknownRegion { entity: EntityId, region: EntityId },
}
