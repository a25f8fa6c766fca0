//! Rule Catalog: the established canon facts the consistency checks read.
//!
//! A [`CatalogSnapshot`] is assembled once (via [`CatalogBuilder`]) and is
//! immutable for the duration of a validation run, so concurrent checks can
//! share it freely and every run is reproducible against the snapshot it
//! saw.

pub mod catalog;
pub mod error;

pub use catalog::{
    CanonEntity, CatalogBuilder, CatalogSnapshot, ModerationPolicy, Region, TimePeriod, WorldLaw,
};
pub use error::CatalogError;
