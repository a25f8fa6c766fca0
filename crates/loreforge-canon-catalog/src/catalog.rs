use std::collections::BTreeMap;

use loreforge_canon_types::{ContentKind, EntityId};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// An established canon entity: a character, location, arc, or lore fact
/// prior contributions have made part of the shared universe.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanonEntity {
    pub id: EntityId,
    pub kind: ContentKind,
    pub name: String,
    /// Locked entities may not have their core facts altered by ordinary
    /// contributions; touching one forces primary-canon review.
    pub locked: bool,
    pub time_period: Option<EntityId>,
    pub region: Option<EntityId>,
    /// Recorded core facts, keyed by trait name (`origin`, `allegiance`, ...).
    pub traits: BTreeMap<String, String>,
}

impl CanonEntity {
    pub fn new(id: EntityId, kind: ContentKind, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            locked: false,
            time_period: None,
            region: None,
            traits: BTreeMap::new(),
        }
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    pub fn in_period(mut self, period: EntityId) -> Self {
        self.time_period = Some(period);
        self
    }

    pub fn in_region(mut self, region: EntityId) -> Self {
        self.region = Some(region);
        self
    }

    pub fn with_trait(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.traits.insert(name.into(), value.into());
        self
    }
}

/// A span of in-world years. Half-open: `end_year` is excluded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimePeriod {
    pub id: EntityId,
    pub name: String,
    pub start_year: i64,
    pub end_year: i64,
}

impl TimePeriod {
    pub fn overlaps(&self, other: &TimePeriod) -> bool {
        self.start_year < other.end_year && other.start_year < self.end_year
    }
}

/// A named area of the world map, with explicit connections to the regions
/// reachable from it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: EntityId,
    pub name: String,
    pub connected: Vec<EntityId>,
}

/// A world-consistency rule with deterministic lexical teeth: content must
/// not assert any of the forbidden terms.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldLaw {
    pub id: String,
    pub statement: String,
    pub forbidden_terms: Vec<String>,
}

/// Moderation policy. Banned terms are hard policy violations; restricted
/// terms are soft cautions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModerationPolicy {
    pub banned_terms: Vec<String>,
    pub restricted_terms: Vec<String>,
}

/// Immutable view of established canon for one validation run.
///
/// Loaded once, shared read-only across concurrent checks. Checks must be
/// deterministic given the same snapshot; that is what makes the audit
/// trail reproducible.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    entities: BTreeMap<EntityId, CanonEntity>,
    time_periods: BTreeMap<EntityId, TimePeriod>,
    regions: BTreeMap<EntityId, Region>,
    laws: Vec<WorldLaw>,
    moderation: ModerationPolicy,
}

impl CatalogSnapshot {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    pub fn entity(&self, id: &EntityId) -> Option<&CanonEntity> {
        self.entities.get(id)
    }

    pub fn is_locked(&self, id: &EntityId) -> bool {
        self.entities.get(id).map(|e| e.locked).unwrap_or(false)
    }

    pub fn entities_of_kind(&self, kind: ContentKind) -> impl Iterator<Item = &CanonEntity> {
        self.entities.values().filter(move |e| e.kind == kind)
    }

    pub fn time_period(&self, id: &EntityId) -> Option<&TimePeriod> {
        self.time_periods.get(id)
    }

    /// The time period an entity is anchored to, if it has one.
    pub fn period_of(&self, entity: &EntityId) -> Option<&TimePeriod> {
        self.entities
            .get(entity)
            .and_then(|e| e.time_period.as_ref())
            .and_then(|p| self.time_periods.get(p))
    }

    pub fn region(&self, id: &EntityId) -> Option<&Region> {
        self.regions.get(id)
    }

    pub fn region_of(&self, entity: &EntityId) -> Option<&Region> {
        self.entities
            .get(entity)
            .and_then(|e| e.region.as_ref())
            .and_then(|r| self.regions.get(r))
    }

    /// Whether two regions are the same or explicitly connected (in either
    /// direction).
    pub fn regions_adjacent(&self, a: &EntityId, b: &EntityId) -> bool {
        if a == b {
            return true;
        }
        let connected = |from: &EntityId, to: &EntityId| {
            self.regions
                .get(from)
                .map(|r| r.connected.contains(to))
                .unwrap_or(false)
        };
        connected(a, b) || connected(b, a)
    }

    pub fn laws(&self) -> &[WorldLaw] {
        &self.laws
    }

    pub fn moderation_policy(&self) -> &ModerationPolicy {
        &self.moderation
    }
}

/// Assembles a [`CatalogSnapshot`], rejecting duplicate IDs and dangling
/// period/region references at build time rather than during a run.
#[derive(Default)]
pub struct CatalogBuilder {
    entities: Vec<CanonEntity>,
    time_periods: Vec<TimePeriod>,
    regions: Vec<Region>,
    laws: Vec<WorldLaw>,
    moderation: ModerationPolicy,
}

impl CatalogBuilder {
    pub fn entity(mut self, entity: CanonEntity) -> Self {
        self.entities.push(entity);
        self
    }

    pub fn time_period(
        mut self,
        id: EntityId,
        name: impl Into<String>,
        start_year: i64,
        end_year: i64,
    ) -> Self {
        self.time_periods.push(TimePeriod {
            id,
            name: name.into(),
            start_year,
            end_year,
        });
        self
    }

    pub fn region(mut self, id: EntityId, name: impl Into<String>, connected: Vec<EntityId>) -> Self {
        self.regions.push(Region {
            id,
            name: name.into(),
            connected,
        });
        self
    }

    pub fn law(
        mut self,
        id: impl Into<String>,
        statement: impl Into<String>,
        forbidden_terms: Vec<String>,
    ) -> Self {
        self.laws.push(WorldLaw {
            id: id.into(),
            statement: statement.into(),
            forbidden_terms,
        });
        self
    }

    pub fn moderation(mut self, policy: ModerationPolicy) -> Self {
        self.moderation = policy;
        self
    }

    pub fn build(self) -> Result<CatalogSnapshot, CatalogError> {
        let mut time_periods = BTreeMap::new();
        for period in self.time_periods {
            if time_periods.contains_key(&period.id) {
                return Err(CatalogError::DuplicateTimePeriod(period.id));
            }
            time_periods.insert(period.id.clone(), period);
        }

        let mut regions = BTreeMap::new();
        for region in self.regions {
            if regions.contains_key(&region.id) {
                return Err(CatalogError::DuplicateRegion(region.id));
            }
            regions.insert(region.id.clone(), region);
        }

        let mut entities = BTreeMap::new();
        for entity in self.entities {
            if entities.contains_key(&entity.id) {
                return Err(CatalogError::DuplicateEntity(entity.id));
            }
            if let Some(period) = &entity.time_period {
                if !time_periods.contains_key(period) {
                    return Err(CatalogError::UnknownTimePeriod {
                        entity: entity.id.clone(),
                        period: period.clone(),
                    });
                }
            }
            if let Some(region) = &entity.region {
                if !regions.contains_key(region) {
                    return Err(CatalogError::UnknownRegion {
                        entity: entity.id.clone(),
                        region: region.clone(),
                    });
                }
            }
            entities.insert(entity.id.clone(), entity);
        }

        let mut law_ids = std::collections::BTreeSet::new();
        for law in &self.laws {
            if !law_ids.insert(law.id.clone()) {
                return Err(CatalogError::DuplicateLaw(law.id.clone()));
            }
        }

        Ok(CatalogSnapshot {
            entities,
            time_periods,
            regions,
            laws: self.laws,
            moderation: self.moderation,
        })
    }
}
