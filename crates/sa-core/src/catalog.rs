//! The fetched university collection and its identifier lookup table

use std::sync::Arc;

use ahash::AHashMap;
use thiserror::Error;

use crate::data::{UniversityId, UniversityRecord};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Duplicate university id {id} at positions {first} and {second}")]
    DuplicateId {
        id: UniversityId,
        first: usize,
        second: usize,
    },
}

/// Frozen, ordered collection of universities.
///
/// Positions never change once built; `position_of` maps a stable
/// identifier back to its position in fetch order.
#[derive(Debug, Default)]
pub struct Catalog {
    records: Vec<Arc<UniversityRecord>>,
    by_id: AHashMap<UniversityId, usize>,
}

impl Catalog {
    /// Freeze a fetched collection.
    ///
    /// Every identifier must be unique, otherwise a marker could resolve to
    /// another university's position.
    pub fn new(records: Vec<UniversityRecord>) -> Result<Self, CatalogError> {
        let mut by_id = AHashMap::with_capacity(records.len());

        for (position, record) in records.iter().enumerate() {
            if let Some(&first) = by_id.get(&record.id) {
                return Err(CatalogError::DuplicateId {
                    id: record.id,
                    first,
                    second: position,
                });
            }
            by_id.insert(record.id, position);
        }

        Ok(Self {
            records: records.into_iter().map(Arc::new).collect(),
            by_id,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at a fetch-order position
    pub fn get(&self, position: usize) -> Option<&Arc<UniversityRecord>> {
        self.records.get(position)
    }

    /// Fetch-order position of an identifier
    pub fn position_of(&self, id: UniversityId) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    /// Record with the given identifier, together with its position
    pub fn find(&self, id: UniversityId) -> Option<(usize, &Arc<UniversityRecord>)> {
        let position = self.position_of(id)?;
        self.records.get(position).map(|record| (position, record))
    }

    /// Iterate records in fetch order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<UniversityRecord>> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u32, name: &str) -> UniversityRecord {
        UniversityRecord {
            id: UniversityId(id),
            name: name.to_string(),
            city: String::new(),
            country: String::new(),
            lng: 0.0,
            lat: 0.0,
            description_text: String::new(),
            languages: Vec::new(),
            rating: None,
            movers: 0,
        }
    }

    #[test]
    fn test_lookup_matches_positions() {
        let catalog = Catalog::new(vec![record(10, "A"), record(3, "B"), record(99, "C")]).unwrap();

        assert_eq!(catalog.len(), 3);
        for (position, record) in catalog.iter().enumerate() {
            assert_eq!(catalog.position_of(record.id), Some(position));
        }
        assert_eq!(catalog.position_of(UniversityId(4)), None);
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let result = Catalog::new(vec![record(1, "First"), record(2, "Other"), record(1, "Second")]);

        assert_eq!(
            result.unwrap_err(),
            CatalogError::DuplicateId {
                id: UniversityId(1),
                first: 0,
                second: 2,
            }
        );
    }
}
