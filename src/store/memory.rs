use bson::Document as BsonDocument;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::Path;

use super::{ListingStore, ndjson};
use crate::document::fields;
use crate::errors::ApiError;
use crate::query::{QueryExpression, UpdateDoc, UpdateReport, apply_update, run_query};
use crate::types::{ListingId, listing_id_of};

/// Listings held in memory, keyed by `_id`. Reads run against a snapshot of
/// the map under the read lock; updates hold the write lock, so each update
/// is atomic per document.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: RwLock<BTreeMap<ListingId, BsonDocument>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_documents<I>(docs: I) -> Result<Self, ApiError>
    where
        I: IntoIterator<Item = BsonDocument>,
    {
        let store = Self::new();
        for d in docs {
            store.insert(d)?;
        }
        Ok(store)
    }

    pub fn load(path: &Path) -> Result<Self, ApiError> {
        let docs = ndjson::load_file(path)?;
        let store = Self::from_documents(docs)?;
        log::info!("loaded {} listings from {}", store.len(), path.display());
        Ok(store)
    }

    pub fn save(&self, path: &Path) -> Result<(), ApiError> {
        let g = self.docs.read();
        ndjson::save_file(path, g.values())?;
        log::info!("saved {} listings to {}", g.len(), path.display());
        Ok(())
    }

    /// Ids are never reused: a document whose id is already present is rejected.
    pub fn insert(&self, doc: BsonDocument) -> Result<ListingId, ApiError> {
        let id = listing_id_of(&doc)
            .ok_or_else(|| ApiError::StoreFailure("listing has no integer _id".into()))?;
        let mut g = self.docs.write();
        if g.contains_key(&id) {
            return Err(ApiError::StoreFailure(format!("duplicate _id {id}")));
        }
        g.insert(id, doc);
        Ok(id)
    }

    /// Set the deletion marker. Returns false when the listing is unknown or
    /// already deleted; an existing marker is never cleared or rewritten.
    pub fn mark_deleted(&self, id: ListingId) -> bool {
        let mut g = self.docs.write();
        match g.get_mut(&id) {
            Some(d) if !d.contains_key(fields::DELETED) => {
                d.insert(fields::DELETED, true);
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn get(&self, id: ListingId) -> Option<BsonDocument> {
        self.docs.read().get(&id).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }

    /// All stored documents, deleted ones included, in id order.
    #[must_use]
    pub fn documents(&self) -> Vec<BsonDocument> {
        self.docs.read().values().cloned().collect()
    }
}

impl ListingStore for MemoryStore {
    fn find(&self, expr: &QueryExpression) -> Result<Vec<BsonDocument>, ApiError> {
        let g = self.docs.read();
        Ok(run_query(g.values(), expr))
    }

    fn update_one(&self, id: ListingId, update: &UpdateDoc) -> Result<UpdateReport, ApiError> {
        if update.set.iter().any(|(p, _)| p == fields::ID || p == fields::DELETED) {
            return Err(ApiError::StoreFailure("update may not touch _id or deleted".into()));
        }
        let mut g = self.docs.write();
        let Some(doc) = g.get_mut(&id) else {
            return Ok(UpdateReport::default());
        };
        let modified = u64::from(apply_update(doc, update));
        Ok(UpdateReport { matched: 1, modified })
    }
}
