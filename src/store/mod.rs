//! Document store seam. The production store is external; [`MemoryStore`]
//! is the reference executor used by the CLI and tests.

mod memory;
pub mod ndjson;

use bson::Document as BsonDocument;

use crate::errors::ApiError;
use crate::query::{QueryExpression, UpdateDoc, UpdateReport};
use crate::types::ListingId;

pub use memory::MemoryStore;

pub trait ListingStore: Send + Sync {
    /// Execute a query expression and return the matching documents,
    /// projected as the expression asks.
    fn find(&self, expr: &QueryExpression) -> Result<Vec<BsonDocument>, ApiError>;

    /// Apply `update` to the listing with this id. `matched` is 0 when no
    /// such listing exists.
    fn update_one(&self, id: ListingId, update: &UpdateDoc) -> Result<UpdateReport, ApiError>;
}

impl<S: ListingStore + ?Sized> ListingStore for std::sync::Arc<S> {
    fn find(&self, expr: &QueryExpression) -> Result<Vec<BsonDocument>, ApiError> {
        (**self).find(expr)
    }

    fn update_one(&self, id: ListingId, update: &UpdateDoc) -> Result<UpdateReport, ApiError> {
        (**self).update_one(id, update)
    }
}
