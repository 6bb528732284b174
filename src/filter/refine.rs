use bson::Document as BsonDocument;

use crate::document::Listing;

/// In-memory predicate applied to store results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    /// One primary-feature entry with exactly this name and value.
    PrimaryFeature { name: String, value: i64 },
}

impl PostFilter {
    #[must_use]
    pub fn matches(&self, doc: &BsonDocument) -> bool {
        match self {
            Self::PrimaryFeature { name, value } => Listing::new(doc).has_primary_feature(name, *value),
        }
    }
}

/// Keep the documents satisfying `predicate`, in their original order.
/// Without a predicate the input is returned untouched.
#[must_use]
pub fn refine(mut docs: Vec<BsonDocument>, predicate: Option<&PostFilter>) -> Vec<BsonDocument> {
    if let Some(p) = predicate {
        docs.retain(|d| p.matches(d));
    }
    docs
}
