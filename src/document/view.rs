use bson::{Bson, Document as BsonDocument};
use serde::{Deserialize, Serialize};

use super::fields;
use crate::query::{bson_eq, get_path};
use crate::types::{ListingId, bson_to_id};

/// Review classification stored in `stateMaloi`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(try_from = "i64", into = "i64")]
pub enum ReviewState {
    UnderReview = 0,
    Approved = 1,
    Rejected = 2,
}

impl ReviewState {
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i64> for ReviewState {
    type Error = String;

    fn try_from(v: i64) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Self::UnderReview),
            1 => Ok(Self::Approved),
            2 => Ok(Self::Rejected),
            other => Err(other.to_string()),
        }
    }
}

impl From<ReviewState> for i64 {
    fn from(s: ReviewState) -> Self {
        i64::from(s.as_i32())
    }
}

impl From<ReviewState> for Bson {
    fn from(s: ReviewState) -> Self {
        Self::Int32(s.as_i32())
    }
}

/// One `{name, value}` entry of `realEstate.properties.primaryFeatures`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimaryFeature<'a> {
    pub name: Option<&'a str>,
    pub value: Option<&'a Bson>,
}

/// Borrowed view over a listing document.
#[derive(Debug, Clone, Copy)]
pub struct Listing<'a>(&'a BsonDocument);

impl<'a> Listing<'a> {
    #[must_use]
    pub const fn new(doc: &'a BsonDocument) -> Self {
        Self(doc)
    }

    #[must_use]
    pub const fn document(&self) -> &'a BsonDocument {
        self.0
    }

    #[must_use]
    pub fn id(&self) -> Option<ListingId> {
        self.0.get(fields::ID).and_then(bson_to_id)
    }

    /// Raw `stateMaloi`, if it is an integral number.
    #[must_use]
    pub fn raw_state(&self) -> Option<i64> {
        self.0.get(fields::STATE).and_then(bson_to_id)
    }

    /// `None` means not yet classified (or an out-of-range stored value).
    #[must_use]
    pub fn state(&self) -> Option<ReviewState> {
        self.raw_state().and_then(|s| ReviewState::try_from(s).ok())
    }

    /// The deletion marker counts whatever its value is.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.0.contains_key(fields::DELETED)
    }

    #[must_use]
    pub fn price(&self) -> Option<f64> {
        self.0.get(fields::PRICE).and_then(crate::query::as_f64)
    }

    #[must_use]
    pub fn province(&self) -> Option<&'a str> {
        get_path(self.0, fields::PROVINCE).and_then(Bson::as_str)
    }

    #[must_use]
    pub fn last_update(&self) -> Option<f64> {
        self.0.get(fields::LAST_UPDATE).and_then(crate::query::as_f64)
    }

    #[must_use]
    pub fn updated_by(&self) -> Option<&'a str> {
        self.0.get(fields::UPDATED_BY).and_then(Bson::as_str)
    }

    pub fn primary_features(&self) -> impl Iterator<Item = PrimaryFeature<'a>> + use<'a> {
        get_path(self.0, fields::PRIMARY_FEATURES)
            .and_then(Bson::as_array)
            .into_iter()
            .flatten()
            .filter_map(Bson::as_document)
            .map(|d| PrimaryFeature { name: d.get_str("name").ok(), value: d.get("value") })
    }

    /// True when a single primary-feature entry carries both `name` and a
    /// value numerically equal to `value`.
    #[must_use]
    pub fn has_primary_feature(&self, name: &str, value: i64) -> bool {
        let want = Bson::Int64(value);
        self.primary_features()
            .any(|f| f.name == Some(name) && f.value.is_some_and(|v| bson_eq(v, &want)))
    }
}
