use bson::{Bson, Document as BsonDocument};

/// Integer primary key of a listing, stored under `_id`.
pub type ListingId = i64;

pub const ID_FIELD: &str = "_id";

/// Reads an integral BSON number as a listing id. Doubles are accepted only
/// when they carry no fractional part.
#[must_use]
pub fn bson_to_id(v: &Bson) -> Option<ListingId> {
    match v {
        Bson::Int32(i) => Some(i64::from(*i)),
        Bson::Int64(i) => Some(*i),
        Bson::Double(f) => crate::utils::num::f64_to_i64_exact(*f),
        _ => None,
    }
}

#[must_use]
pub fn listing_id_of(doc: &BsonDocument) -> Option<ListingId> {
    doc.get(ID_FIELD).and_then(bson_to_id)
}

/// BSON form of an id, narrowed to Int32 when it fits so that stored and
/// generated ids compare the same way ingested JSON numbers do.
#[must_use]
pub fn id_to_bson(id: ListingId) -> Bson {
    i32::try_from(id).map_or(Bson::Int64(id), Bson::Int32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn ids_from_all_numeric_widths() {
        assert_eq!(listing_id_of(&doc! {"_id": 7}), Some(7));
        assert_eq!(listing_id_of(&doc! {"_id": 97_417_958_000_i64}), Some(97_417_958_000));
        assert_eq!(listing_id_of(&doc! {"_id": 12.0}), Some(12));
        assert_eq!(listing_id_of(&doc! {"_id": 12.5}), None);
        assert_eq!(listing_id_of(&doc! {"_id": "12"}), None);
        assert_eq!(listing_id_of(&doc! {}), None);
    }

    #[test]
    fn id_to_bson_narrows() {
        assert_eq!(id_to_bson(5), Bson::Int32(5));
        assert_eq!(id_to_bson(i64::from(i32::MAX) + 1), Bson::Int64(i64::from(i32::MAX) + 1));
    }
}
