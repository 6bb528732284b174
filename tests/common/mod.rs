#![allow(dead_code)]

use affito::api::ListingService;
use affito::config::AppConfig;
use affito::store::MemoryStore;
use bson::{Bson, Document, doc};

pub const REVIEWER: &str = "reviewer@aloi.it";
pub const REVIEWER_TOKEN: &str = "tok-rev";
pub const OTHER: &str = "intruder@example.com";
pub const OTHER_TOKEN: &str = "tok-other";

fn elevator(label: &str) -> Document {
    doc! {"type": "elevator", "compactLabel": label}
}

fn access(value: i32) -> Document {
    doc! {"name": "Accesso per disabili", "value": value}
}

/// Eight listings; id 6 is deleted, ids 4, 5 and 6 are unclassified.
pub fn listings() -> Vec<Document> {
    vec![
        doc! {
            "_id": 1, "stateMaloi": 1, "price": 50, "description": "Monolocale",
            "realEstate": {
                "title": "Monolocale centro",
                "properties": {
                    "floor": "105", "location": {"province": "Udine"},
                    "mainFeatures": [elevator("Sì")]
                },
                "advertiser": {"agency": {"displayName": "Casa & Co."}}
            }
        },
        doc! {
            "_id": 2, "stateMaloi": 0, "price": 150,
            "realEstate": {
                "title": "Bilocale",
                "properties": {
                    "floor": "2", "location": {"province": "Udine"},
                    "mainFeatures": [elevator("Sì"), {"type": "rooms", "compactLabel": "2 locali"}]
                },
                "advertiser": {"agency": {"displayName": "Immobiliare Rossi"}}
            }
        },
        doc! {
            "_id": 3, "stateMaloi": 2, "price": 600,
            "realEstate": {"properties": {"location": {"province": "Roma"}, "mainFeatures": [elevator("Sì")]}}
        },
        doc! {
            "_id": 4, "price": 150,
            "realEstate": {
                "properties": {
                    "floor": "Piano terra", "location": {"province": "Udine"},
                    "mainFeatures": [elevator("No")]
                }
            }
        },
        doc! {
            "_id": 5, "price": 300.5,
            "realEstate": {
                "properties": {
                    "mainFeatures": [{"type": "rooms", "compactLabel": "3 locali"}],
                    "primaryFeatures": [access(1)]
                }
            }
        },
        doc! {
            "_id": 6, "price": 200, "deleted": true,
            "realEstate": {"properties": {"mainFeatures": [elevator("Sì")], "primaryFeatures": [access(1)]}}
        },
        doc! {
            "_id": 7, "stateMaloi": 1, "price": 250,
            "realEstate": {
                "properties": {"primaryFeatures": [access(0), {"name": "Ascensore", "value": 1}]}
            }
        },
        doc! {
            "_id": 8, "stateMaloi": 0, "price": Bson::Int64(400),
            "realEstate": {
                "properties": {
                    "floor": "1.5", "mainFeatures": [elevator("Sì")],
                    "primaryFeatures": [access(1)]
                },
                "advertiser": {"agency": {"displayName": "A+B Immobili"}}
            }
        },
    ]
}

pub fn store() -> MemoryStore {
    MemoryStore::from_documents(listings()).unwrap()
}

pub fn config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.review.authorized_email = Some(REVIEWER.into());
    cfg.auth.tokens.insert(REVIEWER_TOKEN.into(), REVIEWER.into());
    cfg.auth.tokens.insert(OTHER_TOKEN.into(), OTHER.into());
    cfg
}

pub fn service() -> ListingService<MemoryStore> {
    ListingService::from_config(store(), &config())
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub fn ids(docs: &[Document]) -> Vec<i64> {
    docs.iter().map(|d| affito::types::listing_id_of(d).unwrap()).collect()
}

pub fn json_ids(data: &serde_json::Value) -> Vec<i64> {
    data.as_array().unwrap().iter().map(|d| d["_id"].as_i64().unwrap()).collect()
}
