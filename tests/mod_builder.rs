mod common;

use affito::filter::{ElevatorFilter, FilterOptions, StateFilter, build};
use affito::store::{ListingStore, MemoryStore};
use bson::doc;
use common::{ids, store};
use serde_json::json;

fn native_ids(opts: &FilterOptions) -> Vec<i64> {
    let compiled = build(opts);
    ids(&store().find(&compiled.expr).unwrap())
}

fn opts(body: serde_json::Value) -> FilterOptions {
    FilterOptions::from_json(&body).unwrap()
}

#[test]
fn no_options_excludes_exactly_deleted() {
    assert_eq!(native_ids(&FilterOptions::default()), vec![1, 2, 3, 4, 5, 7, 8]);
}

#[test]
fn unclassified_sentinel_selects_missing_state_only() {
    let o = FilterOptions { state: Some(StateFilter::Unclassified), ..Default::default() };
    assert_eq!(native_ids(&o), vec![4, 5]);
}

#[test]
fn state_equality() {
    assert_eq!(native_ids(&opts(json!({"stateMaloi": 0}))), vec![2, 8]);
    assert_eq!(native_ids(&opts(json!({"stateMaloi": "2"}))), vec![3]);
}

#[test]
fn price_range_and_elevator_label() {
    let store = MemoryStore::from_documents(vec![
        doc! {"_id": 10, "price": 50, "realEstate": {"properties": {"mainFeatures": [{"type": "elevator", "compactLabel": "Sì"}]}}},
        doc! {"_id": 11, "price": 150, "realEstate": {"properties": {"mainFeatures": [{"type": "elevator", "compactLabel": "Sì"}]}}},
        doc! {"_id": 12, "price": 600, "realEstate": {"properties": {"mainFeatures": [{"type": "elevator", "compactLabel": "Sì"}]}}},
        doc! {"_id": 13, "price": 150, "realEstate": {"properties": {"mainFeatures": [{"type": "elevator", "compactLabel": "No"}]}}},
    ])
    .unwrap();
    let c = build(&opts(json!({"priceMin": 100, "priceMax": 500, "elevator": "Sì"})));
    assert_eq!(ids(&store.find(&c.expr).unwrap()), vec![11]);
}

#[test]
fn single_price_bounds() {
    assert_eq!(native_ids(&opts(json!({"priceMin": 300}))), vec![3, 5, 8]);
    assert_eq!(native_ids(&opts(json!({"priceMax": "150"}))), vec![1, 2, 4]);
}

#[test]
fn elevator_absent_marker() {
    let o = FilterOptions { elevator: Some(ElevatorFilter::Absent), ..Default::default() };
    assert_eq!(native_ids(&o), vec![5, 7]);
    assert_eq!(native_ids(&opts(json!({"elevator": "No"}))), vec![4]);
}

#[test]
fn floor_is_literal_case_insensitive_substring() {
    assert_eq!(native_ids(&opts(json!({"floor": "1.5"}))), vec![8]);
    assert_eq!(native_ids(&opts(json!({"floor": "TERRA"}))), vec![4]);
    assert_eq!(native_ids(&opts(json!({"floor": 2}))), vec![2]);
}

#[test]
fn agent_name_is_literal() {
    assert_eq!(native_ids(&opts(json!({"agentName": "a+b"}))), vec![8]);
    assert_eq!(native_ids(&opts(json!({"agentName": "casa & co"}))), vec![1]);
    assert!(native_ids(&opts(json!({"agentName": "(unclosed"}))).is_empty());
}

#[test]
fn province_is_exact() {
    assert_eq!(native_ids(&opts(json!({"province": "Udine"}))), vec![1, 2, 4]);
    assert!(native_ids(&opts(json!({"province": "udine"}))).is_empty());
}

#[test]
fn unparseable_numbers_drop_their_clause() {
    let all = native_ids(&FilterOptions::default());
    assert_eq!(native_ids(&opts(json!({"priceMin": "cheap", "stateMaloi": "x"}))), all);
}

#[test]
fn options_combine_conjunctively() {
    let o = opts(json!({"province": "Udine", "stateMaloi": 0, "elevator": "Sì"}));
    assert_eq!(native_ids(&o), vec![2]);
}
