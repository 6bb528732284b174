mod common;

use affito::filter::{FilterOptions, PostFilter, build, refine};
use affito::store::ListingStore;
use common::{ids, store};
use serde_json::json;

fn accessibility(level: i64) -> (Vec<i64>, Vec<i64>) {
    let compiled = build(&FilterOptions::from_json(&json!({"accessoDisabili": level})).unwrap());
    let native = store().find(&compiled.expr).unwrap();
    let native_ids = ids(&native);
    (native_ids, ids(&refine(native, compiled.post_filter.as_ref())))
}

#[test]
fn native_query_over_matches_and_refinement_tightens() {
    let (native, refined) = accessibility(1);
    // 7 has the name on one entry and the value 1 on another
    assert_eq!(native, vec![5, 7, 8]);
    assert_eq!(refined, vec![5, 8]);
}

#[test]
fn level_zero_is_a_real_value() {
    let (native, refined) = accessibility(0);
    assert_eq!(native, vec![7]);
    assert_eq!(refined, vec![7]);
}

#[test]
fn refinement_is_subset_of_native_in_order() {
    for level in [0, 1, 2] {
        let (native, refined) = accessibility(level);
        let mut it = native.iter();
        assert!(refined.iter().all(|r| it.any(|n| n == r)), "level {level}: {refined:?} not in {native:?}");
    }
}

#[test]
fn refine_without_predicate_is_identity() {
    let docs = store().documents();
    assert_eq!(ids(&refine(docs.clone(), None)), ids(&docs));
}

#[test]
fn no_accessibility_option_means_no_post_filter() {
    let compiled = build(&FilterOptions::from_json(&json!({"province": "Udine"})).unwrap());
    assert!(compiled.post_filter.is_none());
}

#[test]
fn post_filter_matches_numeric_kinds_alike() {
    let p = PostFilter::PrimaryFeature { name: "Accesso per disabili".into(), value: 1 };
    let doc = bson::doc! {
        "_id": 1,
        "realEstate": {"properties": {"primaryFeatures": [{"name": "Accesso per disabili", "value": 1.0}]}}
    };
    assert!(p.matches(&doc));
}
