use affito::filter::{FilterOptions, PostFilter, build, refine};
use affito::store::{ListingStore, MemoryStore};
use bson::{Document, doc};
use proptest::prelude::*;

fn arb_options() -> impl Strategy<Value = FilterOptions> {
    (
        proptest::option::of(0.0f64..1000.0),
        proptest::option::of(0.0f64..1000.0),
        proptest::option::of(-1i64..3),
        proptest::option::of(prop_oneof![Just("empty".to_string()), Just("Sì".to_string()), "[a-z]{0,4}"]),
        proptest::option::of(".{0,6}"),
        proptest::option::of(0i64..2),
    )
        .prop_map(|(price_min, price_max, state, elevator, floor, accesso)| {
            let body = serde_json::json!({
                "priceMin": price_min,
                "priceMax": price_max,
                "stateMaloi": state,
                "elevator": elevator,
                "floor": floor,
                "accessoDisabili": accesso,
            });
            FilterOptions::from_json(&body).unwrap()
        })
}

fn listing(id: i32, floor: &str, access: i32, other: i32) -> Document {
    doc! {
        "_id": id,
        "price": id * 10,
        "realEstate": {"properties": {
            "floor": floor,
            "primaryFeatures": [{"name": "Accesso per disabili", "value": access}, {"name": "x", "value": other}]
        }}
    }
}

proptest! {
    #[test]
    fn prop_build_is_deterministic(opts in arb_options()) {
        prop_assert_eq!(build(&opts), build(&opts.clone()));
    }

    #[test]
    fn prop_refine_keeps_an_ordered_subsequence(
        rows in proptest::collection::vec((0i32..2, 0i32..2), 0..30),
        level in 0i64..2,
    ) {
        let docs: Vec<Document> = rows
            .iter()
            .zip(1..)
            .map(|(&(a, o), id)| listing(id, "1", a, o))
            .collect();
        let p = PostFilter::PrimaryFeature { name: "Accesso per disabili".into(), value: level };
        let out = refine(docs.clone(), Some(&p));
        let mut it = docs.iter();
        for d in &out {
            prop_assert!(it.any(|x| x == d));
            prop_assert!(p.matches(d));
        }
        let expected = docs.iter().filter(|d| p.matches(d)).count();
        prop_assert_eq!(out.len(), expected);
    }

    #[test]
    fn prop_floor_text_matches_literally(needle in ".{1,8}", prefix in "[a-z ]{0,4}", suffix in "[a-z ]{0,4}") {
        let haystack = format!("{prefix}{needle}{suffix}");
        let store = MemoryStore::from_documents(vec![listing(1, &haystack, 0, 0), listing(2, "zzzz", 0, 0)]).unwrap();
        let body = serde_json::json!({"floor": needle});
        let found = store.find(&build(&FilterOptions::from_json(&body).unwrap()).expr).unwrap();
        prop_assert!(found.iter().any(|d| d.get_i32("_id").ok() == Some(1)));
    }
}
