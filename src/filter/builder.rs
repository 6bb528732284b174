use bson::Bson;

use super::options::{ElevatorFilter, FilterOptions, StateFilter};
use super::refine::PostFilter;
use crate::document::fields;
use crate::query::{CmpOp, Filter, QueryExpression};
use crate::types::{ListingId, id_to_bson};

/// Primary-feature name carrying the disability-access level.
pub const ACCESSIBILITY_FEATURE: &str = "Accesso per disabili";

/// Fields returned by the list and statistics queries.
pub const SUMMARY_PROJECTION: [&str; 9] = [
    fields::ID,
    fields::STATE,
    fields::PRICE,
    fields::DESCRIPTION,
    fields::LAST_UPDATE,
    fields::UPDATED_BY,
    fields::TITLE,
    fields::PROPERTIES,
    fields::ADVERTISER,
];

/// Output of [`build`]: the store query plus the in-memory check the store
/// cannot express.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub expr: QueryExpression,
    pub post_filter: Option<PostFilter>,
}

fn not_deleted() -> Filter {
    Filter::exists(fields::DELETED, false)
}

fn summary_projection() -> Vec<String> {
    SUMMARY_PROJECTION.iter().map(|f| (*f).to_string()).collect()
}

/// Case-insensitive literal substring match on caller text.
fn contains_ci(path: &str, text: &str) -> Filter {
    Filter::Regex { path: path.to_string(), pattern: regex::escape(text), case_insensitive: true }
}

/// Compile filter options into a query expression. Pure: the same options
/// always produce the same expression.
#[must_use]
pub fn build(opts: &FilterOptions) -> CompiledQuery {
    let mut expr = QueryExpression::new().with_projection(summary_projection());
    expr.push(not_deleted());

    let bound = |op, v: f64| Filter::Cmp { path: fields::PRICE.to_string(), op, value: Bson::Double(v) };
    match (opts.price_min, opts.price_max) {
        (Some(lo), Some(hi)) => expr.push(Filter::And(vec![bound(CmpOp::Gte, lo), bound(CmpOp::Lte, hi)])),
        (Some(lo), None) => expr.push(bound(CmpOp::Gte, lo)),
        (None, Some(hi)) => expr.push(bound(CmpOp::Lte, hi)),
        (None, None) => {}
    }

    match opts.state {
        Some(StateFilter::Unclassified) => expr.push(Filter::exists(fields::STATE, false)),
        Some(StateFilter::Is(v)) => expr.push(Filter::equals(fields::STATE, Bson::Int64(v))),
        None => {}
    }

    match &opts.elevator {
        Some(ElevatorFilter::Absent) => expr.push(Filter::Nin {
            path: fields::MAIN_FEATURE_TYPE.to_string(),
            values: vec![Bson::String("elevator".into())],
        }),
        Some(ElevatorFilter::Label(label)) => {
            expr.push(Filter::equals(fields::MAIN_FEATURE_LABEL, label.as_str()));
        }
        None => {}
    }

    if let Some(floor) = &opts.floor {
        expr.push(contains_ci(fields::FLOOR, floor));
    }
    if let Some(agent) = &opts.agent_name {
        expr.push(contains_ci(fields::AGENCY_NAME, agent));
    }
    if let Some(province) = &opts.province {
        expr.push(Filter::equals(fields::PROVINCE, province.as_str()));
    }

    // The store can only say "some entry has the name and some entry has the
    // value"; the post-filter requires both on one entry.
    let post_filter = opts.accesso_disabili.map(|v| {
        expr.push(Filter::And(vec![
            Filter::equals(fields::PRIMARY_FEATURE_NAME, ACCESSIBILITY_FEATURE),
            Filter::equals(fields::PRIMARY_FEATURE_VALUE, Bson::Int64(v)),
        ]));
        PostFilter::PrimaryFeature { name: ACCESSIBILITY_FEATURE.to_string(), value: v }
    });

    CompiledQuery { expr, post_filter }
}

/// Every non-deleted listing, summary fields only.
#[must_use]
pub fn build_summary() -> QueryExpression {
    build(&FilterOptions::default()).expr
}

/// One non-deleted listing by id, all fields.
#[must_use]
pub fn build_by_id(id: ListingId) -> QueryExpression {
    let mut expr = QueryExpression::new();
    expr.push(Filter::equals(fields::ID, id_to_bson(id)));
    expr.push(not_deleted());
    expr
}
