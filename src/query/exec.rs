use bson::Document as BsonDocument;

use super::eval::{CompiledFilter, project_fields, set_path};
use super::types::{MAX_PROJECTION_FIELDS, QueryExpression, UpdateDoc};

/// Run a query expression over an in-memory document set: match, then
/// project.
pub fn run_query<'a, I>(docs: I, expr: &QueryExpression) -> Vec<BsonDocument>
where
    I: IntoIterator<Item = &'a BsonDocument>,
{
    let bench_start = std::time::Instant::now();
    let filter = expr.filter();
    let matcher = CompiledFilter::new(&filter);
    let mut scanned = 0u64;
    let mut out: Vec<BsonDocument> = docs
        .into_iter()
        .inspect(|_| scanned += 1)
        .filter(|d| matcher.matches(d))
        .cloned()
        .collect();

    if let Some(fields) = &expr.projection {
        if fields.len() > MAX_PROJECTION_FIELDS {
            log::warn!("projection too long: {}", fields.len());
        }
        let fields: Vec<String> = fields.iter().take(MAX_PROJECTION_FIELDS).cloned().collect();
        for d in &mut out {
            *d = project_fields(d, &fields);
        }
    }

    crate::bench!({
        "bench": "query",
        "op": "find",
        "duration_ms": u64::try_from(bench_start.elapsed().as_millis()).unwrap_or(u64::MAX),
        "scanned": scanned,
        "result_count": out.len(),
        "clauses": expr.match_stage.len(),
    });
    out
}

/// Apply `$set` assignments in order; true when any stored value changed.
pub fn apply_update(doc: &mut BsonDocument, update: &UpdateDoc) -> bool {
    let mut changed = false;
    for (path, value) in &update.set {
        changed |= set_path(doc, path, value.clone());
    }
    changed
}
