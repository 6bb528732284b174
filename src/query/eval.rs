use bson::{Bson, Document as BsonDocument};
use regex::Regex;
use std::cmp::Ordering;

use super::types::{CmpOp, Filter, MAX_PATH_DEPTH, MAX_PATH_LEN, MAX_PATTERN_LEN, MAX_SET_VALUES};

/// A filter prepared for scanning: regex clauses are compiled up front so a
/// scan builds each pattern once, and a rejected pattern is reported once.
#[derive(Debug)]
pub struct CompiledFilter<'f> {
    node: Node<'f>,
}

#[derive(Debug)]
enum Node<'f> {
    Leaf(&'f Filter),
    And(Vec<Node<'f>>),
    /// `None` when the pattern was rejected; the clause then matches nothing.
    Regex { path: &'f str, re: Option<Regex> },
}

impl<'f> CompiledFilter<'f> {
    pub fn new(filter: &'f Filter) -> Self {
        Self { node: compile_node(filter) }
    }

    #[must_use]
    pub fn matches(&self, doc: &BsonDocument) -> bool {
        eval_node(doc, &self.node)
    }
}

fn compile_node(filter: &Filter) -> Node<'_> {
    match filter {
        Filter::And(fs) => Node::And(fs.iter().map(compile_node).collect()),
        Filter::Regex { path, pattern, case_insensitive } => {
            Node::Regex { path, re: compile_pattern(path, pattern, *case_insensitive) }
        }
        leaf => Node::Leaf(leaf),
    }
}

fn compile_pattern(path: &str, pattern: &str, case_insensitive: bool) -> Option<Regex> {
    let rejected = |reason: String| {
        log::warn!("pattern on {path} rejected: {reason}; clause matches nothing");
        crate::bench!({"bench": "query", "op": "pattern_rejected", "path": path});
    };
    if pattern.len() > MAX_PATTERN_LEN {
        rejected(format!("exceeds {MAX_PATTERN_LEN} bytes"));
        return None;
    }
    match regex::RegexBuilder::new(pattern).case_insensitive(case_insensitive).build() {
        Ok(re) => Some(re),
        Err(e) => {
            rejected(e.to_string());
            None
        }
    }
}

fn eval_node(doc: &BsonDocument, node: &Node<'_>) -> bool {
    match node {
        Node::Leaf(f) => eval_leaf(doc, f),
        Node::And(ns) => ns.iter().all(|n| eval_node(doc, n)),
        Node::Regex { re: None, .. } => false,
        Node::Regex { path, re: Some(re) } => {
            candidates(doc, path).any(|v| matches!(v, Bson::String(s) if re.is_match(s)))
        }
    }
}

fn eval_leaf(doc: &BsonDocument, filter: &Filter) -> bool {
    match filter {
        Filter::True => true,
        Filter::Exists { path, exists } => !resolve_path(doc, path).is_empty() == *exists,
        Filter::Nin { path, values } => !candidates(doc, path)
            .any(|v| values.iter().take(MAX_SET_VALUES).any(|x| bson_eq(v, x))),
        Filter::Cmp { path, op, value } => candidates(doc, path).any(|v| match op {
            CmpOp::Eq => bson_eq(v, value),
            CmpOp::Gte => matches!(compare_bracketed(v, value), Some(Ordering::Greater | Ordering::Equal)),
            CmpOp::Lte => matches!(compare_bracketed(v, value), Some(Ordering::Less | Ordering::Equal)),
        }),
        Filter::And(_) | Filter::Regex { .. } => CompiledFilter::new(filter).matches(doc),
    }
}

/// Evaluate one filter against one document. Scans over many documents
/// should build a [`CompiledFilter`] once instead.
pub fn eval_filter(doc: &BsonDocument, filter: &Filter) -> bool {
    CompiledFilter::new(filter).matches(doc)
}

/// Values stored at a dotted path. Arrays met on the way fan out over their
/// sub-document elements; the value at the final segment is returned as is.
pub fn resolve_path<'a>(doc: &'a BsonDocument, path: &str) -> Vec<&'a Bson> {
    let mut out = Vec::new();
    if path.is_empty() || path.len() > MAX_PATH_LEN {
        return out;
    }
    let segs: Vec<&str> = path.split('.').collect();
    if segs.len() > MAX_PATH_DEPTH {
        return out;
    }
    walk(doc, &segs, &mut out);
    out
}

fn walk<'a>(doc: &'a BsonDocument, segs: &[&str], out: &mut Vec<&'a Bson>) {
    let Some((head, rest)) = segs.split_first() else {
        return;
    };
    let Some(v) = doc.get(*head) else {
        return;
    };
    if rest.is_empty() {
        out.push(v);
        return;
    }
    match v {
        Bson::Document(d) => walk(d, rest, out),
        Bson::Array(items) => {
            for item in items {
                if let Bson::Document(d) = item {
                    walk(d, rest, out);
                }
            }
        }
        _ => {}
    }
}

/// Comparison candidates: resolved values, with arrays at the leaf
/// contributing each element.
fn candidates<'a>(doc: &'a BsonDocument, path: &str) -> impl Iterator<Item = &'a Bson> {
    resolve_path(doc, path).into_iter().flat_map(|v| match v {
        Bson::Array(items) => items.iter().collect::<Vec<_>>(),
        other => vec![other],
    })
}

/// Strict dotted-path lookup through sub-documents only.
pub fn get_path<'a>(doc: &'a BsonDocument, path: &str) -> Option<&'a Bson> {
    let mut cur = doc;
    let mut iter = path.split('.').take(MAX_PATH_DEPTH).peekable();
    while let Some(seg) = iter.next() {
        let v = cur.get(seg)?;
        if iter.peek().is_none() {
            return Some(v);
        }
        match v {
            Bson::Document(d) => cur = d,
            _ => return None,
        }
    }
    None
}

/// Insert `value` at a dotted path, creating or replacing intermediate
/// sub-documents. Returns true when the stored value changed.
pub fn set_path(root: &mut BsonDocument, path: &str, value: Bson) -> bool {
    let mut segs: Vec<&str> = path.split('.').collect();
    let Some(last) = segs.pop() else {
        return false;
    };
    let mut cur = root;
    for seg in segs {
        if !matches!(cur.get(seg), Some(Bson::Document(_))) {
            cur.insert(seg, Bson::Document(BsonDocument::new()));
        }
        cur = match cur.get_mut(seg) {
            Some(Bson::Document(d)) => d,
            _ => return false,
        };
    }
    let old = cur.insert(last, value.clone());
    old.as_ref() != Some(&value)
}

fn is_num(v: &Bson) -> bool {
    matches!(v, Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_))
}

#[allow(clippy::cast_precision_loss)]
pub fn as_f64(v: &Bson) -> Option<f64> {
    match v {
        Bson::Int32(i) => Some(f64::from(*i)),
        Bson::Int64(i) => Some(*i as f64),
        Bson::Double(f) => Some(*f),
        _ => None,
    }
}

/// Equality with numbers compared by value across Int32/Int64/Double.
pub fn bson_eq(a: &Bson, b: &Bson) -> bool {
    if is_num(a) && is_num(b) {
        return compare_bracketed(a, b) == Some(Ordering::Equal);
    }
    a == b
}

/// Ordering within one type bracket (numbers, strings, booleans); values of
/// different brackets are incomparable and never satisfy a range clause.
pub fn compare_bracketed(a: &Bson, b: &Bson) -> Option<Ordering> {
    match (a, b) {
        (Bson::Int32(x), Bson::Int32(y)) => Some(x.cmp(y)),
        (Bson::Int64(x), Bson::Int64(y)) => Some(x.cmp(y)),
        (Bson::String(x), Bson::String(y)) => Some(x.cmp(y)),
        (Bson::Boolean(x), Bson::Boolean(y)) => Some(x.cmp(y)),
        _ => match (as_f64(a), as_f64(b)) {
            (Some(x), Some(y)) => x.partial_cmp(&y),
            _ => None,
        },
    }
}

/// Keep only the listed (possibly dotted) fields, preserving their nesting.
pub fn project_fields(doc: &BsonDocument, fields: &[String]) -> BsonDocument {
    let mut out = BsonDocument::new();
    for f in fields {
        if let Some(v) = get_path(doc, f) {
            set_path(&mut out, f, v.clone());
        }
    }
    out
}
