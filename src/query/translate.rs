//! Rendering of a [`QueryExpression`] into the MongoDB filter and
//! aggregation-pipeline shapes a Mongo adapter sends over the wire.

use bson::{Bson, Document as BsonDocument, doc};

use super::types::{CmpOp, Filter, QueryExpression};

enum PathCond {
    Plain(Bson),
    Ops(BsonDocument),
}

impl PathCond {
    fn into_bson(self) -> Bson {
        match self {
            Self::Plain(v) => v,
            Self::Ops(d) => Bson::Document(d),
        }
    }
}

#[derive(Default)]
struct MatchBuilder {
    paths: Vec<(String, PathCond)>,
    overflow: Vec<BsonDocument>,
}

impl MatchBuilder {
    fn add(&mut self, f: &Filter) {
        match f {
            Filter::True => {}
            Filter::And(fs) => fs.iter().for_each(|f| self.add(f)),
            Filter::Exists { path, exists } => self.add_ops(path, doc! {"$exists": *exists}),
            Filter::Cmp { path, op: CmpOp::Eq, value } => self.add_plain(path, value.clone()),
            Filter::Cmp { path, op: CmpOp::Gte, value } => self.add_ops(path, doc! {"$gte": value.clone()}),
            Filter::Cmp { path, op: CmpOp::Lte, value } => self.add_ops(path, doc! {"$lte": value.clone()}),
            Filter::Nin { path, values } => match values.as_slice() {
                [one] => self.add_ops(path, doc! {"$ne": one.clone()}),
                many => self.add_ops(path, doc! {"$nin": many.to_vec()}),
            },
            Filter::Regex { path, pattern, case_insensitive } => {
                let mut ops = doc! {"$regex": pattern.as_str()};
                if *case_insensitive {
                    ops.insert("$options", "i");
                }
                self.add_ops(path, ops);
            }
        }
    }

    fn slot(&mut self, path: &str) -> Option<&mut PathCond> {
        self.paths.iter_mut().find(|(p, _)| p == path).map(|(_, c)| c)
    }

    fn add_plain(&mut self, path: &str, value: Bson) {
        if self.slot(path).is_some() {
            self.overflow.push(doc! {path: value});
        } else {
            self.paths.push((path.to_string(), PathCond::Plain(value)));
        }
    }

    fn add_ops(&mut self, path: &str, ops: BsonDocument) {
        match self.slot(path) {
            None => self.paths.push((path.to_string(), PathCond::Ops(ops))),
            Some(PathCond::Ops(existing)) if ops.keys().all(|k| !existing.contains_key(k)) => {
                for (k, v) in ops {
                    existing.insert(k, v);
                }
            }
            Some(_) => self.overflow.push(doc! {path: ops}),
        }
    }

    fn finish(self) -> BsonDocument {
        let mut out = BsonDocument::new();
        for (path, cond) in self.paths {
            out.insert(path, cond.into_bson());
        }
        if !self.overflow.is_empty() {
            out.insert("$and", self.overflow);
        }
        out
    }
}

impl QueryExpression {
    /// The match stage as a plain Mongo `find` filter. Conditions on the same
    /// path merge into one operator document; a condition that cannot merge
    /// goes under `$and`.
    #[must_use]
    pub fn to_match_document(&self) -> BsonDocument {
        let mut b = MatchBuilder::default();
        for clause in &self.match_stage {
            b.add(clause);
        }
        b.finish()
    }

    /// `[$match, $project?]` aggregation stages.
    #[must_use]
    pub fn to_pipeline(&self) -> Vec<BsonDocument> {
        let mut stages = vec![doc! {"$match": self.to_match_document()}];
        if let Some(fields) = &self.projection {
            let mut project = BsonDocument::new();
            for f in fields {
                project.insert(f.as_str(), 1);
            }
            stages.push(doc! {"$project": project});
        }
        stages
    }
}
