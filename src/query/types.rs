use bson::Bson;

// Safety limits to prevent resource abuse
pub(crate) const MAX_PATH_DEPTH: usize = 32;
pub(crate) const MAX_PATH_LEN: usize = 1024;
pub(crate) const MAX_SET_VALUES: usize = 1000;
pub(crate) const MAX_PROJECTION_FIELDS: usize = 64;
pub(crate) const MAX_PATTERN_LEN: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Gte,
    Lte,
}

/// One match-stage condition. Paths are dotted and traverse arrays of
/// sub-documents the way the document store does: a clause holds when any
/// value reachable at the path satisfies it.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    True,
    And(Vec<Filter>),
    Exists { path: String, exists: bool },
    /// No reachable value is in `values` (also true when the path is absent).
    Nin { path: String, values: Vec<Bson> },
    Cmp { path: String, op: CmpOp, value: Bson },
    Regex { path: String, pattern: String, case_insensitive: bool },
}

impl Filter {
    pub fn equals(path: &str, value: impl Into<Bson>) -> Self {
        Self::Cmp { path: path.to_string(), op: CmpOp::Eq, value: value.into() }
    }

    #[must_use]
    pub fn exists(path: &str, exists: bool) -> Self {
        Self::Exists { path: path.to_string(), exists }
    }
}

/// Structured, store-agnostic query: a conjunctive match stage plus an
/// optional projection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryExpression {
    pub match_stage: Vec<Filter>,
    pub projection: Option<Vec<String>>,
}

impl QueryExpression {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one clause; clauses are ANDed.
    pub fn push(&mut self, clause: Filter) {
        self.match_stage.push(clause);
    }

    #[must_use]
    pub fn with_projection(mut self, fields: Vec<String>) -> Self {
        self.projection = Some(fields);
        self
    }

    /// The match stage as a single filter.
    #[must_use]
    pub fn filter(&self) -> Filter {
        match self.match_stage.as_slice() {
            [] => Filter::True,
            [only] => only.clone(),
            all => Filter::And(all.to_vec()),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct UpdateDoc {
    pub set: Vec<(String, Bson)>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UpdateReport {
    pub matched: u64,
    pub modified: u64,
}
