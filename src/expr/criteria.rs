//! Criteria container: one complete query description
//!
//! Builder-style construction; consumers borrow criteria immutably.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::predicate::Predicate;
use super::sort::SortKey;

/// How a criteria's predicates combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Combinator {
    And,
    Or,
}

impl Combinator {
    /// SQL infix token for this combinator, with surrounding spaces
    pub fn sql_infix(&self) -> &'static str {
        match self {
            Combinator::And => " AND ",
            Combinator::Or => " OR ",
        }
    }
}

/// A full query description: predicates, sort keys, pagination.
///
/// An empty predicate list matches every row. Absent `offset`/`limit` mean
/// "unbounded". Sort key order defines lexicographic precedence — the first
/// key is primary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    pub combinator: Combinator,
    pub predicates: Vec<Predicate>,
    pub sort_keys: Vec<SortKey>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl Criteria {
    /// Criteria whose predicates must all hold (AND)
    pub fn all() -> Self {
        Self::with_combinator(Combinator::And)
    }

    /// Criteria where any predicate suffices (OR)
    pub fn any() -> Self {
        Self::with_combinator(Combinator::Or)
    }

    fn with_combinator(combinator: Combinator) -> Self {
        Self {
            combinator,
            predicates: Vec::new(),
            sort_keys: Vec::new(),
            offset: None,
            limit: None,
        }
    }

    /// Appends a predicate
    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Appends a sort key (first key added is the primary sort)
    pub fn with_sort_key(mut self, key: SortKey) -> Self {
        self.sort_keys.push(key);
        self
    }

    /// Sets the pagination offset (rows to skip after filtering and sorting)
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets the pagination limit
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// True when this criteria matches every row
    pub fn is_unfiltered(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Structural fingerprint of the criteria tree, usable as a
    /// process-local cache key. Equal trees always fingerprint equally.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        // Predicates carry serde_json values, which do not implement Hash;
        // the serialized wire form is structural and total over the tree.
        serde_json::to_string(self)
            .unwrap_or_else(|_| format!("{self:?}"))
            .hash(&mut hasher);
        hasher.finish()
    }
}

impl Default for Criteria {
    fn default() -> Self {
        Self::all()
    }
}
