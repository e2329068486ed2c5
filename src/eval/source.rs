//! Row sources: "execute criteria, get a forward-only cursor of rows"
//!
//! Whether a cursor is backed by a live SQL connection or an in-memory
//! collection is invisible to callers. [`MemorySource`] is the in-process
//! store: filtering via [`RowMatcher`], ordering via [`RowComparator`].
//!
//! The streaming/materializing split is deliberate and load-bearing: with no
//! sort keys a query streams one row at a time with no buffering; with sort
//! keys every match is materialized before the first row comes back.

use crate::expr::Criteria;
use crate::mapping::{Mapping, Row, RowLayout, TableMapping};

use super::errors::EvalResult;
use super::matcher::RowMatcher;
use super::sorter::RowComparator;

/// Forward-only cursor of rows; errors surface in-band and must not be
/// skipped over
pub type RowCursor<'a> = Box<dyn Iterator<Item = EvalResult<Row>> + 'a>;

/// Any backend that can satisfy a criteria with a cursor of rows
pub trait RowSource {
    /// Mapping metadata for this source's record type
    fn mapping(&self) -> &dyn Mapping;

    /// Row shape shared by every cursor this source produces
    fn layout(&self) -> &RowLayout;

    /// Executes the criteria: filter, sort, paginate
    fn execute(&self, criteria: &Criteria) -> EvalResult<RowCursor<'_>>;

    /// Convenience: run the cursor to completion
    fn query(&self, criteria: &Criteria) -> EvalResult<Vec<Row>> {
        self.execute(criteria)?.collect()
    }
}

/// Pure in-memory store over one mapping
pub struct MemorySource {
    mapping: TableMapping,
    layout: RowLayout,
    rows: Vec<Row>,
}

impl MemorySource {
    pub fn new(mapping: TableMapping) -> Self {
        let layout = RowLayout::from_mapping(&mapping);
        Self {
            mapping,
            layout,
            rows: Vec::new(),
        }
    }

    /// Appends one record's column values, ordered per the mapping
    pub fn with_row(mut self, values: Vec<serde_json::Value>) -> Self {
        self.rows.push(Row::new(values));
        self
    }

    pub fn push_row(&mut self, values: Vec<serde_json::Value>) {
        self.rows.push(Row::new(values));
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl RowSource for MemorySource {
    fn mapping(&self) -> &dyn Mapping {
        &self.mapping
    }

    fn layout(&self) -> &RowLayout {
        &self.layout
    }

    fn execute(&self, criteria: &Criteria) -> EvalResult<RowCursor<'_>> {
        let offset = criteria.offset.unwrap_or(0) as usize;
        let limit = criteria.limit.map(|l| l as usize).unwrap_or(usize::MAX);

        if criteria.sort_keys.is_empty() {
            // Streaming branch: no buffering, rows flow through one at a
            // time. Pagination counts only matching rows; errors always
            // pass through.
            let matcher = RowMatcher::new(&self.mapping, &self.layout);
            let criteria = criteria.clone();
            let mut skipped = 0usize;
            let mut emitted = 0usize;
            let cursor = self.rows.iter().filter_map(move |row| {
                match matcher.matches(row, &criteria) {
                    Err(e) => Some(Err(e)),
                    Ok(false) => None,
                    Ok(true) => {
                        if skipped < offset {
                            skipped += 1;
                            None
                        } else if emitted < limit {
                            emitted += 1;
                            Some(Ok(row.clone()))
                        } else {
                            None
                        }
                    }
                }
            });
            return Ok(Box::new(cursor));
        }

        // Sorting branch: every match is materialized before the first row
        // is returned
        let matcher = RowMatcher::new(&self.mapping, &self.layout);
        let mut matched = Vec::new();
        for row in &self.rows {
            if matcher.matches(row, criteria)? {
                matched.push(row.clone());
            }
        }
        let comparator = RowComparator::new(&self.mapping, &self.layout, &criteria.sort_keys)?;
        let sorted = comparator.sort_rows(matched)?;
        let page: Vec<Row> = sorted.into_iter().skip(offset).take(limit).collect();
        Ok(Box::new(page.into_iter().map(Ok)))
    }
}
