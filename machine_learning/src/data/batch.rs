use std::slice::Iter;

use super::Row;

/// Borrowed batch view (zero-copy) handed out by a `Reader`.
///
/// An empty batch marks the end of the stream.
#[derive(Debug, Clone, Copy)]
pub struct BatchRef<'a> {
    rows: &'a [Row],
}

impl<'a> BatchRef<'a> {
    pub fn new(rows: &'a [Row]) -> Self {
        Self { rows }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn rows(&self) -> &'a [Row] {
        self.rows
    }

    #[inline]
    pub fn iter(&self) -> Iter<'a, Row> {
        self.rows.iter()
    }

    /// The largest feature index across every row of the batch.
    pub fn max_index(&self) -> usize {
        self.rows.iter().map(Row::max_index).max().unwrap_or(0)
    }

    /// The largest field id across every row of the batch.
    pub fn max_field(&self) -> usize {
        self.rows.iter().map(Row::max_field).max().unwrap_or(0)
    }
}

impl<'a> IntoIterator for BatchRef<'a> {
    type Item = &'a Row;
    type IntoIter = Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
