/// A single sparse example.
///
/// Feature indices and field ids are 1-based, index 0 of the parameter vector
/// belongs to the bias term.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub label: f32,
    pub idx: Vec<usize>,
    pub values: Vec<f32>,
    pub fields: Option<Vec<usize>>,
}

impl Row {
    /// Creates a new row without field ids.
    ///
    /// # Panics
    /// If `idx.len() != values.len()`.
    pub fn new(label: f32, idx: Vec<usize>, values: Vec<f32>) -> Self {
        assert_eq!(idx.len(), values.len(), "idx and values must have same length");
        Self {
            label,
            idx,
            values,
            fields: None,
        }
    }

    /// Creates a new field-aware row.
    ///
    /// # Panics
    /// If `fields`, `idx` and `values` differ in length.
    pub fn with_fields(label: f32, fields: Vec<usize>, idx: Vec<usize>, values: Vec<f32>) -> Self {
        assert_eq!(idx.len(), values.len(), "idx and values must have same length");
        assert_eq!(idx.len(), fields.len(), "idx and fields must have same length");
        Self {
            label,
            idx,
            values,
            fields: Some(fields),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.idx.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.idx.is_empty()
    }

    /// Iterates the `(index, value)` pairs of this row.
    pub fn entries(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.idx.iter().copied().zip(self.values.iter().copied())
    }

    /// The largest feature index in this row, 0 when empty.
    pub fn max_index(&self) -> usize {
        self.idx.iter().copied().max().unwrap_or(0)
    }

    /// The largest field id in this row, 0 when empty or without fields.
    pub fn max_field(&self) -> usize {
        self.fields
            .as_deref()
            .and_then(|fields| fields.iter().copied().max())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maxima() {
        let row = Row::with_fields(1., vec![2, 1, 3], vec![4, 9, 2], vec![1., 1., 1.]);
        assert_eq!(row.max_index(), 9);
        assert_eq!(row.max_field(), 3);

        let row = Row::new(0., vec![5, 2], vec![0.5, 1.]);
        assert_eq!(row.max_index(), 5);
        assert_eq!(row.max_field(), 0);
    }

    #[test]
    fn empty_row_has_zero_maxima() {
        let row = Row::new(1., vec![], vec![]);
        assert!(row.is_empty());
        assert_eq!(row.max_index(), 0);
        assert_eq!(row.max_field(), 0);
    }
}
