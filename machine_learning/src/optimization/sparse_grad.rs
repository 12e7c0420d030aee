/// A sparse gradient, a list of `(parameter index, gradient)` pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseGrad {
    entries: Vec<(usize, f32)>,
}

impl SparseGrad {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, index: usize, grad: f32) {
        self.entries.push((index, grad));
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn entries(&self) -> &[(usize, f32)] {
        &self.entries
    }

    /// Sums the contributions of repeated indices and scales every gradient by `scale`.
    ///
    /// Afterwards the entries are sorted by index and every index appears once.
    pub fn coalesce(&mut self, scale: f32) {
        self.entries.sort_unstable_by_key(|&(i, _)| i);
        self.entries.dedup_by(|(i, g), (kept_i, kept_g)| {
            if i == kept_i {
                *kept_g += *g;
                true
            } else {
                false
            }
        });

        for (_, g) in &mut self.entries {
            *g *= scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coalesce_sums_and_scales() {
        let mut grad = SparseGrad::new();
        grad.push(3, 1.);
        grad.push(0, 2.);
        grad.push(3, 3.);
        grad.push(1, -4.);

        grad.coalesce(0.5);

        assert_eq!(grad.entries(), [(0, 1.), (1, -2.), (3, 2.)]);
    }
}
