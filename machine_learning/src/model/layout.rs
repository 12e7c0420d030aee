use std::ops::Range;

use super::{ModelFamily, ModelMeta};
use crate::Result;

/// Maps a flat parameter buffer into the bias, linear and latent blocks.
///
/// Flat layout: `[bias, w_1 .. w_n, latent...]` where the latent block holds one `k`-sized
/// vector per feature (fm) or per feature and field (ffm).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamLayout {
    family: ModelFamily,
    num_feature: usize,
    num_field: usize,
    k: usize,
    len: usize,
}

impl ParamLayout {
    /// # Returns
    /// `MlErr::TooManyParams` if `meta` describes a buffer that can't be allocated.
    pub fn new(meta: &ModelMeta) -> Result<Self> {
        Ok(Self::sized(meta, meta.num_params()?))
    }

    /// A layout for `meta` whose parameter count is already known to be `len`.
    pub(super) fn sized(meta: &ModelMeta, len: usize) -> Self {
        Self {
            family: meta.family,
            num_feature: meta.num_feature,
            num_field: meta.num_field,
            k: meta.num_k,
            len,
        }
    }

    #[inline]
    pub fn family(&self) -> ModelFamily {
        self.family
    }

    #[inline]
    pub fn num_feature(&self) -> usize {
        self.num_feature
    }

    #[inline]
    pub fn num_field(&self) -> usize {
        self.num_field
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    #[inline]
    pub fn bias(&self) -> usize {
        0
    }

    /// The slot of the linear weight for feature `j`.
    #[inline]
    pub fn linear(&self, j: usize) -> usize {
        j
    }

    /// Whether feature `j` has parameters in this layout.
    #[inline]
    pub fn has_feature(&self, j: usize) -> bool {
        (1..=self.num_feature).contains(&j)
    }

    /// Whether field `f` has parameters in this layout.
    #[inline]
    pub fn has_field(&self, f: usize) -> bool {
        (1..=self.num_field).contains(&f)
    }

    /// The latent vector of feature `j` (fm).
    pub fn latent(&self, j: usize) -> Range<usize> {
        let start = self.num_feature + 1 + (j - 1) * self.k;
        start..start + self.k
    }

    /// The latent vector of feature `j` paired against field `f` (ffm).
    pub fn field_latent(&self, j: usize, f: usize) -> Range<usize> {
        let start = self.num_feature + 1 + ((j - 1) * self.num_field + (f - 1)) * self.k;
        start..start + self.k
    }

    /// Total number of parameters described by this layout.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fm_latent_blocks_tile_the_tail() {
        let meta = ModelMeta::new(ModelFamily::Fm, 3, 2, 0);
        let layout = ParamLayout::new(&meta).unwrap();

        assert_eq!(layout.len(), 10);
        assert_eq!(layout.latent(1), 4..6);
        assert_eq!(layout.latent(3), 8..10);
    }

    #[test]
    fn ffm_latent_blocks_tile_the_tail() {
        let meta = ModelMeta::new(ModelFamily::Ffm, 2, 2, 3);
        let layout = ParamLayout::new(&meta).unwrap();

        assert_eq!(layout.len(), 3 + 12);
        assert_eq!(layout.field_latent(1, 1), 3..5);
        assert_eq!(layout.field_latent(1, 3), 7..9);
        assert_eq!(layout.field_latent(2, 1), 9..11);
        assert_eq!(layout.field_latent(2, 3).end, layout.len());
    }

    #[test]
    fn bounds() {
        let meta = ModelMeta::new(ModelFamily::Ffm, 4, 1, 2);
        let layout = ParamLayout::new(&meta).unwrap();

        assert!(!layout.has_feature(0));
        assert!(layout.has_feature(4));
        assert!(!layout.has_feature(5));
        assert!(layout.has_field(2));
        assert!(!layout.has_field(3));
    }
}
