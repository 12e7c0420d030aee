use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The model class, it dictates the shape of the parameter vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFamily {
    Linear,
    Fm,
    Ffm,
}

impl ModelFamily {
    pub const ALL: [ModelFamily; 3] = [ModelFamily::Linear, ModelFamily::Fm, ModelFamily::Ffm];

    /// Total number of parameters in the flat buffer for this family.
    ///
    /// # Arguments
    /// * `max_feature` - The largest feature index in the data.
    /// * `max_field` - The largest field id in the data, only used by field-aware families.
    /// * `k` - The latent dimension, ignored by the linear family.
    ///
    /// # Returns
    /// `None` if the count overflows a `usize`.
    pub fn num_params(self, max_feature: usize, max_field: usize, k: usize) -> Option<usize> {
        let bias_and_linear = max_feature.checked_add(1)?;

        let latent = match self {
            ModelFamily::Linear => 0,
            ModelFamily::Fm => max_feature.checked_mul(k)?,
            ModelFamily::Ffm => max_feature.checked_mul(max_field)?.checked_mul(k)?,
        };

        bias_and_linear.checked_add(latent)
    }

    /// Whether the family uses latent factors.
    #[inline]
    pub fn is_latent(self) -> bool {
        !matches!(self, ModelFamily::Linear)
    }

    /// Whether the family needs field ids.
    #[inline]
    pub fn is_field_aware(self) -> bool {
        matches!(self, ModelFamily::Ffm)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ModelFamily::Linear => "linear",
            ModelFamily::Fm => "fm",
            ModelFamily::Ffm => "ffm",
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string doesn't name a known family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFamily(pub String);

impl fmt::Display for UnknownFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown model family {:?}, expected linear, fm or ffm", self.0)
    }
}

impl std::error::Error for UnknownFamily {}

impl FromStr for ModelFamily {
    type Err = UnknownFamily;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelFamily::ALL
            .into_iter()
            .find(|family| family.as_str() == s)
            .ok_or_else(|| UnknownFamily(s.to_string()))
    }
}
