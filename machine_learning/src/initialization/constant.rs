use super::ParamGen;

/// A parameter generator that fills a fixed amount of slots with the same value.
#[derive(Debug, Clone)]
pub struct ConstParamGen {
    value: f32,
    remaining: usize,
}

impl ConstParamGen {
    /// Creates a new `ConstParamGen`.
    ///
    /// # Arguments
    /// * `value` - The value to generate.
    /// * `limit` - The amount of parameters to generate before being exhausted.
    pub fn new(value: f32, limit: usize) -> Self {
        Self {
            value,
            remaining: limit,
        }
    }

    /// A generator of `limit` zeros.
    pub fn zeros(limit: usize) -> Self {
        Self::new(0., limit)
    }
}

impl ParamGen for ConstParamGen {
    fn sample(&mut self, n: usize) -> Option<Vec<f32>> {
        if self.remaining == 0 {
            return None;
        }

        let n = n.min(self.remaining);
        self.remaining -= n;
        Some(vec![self.value; n])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_after_limit() {
        let mut param_gen = ConstParamGen::new(2., 5);

        assert_eq!(param_gen.sample(3).unwrap(), [2.; 3]);
        assert_eq!(param_gen.sample(3).unwrap(), [2.; 2]);
        assert!(param_gen.sample(1).is_none());
    }

    #[test]
    fn collect_stops_at_limit() {
        assert_eq!(ConstParamGen::zeros(4).collect(10), [0.; 4]);
        assert_eq!(ConstParamGen::zeros(4).collect(2), [0.; 2]);
        assert!(ConstParamGen::zeros(0).collect(3).is_empty());
    }
}
