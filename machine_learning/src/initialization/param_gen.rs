/// A `ParamGen` generates values for the initial state of the model's parameters.
pub trait ParamGen {
    /// Should sample at most `n` parameters.
    ///
    /// # Arguments
    /// * `n` - The upper limit of samples to generate.
    ///
    /// # Returns
    /// An option whether the generator is exhausted.
    fn sample(&mut self, n: usize) -> Option<Vec<f32>>;

    /// Drains the generator into a single parameter vector of at most `n` values.
    fn collect(&mut self, n: usize) -> Vec<f32> {
        let mut params = Vec::with_capacity(n);

        while params.len() < n {
            match self.sample(n - params.len()) {
                Some(sample) => params.extend(sample),
                None => break,
            }
        }

        params
    }
}
