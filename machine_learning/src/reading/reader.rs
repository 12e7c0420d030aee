use std::{num::NonZeroUsize, path::Path, sync::Arc};

use crate::{Result, data::BatchRef, parsing::Parser};

/// A rewindable, lazy producer of sparse example batches from a single file.
///
/// Every full pass must yield the same rows in the same order, whatever the batch size.
pub trait Reader: Send {
    /// Binds this reader to a file.
    ///
    /// # Arguments
    /// * `path` - The file to read from.
    /// * `batch_size` - The maximum amount of rows per batch.
    /// * `parser` - The parser shared by every reader of the run.
    ///
    /// # Returns
    /// An io error if the file can't be opened or a malformed record error.
    fn initialize(
        &mut self,
        path: &Path,
        batch_size: NonZeroUsize,
        parser: Arc<dyn Parser>,
    ) -> Result<()>;

    /// Pulls the next batch of rows.
    ///
    /// # Returns
    /// The next batch, empty once the file has been exhausted.
    fn samples(&mut self) -> Result<BatchRef<'_>>;

    /// Rewinds the reader to its first batch. Calling it more than once is harmless.
    fn reset(&mut self) -> Result<()>;

    /// The file this reader is bound to, if initialized.
    fn path(&self) -> Option<&Path>;
}
