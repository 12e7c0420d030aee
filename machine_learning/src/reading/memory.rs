use std::{
    fs,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::Arc,
};

use log::debug;

use super::{Reader, parse_line};
use crate::{
    MlErr, Result,
    data::{BatchRef, Row},
    parsing::Parser,
};

/// Parses the whole file up front and hands out zero-copy batches over it.
#[derive(Debug, Default)]
pub struct MemoryReader {
    path: Option<PathBuf>,
    rows: Vec<Row>,
    batch_size: usize,
    cursor: usize,
}

impl MemoryReader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reader for MemoryReader {
    fn initialize(
        &mut self,
        path: &Path,
        batch_size: NonZeroUsize,
        parser: Arc<dyn Parser>,
    ) -> Result<()> {
        let content = fs::read_to_string(path)?;

        let rows = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| parse_line(parser.as_ref(), path, i + 1, line))
            .collect::<Result<Vec<_>>>()?;

        debug!("loaded {} rows from {}", rows.len(), path.display());

        self.path = Some(path.to_path_buf());
        self.rows = rows;
        self.batch_size = batch_size.get();
        self.cursor = 0;
        Ok(())
    }

    fn samples(&mut self) -> Result<BatchRef<'_>> {
        if self.path.is_none() {
            return Err(MlErr::Uninitialized("memory reader"));
        }

        let start = self.cursor;
        let end = (start + self.batch_size).min(self.rows.len());
        self.cursor = end;

        Ok(BatchRef::new(&self.rows[start..end]))
    }

    fn reset(&mut self) -> Result<()> {
        self.cursor = 0;
        Ok(())
    }

    fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
