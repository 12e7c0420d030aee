use std::{
    fs::File,
    io::{BufRead, BufReader, Seek},
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::Arc,
};

use super::{Reader, parse_line};
use crate::{
    MlErr, Result,
    data::{BatchRef, Row},
    parsing::Parser,
};

struct Source {
    path: PathBuf,
    file: BufReader<File>,
    parser: Arc<dyn Parser>,
    line_no: usize,
}

/// Streams the file batch by batch, keeping a single batch in memory.
#[derive(Default)]
pub struct DiskReader {
    source: Option<Source>,
    batch_size: usize,
    buf: Vec<Row>,
    line: String,
}

impl DiskReader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reader for DiskReader {
    fn initialize(
        &mut self,
        path: &Path,
        batch_size: NonZeroUsize,
        parser: Arc<dyn Parser>,
    ) -> Result<()> {
        let file = BufReader::new(File::open(path)?);

        self.source = Some(Source {
            path: path.to_path_buf(),
            file,
            parser,
            line_no: 0,
        });
        self.batch_size = batch_size.get();
        self.buf = Vec::with_capacity(self.batch_size);
        Ok(())
    }

    fn samples(&mut self) -> Result<BatchRef<'_>> {
        let Some(source) = self.source.as_mut() else {
            return Err(MlErr::Uninitialized("disk reader"));
        };

        self.buf.clear();

        while self.buf.len() < self.batch_size {
            self.line.clear();
            if source.file.read_line(&mut self.line)? == 0 {
                break;
            }

            source.line_no += 1;
            let line = self.line.trim_end_matches(['\n', '\r']);
            if line.trim().is_empty() {
                continue;
            }

            let row = parse_line(source.parser.as_ref(), &source.path, source.line_no, line)?;
            self.buf.push(row);
        }

        Ok(BatchRef::new(&self.buf))
    }

    fn reset(&mut self) -> Result<()> {
        let Some(source) = self.source.as_mut() else {
            return Err(MlErr::Uninitialized("disk reader"));
        };

        source.file.rewind()?;
        source.line_no = 0;
        self.buf.clear();
        Ok(())
    }

    fn path(&self) -> Option<&Path> {
        self.source.as_ref().map(|source| source.path.as_path())
    }
}
