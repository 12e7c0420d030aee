mod disk;
mod memory;
mod reader;

use std::path::Path;

pub use disk::DiskReader;
pub use memory::MemoryReader;
pub use reader::Reader;

use crate::{MlErr, Result, data::Row, parsing::Parser};

/// Parses a record, attaching its location to the error if any.
fn parse_line(parser: &dyn Parser, path: &Path, line: usize, record: &str) -> Result<Row> {
    parser.parse(record).map_err(|e| MlErr::Malformed {
        path: path.to_path_buf(),
        line,
        reason: e.0,
    })
}
