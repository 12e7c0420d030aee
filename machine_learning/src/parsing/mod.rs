mod csv;
mod libffm;
mod libsvm;
mod parser;

pub use csv::CsvParser;
pub use libffm::LibffmParser;
pub use libsvm::LibsvmParser;
pub use parser::{ParseErr, Parser};
