mod batch;
mod row;

pub use batch::BatchRef;
pub use row::Row;
