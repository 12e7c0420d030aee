pub mod arch;
pub mod data;
pub mod error;
pub mod initialization;
pub mod model;
pub mod optimization;
pub mod parsing;
pub mod reading;
pub mod registry;

pub use error::{MlErr, Result};
pub use registry::{ComponentKind, Registry};
