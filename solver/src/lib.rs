pub mod config;
pub mod error;
pub mod interrupt;
pub mod scan;
pub mod solver;
pub mod splitter;
pub mod training;

pub use config::{Dimensions, HyperParam, Mode};
pub use error::{Result, SolverErr};
pub use interrupt::Interrupt;
pub use solver::{Report, Solver, SolverBuilder};
