use std::{error::Error, fmt, io};

use machine_learning::{MlErr, model::UnknownFamily};

/// The solver module's result type.
pub type Result<T> = std::result::Result<T, SolverErr>;

/// Failures while assembling or running a solver.
#[derive(Debug)]
pub enum SolverErr {
    InvalidConfig(String),
    UnknownFamily(UnknownFamily),
    Config(serde_json::Error),
    Ml(MlErr),
    Io(io::Error),
    Interrupted,
}

impl fmt::Display for SolverErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverErr::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            SolverErr::UnknownFamily(e) => write!(f, "invalid config: {e}"),
            SolverErr::Config(e) => write!(f, "failed to decode config: {e}"),
            SolverErr::Ml(e) => write!(f, "{e}"),
            SolverErr::Io(e) => write!(f, "io error: {e}"),
            SolverErr::Interrupted => write!(f, "interrupted"),
        }
    }
}

impl Error for SolverErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SolverErr::UnknownFamily(e) => Some(e),
            SolverErr::Config(e) => Some(e),
            SolverErr::Ml(e) => Some(e),
            SolverErr::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MlErr> for SolverErr {
    fn from(value: MlErr) -> Self {
        Self::Ml(value)
    }
}

impl From<UnknownFamily> for SolverErr {
    fn from(value: UnknownFamily) -> Self {
        Self::UnknownFamily(value)
    }
}

impl From<serde_json::Error> for SolverErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Config(value)
    }
}

impl From<io::Error> for SolverErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Boundary conversion for the binary.
impl From<SolverErr> for io::Error {
    fn from(value: SolverErr) -> Self {
        match value {
            SolverErr::Io(e) => e,
            SolverErr::Ml(MlErr::Io(e)) => e,
            SolverErr::Interrupted => io::Error::new(io::ErrorKind::Interrupted, value),
            other => io::Error::new(io::ErrorKind::InvalidInput, other),
        }
    }
}
