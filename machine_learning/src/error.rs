use std::{
    error::Error,
    fmt::{self, Display},
    io,
    path::PathBuf,
};

use crate::{initialization::RandErr, model::ModelMeta, registry::ComponentKind};

/// The result type used in the entire machine learning module.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The machine learning module's error type.
#[derive(Debug)]
pub enum MlErr {
    Io(io::Error),
    Malformed {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    UnknownComponent {
        kind: ComponentKind,
        key: String,
        known: Vec<String>,
    },
    Uninitialized(&'static str),
    SizeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    IndexOutOfBounds {
        index: usize,
        len: usize,
    },
    TooManyParams(ModelMeta),
    MissingFields,
    InvalidHyperParam(&'static str),
    Init(RandErr),
    Checkpoint(serde_json::Error),
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlErr::Io(e) => write!(f, "io error: {e}"),
            MlErr::Malformed { path, line, reason } => {
                write!(f, "malformed record at {}:{line}: {reason}", path.display())
            }
            MlErr::UnknownComponent { kind, key, known } => write!(
                f,
                "cannot create {kind}: unknown key {key:?}, expected one of [{}]",
                known.join(", ")
            ),
            MlErr::Uninitialized(what) => write!(f, "{what} was used before being initialized"),
            MlErr::SizeMismatch {
                what,
                got,
                expected,
            } => write!(
                f,
                "There's a size mismatch for {what}, got {got} and expected {expected}"
            ),
            MlErr::IndexOutOfBounds { index, len } => {
                write!(f, "parameter index {index} is out of bounds for {len} parameters")
            }
            MlErr::TooManyParams(meta) => write!(
                f,
                "a {} model with {} features, {} fields and k = {} has too many parameters",
                meta.family, meta.num_feature, meta.num_field, meta.num_k
            ),
            MlErr::MissingFields => {
                write!(f, "field-aware scoring requires rows carrying field ids")
            }
            MlErr::InvalidHyperParam(msg) => write!(f, "invalid hyper parameter: {msg}"),
            MlErr::Init(e) => write!(f, "failed to initialize parameters: {e}"),
            MlErr::Checkpoint(e) => write!(f, "invalid model checkpoint: {e}"),
        }
    }
}

impl Error for MlErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MlErr::Io(e) => Some(e),
            MlErr::Init(e) => Some(e),
            MlErr::Checkpoint(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MlErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<RandErr> for MlErr {
    fn from(value: RandErr) -> Self {
        Self::Init(value)
    }
}

impl From<serde_json::Error> for MlErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Checkpoint(value)
    }
}
