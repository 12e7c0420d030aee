use std::{
    error::Error,
    fmt::{self, Display},
    str::FromStr,
};

use crate::data::Row;

/// Error returned by a `Parser` whenever a record can't be turned into a `Row`.
///
/// Readers attach the file and line to it before surfacing it as an `MlErr`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErr(pub String);

impl Display for ParseErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Error for ParseErr {}

/// Converts one raw input record into a structured `Row`.
///
/// A single parser instance is shared by every reader of a run, so it must be stateless.
pub trait Parser: Send + Sync {
    /// Parses a single non-empty line.
    ///
    /// # Arguments
    /// * `line` - The raw record, without its line terminator.
    ///
    /// # Returns
    /// The parsed row or a `ParseErr` describing what's wrong with the record.
    fn parse(&self, line: &str) -> Result<Row, ParseErr>;
}

/// Parses a single token, naming it in the error message.
pub(super) fn token<T: FromStr>(tok: &str, what: &str) -> Result<T, ParseErr> {
    tok.parse()
        .map_err(|_| ParseErr(format!("invalid {what} {tok:?}")))
}

/// Parses a 1-based identifier (feature index or field id).
pub(super) fn one_based(tok: &str, what: &str) -> Result<usize, ParseErr> {
    match token::<usize>(tok, what)? {
        0 => Err(ParseErr(format!("{what} must be 1-based, got 0"))),
        id => Ok(id),
    }
}

/// Splits off the leading label, unlabeled records start directly with an entry.
pub(super) fn split_label<'a, I>(tokens: &mut std::iter::Peekable<I>) -> Result<f32, ParseErr>
where
    I: Iterator<Item = &'a str>,
{
    match tokens.peek() {
        Some(tok) if !tok.contains(':') => {
            let label = token(tok, "label")?;
            tokens.next();
            Ok(label)
        }
        _ => Ok(0.),
    }
}
