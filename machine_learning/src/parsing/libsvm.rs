use super::{
    Parser,
    parser::{ParseErr, one_based, split_label, token},
};
use crate::data::Row;

/// Parses `label idx:value idx:value ...` records.
#[derive(Debug, Default, Clone, Copy)]
pub struct LibsvmParser;

impl LibsvmParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for LibsvmParser {
    fn parse(&self, line: &str) -> Result<Row, ParseErr> {
        let mut tokens = line.split_whitespace().peekable();
        let label = split_label(&mut tokens)?;

        let mut idx = Vec::new();
        let mut values = Vec::new();

        for tok in tokens {
            let Some((i, v)) = tok.split_once(':') else {
                return Err(ParseErr(format!("expected idx:value, got {tok:?}")));
            };

            idx.push(one_based(i, "feature index")?);
            values.push(token(v, "value")?);
        }

        Ok(Row::new(label, idx, values))
    }
}
