use super::{
    Parser,
    parser::{ParseErr, one_based, split_label, token},
};
use crate::data::Row;

/// Parses `label field:idx:value ...` records.
#[derive(Debug, Default, Clone, Copy)]
pub struct LibffmParser;

impl LibffmParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for LibffmParser {
    fn parse(&self, line: &str) -> Result<Row, ParseErr> {
        let mut tokens = line.split_whitespace().peekable();
        let label = split_label(&mut tokens)?;

        let mut fields = Vec::new();
        let mut idx = Vec::new();
        let mut values = Vec::new();

        for tok in tokens {
            let mut parts = tok.splitn(3, ':');
            let (Some(f), Some(i), Some(v)) = (parts.next(), parts.next(), parts.next()) else {
                return Err(ParseErr(format!("expected field:idx:value, got {tok:?}")));
            };

            fields.push(one_based(f, "field id")?);
            idx.push(one_based(i, "feature index")?);
            values.push(token(v, "value")?);
        }

        Ok(Row::with_fields(label, fields, idx, values))
    }
}
