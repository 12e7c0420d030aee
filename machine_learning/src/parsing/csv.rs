use super::{
    Parser,
    parser::{ParseErr, token},
};
use crate::data::Row;

/// Parses dense `label,v1,v2,...` records, column `i` becomes feature `i`.
///
/// Zero-valued columns are dropped so the resulting row stays sparse.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvParser;

impl CsvParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for CsvParser {
    fn parse(&self, line: &str) -> Result<Row, ParseErr> {
        let mut columns = line.split(',').map(str::trim);

        let label = match columns.next() {
            Some(tok) if !tok.is_empty() => token(tok, "label")?,
            _ => return Err(ParseErr("missing label column".into())),
        };

        let mut idx = Vec::new();
        let mut values = Vec::new();

        for (i, tok) in columns.enumerate() {
            let value: f32 = token(tok, "value")?;
            if value != 0. {
                idx.push(i + 1);
                values.push(value);
            }
        }

        Ok(Row::new(label, idx, values))
    }
}
