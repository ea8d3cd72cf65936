// OWID CSV parsing: header-driven projection onto the kept columns
use crate::model::{ParserError, Record};
use csv::ReaderBuilder;

pub trait Parser {
    fn parse(&self, text: &str) -> Result<Vec<Record>, ParserError>;
}

/// Columns not named in `Record` are dropped; kept columns missing from the
/// header come back as `None`.
pub struct CsvRecordParser {
    delimiter: u8,
}

impl CsvRecordParser {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }
}

impl Parser for CsvRecordParser {
    fn parse(&self, text: &str) -> Result<Vec<Record>, ParserError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut records = Vec::new();
        for result in reader.deserialize::<Record>() {
            records.push(result?);
        }

        Ok(records)
    }
}
