use crate::domain::sale_record::SaleRecordEvent;
use crate::error::{PostprocessError, Result};
use std::io::{BufRead, BufReader, Read};

/// Reads sale-record events from a JSON-lines source, one event per line.
///
/// Blank lines are skipped. A malformed line yields an error for that line
/// only; the following lines are still read.
pub struct SaleRecordReader<R: Read> {
    reader: BufReader<R>,
}

impl<R: Read> SaleRecordReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            reader: BufReader::new(source),
        }
    }

    pub fn events(self) -> impl Iterator<Item = Result<SaleRecordEvent>> {
        self.reader
            .lines()
            .filter(|line| !matches!(line, Ok(l) if l.trim().is_empty()))
            .map(|line| {
                let line = line?;
                serde_json::from_str(&line).map_err(PostprocessError::from)
            })
    }
}
