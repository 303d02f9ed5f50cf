use crate::error::Result;
use serde::Serialize;
use std::io::Write;

/// Writes persisted rows (fees, mileage postings, fail markers) as CSV.
///
/// The header row is derived from the first record's field names.
pub struct RecordWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_records<T, I>(&mut self, records: I) -> Result<()>
    where
        T: Serialize,
        I: IntoIterator<Item = T>,
    {
        for record in records {
            self.writer.serialize(record)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
