use crate::domain::promotion::PromotionEvent;
use crate::error::{PostprocessError, Result};
use std::io::Read;

/// Reads promotion events from a CSV source with a camelCase header row.
///
/// Columns not present in the header take their default value, so a catalog
/// export only needs `offerNo`, `eventTypeCode` and `feeRate`.
pub struct PromotionReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> PromotionReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes promotion events.
    pub fn promotions(self) -> impl Iterator<Item = Result<PromotionEvent>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(PostprocessError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reader_valid_stream() {
        let data = "offerNo, eventTypeCode, feeRate, brandCode\n1-10-20, 01, 5, BR\n1-11-21, 05, 0, BR";
        let reader = PromotionReader::new(data.as_bytes());
        let results: Vec<Result<PromotionEvent>> = reader.promotions().collect();

        assert_eq!(results.len(), 2);
        let first = results[0].as_ref().unwrap();
        assert_eq!(first.offer_no, "1-10-20");
        assert_eq!(first.event_type_code, "01");
        assert_eq!(first.fee_rate, dec!(5));
        assert_eq!(first.brand_code, "BR");
        assert_eq!(first.shop_code, "");
        assert!(!results[1].as_ref().unwrap().is_fee_eligible());
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = "offerNo, eventTypeCode, feeRate\n1-10-20, 01, not_a_rate";
        let reader = PromotionReader::new(data.as_bytes());
        let results: Vec<Result<PromotionEvent>> = reader.promotions().collect();

        assert!(results[0].is_err());
    }
}
