pub mod promotion_reader;
pub mod record_writer;
