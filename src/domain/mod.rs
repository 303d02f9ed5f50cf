//! Domain types and the fee/mileage rules, free of any I/O.

pub mod fee;
pub mod mileage;
pub mod ports;
pub mod promotion;
pub mod sale_record;
