pub mod barcode;
pub mod reactions;
