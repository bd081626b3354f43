pub mod data;
pub mod fields;
pub mod rules;

pub use data::*;
pub use fields::{AedField, FieldName, FieldRecord, ReportField, FLAG_NO, FLAG_YES, NOT_FOUND};
pub use rules::GenerationRule;
