pub mod error;

pub use error::InspectionError;
