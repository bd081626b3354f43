pub mod config;
pub mod export;
pub mod inspection;
pub mod models;
pub mod processing;
pub mod utils;
pub mod validation;

pub use config::InspectionConfig;
pub use export::ExportBundle;
pub use inspection::InspectionSession;
pub use utils::InspectionError;
pub use validation::Verdict;
