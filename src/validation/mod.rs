pub mod device;
pub mod images;
pub mod mapping;
pub mod normalize;
pub mod topic;
pub mod verdict;

pub use device::{DeviceComparator, BATTERY_LEVEL_TOLERANCE};
pub use images::ImageComparator;
pub use mapping::{ComponentFields, FieldMapping, FieldMappingResolver};
pub use normalize::{normalize_serial, parse_date};
pub use verdict::Verdict;
