pub mod image;
pub mod text;

pub use crate::model::ScanResult;
