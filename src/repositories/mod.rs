pub mod dataset;

pub use dataset::{parse_timestamp, Dataset};
