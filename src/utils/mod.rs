pub mod http_range;
pub mod parallel;
pub mod range_reader;
pub mod reporting;
