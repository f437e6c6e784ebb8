//! Parsing infrastructure: the UTS grammar, position conversion and the
//! content-hash cache for compiled documents

pub mod parse_cache;
pub mod position_utils;
pub mod typescript;

pub use parse_cache::{CacheStats, ParseCache};
pub use position_utils::LineIndex;
