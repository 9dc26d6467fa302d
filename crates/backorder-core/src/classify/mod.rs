pub mod engine;
pub mod outcome;

pub use engine::{category_of, partition};
pub use outcome::StockPartition;
