pub mod storage;

pub use storage::{FrequentLevel, ItemsetStorage, group_by_level};
