pub mod skiplist;

pub use skiplist::*;
