pub mod settings;
pub mod skiplist;

pub use settings::{Settings, ENV_PREFIX};
pub use skiplist::{SkipListConfig, DEFAULT_MAX_LEVEL, DEFAULT_PROBABILITY};
