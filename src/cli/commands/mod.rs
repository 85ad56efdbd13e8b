mod migrate;
mod search;
mod stats;

pub use migrate::cmd_migrate;
pub use search::cmd_search_city;
pub use stats::cmd_stats;
