mod entries;
mod stats;
mod storage;

pub use entries::{DnskeyEntry, DsEntry};
pub use stats::{CacheStats, CacheStatsSnapshot};
pub use storage::DnssecCache;
