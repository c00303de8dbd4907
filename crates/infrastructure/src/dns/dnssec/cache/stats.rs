use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct CacheStats {
    pub(super) dnskey_hits: AtomicU64,
    pub(super) dnskey_misses: AtomicU64,
    pub(super) ds_hits: AtomicU64,
    pub(super) ds_misses: AtomicU64,
}

impl CacheStats {
    pub fn record_dnskey_hit(&self) {
        self.dnskey_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dnskey_miss(&self) {
        self.dnskey_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ds_hit(&self) {
        self.ds_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ds_miss(&self) {
        self.ds_misses.fetch_add(1, Ordering::Relaxed);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStatsSnapshot {
    pub dnskey_entries: usize,
    pub ds_entries: usize,
    pub dnskey_hits: u64,
    pub dnskey_misses: u64,
    pub ds_hits: u64,
    pub ds_misses: u64,
}

impl CacheStatsSnapshot {
    pub(super) fn capture(stats: &CacheStats, dnskey_entries: usize, ds_entries: usize) -> Self {
        Self {
            dnskey_entries,
            ds_entries,
            dnskey_hits: stats.dnskey_hits.load(Ordering::Relaxed),
            dnskey_misses: stats.dnskey_misses.load(Ordering::Relaxed),
            ds_hits: stats.ds_hits.load(Ordering::Relaxed),
            ds_misses: stats.ds_misses.load(Ordering::Relaxed),
        }
    }

    pub fn hit_rate(&self) -> f64 {
        let hits = self.dnskey_hits + self.ds_hits;
        let total = hits + self.dnskey_misses + self.ds_misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }
}
