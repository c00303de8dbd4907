use super::super::types::{DnskeyRecord, DsRecord};
use super::entries::{DnskeyEntry, DsEntry};
use super::stats::{CacheStats, CacheStatsSnapshot};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// TTL-bound store of DNSKEY and DS RRsets that already passed validation.
///
/// Entries are inserted only after their signatures verified, so a hit can
/// be used without re-checking them. Keys are fqdn zone names.
#[derive(Default)]
pub struct DnssecCache {
    dnskeys: DashMap<Arc<str>, DnskeyEntry>,
    ds_records: DashMap<Arc<str>, DsEntry>,
    stats: CacheStats,
}

impl DnssecCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache_dnskey(&self, zone: &str, keys: Arc<[DnskeyRecord]>, ttl_seconds: u32) {
        self.dnskeys
            .insert(Arc::from(zone), DnskeyEntry::new(keys, ttl_seconds));
        trace!(zone = %zone, ttl = ttl_seconds, "Cached DNSKEY records");
    }

    pub fn get_dnskey(&self, zone: &str) -> Option<Arc<[DnskeyRecord]>> {
        if let Some(entry) = self.dnskeys.get(zone) {
            if !entry.is_expired() {
                self.stats.record_dnskey_hit();
                trace!(zone = %zone, "DNSKEY cache hit");
                return Some(Arc::clone(entry.keys()));
            }
            drop(entry);
            self.dnskeys.remove(zone);
            debug!(zone = %zone, "DNSKEY cache expired");
        }

        self.stats.record_dnskey_miss();
        None
    }

    pub fn cache_ds(&self, zone: &str, records: Arc<[DsRecord]>, ttl_seconds: u32) {
        self.ds_records
            .insert(Arc::from(zone), DsEntry::new(records, ttl_seconds));
        trace!(zone = %zone, ttl = ttl_seconds, "Cached DS records");
    }

    pub fn get_ds(&self, zone: &str) -> Option<Arc<[DsRecord]>> {
        if let Some(entry) = self.ds_records.get(zone) {
            if !entry.is_expired() {
                self.stats.record_ds_hit();
                trace!(zone = %zone, "DS cache hit");
                return Some(Arc::clone(entry.records()));
            }
            drop(entry);
            self.ds_records.remove(zone);
            debug!(zone = %zone, "DS cache expired");
        }

        self.stats.record_ds_miss();
        None
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot::capture(&self.stats, self.dnskeys.len(), self.ds_records.len())
    }

    pub fn clear(&self) {
        self.dnskeys.clear();
        self.ds_records.clear();
        debug!("DNSSEC cache cleared");
    }
}
