use super::super::types::{DnskeyRecord, DsRecord};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Validated DNSKEY RRset of one zone.
#[derive(Debug, Clone)]
pub struct DnskeyEntry {
    pub(super) keys: Arc<[DnskeyRecord]>,
    pub(super) expires_at: Instant,
}

impl DnskeyEntry {
    pub fn new(keys: Arc<[DnskeyRecord]>, ttl_secs: u32) -> Self {
        Self {
            keys,
            expires_at: Instant::now() + Duration::from_secs(u64::from(ttl_secs)),
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    pub fn keys(&self) -> &Arc<[DnskeyRecord]> {
        &self.keys
    }
}

/// Validated DS RRset published by a parent for one child zone.
#[derive(Debug, Clone)]
pub struct DsEntry {
    pub(super) records: Arc<[DsRecord]>,
    pub(super) expires_at: Instant,
}

impl DsEntry {
    pub fn new(records: Arc<[DsRecord]>, ttl_secs: u32) -> Self {
        Self {
            records,
            expires_at: Instant::now() + Duration::from_secs(u64::from(ttl_secs)),
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    pub fn records(&self) -> &Arc<[DsRecord]> {
        &self.records
    }
}
