use super::algorithm_name;
use hickory_proto::dnssec::rdata::DNSSECRData;
use hickory_proto::rr::RData;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DsRecord {
    pub key_tag: u16,
    pub algorithm: u8,
    pub digest_type: u8,
    pub digest: Vec<u8>,
}

impl DsRecord {
    pub fn from_rdata(rdata: &RData) -> Option<Self> {
        let RData::DNSSEC(DNSSECRData::DS(ds)) = rdata else {
            return None;
        };
        Some(Self {
            key_tag: ds.key_tag(),
            algorithm: u8::from(ds.algorithm()),
            digest_type: u8::from(ds.digest_type()),
            digest: ds.digest().to_vec(),
        })
    }

    pub fn digest_type_name(&self) -> &'static str {
        match self.digest_type {
            1 => "SHA-1",
            2 => "SHA-256",
            4 => "SHA-384",
            _ => "Unknown",
        }
    }

    pub fn algorithm_name(&self) -> &'static str {
        algorithm_name(self.algorithm)
    }
}

impl fmt::Display for DsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DS(tag={}, algo={}, digest={})",
            self.key_tag,
            self.algorithm_name(),
            self.digest_type_name()
        )
    }
}
