use super::algorithm_name;
use ferrous_dnsq_domain::DomainError;
use hickory_proto::dnssec::rdata::DNSSECRData;
use hickory_proto::dnssec::PublicKey;
use hickory_proto::rr::RData;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnskeyRecord {
    pub flags: u16,
    pub protocol: u8,
    pub algorithm: u8,
    pub public_key: Vec<u8>,
}

impl DnskeyRecord {
    pub const ZONE_KEY_FLAG: u16 = 0x0100;
    pub const SEP_FLAG: u16 = 0x0001;

    /// A key usable for validation: protocol 3, zone-key flag set,
    /// non-empty key material (RFC 4034 §2.1).
    pub fn new(
        flags: u16,
        protocol: u8,
        algorithm: u8,
        public_key: Vec<u8>,
    ) -> Result<Self, DomainError> {
        if protocol != 3 {
            return Err(DomainError::InvalidDnsResponse(format!(
                "Invalid DNSKEY protocol: {} (expected 3)",
                protocol
            )));
        }

        if flags & Self::ZONE_KEY_FLAG == 0 {
            return Err(DomainError::InvalidDnsResponse(
                "DNSKEY Zone Key flag not set".into(),
            ));
        }

        if public_key.is_empty() {
            return Err(DomainError::InvalidDnsResponse(
                "DNSKEY public key is empty".into(),
            ));
        }

        Ok(Self {
            flags,
            protocol,
            algorithm,
            public_key,
        })
    }

    pub fn from_rdata(rdata: &RData) -> Option<Self> {
        let RData::DNSSEC(DNSSECRData::DNSKEY(dnskey)) = rdata else {
            return None;
        };
        let pk = dnskey.public_key();
        Some(Self {
            flags: dnskey.flags(),
            protocol: 3,
            algorithm: u8::from(<dyn PublicKey>::algorithm(pk)),
            public_key: <dyn PublicKey>::public_bytes(pk).to_vec(),
        })
    }

    pub fn is_zone_key(&self) -> bool {
        self.flags & Self::ZONE_KEY_FLAG != 0
    }

    pub fn is_ksk(&self) -> bool {
        self.flags & Self::SEP_FLAG != 0
    }

    /// RFC 4034 Appendix B key tag.
    pub fn calculate_key_tag(&self) -> u16 {
        let mut wire = Vec::with_capacity(4 + self.public_key.len());
        wire.extend_from_slice(&self.flags.to_be_bytes());
        wire.push(self.protocol);
        wire.push(self.algorithm);
        wire.extend_from_slice(&self.public_key);

        let mut accumulator: u32 = 0;

        for chunk in wire.chunks(2) {
            if chunk.len() == 2 {
                accumulator += u32::from(u16::from_be_bytes([chunk[0], chunk[1]]));
            } else {
                accumulator += u32::from(chunk[0]) << 8;
            }
        }

        accumulator += accumulator >> 16;
        (accumulator & 0xFFFF) as u16
    }

    pub fn algorithm_name(&self) -> &'static str {
        algorithm_name(self.algorithm)
    }
}

impl fmt::Display for DnskeyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DNSKEY(flags={}, algo={}, tag={}, {})",
            self.flags,
            self.algorithm_name(),
            self.calculate_key_tag(),
            if self.is_ksk() { "KSK" } else { "ZSK" }
        )
    }
}
