#![allow(dead_code)]
use super::dns_server_mock::{
    name_wire, MockQuery, MockReply, WireRecord, TYPE_DNSKEY, TYPE_DS, TYPE_RRSIG,
};
use base64::Engine as _;
use ring::rand::SystemRandom;
use ring::signature::{
    EcdsaKeyPair, Ed25519KeyPair, KeyPair, ECDSA_P256_SHA256_FIXED_SIGNING,
    ECDSA_P384_SHA384_FIXED_SIGNING,
};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

pub const ECDSA_P256: u8 = 13;
pub const ECDSA_P384: u8 = 14;
pub const ED25519: u8 = 15;

pub fn label_count(name: &str) -> u8 {
    name.trim_end_matches('.')
        .split('.')
        .filter(|l| !l.is_empty())
        .count() as u8
}

/// RRSIG RDATA up to and including the signer name (RFC 4034 §3.1).
#[derive(Debug, Clone)]
pub struct RrsigHeader {
    pub type_covered: u16,
    pub algorithm: u8,
    pub labels: u8,
    pub original_ttl: u32,
    pub expiration: u32,
    pub inception: u32,
    pub key_tag: u16,
    pub signer: String,
}

impl RrsigHeader {
    pub fn to_wire(&self) -> Vec<u8> {
        let mut rdata = self.type_covered.to_be_bytes().to_vec();
        rdata.push(self.algorithm);
        rdata.push(self.labels);
        rdata.extend(self.original_ttl.to_be_bytes());
        rdata.extend(self.expiration.to_be_bytes());
        rdata.extend(self.inception.to_be_bytes());
        rdata.extend(self.key_tag.to_be_bytes());
        rdata.extend(name_wire(&self.signer));
        rdata
    }

    /// The complete RRSIG record for `owner`.
    pub fn record(&self, owner: &str, signature: &[u8]) -> WireRecord {
        let mut rdata = self.to_wire();
        rdata.extend_from_slice(signature);
        WireRecord::new(owner, TYPE_RRSIG, self.original_ttl, rdata)
    }
}

/// RFC 4034 appendix B.
pub fn key_tag(dnskey_rdata: &[u8]) -> u16 {
    let mut acc: u32 = 0;
    for (i, byte) in dnskey_rdata.iter().enumerate() {
        acc += if i % 2 == 0 {
            (*byte as u32) << 8
        } else {
            *byte as u32
        };
    }
    acc += (acc >> 16) & 0xffff;
    (acc & 0xffff) as u16
}

enum Signer {
    Ed25519(Ed25519KeyPair),
    Ecdsa(EcdsaKeyPair),
}

/// A signing key for one zone. Ed25519 keys come from a fixed seed so runs
/// are reproducible; ECDSA keys are generated fresh.
pub struct ZoneKey {
    pub zone: String,
    pub flags: u16,
    pub algorithm: u8,
    signer: Signer,
}

impl ZoneKey {
    pub fn new(zone: &str, seed: u8) -> Self {
        Self {
            zone: zone.to_ascii_lowercase(),
            flags: 257,
            algorithm: ED25519,
            signer: Signer::Ed25519(
                Ed25519KeyPair::from_seed_unchecked(&[seed; 32]).expect("ed25519 seed"),
            ),
        }
    }

    pub fn ecdsa_p256(zone: &str) -> Self {
        Self::ecdsa(zone, ECDSA_P256)
    }

    pub fn ecdsa_p384(zone: &str) -> Self {
        Self::ecdsa(zone, ECDSA_P384)
    }

    fn ecdsa(zone: &str, algorithm: u8) -> Self {
        let signing = if algorithm == ECDSA_P256 {
            &ECDSA_P256_SHA256_FIXED_SIGNING
        } else {
            &ECDSA_P384_SHA384_FIXED_SIGNING
        };
        let rng = SystemRandom::new();
        let pkcs8 = EcdsaKeyPair::generate_pkcs8(signing, &rng).expect("ecdsa keygen");
        let pair = EcdsaKeyPair::from_pkcs8(signing, pkcs8.as_ref(), &rng).expect("ecdsa key");

        Self {
            zone: zone.to_ascii_lowercase(),
            flags: 257,
            algorithm,
            signer: Signer::Ecdsa(pair),
        }
    }

    /// Key material as carried in DNSKEY RDATA. ECDSA keys drop the SEC1
    /// uncompressed-point prefix (RFC 6605 §4).
    pub fn public_key(&self) -> Vec<u8> {
        match &self.signer {
            Signer::Ed25519(pair) => pair.public_key().as_ref().to_vec(),
            Signer::Ecdsa(pair) => pair.public_key().as_ref()[1..].to_vec(),
        }
    }

    fn sign_bytes(&self, data: &[u8]) -> Vec<u8> {
        match &self.signer {
            Signer::Ed25519(pair) => pair.sign(data).as_ref().to_vec(),
            Signer::Ecdsa(pair) => pair
                .sign(&SystemRandom::new(), data)
                .expect("ecdsa sign")
                .as_ref()
                .to_vec(),
        }
    }

    pub fn dnskey_rdata(&self) -> Vec<u8> {
        let mut rdata = self.flags.to_be_bytes().to_vec();
        rdata.push(3);
        rdata.push(self.algorithm);
        rdata.extend_from_slice(&self.public_key());
        rdata
    }

    pub fn key_tag(&self) -> u16 {
        key_tag(&self.dnskey_rdata())
    }

    pub fn dnskey(&self, ttl: u32) -> WireRecord {
        WireRecord::new(&self.zone, TYPE_DNSKEY, ttl, self.dnskey_rdata())
    }

    /// SHA-256 DS record for this key, as the parent zone publishes it.
    pub fn ds(&self, ttl: u32) -> WireRecord {
        let mut hasher = Sha256::new();
        hasher.update(name_wire(&self.zone));
        hasher.update(self.dnskey_rdata());

        let mut rdata = self.key_tag().to_be_bytes().to_vec();
        rdata.push(self.algorithm);
        rdata.push(2);
        rdata.extend_from_slice(&hasher.finalize());
        WireRecord::new(&self.zone, TYPE_DS, ttl, rdata)
    }

    pub fn anchor_text(&self) -> String {
        format!(
            "{} 3600 IN DNSKEY {} 3 {} {}",
            self.zone,
            self.flags,
            self.algorithm,
            base64::engine::general_purpose::STANDARD.encode(self.public_key())
        )
    }

    /// RRSIG over one RRset (all records share owner, type and TTL), valid
    /// from an hour ago until a day from now.
    pub fn sign(&self, rrset: &[WireRecord]) -> WireRecord {
        let owner = rrset[0].owner.clone();
        self.sign_as(rrset, &owner, label_count(&owner))
    }

    /// RRSIG for an RRset synthesized from `wildcard` (`*.zone.`): the
    /// signature covers the wildcard owner and the labels field leaves the
    /// asterisk out.
    pub fn sign_wildcard(&self, rrset: &[WireRecord], wildcard: &str) -> WireRecord {
        self.sign_as(rrset, wildcard, label_count(wildcard) - 1)
    }

    fn sign_as(&self, rrset: &[WireRecord], signed_owner: &str, labels: u8) -> WireRecord {
        let first = &rrset[0];
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as u32;

        let header = RrsigHeader {
            type_covered: first.rtype,
            algorithm: self.algorithm,
            labels,
            original_ttl: first.ttl,
            expiration: now + 86_400,
            inception: now - 3_600,
            key_tag: self.key_tag(),
            signer: self.zone.clone(),
        };

        let mut sorted: Vec<&WireRecord> = rrset.iter().collect();
        sorted.sort_by(|a, b| a.rdata.cmp(&b.rdata));

        let mut signed_data = header.to_wire();
        for record in sorted {
            let as_signed = WireRecord::new(signed_owner, record.rtype, record.ttl, record.rdata.clone());
            as_signed.write(first.ttl, &mut signed_data);
        }

        header.record(&first.owner, &self.sign_bytes(&signed_data))
    }

    /// The RRset followed by its signature.
    pub fn signed(&self, rrset: Vec<WireRecord>) -> Vec<WireRecord> {
        let rrsig = self.sign(&rrset);
        let mut records = rrset;
        records.push(rrsig);
        records
    }
}

/// Canned replies keyed by question; anything else gets an empty NOERROR.
#[derive(Default, Clone)]
pub struct ZoneData {
    replies: HashMap<(String, u16), MockReply>,
}

impl ZoneData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, qtype: u16, reply: MockReply) {
        self.replies.insert((name.to_ascii_lowercase(), qtype), reply);
    }

    pub fn reply(&self, query: &MockQuery) -> MockReply {
        self.replies
            .get(&(query.name.clone(), query.qtype))
            .cloned()
            .unwrap_or_else(MockReply::empty)
    }

    /// Publish a zone's self-signed DNSKEY RRset.
    pub fn publish_keys(&mut self, key: &ZoneKey) {
        let records = key.signed(vec![key.dnskey(3600)]);
        self.insert(&key.zone, TYPE_DNSKEY, MockReply::answer(records));
    }

    /// Publish the DS for `child` in `parent`, signed by the parent.
    pub fn delegate(&mut self, parent: &ZoneKey, child: &ZoneKey) {
        let records = parent.signed(vec![child.ds(3600)]);
        self.insert(&child.zone, TYPE_DS, MockReply::answer(records));
    }
}
