use super::ValidationOutcome;
use crate::dns::dnssec::cache::DnssecCache;
use crate::dns::dnssec::crypto::SignatureVerifier;
use crate::dns::dnssec::trust_anchor::TrustAnchorStore;
use crate::dns::dnssec::types::{DnskeyRecord, DsRecord, RrsigRecord};
use crate::dns::dnssec::zone::{to_fqdn, zones_between};
use crate::dns::upstream::UpstreamClient;
use ferrous_dnsq_domain::DomainError;
use hickory_proto::rr::{Name, Record, RecordType};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

/// One RRset and the RRSIGs that cover it.
#[derive(Debug, Clone, Default)]
pub struct SignedRrset {
    pub records: Vec<Record>,
    pub rrsigs: Vec<RrsigRecord>,
}

impl SignedRrset {
    /// Pick the `record_type` RRset owned by `owner` out of a section,
    /// together with the RRSIGs covering it.
    pub fn collect(section: &[Record], owner: &Name, record_type: RecordType) -> Self {
        let mut rrset = Self::default();

        for record in section {
            if record.name() != owner {
                continue;
            }
            if let Some(rrsig) = RrsigRecord::from_rdata(record.data()) {
                if rrsig.type_covered == record_type {
                    rrset.rrsigs.push(rrsig);
                }
            } else if record.record_type() == record_type {
                rrset.records.push(record.clone());
            }
        }

        rrset
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn min_ttl(&self) -> u32 {
        self.records.iter().map(Record::ttl).min().unwrap_or(0)
    }
}

enum Delegation {
    Secure,
    NotZoneCut,
}

/// Walks the chain of trust from the closest trust anchor down to a zone.
///
/// Keys validated during a walk are kept for the lifetime of the verifier
/// (one response) and in the shared [`DnssecCache`] for their TTL.
pub struct ChainVerifier<'a> {
    client: &'a UpstreamClient,
    trust_store: &'a TrustAnchorStore,
    cache: &'a DnssecCache,
    crypto_verifier: SignatureVerifier,
    now: u32,

    validated_keys: HashMap<String, Arc<[DnskeyRecord]>>,

    verdicts: HashMap<String, ValidationOutcome>,
}

impl<'a> ChainVerifier<'a> {
    pub fn new(
        client: &'a UpstreamClient,
        trust_store: &'a TrustAnchorStore,
        cache: &'a DnssecCache,
        now: u32,
    ) -> Self {
        Self {
            client,
            trust_store,
            cache,
            crypto_verifier: SignatureVerifier,
            now,
            validated_keys: HashMap::new(),
            verdicts: HashMap::new(),
        }
    }

    pub async fn verify_chain(&mut self, zone: &str) -> ValidationOutcome {
        let zone = to_fqdn(zone);
        if let Some(outcome) = self.verdicts.get(&zone) {
            return outcome.clone();
        }

        let outcome = self.walk(&zone).await;
        debug!(zone = %zone, status = outcome.result.as_str(), "Chain of trust evaluated");
        self.verdicts.insert(zone, outcome.clone());
        outcome
    }

    /// Verify an RRset against the already validated keys of `signer_zone`.
    pub fn verify_rrset(&self, owner: &str, rrset: &SignedRrset, signer_zone: &str) -> bool {
        match self.validated_keys.get(signer_zone) {
            Some(keys) => self.rrset_verifies(rrset, owner, signer_zone, keys),
            None => {
                debug!(zone = %signer_zone, "No trusted keys for signer zone");
                false
            }
        }
    }

    async fn walk(&mut self, zone: &str) -> ValidationOutcome {
        let Some(anchor_zone) = self
            .trust_store
            .closest_anchor_zone(zone)
            .map(str::to_string)
        else {
            debug!(zone = %zone, "No trust anchor covers zone");
            return ValidationOutcome::indeterminate();
        };

        if let Err(e) = self.validate_anchor_zone(&anchor_zone).await {
            warn!(zone = %anchor_zone, error = %e, "Trust anchor zone failed validation");
            return ValidationOutcome::bogus(format!("{}: {}", anchor_zone, e));
        }

        let mut parent = anchor_zone;
        for child in zones_between(&parent, zone) {
            match self.validate_delegation(&parent, &child).await {
                Ok(Delegation::Secure) => {
                    debug!(parent = %parent, child = %child, "Delegation validated");
                    parent = child;
                }
                Ok(Delegation::NotZoneCut) => {
                    debug!(name = %child, "Not a zone cut");
                }
                Err(DomainError::InsecureDelegation) => {
                    debug!(
                        parent = %parent,
                        child = %child,
                        "Insecure delegation: chain is unsigned below this point"
                    );
                    return ValidationOutcome::insecure();
                }
                Err(e) => {
                    warn!(
                        parent = %parent,
                        child = %child,
                        error = %e,
                        "Delegation validation failed"
                    );
                    return ValidationOutcome::bogus(format!("{} -> {}: {}", parent, child, e));
                }
            }
        }

        ValidationOutcome::secure()
    }

    /// The anchored zone's DNSKEY RRset must contain an anchor key and carry
    /// a signature made with it.
    async fn validate_anchor_zone(&mut self, zone: &str) -> Result<(), DomainError> {
        if self.validated_keys.contains_key(zone) {
            return Ok(());
        }
        if let Some(keys) = self.cache.get_dnskey(zone) {
            self.validated_keys.insert(zone.to_string(), keys);
            return Ok(());
        }

        let rrset = self.fetch_rrset(zone, RecordType::DNSKEY).await?;
        let keys: Vec<DnskeyRecord> = rrset
            .records
            .iter()
            .filter_map(|record| DnskeyRecord::from_rdata(record.data()))
            .collect();

        let anchored: Vec<DnskeyRecord> = keys
            .iter()
            .filter(|key| self.trust_store.is_trusted(key, zone))
            .cloned()
            .collect();

        if anchored.is_empty() {
            return Err(DomainError::InvalidDnsResponse(
                "no DNSKEY matches a configured trust anchor".into(),
            ));
        }
        for key in &anchored {
            debug!(zone = %zone, key = %key, "Trust anchor key published");
        }

        if !self.rrset_verifies(&rrset, zone, zone, &anchored) {
            return Err(DomainError::InvalidDnsResponse(
                "DNSKEY RRset is not signed by the trust anchor".into(),
            ));
        }

        let keys: Arc<[DnskeyRecord]> = Arc::from(keys);
        self.cache.cache_dnskey(zone, Arc::clone(&keys), rrset.min_ttl());
        self.validated_keys.insert(zone.to_string(), keys);
        Ok(())
    }

    async fn validate_delegation(
        &mut self,
        parent: &str,
        child: &str,
    ) -> Result<Delegation, DomainError> {
        let parent_keys = self.validated_keys.get(parent).cloned().ok_or_else(|| {
            DomainError::InvalidDnsResponse(format!("no validated keys for {}", parent))
        })?;

        let ds_records = match self.cache.get_ds(child) {
            Some(records) => records,
            None => {
                let rrset = self.fetch_rrset(child, RecordType::DS).await?;

                if rrset.is_empty() {
                    return if self.is_zone_cut(child).await? {
                        Err(DomainError::InsecureDelegation)
                    } else {
                        Ok(Delegation::NotZoneCut)
                    };
                }

                if !self.rrset_verifies(&rrset, child, parent, &parent_keys) {
                    return Err(DomainError::InvalidDnsResponse(format!(
                        "DS RRset is not signed by {}",
                        parent
                    )));
                }

                let records: Arc<[DsRecord]> = rrset
                    .records
                    .iter()
                    .filter_map(|record| DsRecord::from_rdata(record.data()))
                    .collect::<Vec<_>>()
                    .into();
                self.cache.cache_ds(child, Arc::clone(&records), rrset.min_ttl());
                records
            }
        };

        let usable = ds_records.iter().any(|ds| {
            SignatureVerifier::supports_digest(ds.digest_type)
                && SignatureVerifier::supports_algorithm(ds.algorithm)
        });
        if !usable {
            debug!(zone = %child, "No DS record uses a supported algorithm");
            return Err(DomainError::InsecureDelegation);
        }

        if self.validated_keys.contains_key(child) {
            return Ok(Delegation::Secure);
        }
        if let Some(keys) = self.cache.get_dnskey(child) {
            self.validated_keys.insert(child.to_string(), keys);
            return Ok(Delegation::Secure);
        }

        let dnskey_rrset = self.fetch_rrset(child, RecordType::DNSKEY).await?;
        let keys: Vec<DnskeyRecord> = dnskey_rrset
            .records
            .iter()
            .filter_map(|record| DnskeyRecord::from_rdata(record.data()))
            .collect();

        if keys.is_empty() {
            return Err(DomainError::InvalidDnsResponse(
                "No DNSKEY records found".into(),
            ));
        }

        let matched: Vec<DnskeyRecord> = keys
            .iter()
            .filter(|key| {
                ds_records.iter().any(|ds| {
                    match self.crypto_verifier.verify_ds(ds, key, child) {
                        Ok(matches) => matches,
                        Err(e) => {
                            debug!(zone = %child, error = %e, "DS check skipped");
                            false
                        }
                    }
                })
            })
            .cloned()
            .collect();

        if matched.is_empty() {
            for ds in ds_records.iter() {
                debug!(zone = %child, ds = %ds, "DS matches no published DNSKEY");
            }
            return Err(DomainError::InvalidDnsResponse(
                "No matching DNSKEY for DS".into(),
            ));
        }

        if !self.rrset_verifies(&dnskey_rrset, child, child, &matched) {
            return Err(DomainError::InvalidDnsResponse(
                "DNSKEY RRSIG verification failed".into(),
            ));
        }

        let keys: Arc<[DnskeyRecord]> = Arc::from(keys);
        self.cache
            .cache_dnskey(child, Arc::clone(&keys), dnskey_rrset.min_ttl());
        self.validated_keys.insert(child.to_string(), keys);

        Ok(Delegation::Secure)
    }

    /// A name is a zone cut when it owns an SOA record.
    async fn is_zone_cut(&self, name: &str) -> Result<bool, DomainError> {
        let owner = Self::parse_name(name)?;
        let exchange = self.client.query(&owner, RecordType::SOA).await?;

        Ok(exchange
            .response
            .message
            .answers()
            .iter()
            .any(|record| record.record_type() == RecordType::SOA && record.name() == &owner))
    }

    async fn fetch_rrset(
        &self,
        owner: &str,
        record_type: RecordType,
    ) -> Result<SignedRrset, DomainError> {
        let name = Self::parse_name(owner)?;
        let exchange = self.client.query(&name, record_type).await?;

        let rrset = SignedRrset::collect(exchange.response.message.answers(), &name, record_type);
        debug!(
            owner = %owner,
            record_type = %record_type,
            records = rrset.records.len(),
            rrsigs = rrset.rrsigs.len(),
            "Fetched RRset"
        );
        Ok(rrset)
    }

    fn rrset_verifies(
        &self,
        rrset: &SignedRrset,
        owner: &str,
        signer_zone: &str,
        keys: &[DnskeyRecord],
    ) -> bool {
        for rrsig in &rrset.rrsigs {
            if to_fqdn(&rrsig.signer_name) != signer_zone {
                continue;
            }
            for key in keys {
                match self
                    .crypto_verifier
                    .verify_rrsig(rrsig, key, owner, &rrset.records, self.now)
                {
                    Ok(true) => {
                        debug!(owner = %owner, rrsig = %rrsig, key = %key, "RRSIG verified");
                        return true;
                    }
                    Ok(false) => {}
                    Err(e) => debug!(owner = %owner, rrsig = %rrsig, error = %e, "RRSIG not usable"),
                }
            }
        }
        false
    }

    fn parse_name(name: &str) -> Result<Name, DomainError> {
        Name::from_str(name)
            .map_err(|e| DomainError::InvalidDomainName(format!("{}: {}", name, e)))
    }
}
