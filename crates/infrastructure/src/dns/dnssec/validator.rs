use super::cache::{CacheStatsSnapshot, DnssecCache};
use super::trust_anchor::TrustAnchorStore;
use super::types::RrsigRecord;
use super::validation::{ChainVerifier, SignedRrset, ValidationOutcome};
use super::zone::{is_subdomain, to_fqdn};
use crate::dns::forwarding::{AnswerChain, DnsResponse};
use crate::dns::upstream::UpstreamClient;
use hickory_proto::rr::{Name, Record, RecordType};
use std::sync::Arc;
use tracing::{debug, warn};

/// Judges a response against the configured trust anchors.
///
/// Only RRsets owned by the query name or a CNAME target reached from it are
/// judged; anything else in the answer section is ignored. Each of those
/// RRsets is checked on its own: its signer zone must chain up to an anchor
/// and its RRSIG must verify with that zone's keys. Negative answers are
/// judged through the authority SOA. The worst verdict wins.
pub struct DnssecValidator {
    trust_store: TrustAnchorStore,

    cache: Arc<DnssecCache>,
}

impl DnssecValidator {
    pub fn new(trust_store: TrustAnchorStore, cache: Arc<DnssecCache>) -> Self {
        Self { trust_store, cache }
    }

    pub fn trust_store(&self) -> &TrustAnchorStore {
        &self.trust_store
    }

    pub fn trust_store_mut(&mut self) -> &mut TrustAnchorStore {
        &mut self.trust_store
    }

    pub async fn validate(
        &self,
        client: &UpstreamClient,
        qname: &Name,
        record_type: RecordType,
        response: &DnsResponse,
    ) -> ValidationOutcome {
        if self.trust_store.is_empty() {
            return ValidationOutcome::indeterminate();
        }
        if !response.is_validatable() {
            debug!(qname = %qname, rcode = ?response.rcode, "Response code is not validatable");
            return ValidationOutcome::indeterminate();
        }

        let mut chain = ChainVerifier::new(client, &self.trust_store, &self.cache, unix_now());
        let answer_chain = response.answer_chain(qname, record_type);
        let rrsets = group_rrsets(response.message.answers(), &answer_chain, record_type);
        let kept: usize = rrsets
            .iter()
            .map(|(_, rrset)| rrset.records.len() + rrset.rrsigs.len())
            .sum();
        let ignored = response.message.answers().len().saturating_sub(kept);
        if ignored > 0 {
            debug!(qname = %qname, ignored, "Ignoring answer records off the CNAME chain");
        }

        let outcome = if rrsets.is_empty() && ignored > 0 {
            Self::validate_unrelated(&mut chain, qname).await
        } else if rrsets.is_empty() {
            Self::validate_negative(&mut chain, qname, response).await
        } else {
            let mut outcome = ValidationOutcome::secure();
            for ((owner, record_type), rrset) in &rrsets {
                let verdict = Self::validate_rrset(&mut chain, owner, *record_type, rrset).await;
                outcome = outcome.merge(verdict);
            }
            outcome
        };

        if let Some(reason) = &outcome.reason {
            warn!(qname = %qname, reason = %reason, "Response is bogus");
        }
        debug!(
            qname = %qname,
            rrsets = rrsets.len(),
            status = outcome.result.as_str(),
            "DNSSEC validation completed"
        );

        outcome
    }

    pub fn cache_stats(&self) -> CacheStatsSnapshot {
        self.cache.stats()
    }

    async fn validate_rrset(
        chain: &mut ChainVerifier<'_>,
        owner: &Name,
        record_type: RecordType,
        rrset: &SignedRrset,
    ) -> ValidationOutcome {
        let owner_text = to_fqdn(&owner.to_string());

        let Some(first) = rrset.rrsigs.first() else {
            let walk = chain.verify_chain(&owner_text).await;
            return if walk.is_secure() {
                ValidationOutcome::bogus(format!(
                    "{} {} is unsigned in a signed zone",
                    owner_text, record_type
                ))
            } else {
                walk
            };
        };

        let signer = to_fqdn(&first.signer_name);
        if !is_subdomain(&owner_text, &signer) {
            return ValidationOutcome::bogus(format!(
                "signer {} is not an ancestor of {}",
                signer, owner_text
            ));
        }

        let walk = chain.verify_chain(&signer).await;
        if !walk.is_secure() {
            return walk;
        }

        if chain.verify_rrset(&owner_text, rrset, &signer) {
            ValidationOutcome::secure()
        } else {
            ValidationOutcome::bogus(format!(
                "no valid RRSIG over {} {} from {}",
                owner_text, record_type, signer
            ))
        }
    }

    /// Records were returned, but none of them belongs to the question.
    async fn validate_unrelated(chain: &mut ChainVerifier<'_>, qname: &Name) -> ValidationOutcome {
        let walk = chain.verify_chain(&qname.to_string()).await;
        if walk.is_secure() {
            ValidationOutcome::bogus(format!("no answer record belongs to {}", qname))
        } else {
            walk
        }
    }

    async fn validate_negative(
        chain: &mut ChainVerifier<'_>,
        qname: &Name,
        response: &DnsResponse,
    ) -> ValidationOutcome {
        let authority = response.message.name_servers();
        let soa_owner = authority
            .iter()
            .find(|record| record.record_type() == RecordType::SOA)
            .map(|record| record.name().clone());

        let Some(soa_owner) = soa_owner else {
            let walk = chain.verify_chain(&qname.to_string()).await;
            return if walk.is_secure() {
                ValidationOutcome::bogus(format!("negative answer for {} carries no SOA", qname))
            } else {
                walk
            };
        };

        let rrset = SignedRrset::collect(authority, &soa_owner, RecordType::SOA);
        Self::validate_rrset(chain, &soa_owner, RecordType::SOA, &rrset).await
    }
}

/// Split the part of a section that answers the question into RRsets keyed
/// by owner and type, attaching each RRSIG to the RRset it covers. Only the
/// chain's CNAMEs and `qtype` records owned by a chain name are kept. Packet
/// order is kept.
fn group_rrsets(
    section: &[Record],
    chain: &AnswerChain,
    qtype: RecordType,
) -> Vec<((Name, RecordType), SignedRrset)> {
    let mut rrsets: Vec<((Name, RecordType), SignedRrset)> = Vec::new();

    for record in section {
        let rrsig = RrsigRecord::from_rdata(record.data());
        let record_type = match &rrsig {
            Some(rrsig) => rrsig.type_covered,
            None => record.record_type(),
        };
        if !chain.contains(record.name())
            || (record_type != qtype && record_type != RecordType::CNAME)
        {
            continue;
        }

        let position = rrsets
            .iter()
            .position(|((owner, rtype), _)| owner == record.name() && *rtype == record_type);
        let index = match position {
            Some(index) => index,
            None => {
                rrsets.push(((record.name().clone(), record_type), SignedRrset::default()));
                rrsets.len() - 1
            }
        };

        let rrset = &mut rrsets[index].1;
        match rrsig {
            Some(rrsig) => rrset.rrsigs.push(rrsig),
            None => rrset.records.push(record.clone()),
        }
    }

    // A group holding only signatures has nothing to validate.
    rrsets.retain(|(_, rrset)| !rrset.is_empty());
    rrsets
}

fn unix_now() -> u32 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(0)
}
