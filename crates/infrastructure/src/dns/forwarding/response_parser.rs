use ferrous_dnsq_domain::DomainError;
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordType};
use tracing::debug;

/// Longest CNAME chain followed inside one answer section.
const MAX_CNAME_CHAIN: usize = 16;

#[derive(Debug, Clone)]
pub struct DnsResponse {
    pub rcode: ResponseCode,

    pub truncated: bool,

    pub message: Message,
}

/// Owners that answer a question: the query name and every CNAME target
/// reached from it, in chain order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerChain {
    pub owners: Vec<Name>,
}

impl AnswerChain {
    pub fn contains(&self, owner: &Name) -> bool {
        self.owners.iter().any(|name| name == owner)
    }

    /// Final CNAME target, when the query name is an alias.
    pub fn target(&self) -> Option<&Name> {
        match self.owners.as_slice() {
            [_, .., last] => Some(last),
            _ => None,
        }
    }
}

impl DnsResponse {
    /// The reply carries exactly the question that was sent.
    pub fn answers_question(&self, name: &Name, record_type: RecordType) -> bool {
        match self.message.queries() {
            [query] => {
                query.name() == name
                    && query.query_type() == record_type
                    && query.query_class() == DNSClass::IN
            }
            _ => false,
        }
    }

    /// Follow CNAME records from `qname`. A question for CNAME itself is not
    /// chased.
    pub fn answer_chain(&self, qname: &Name, record_type: RecordType) -> AnswerChain {
        let mut owners = vec![qname.clone()];
        if record_type == RecordType::CNAME {
            return AnswerChain { owners };
        }

        while owners.len() <= MAX_CNAME_CHAIN {
            let Some(current) = owners.last() else { break };
            let target = self.message.answers().iter().find_map(|record| {
                match record.data() {
                    RData::CNAME(cname) if record.name() == current => Some(cname.0.clone()),
                    _ => None,
                }
            });

            match target {
                Some(target) if !owners.contains(&target) => owners.push(target),
                _ => break,
            }
        }

        AnswerChain { owners }
    }

    /// Answer records of `record_type` owned by a name on `chain`, in packet
    /// order.
    pub fn chain_answers<'a>(
        &'a self,
        chain: &'a AnswerChain,
        record_type: RecordType,
    ) -> impl Iterator<Item = &'a Record> {
        self.message
            .answers()
            .iter()
            .filter(move |record| record.record_type() == record_type && chain.contains(record.name()))
    }

    /// Negative-caching TTL from the authority SOA (RFC 2308 §5).
    pub fn negative_ttl(&self) -> Option<u32> {
        self.message
            .name_servers()
            .iter()
            .find_map(|record| match record.data() {
                RData::SOA(soa) => Some(record.ttl().min(soa.minimum())),
                _ => None,
            })
    }

    pub fn is_nxdomain(&self) -> bool {
        self.rcode == ResponseCode::NXDomain
    }

    pub fn is_validatable(&self) -> bool {
        matches!(self.rcode, ResponseCode::NoError | ResponseCode::NXDomain)
    }
}

pub struct ResponseParser;

impl ResponseParser {
    pub fn parse(response_bytes: &[u8]) -> Result<DnsResponse, DomainError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        let rcode = message.response_code();
        let truncated = message.truncated();

        debug!(
            rcode = ?rcode,
            answers = message.answers().len(),
            authority = message.name_servers().len(),
            truncated,
            "DNS response parsed"
        );

        Ok(DnsResponse {
            rcode,
            truncated,
            message,
        })
    }
}
