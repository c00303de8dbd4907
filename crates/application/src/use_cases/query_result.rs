use crate::ports::{ValidatingEngine, WireCodec};
use crate::use_cases::ResolutionContext;
use ferrous_dnsq_domain::{rcode_to_text, DnsQuery, DomainError, WireStage};
use std::borrow::Cow;
use std::fmt;
use tracing::{debug, warn};

/// Outcome of one validated resolution, fully decoded.
///
/// Built only by [`QueryResult::resolve`]; there is no partially decoded
/// state. `answers[i]` is decoded from `answers_raw[i]`.
pub struct QueryResult<C: WireCodec> {
    query: DnsQuery,
    rcode: u16,
    secure: bool,
    ttl: u32,
    answers_raw: Vec<Vec<u8>>,
    answers: Vec<C::Record>,
    message: C::Message,
}

impl<C: WireCodec> QueryResult<C> {
    pub fn resolve<E: ValidatingEngine>(
        context: &ResolutionContext<E>,
        codec: &C,
        qname: &str,
        qtype_text: &str,
    ) -> Result<Self, DomainError> {
        let qtype = codec.type_code(qtype_text)?;
        let query = DnsQuery::new(qname, qtype, qtype_text);

        debug!(domain = %query.qname, record_type = %query.qtype_text, "Resolving");

        let response = context
            .engine()
            .resolve(&query.qname, query.qtype, query.qclass.code());

        if !response.status.is_ok() {
            let reason = response
                .detail
                .unwrap_or_else(|| response.status.describe().to_string());
            warn!(domain = %query.qname, status = %response.status, reason = %reason, "Resolution failed");
            return Err(DomainError::ResolutionFailed {
                status: response.status,
                reason,
            });
        }

        let Some(raw) = response.resolution else {
            return Err(DomainError::ResolutionFailed {
                status: response.status,
                reason: "engine returned no result".to_string(),
            });
        };

        let secure = raw.security.is_secure();
        if let Some(why) = &raw.why_bogus {
            warn!(domain = %query.qname, security = %raw.security, reason = %why, "DNSSEC validation failed");
        }
        if let Some(cname) = &raw.canonical_name {
            debug!(domain = %query.qname, canonical_name = %cname, "Followed CNAME chain");
        }

        let message = codec
            .decode_message(&raw.packet)
            .map_err(|e| DomainError::MalformedWire {
                stage: WireStage::Message,
                reason: e.to_string(),
            })?;

        let answers = raw
            .answers
            .iter()
            .enumerate()
            .map(|(index, bytes)| {
                codec
                    .decode_record(query.qclass.code(), qtype, bytes, 0, bytes.len())
                    .map_err(|e| DomainError::MalformedWire {
                        stage: WireStage::Answer { index },
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            domain = %query.qname,
            rcode = raw.rcode,
            secure,
            ttl = raw.ttl,
            answers = answers.len(),
            "Resolution decoded"
        );

        Ok(Self {
            query,
            rcode: raw.rcode,
            secure,
            ttl: raw.ttl,
            answers_raw: raw.answers,
            answers,
            message,
        })
    }

    pub fn query(&self) -> &DnsQuery {
        &self.query
    }

    pub fn rcode(&self) -> u16 {
        self.rcode
    }

    pub fn rcode_text(&self) -> Cow<'static, str> {
        rcode_to_text(self.rcode)
    }

    /// True only when the engine authenticated the answer. Insecure, bogus
    /// and indeterminate answers all report `false`.
    pub fn secure(&self) -> bool {
        self.secure
    }

    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    pub fn answers_raw(&self) -> &[Vec<u8>] {
        &self.answers_raw
    }

    pub fn answers(&self) -> &[C::Record] {
        &self.answers
    }

    pub fn message(&self) -> &C::Message {
        &self.message
    }
}

impl<C: WireCodec> fmt::Display for QueryResult<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Result: {} {}", self.query.qname, self.query.qtype_text)
    }
}

impl<C: WireCodec> fmt::Debug for QueryResult<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryResult")
            .field("query", &self.query)
            .field("rcode", &self.rcode)
            .field("secure", &self.secure)
            .field("ttl", &self.ttl)
            .field("answers_raw", &self.answers_raw)
            .field("answers", &self.answers)
            .field("message", &self.message)
            .finish()
    }
}
