use ferrous_dnsq_domain::{DomainError, EngineStatus, SecurityIndicator};

/// Result bundle produced by a successful engine call.
///
/// `answers` holds the RDATA of each answer record, in the order the engine
/// returned them. `packet` is the full response message in wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResolution {
    pub rcode: u16,
    pub security: SecurityIndicator,
    pub ttl: u32,
    pub answers: Vec<Vec<u8>>,
    pub packet: Vec<u8>,
    pub canonical_name: Option<String>,
    /// Reason for a bogus verdict. Diagnostic only.
    pub why_bogus: Option<String>,
}

impl RawResolution {
    pub fn new(rcode: u16, security: SecurityIndicator, ttl: u32, packet: Vec<u8>) -> Self {
        Self {
            rcode,
            security,
            ttl,
            answers: Vec::new(),
            packet,
            canonical_name: None,
            why_bogus: None,
        }
    }

    pub fn with_answers(mut self, answers: Vec<Vec<u8>>) -> Self {
        self.answers = answers;
        self
    }
}

/// Dual outcome of an engine call: an operation status and, when the status
/// is zero, the result bundle.
#[derive(Debug, Clone)]
pub struct EngineResponse {
    pub status: EngineStatus,
    pub resolution: Option<RawResolution>,
    pub detail: Option<String>,
}

impl EngineResponse {
    pub fn ok(resolution: RawResolution) -> Self {
        Self {
            status: EngineStatus::OK,
            resolution: Some(resolution),
            detail: None,
        }
    }

    pub fn failed(status: EngineStatus, detail: impl Into<String>) -> Self {
        Self {
            status,
            resolution: None,
            detail: Some(detail.into()),
        }
    }
}

/// DNSSEC-validating resolution engine.
///
/// Configuration and trust anchors are written during setup only; `resolve`
/// takes `&self` and blocks until the engine has an outcome.
pub trait ValidatingEngine: Send + Sync {
    fn load_resolver_config(&mut self, path: &str) -> Result<(), DomainError>;

    fn add_trust_anchor(&mut self, anchor: &str) -> Result<(), DomainError>;

    fn resolve(&self, qname: &str, qtype: u16, qclass: u16) -> EngineResponse;
}
