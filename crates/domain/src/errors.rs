use crate::dns_security::EngineStatus;
use std::fmt;
use thiserror::Error;

/// Which decoding step of a query result failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireStage {
    Message,
    Answer { index: usize },
}

impl fmt::Display for WireStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireStage::Message => write!(f, "response message"),
            WireStage::Answer { index } => write!(f, "answer record #{}", index),
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Resolver configuration error: {0}")]
    ResolverConfig(String),

    #[error("Invalid trust anchor: {0}")]
    InvalidTrustAnchor(String),

    #[error("Unknown record type: {0}")]
    UnknownRecordType(String),

    #[error("Resolution failed with engine status {status}: {reason}")]
    ResolutionFailed { status: EngineStatus, reason: String },

    #[error("Malformed wire data in {stage}: {reason}")]
    MalformedWire { stage: WireStage, reason: String },

    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Insecure DNSSEC delegation: no DS records")]
    InsecureDelegation,

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Transport timeout connecting to {server}")]
    TransportTimeout { server: String },

    #[error("All upstream servers are unreachable")]
    TransportAllServersUnreachable,
}

impl DomainError {
    /// Errors raised while preparing a resolution context. A session that
    /// hits one of these must not go on to issue queries.
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            DomainError::ResolverConfig(_) | DomainError::InvalidTrustAnchor(_)
        )
    }

    /// Errors scoped to a single query; the context stays usable.
    pub fn is_query_error(&self) -> bool {
        matches!(
            self,
            DomainError::UnknownRecordType(_)
                | DomainError::ResolutionFailed { .. }
                | DomainError::MalformedWire { .. }
        )
    }
}
